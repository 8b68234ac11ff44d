// Adapters layer: concrete implementations for external systems (HTTP surface, SMTP relay).

pub mod http;
pub mod smtp;
