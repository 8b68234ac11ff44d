pub mod email;
pub mod error;
pub mod logger;
pub mod retry;
pub mod validation;
