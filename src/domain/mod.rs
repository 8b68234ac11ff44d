// Domain layer: contact form models and the outbound mail port.

pub mod model;
pub mod ports;
