pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::{router, AppState};
pub use adapters::smtp::SmtpRelay;
pub use app::server::ContactServer;
pub use config::{ServerConfig, TomlConfig};
pub use core::contact::ContactService;
pub use utils::email::is_valid_email;
pub use utils::error::{ContactError, Result};
