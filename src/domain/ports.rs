use crate::domain::model::{ContactNotification, SmtpSettings};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::retry::RetryPolicy;
use async_trait::async_trait;

/// Outbound mail collaborator. Called once per accepted submission.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn deliver(&self, notification: &ContactNotification) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn port(&self) -> u16;
    fn static_dir(&self) -> &str;
    fn smtp_settings(&self) -> SmtpSettings;
    fn retry_policy(&self) -> RetryPolicy;
    fn log_format(&self) -> LogFormat;
    fn verbose(&self) -> bool;
}
