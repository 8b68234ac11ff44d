use crate::domain::model::{ContactNotification, SmtpSecurity, SmtpSettings};
use crate::domain::ports::MailRelay;
use crate::utils::error::{ContactError, Result};
use crate::utils::retry::RetryPolicy;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Mail relay backed by an external SMTP server.
///
/// Every notification goes to the same configured recipient; the visitor's
/// address is carried in `Reply-To`.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    retry: RetryPolicy,
    host: String,
    port: u16,
}

impl SmtpRelay {
    pub fn new(settings: &SmtpSettings, retry: RetryPolicy) -> Result<Self> {
        let from = parse_mailbox("smtp.from", &settings.from)?;
        let to = parse_mailbox("smtp.recipient", &settings.to)?;

        let builder = match settings.security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
            SmtpSecurity::Plain => {
                tracing::warn!("⚠️ SMTP connection to {} is not encrypted", settings.host);
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        let mut builder = builder
            .port(settings.port)
            .timeout(Some(Duration::from_secs(settings.timeout_seconds)));

        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
            retry,
            host: settings.host.clone(),
            port: settings.port,
        })
    }

    /// 啟動時測試 SMTP 連線，失敗只記錄不中止
    pub async fn verify(&self) -> bool {
        match self.transport.test_connection().await {
            Ok(true) => {
                tracing::info!("✅ SMTP relay {}:{} is ready to send emails", self.host, self.port);
                true
            }
            Ok(false) => {
                tracing::error!(
                    host = %self.host,
                    port = self.port,
                    "❌ SMTP relay did not accept the connection test"
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    host = %self.host,
                    port = self.port,
                    permanent = e.is_permanent(),
                    timeout = e.is_timeout(),
                    "❌ SMTP connection error: {}",
                    e
                );
                false
            }
        }
    }

    pub fn build_message(&self, notification: &ContactNotification) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.clone());

        // lettre 的位址規則比表單驗證嚴格 (例如 local part 連續的點)，
        // 解析不了就省略 Reply-To，位址仍保留在信件內文中
        match notification.reply_to.parse::<Mailbox>() {
            Ok(reply_to) => builder = builder.reply_to(reply_to),
            Err(e) => tracing::warn!(
                "⚠️ Sending without Reply-To, '{}' is not a deliverable mailbox: {}",
                notification.reply_to,
                e
            ),
        }

        let message = builder.multipart(MultiPart::alternative_plain_html(
            notification.text_body.clone(),
            notification.html_body.clone(),
        ))?;

        Ok(message)
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn deliver(&self, notification: &ContactNotification) -> Result<()> {
        let message = self.build_message(notification)?;

        self.retry
            .run("SMTP send", || {
                let message = message.clone();
                async move {
                    let response = self.transport.send(message).await?;
                    tracing::debug!("SMTP relay answered {}", response.code());
                    Ok::<(), ContactError>(())
                }
            })
            .await
    }
}

fn parse_mailbox(field: &str, value: &str) -> Result<Mailbox> {
    value
        .parse()
        .map_err(|e: lettre::address::AddressError| ContactError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
