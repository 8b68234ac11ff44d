use crate::core::ConfigProvider;
use crate::domain::model::{SmtpSecurity, SmtpSettings};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::retry::{Backoff, RetryPolicy};
use crate::utils::validation::*;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "contact-relay")]
#[command(about = "Contact form endpoint that relays submissions through SMTP")]
#[command(version)]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(long, env = "CONTACT_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Directory with index.html and other static assets
    #[arg(long, env = "CONTACT_STATIC_DIR", default_value = "public")]
    pub static_dir: String,

    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// SMTP port (465 for tls, otherwise 587)
    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    #[arg(long, env = "SMTP_SECURITY", value_enum, default_value_t = SmtpSecurity::Starttls)]
    pub smtp_security: SmtpSecurity,

    #[arg(long, env = "SMTP_TIMEOUT_SECONDS", default_value = "10")]
    pub smtp_timeout: u64,

    /// SMTP account, also the sender of every notification
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    /// Where notifications are sent (defaults to EMAIL_USER)
    #[arg(long, env = "CONTACT_RECIPIENT")]
    pub recipient: Option<String>,

    #[arg(long, env = "SMTP_RETRY_ATTEMPTS", default_value = "3")]
    pub retry_attempts: u32,

    #[arg(long, env = "SMTP_RETRY_DELAY_MS", default_value = "500")]
    pub retry_delay_ms: u64,

    #[arg(long, value_enum, default_value_t = Backoff::Exponential)]
    pub retry_backoff: Backoff,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Load settings from a TOML file instead of flags
    #[arg(short, long, env = "CONTACT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConfigProvider for ServerConfig {
    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn static_dir(&self) -> &str {
        &self.static_dir
    }

    fn smtp_settings(&self) -> SmtpSettings {
        let user = self.email_user.clone().unwrap_or_default();
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self
                .smtp_port
                .unwrap_or_else(|| self.smtp_security.default_port()),
            username: user.clone(),
            password: self.email_pass.clone().unwrap_or_default(),
            security: self.smtp_security,
            timeout_seconds: self.smtp_timeout,
            from: user.clone(),
            to: self.recipient.clone().unwrap_or(user),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_delay_ms),
            self.retry_backoff,
        )
    }

    fn log_format(&self) -> LogFormat {
        self.log_format
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("bind", &self.bind)?;
        validate_range("port", self.port, 1, u16::MAX)?;
        validate_path("static_dir", &self.static_dir)?;

        validate_non_empty_string("smtp_host", &self.smtp_host)?;
        if let Some(port) = self.smtp_port {
            validate_range("smtp_port", port, 1, u16::MAX)?;
        }
        validate_positive_number("smtp_timeout", self.smtp_timeout, 1)?;

        let user = validate_required_field("email_user", &self.email_user)?;
        validate_email_address("email_user", user)?;
        let pass = validate_required_field("email_pass", &self.email_pass)?;
        validate_non_empty_string("email_pass", pass)?;

        if let Some(recipient) = &self.recipient {
            validate_email_address("recipient", recipient)?;
        }

        self.retry_policy().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ContactError;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["contact-relay"];
        argv.extend_from_slice(args);
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_and_recipient_fallback() {
        let config = parse(&["--email-user", "owner@example.com", "--email-pass", "secret"]);

        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.smtp_security, SmtpSecurity::Starttls);

        let smtp = config.smtp_settings();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.from, "owner@example.com");
        assert_eq!(smtp.to, "owner@example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_recipient_and_retry() {
        let config = parse(&[
            "--email-user",
            "owner@example.com",
            "--email-pass",
            "secret",
            "--recipient",
            "inbox@example.org",
            "--smtp-security",
            "none",
            "--retry-attempts",
            "5",
            "--retry-backoff",
            "fixed",
        ]);

        assert_eq!(config.smtp_settings().to, "inbox@example.org");
        assert_eq!(config.smtp_security, SmtpSecurity::Plain);
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff, Backoff::Fixed);
    }

    #[test]
    fn test_tls_defaults_to_port_465() {
        let config = parse(&[
            "--email-user",
            "owner@example.com",
            "--email-pass",
            "secret",
            "--smtp-security",
            "tls",
        ]);

        assert_eq!(config.smtp_port, None);
        assert_eq!(config.smtp_settings().port, 465);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_smtp_port_wins_over_security_default() {
        let config = parse(&[
            "--email-user",
            "owner@example.com",
            "--email-pass",
            "secret",
            "--smtp-security",
            "tls",
            "--smtp-port",
            "2465",
        ]);

        assert_eq!(config.smtp_settings().port, 2465);
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let mut config = parse(&[]);
        config.email_user = None;
        config.email_pass = None;
        assert!(matches!(
            config.validate(),
            Err(ContactError::MissingConfigError { field }) if field == "email_user"
        ));
    }

    #[test]
    fn test_bad_recipient_fails_validation() {
        let config = parse(&[
            "--email-user",
            "owner@example.com",
            "--email-pass",
            "secret",
            "--recipient",
            "nobody",
        ]);
        assert!(config.validate().is_err());
    }
}
