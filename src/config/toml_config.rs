use crate::core::ConfigProvider;
use crate::domain::model::{SmtpSecurity, SmtpSettings};
use crate::utils::error::{ContactError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::retry::{Backoff, RetryPolicy};
use crate::utils::validation::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is a valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub smtp: SmtpSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSection {
    pub host: String,
    pub port: Option<u16>,
    pub security: Option<SmtpSecurity>,
    pub username: String,
    pub password: String,
    pub from: Option<String>,
    pub recipient: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub attempts: u32,
    pub delay_ms: u64,
    pub backoff: Backoff,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 500,
            backoff: Backoff::Exponential,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: LogFormat,
    pub verbose: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContactError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ContactError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EMAIL_PASS})，找不到的保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.bind", &self.server.bind)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_path("server.static_dir", &self.server.static_dir)?;

        validate_non_empty_string("smtp.host", &self.smtp.host)?;
        if let Some(port) = self.smtp.port {
            validate_range("smtp.port", port, 1, u16::MAX)?;
        }
        if let Some(timeout) = self.smtp.timeout_seconds {
            validate_positive_number("smtp.timeout_seconds", timeout, 1)?;
        }

        // 未替換的 ${VAR} 代表環境變數沒有設定
        for (field, value) in [
            ("smtp.username", &self.smtp.username),
            ("smtp.password", &self.smtp.password),
        ] {
            if ENV_PLACEHOLDER.is_match(value) {
                return Err(ContactError::MissingConfigError {
                    field: format!("{} ({})", field, value),
                });
            }
            validate_non_empty_string(field, value)?;
        }

        validate_email_address("smtp.username", &self.smtp.username)?;
        if let Some(from) = &self.smtp.from {
            validate_email_address("smtp.from", from)?;
        }
        if let Some(recipient) = &self.smtp.recipient {
            validate_email_address("smtp.recipient", recipient)?;
        }

        self.retry_policy().validate()
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn port(&self) -> u16 {
        self.server.port
    }

    fn static_dir(&self) -> &str {
        &self.server.static_dir
    }

    fn smtp_settings(&self) -> SmtpSettings {
        let security = self.smtp.security.unwrap_or_default();
        SmtpSettings {
            host: self.smtp.host.clone(),
            port: self.smtp.port.unwrap_or_else(|| security.default_port()),
            username: self.smtp.username.clone(),
            password: self.smtp.password.clone(),
            security,
            timeout_seconds: self.smtp.timeout_seconds.unwrap_or(10),
            from: self
                .smtp
                .from
                .clone()
                .unwrap_or_else(|| self.smtp.username.clone()),
            to: self
                .smtp
                .recipient
                .clone()
                .unwrap_or_else(|| self.smtp.username.clone()),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.attempts,
            Duration::from_millis(self.retry.delay_ms),
            self.retry.backoff,
        )
    }

    fn log_format(&self) -> LogFormat {
        self.logging.format
    }

    fn verbose(&self) -> bool {
        self.logging.verbose
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
