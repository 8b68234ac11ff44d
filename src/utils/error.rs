use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::domain::model::SubmissionResponse;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Name, email, and message are required fields")]
    MissingFields,

    #[error("Invalid email format: {email}")]
    InvalidEmail { email: String },

    #[error("Mail delivery failed: {message}")]
    Delivery { message: String },

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Delivery,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContactError {
    pub fn delivery(message: impl Into<String>) -> Self {
        ContactError::Delivery {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ContactError::MissingFields | ContactError::InvalidEmail { .. } => {
                ErrorCategory::Validation
            }
            ContactError::Delivery { .. }
            | ContactError::Smtp(_)
            | ContactError::MessageBuild(_) => ErrorCategory::Delivery,
            ContactError::ConfigError { .. }
            | ContactError::MissingConfigError { .. }
            | ContactError::InvalidConfigValueError { .. }
            | ContactError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ContactError::IoError(_) | ContactError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Delivery => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 驗證失敗屬於客戶端錯誤，其餘都是伺服器錯誤
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether a retry of the failed operation could succeed.
    ///
    /// SMTP permanent rejections (5xx replies) and message build errors are final.
    pub fn is_transient(&self) -> bool {
        match self {
            ContactError::Smtp(e) => !e.is_permanent(),
            ContactError::Delivery { .. } | ContactError::IoError(_) => true,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ContactError::MissingFields => {
                "Name, email, and message are required fields".to_string()
            }
            ContactError::InvalidEmail { .. } => "Invalid email format".to_string(),
            ContactError::Delivery { .. }
            | ContactError::Smtp(_)
            | ContactError::MessageBuild(_) => "Failed to send email".to_string(),
            ContactError::ConfigError { message } => format!("Configuration problem: {}", message),
            ContactError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            ContactError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            ContactError::ConfigValidationError { field, message } => {
                format!("Setting '{}' failed validation: {}", field, message)
            }
            ContactError::IoError(_) | ContactError::SerializationError(_) => {
                "Server error".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "檢查表單欄位與 email 格式後重新送出",
            ErrorCategory::Delivery => "確認 SMTP 主機、帳號密碼與網路連線，稍後再試",
            ErrorCategory::Configuration => "檢查命令列參數、環境變數或 TOML 設定檔",
            ErrorCategory::System => "檢查檔案權限與系統資源",
        }
    }

    pub fn to_response_body(&self) -> SubmissionResponse {
        match self.category() {
            ErrorCategory::Validation => SubmissionResponse::failure(self.user_friendly_message()),
            ErrorCategory::Delivery => {
                SubmissionResponse::failure_with_detail("Failed to send email", self.to_string())
            }
            _ => SubmissionResponse::failure_with_detail("Server error", self.to_string()),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response_body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
