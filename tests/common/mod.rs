#![allow(dead_code)]

use async_trait::async_trait;
use contact_relay::core::{ContactNotification, MailRelay};
use contact_relay::domain::model::{SmtpSecurity, SmtpSettings};
use contact_relay::utils::retry::RetryPolicy;
use contact_relay::{AppState, ContactError, Result, SmtpRelay};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// In-memory relay that records every notification it is handed.
#[derive(Default)]
pub struct RecordingRelay {
    pub sent: Mutex<Vec<ContactNotification>>,
    pub failure: Option<String>,
}

impl RecordingRelay {
    pub fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailRelay for RecordingRelay {
    async fn deliver(&self, notification: &ContactNotification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        match &self.failure {
            Some(message) => Err(ContactError::delivery(message.clone())),
            None => Ok(()),
        }
    }
}

/// Builds the real SMTP message for each notification and keeps the
/// formatted output instead of opening a connection.
pub struct MessageCapturingRelay {
    pub smtp: SmtpRelay,
    pub messages: Mutex<Vec<String>>,
}

impl MessageCapturingRelay {
    pub fn new() -> Self {
        let settings = SmtpSettings {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: "owner@example.com".to_string(),
            password: "secret".to_string(),
            security: SmtpSecurity::Plain,
            timeout_seconds: 1,
            from: "owner@example.com".to_string(),
            to: "owner@example.com".to_string(),
        };
        Self {
            smtp: SmtpRelay::new(&settings, RetryPolicy::none()).unwrap(),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailRelay for MessageCapturingRelay {
    async fn deliver(&self, notification: &ContactNotification) -> Result<()> {
        let message = self.smtp.build_message(notification)?;
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        self.messages.lock().unwrap().push(raw);
        Ok(())
    }
}

pub fn test_state(relay: Arc<dyn MailRelay>, static_dir: &Path) -> AppState {
    AppState::new(relay, static_dir)
}
