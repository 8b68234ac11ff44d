use crate::core::{ContactNotification, ContactSubmission, MailRelay, ValidatedContact};
use crate::utils::email::is_valid_email;
use crate::utils::error::{ContactError, ErrorCategory, Result};
use std::sync::Arc;

/// Gates outbound mail: required fields first, then the address check, then
/// exactly one relay call.
pub struct ContactService<R: MailRelay + ?Sized> {
    relay: Arc<R>,
}

impl<R: MailRelay + ?Sized> Clone for ContactService<R> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
        }
    }
}

impl<R: MailRelay + ?Sized> ContactService<R> {
    pub fn new(relay: Arc<R>) -> Self {
        Self { relay }
    }

    /// 檢查必填欄位與 email 格式，不做任何修正
    pub fn validate(&self, submission: ContactSubmission) -> Result<ValidatedContact> {
        let ContactSubmission {
            name,
            email,
            subject,
            message,
        } = submission;

        let (name, email, message) = match (present(name), present(email), present(message)) {
            (Some(name), Some(email), Some(message)) => (name, email, message),
            _ => return Err(ContactError::MissingFields),
        };

        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail { email });
        }

        Ok(ValidatedContact {
            name,
            email,
            subject: present(subject),
            message,
        })
    }

    pub async fn submit(&self, submission: ContactSubmission) -> Result<()> {
        let contact = match self.validate(submission) {
            Ok(contact) => contact,
            Err(e) => {
                tracing::info!("Rejected contact submission: {}", e.user_friendly_message());
                return Err(e);
            }
        };

        tracing::debug!("Relaying contact message from <{}>", contact.email);
        let notification = ContactNotification::from(&contact);

        self.relay
            .deliver(&notification)
            .await
            .map_err(|e| match e.category() {
                ErrorCategory::Delivery => e,
                _ => ContactError::delivery(e.to_string()),
            })?;

        tracing::info!("📧 Contact message from {} delivered", contact.name);
        Ok(())
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}
