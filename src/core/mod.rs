pub mod contact;

pub use crate::domain::model::{
    ContactNotification, ContactSubmission, SubmissionResponse, ValidatedContact,
};
pub use crate::domain::ports::{ConfigProvider, MailRelay};
pub use crate::utils::error::Result;
