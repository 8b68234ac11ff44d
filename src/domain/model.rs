use serde::{Deserialize, Serialize};

/// JSON body of `POST /send-email`. Every field may be absent on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A submission whose required fields are present and whose address passed
/// the email validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// The message handed to the mail relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNotification {
    /// Visitor address, used as `Reply-To`.
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl From<&ValidatedContact> for ContactNotification {
    fn from(contact: &ValidatedContact) -> Self {
        let subject = match &contact.subject {
            Some(topic) => format!("Contact Form Message from {}: {}", contact.name, topic),
            None => format!("Contact Form Message from {}", contact.name),
        };

        let mut text_body = format!("Name: {}\nEmail: {}\n", contact.name, contact.email);
        let mut html_body = format!(
            "<p><strong>Name:</strong> {}</p>\n<p><strong>Email:</strong> {}</p>\n",
            escape_html(&contact.name),
            escape_html(&contact.email)
        );
        if let Some(topic) = &contact.subject {
            text_body.push_str(&format!("Subject: {}\n", topic));
            html_body.push_str(&format!(
                "<p><strong>Subject:</strong> {}</p>\n",
                escape_html(topic)
            ));
        }
        text_body.push_str(&format!("Message: {}", contact.message));
        html_body.push_str(&format!(
            "<p><strong>Message:</strong> {}</p>",
            escape_html(&contact.message).replace('\n', "<br>")
        ));

        Self {
            reply_to: contact.email.clone(),
            subject,
            text_body,
            html_body,
        }
    }
}

/// Body returned for every submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "Email sent successfully!".to_string(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(detail.into()),
        }
    }
}

/// SMTP 連線安全模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    Starttls,
    /// Implicit TLS (port 465)
    Tls,
    /// No encryption, for local test relays only
    #[serde(rename = "none")]
    #[value(name = "none")]
    Plain,
}

impl SmtpSecurity {
    /// Port used when none is configured.
    pub fn default_port(self) -> u16 {
        match self {
            SmtpSecurity::Tls => 465,
            SmtpSecurity::Starttls | SmtpSecurity::Plain => 587,
        }
    }
}

/// Everything the SMTP relay needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: SmtpSecurity,
    pub timeout_seconds: u64,
    /// Sender mailbox; the authenticated user unless overridden.
    pub from: String,
    /// Fixed recipient of every notification.
    pub to: String,
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
