//! Best-effort email notifications.
//!
//! Lending operations hand finished messages to a [`NotificationDispatcher`]
//! after their transaction commits. A background worker delivers them
//! through a [`Mailer`]; delivery failures are logged and never reach the
//! request that caused them.

pub mod dispatcher;
pub mod templates;

pub use dispatcher::NotificationDispatcher;

use std::fmt;

use async_trait::async_trait;

/// A file attached to an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

/// Transport failure reported by a [`Mailer`].
#[derive(Debug)]
pub struct MailError(pub String);

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mail transport error: {}", self.0)
    }
}

impl std::error::Error for MailError {}

/// Email transport seam.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Writes messages to the tracing log instead of delivering them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    sender: String,
}

impl LogMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        if email.to.trim().is_empty() {
            return Err(MailError("empty recipient".to_string()));
        }
        tracing::info!(
            from = %self.sender,
            to = %email.to,
            subject = %email.subject,
            attachment = email.attachment.as_ref().map(|a| a.file_name.as_str()),
            "\n{}",
            email.body
        );
        Ok(())
    }
}
