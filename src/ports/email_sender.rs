use async_trait::async_trait;

use crate::domain::foundation::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Transactional email. Callers treat delivery as best-effort.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError>;
}
