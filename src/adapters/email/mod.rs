//! Transactional email adapters.
//!
//! `ResendEmailSender` calls the email API; `LoggingEmailSender` is used
//! when `email.enabled` is false and only logs what would be sent.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{EmailMessage, EmailSender};

#[derive(Serialize)]
struct SendBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

pub struct ResendEmailSender {
    api_url: String,
    api_key: SecretString,
    from: String,
    http_client: reqwest::Client,
}

impl ResendEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DomainError::new(ErrorCode::EmailError, e.to_string()))?;
        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: SecretString::new(config.api_key.clone()),
            from: config.from_header(),
            http_client,
        })
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        let body = SendBody {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::new(ErrorCode::EmailError, format!("Email request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::EmailError,
                format!("Email API returned {}: {}", status, error_text),
            ));
        }
        tracing::debug!(subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Logs instead of sending.
#[derive(Debug, Default)]
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        tracing::info!(to = %message.to, subject = %message.subject, "Email delivery disabled; not sent");
        Ok(())
    }
}

/// Records messages for test assertions.
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }
}
