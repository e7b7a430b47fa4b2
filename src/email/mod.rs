// Email delivery
//
// - resend: HTTP client for the Resend API
// - messages: diagnosis, internal notification, proposal and test emails

pub mod messages;
pub mod resend;

pub use messages::EmailComposer;
pub use resend::ResendClient;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("RESEND_API_KEY no está configurada")]
    MissingApiKey,

    #[error("No recipient configured for {0}")]
    MissingRecipient(&'static str),

    #[error("Email request failed: {0}")]
    Transport(String),

    #[error("Email API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to render email: {0}")]
    Render(String),
}

/// A message ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    /// Sender; the provider's configured default when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            from: None,
            to: vec![to.into()],
            subject: subject.into(),
            html: html.into(),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Email delivery provider
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a message; returns the provider's message id when given one
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError>;
}
