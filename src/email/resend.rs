// Resend API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{EmailError, EmailMessage, EmailSender};
use crate::config::EmailConfig;

/// Resend HTTP client
pub struct ResendClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    default_from: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: Option<String>,
}

impl ResendClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>, default_from: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            default_from: default_from.into(),
        }
    }

    pub fn from_config(config: &EmailConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.from.clone(),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request<'a>(&'a self, message: &'a EmailMessage) -> SendRequest<'a> {
        SendRequest {
            from: message.from.as_deref().unwrap_or(&self.default_from),
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        }
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        let api_key = self.api_key.as_ref().ok_or(EmailError::MissingApiKey)?;
        if message.to.is_empty() {
            return Err(EmailError::MissingRecipient("email"));
        }

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(api_key)
            .json(&self.build_request(message))
            .send()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Api { status, body });
        }

        let sent: SendResponse = response.json().await.unwrap_or(SendResponse { id: None });
        log::info!(
            "[email] Sent '{}' to {} ({})",
            message.subject,
            message.to.join(", "),
            sent.id.as_deref().unwrap_or("no id")
        );
        Ok(sent.id)
    }
}
