//! Text-generation collaborator
//!
//! Used best-effort: callers substitute fixed text when a completion fails.

pub mod anthropic;

pub use anthropic::AnthropicProvider;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion API key not configured")]
    MissingApiKey,

    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Completion API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode completion response: {0}")]
    Decode(String),

    #[error("Completion response contained no text")]
    EmptyResponse,
}

/// Text-generation provider
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a user prompt under a system prompt
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, CompletionError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
