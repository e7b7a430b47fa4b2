//! Anthropic Messages API provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionError, CompletionProvider};
use crate::config::CompletionConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Build from config; `None` when no API key is configured.
    pub fn from_config(config: &CompletionConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some(Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn build_request(&self, system: &str, user_message: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user_message.to_string(),
            }],
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let request = self.build_request(system_prompt, user_prompt);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .find(|text| !text.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Messages API request structure.
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Messages API response structure.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// Content block in a response; non-text blocks carry no `text`.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_key() {
        assert!(AnthropicProvider::from_config(&CompletionConfig::default()).is_none());

        let config = CompletionConfig {
            api_key: Some("sk-ant-test".to_string()),
            ..Default::default()
        };
        let provider = AnthropicProvider::from_config(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_request_shape() {
        let config = CompletionConfig {
            api_key: Some("key".to_string()),
            model: "claude-test".to_string(),
            ..Default::default()
        };
        let provider = AnthropicProvider::from_config(&config).unwrap();
        let request = provider.build_request("sys", "hola");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-test");
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hola");
    }

    #[test]
    fn test_response_skips_non_text_blocks() {
        let body = r#"{"content":[{"type":"tool_use"},{"type":"text","text":"Plan"}]}"#;
        let response: MessagesResponse = serde_json::from_str(body).unwrap();
        let text: Vec<_> = response.content.into_iter().filter_map(|b| b.text).collect();
        assert_eq!(text, vec!["Plan".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_key_fails_without_request() {
        let mut provider = AnthropicProvider::from_config(&CompletionConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        })
        .unwrap();
        provider.api_key.clear();
        let result = provider.complete("s", "u").await;
        assert!(matches!(result, Err(CompletionError::MissingApiKey)));
    }
}
