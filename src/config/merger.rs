// Configuration merging with priority

use crate::config::loader::{
    AppConfig, ClientConfig, CompletionConfig, CrmConfig, EmailConfig, ServerConfig,
    TemplateConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Partial configuration for merging
/// Uses Option<T> for all fields to support partial overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(default)]
    pub server: Option<PartialServerConfig>,
    #[serde(default)]
    pub crm: Option<PartialCrmConfig>,
    #[serde(default)]
    pub email: Option<PartialEmailConfig>,
    #[serde(default)]
    pub completion: Option<PartialCompletionConfig>,
    #[serde(default)]
    pub client: Option<PartialClientConfig>,
    #[serde(default)]
    pub templates: Option<PartialTemplateConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialServerConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialCrmConfig {
    pub base_url: Option<String>,
    pub app_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialEmailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: Option<String>,
    pub alerts_from: Option<String>,
    pub consultant_email: Option<String>,
    pub app_url: Option<String>,
    pub booking_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialCompletionConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialClientConfig {
    pub server_url: Option<String>,
    pub pending_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialTemplateConfig {
    pub templates_dir: Option<PathBuf>,
}

/// Configuration merger
/// Priority order: CLI -> Env -> Secrets -> File -> Defaults
pub struct ConfigMerger {
    defaults: AppConfig,
    layers: Vec<PartialConfig>,
}

impl ConfigMerger {
    /// Create a new config merger with defaults
    pub fn new() -> Self {
        Self {
            defaults: AppConfig::default(),
            layers: Vec::new(),
        }
    }

    /// Add a layer; later layers override earlier ones
    pub fn with_layer(mut self, layer: Option<PartialConfig>) -> Self {
        if let Some(layer) = layer {
            self.layers.push(layer);
        }
        self
    }

    /// Merge all layers over the defaults
    pub fn merge(&self) -> AppConfig {
        self.layers
            .iter()
            .fold(self.defaults.clone(), |acc, layer| self.merge_partial(&acc, layer))
    }

    fn merge_partial(&self, base: &AppConfig, partial: &PartialConfig) -> AppConfig {
        AppConfig {
            server: match &partial.server {
                Some(p) => self.merge_server(&base.server, p),
                None => base.server.clone(),
            },
            crm: match &partial.crm {
                Some(p) => self.merge_crm(&base.crm, p),
                None => base.crm.clone(),
            },
            email: match &partial.email {
                Some(p) => self.merge_email(&base.email, p),
                None => base.email.clone(),
            },
            completion: match &partial.completion {
                Some(p) => self.merge_completion(&base.completion, p),
                None => base.completion.clone(),
            },
            client: match &partial.client {
                Some(p) => self.merge_client(&base.client, p),
                None => base.client.clone(),
            },
            templates: match &partial.templates {
                Some(p) => TemplateConfig {
                    templates_dir: p
                        .templates_dir
                        .clone()
                        .or_else(|| base.templates.templates_dir.clone()),
                },
                None => base.templates.clone(),
            },
        }
    }

    fn merge_server(&self, base: &ServerConfig, p: &PartialServerConfig) -> ServerConfig {
        ServerConfig {
            bind: p.bind.clone().unwrap_or_else(|| base.bind.clone()),
            port: p.port.unwrap_or(base.port),
            cors_origins: p
                .cors_origins
                .clone()
                .unwrap_or_else(|| base.cors_origins.clone()),
        }
    }

    fn merge_crm(&self, base: &CrmConfig, p: &PartialCrmConfig) -> CrmConfig {
        CrmConfig {
            base_url: p.base_url.clone().unwrap_or_else(|| base.base_url.clone()),
            app_url: p.app_url.clone().unwrap_or_else(|| base.app_url.clone()),
            api_key: p.api_key.clone().or_else(|| base.api_key.clone()),
        }
    }

    fn merge_email(&self, base: &EmailConfig, p: &PartialEmailConfig) -> EmailConfig {
        EmailConfig {
            api_url: p.api_url.clone().unwrap_or_else(|| base.api_url.clone()),
            api_key: p.api_key.clone().or_else(|| base.api_key.clone()),
            from: p.from.clone().unwrap_or_else(|| base.from.clone()),
            alerts_from: p
                .alerts_from
                .clone()
                .unwrap_or_else(|| base.alerts_from.clone()),
            consultant_email: p
                .consultant_email
                .clone()
                .or_else(|| base.consultant_email.clone()),
            app_url: p.app_url.clone().unwrap_or_else(|| base.app_url.clone()),
            booking_url: p
                .booking_url
                .clone()
                .unwrap_or_else(|| base.booking_url.clone()),
        }
    }

    fn merge_completion(
        &self,
        base: &CompletionConfig,
        p: &PartialCompletionConfig,
    ) -> CompletionConfig {
        CompletionConfig {
            api_url: p.api_url.clone().unwrap_or_else(|| base.api_url.clone()),
            api_key: p.api_key.clone().or_else(|| base.api_key.clone()),
            model: p.model.clone().unwrap_or_else(|| base.model.clone()),
            max_tokens: p.max_tokens.unwrap_or(base.max_tokens),
        }
    }

    fn merge_client(&self, base: &ClientConfig, p: &PartialClientConfig) -> ClientConfig {
        ClientConfig {
            server_url: p
                .server_url
                .clone()
                .unwrap_or_else(|| base.server_url.clone()),
            pending_path: p
                .pending_path
                .clone()
                .or_else(|| base.pending_path.clone()),
        }
    }
}

impl Default for ConfigMerger {
    fn default() -> Self {
        Self::new()
    }
}
