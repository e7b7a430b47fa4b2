// Resolved application configuration and its file loader

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::merger::PartialConfig;

pub const DEFAULT_CRM_BASE_URL: &str = "https://volkern.app/api";
pub const DEFAULT_CRM_APP_URL: &str = "https://volkern.app";
pub const DEFAULT_EMAIL_FROM: &str = "Volkern AI <diagnostico@dimensionexpert.com>";
pub const DEFAULT_ALERTS_FROM: &str = "Volkern Alerts <alertas@dimensionexpert.com>";
pub const DEFAULT_APP_URL: &str = "https://diagnosis.dimension.expert";
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_COMPLETION_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_PORT: u16 = 3000;

/// Fully resolved configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub crm: CrmConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrmConfig {
    pub base_url: String,
    /// Web app root used for lead links in notifications
    pub app_url: String,
    pub api_key: Option<String>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CRM_BASE_URL.to_string(),
            app_url: DEFAULT_CRM_APP_URL.to_string(),
            api_key: None,
        }
    }
}

impl CrmConfig {
    /// Link to a lead in the CRM web app
    pub fn lead_url(&self, lead_id: &str) -> String {
        format!("{}/leads/{}", self.app_url.trim_end_matches('/'), lead_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
    pub alerts_from: String,
    /// Internal recipient of lead notifications and test emails
    pub consultant_email: Option<String>,
    pub app_url: String,
    pub booking_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EMAIL_API_URL.to_string(),
            api_key: None,
            from: DEFAULT_EMAIL_FROM.to_string(),
            alerts_from: DEFAULT_ALERTS_FROM.to_string(),
            consultant_email: None,
            app_url: DEFAULT_APP_URL.to_string(),
            booking_url: format!("{}/agenda", DEFAULT_APP_URL),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_COMPLETION_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            max_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub server_url: String,
    /// Overrides ~/.diagnosis/pending_diagnosis.json
    pub pending_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: format!("http://localhost:{}", DEFAULT_PORT),
            pending_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Operator directory whose files override builtin templates by name
    pub templates_dir: Option<PathBuf>,
}

/// Load a partial config from a TOML file; a missing file yields `None`
pub fn load_config_file(path: &Path) -> Result<Option<PartialConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

    let config: PartialConfig = toml::from_str(&contents)
        .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

    log::info!("[config] Loaded config from: {}", path.display());
    Ok(Some(config))
}

/// Config overrides read from the process environment.
///
/// Takes a lookup function so tests can supply their own environment.
pub fn env_overrides<F>(lookup: F) -> PartialConfig
where
    F: Fn(&str) -> Option<String>,
{
    use crate::config::merger::{
        PartialClientConfig, PartialCompletionConfig, PartialCrmConfig, PartialEmailConfig,
    };

    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let app_url = get("NEXT_PUBLIC_APP_URL").or_else(|| get("APP_URL"));

    PartialConfig {
        server: None,
        crm: Some(PartialCrmConfig {
            base_url: get("VOLKERN_BASE_URL"),
            app_url: None,
            api_key: get("VOLKERN_API_KEY"),
        }),
        email: Some(PartialEmailConfig {
            api_url: None,
            api_key: get("RESEND_API_KEY"),
            from: None,
            alerts_from: None,
            consultant_email: get("CONSULTANT_EMAIL"),
            app_url,
            booking_url: get("BOOKING_URL"),
        }),
        completion: Some(PartialCompletionConfig {
            api_url: None,
            api_key: get("ANTHROPIC_API_KEY"),
            model: None,
            max_tokens: None,
        }),
        client: Some(PartialClientConfig {
            server_url: get("DIAGNOSIS_SERVER_URL"),
            pending_path: None,
        }),
        templates: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.crm.base_url, "https://volkern.app/api");
        assert_eq!(config.email.from, DEFAULT_EMAIL_FROM);
        assert!(config.crm.api_key.is_none());
        assert_eq!(config.client.server_url, "http://localhost:3000");
    }

    #[test]
    fn test_lead_url() {
        let crm = CrmConfig::default();
        assert_eq!(crm.lead_url("abc"), "https://volkern.app/leads/abc");
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_config_file(&temp_dir.path().join("config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[server]\nport = 8080\n\n[email]\nconsultantEmail = \"ops@acme.com\"\n",
        )
        .unwrap();

        let partial = load_config_file(&path).unwrap().unwrap();
        assert_eq!(partial.server.unwrap().port, Some(8080));
        assert_eq!(
            partial.email.unwrap().consultant_email.as_deref(),
            Some("ops@acme.com")
        );
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[server\nport = ").unwrap();
        assert!(load_config_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("VOLKERN_API_KEY", "vk_123"),
            ("APP_URL", "https://app.example"),
            ("BOOKING_URL", "  "),
        ]
        .into_iter()
        .collect();

        let partial = env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(partial.crm.unwrap().api_key.as_deref(), Some("vk_123"));
        let email = partial.email.unwrap();
        assert_eq!(email.app_url.as_deref(), Some("https://app.example"));
        assert!(email.booking_url.is_none());
    }
}
