// Secure storage for collaborator API keys
//
// Keys are stored in ~/.diagnosis/secrets.toml (global only)
// This file should never be committed

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::merger::{
    PartialCompletionConfig, PartialConfig, PartialCrmConfig, PartialEmailConfig,
};

/// Secret identifiers
pub const CRM_KEY: &str = "crm";
pub const EMAIL_KEY: &str = "email";
pub const COMPLETION_KEY: &str = "completion";

/// Secrets stored in ~/.diagnosis/secrets.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// API keys indexed by collaborator ("crm" -> "vk_...")
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

impl SecretsConfig {
    /// Get the secrets file path (~/.diagnosis/secrets.toml)
    pub fn get_secrets_path() -> Option<PathBuf> {
        crate::utils::app_dir().map(|p| p.join("secrets.toml"))
    }

    /// Load secrets from the default location
    pub fn load() -> Result<Self> {
        let path = Self::get_secrets_path()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Self::load_from(&path)
    }

    /// Load secrets from a path; a missing file is empty
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read secrets file '{}': {}", path.display(), e))?;

        let config: SecretsConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse secrets file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save secrets to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::get_secrets_path()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        self.save_to(&path)
    }

    /// Save secrets to a path with owner-only permissions
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize secrets: {}", e))?;

        crate::utils::atomic_write(path, contents.as_bytes())
            .map_err(|e| anyhow!("Failed to write secrets file '{}': {}", path.display(), e))?;

        // Set file permissions to 600 (owner read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions).map_err(|e| {
                anyhow!(
                    "Failed to set permissions on secrets file '{}': {}",
                    path.display(),
                    e
                )
            })?;
        }

        log::info!("[secrets] Saved secrets to: {}", path.display());
        Ok(())
    }

    pub fn get_key(&self, id: &str) -> Option<&String> {
        self.api_keys.get(id)
    }

    pub fn set_key(&mut self, id: &str, key: &str) {
        self.api_keys.insert(id.to_string(), key.to_string());
    }

    pub fn delete_key(&mut self, id: &str) -> bool {
        self.api_keys.remove(id).is_some()
    }

    /// Secrets as a config layer
    pub fn as_partial(&self) -> PartialConfig {
        let key = |id: &str| self.get_key(id).cloned();
        PartialConfig {
            crm: Some(PartialCrmConfig {
                api_key: key(CRM_KEY),
                ..Default::default()
            }),
            email: Some(PartialEmailConfig {
                api_key: key(EMAIL_KEY),
                ..Default::default()
            }),
            completion: Some(PartialCompletionConfig {
                api_key: key(COMPLETION_KEY),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_delete_key() {
        let mut config = SecretsConfig::default();
        config.set_key(CRM_KEY, "vk_test");
        assert_eq!(config.get_key(CRM_KEY), Some(&"vk_test".to_string()));
        assert!(config.delete_key(CRM_KEY));
        assert!(!config.delete_key(CRM_KEY));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secrets.toml");

        let mut config = SecretsConfig::default();
        config.set_key(EMAIL_KEY, "re_12345");
        config.save_to(&path).unwrap();

        let loaded = SecretsConfig::load_from(&path).unwrap();
        assert_eq!(loaded.get_key(EMAIL_KEY), Some(&"re_12345".to_string()));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = SecretsConfig::load_from(&temp_dir.path().join("none.toml")).unwrap();
        assert!(loaded.api_keys.is_empty());
    }

    #[test]
    fn test_as_partial_maps_keys() {
        let mut config = SecretsConfig::default();
        config.set_key(COMPLETION_KEY, "sk-ant");
        let partial = config.as_partial();
        assert_eq!(
            partial.completion.unwrap().api_key.as_deref(),
            Some("sk-ant")
        );
        assert!(partial.crm.unwrap().api_key.is_none());
    }
}
