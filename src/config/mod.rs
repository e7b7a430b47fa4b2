// Layered configuration
//
// Priority, lowest to highest: defaults, ~/.diagnosis/config.toml,
// ~/.diagnosis/secrets.toml, environment variables, CLI flags.

pub mod loader;
pub mod merger;
pub mod secrets;

pub use loader::{
    AppConfig, ClientConfig, CompletionConfig, CrmConfig, EmailConfig, ServerConfig,
    TemplateConfig,
};
pub use merger::{ConfigMerger, PartialConfig};
pub use secrets::SecretsConfig;

use anyhow::Result;

/// Resolve the full configuration from every layer
pub fn load_config(cli: Option<PartialConfig>) -> Result<AppConfig> {
    let file = match crate::utils::config_path() {
        Some(path) => loader::load_config_file(&path)?,
        None => None,
    };
    let secrets = SecretsConfig::load()?.as_partial();
    let env = loader::env_overrides(|key| std::env::var(key).ok());

    let config = ConfigMerger::new()
        .with_layer(file)
        .with_layer(Some(secrets))
        .with_layer(Some(env))
        .with_layer(cli)
        .merge();

    log::debug!(
        "[config] Resolved config: crm={} port={} crm_key={} email_key={} completion_key={}",
        config.crm.base_url,
        config.server.port,
        config.crm.api_key.is_some(),
        config.email.api_key.is_some(),
        config.completion.api_key.is_some()
    );
    Ok(config)
}
