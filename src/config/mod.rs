mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads `.env`, then the YAML file at `CONFIG_PATH`, then environment overrides.
///
/// A missing `config.yaml` at the default location means "all defaults"; a
/// missing file named explicitly through `CONFIG_PATH` is an error.
pub async fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if explicit_path.is_some() || Path::new(&config_path).exists() {
        debug!("Loading configuration from: {}", config_path);
        from_file(&config_path).await?
    } else {
        debug!("No {} found, using defaults", config_path);
        Config::default()
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

pub async fn from_file(path: &str) -> Result<Config> {
    let config_str = tokio::fs::read_to_string(path).await?;
    from_yaml(&config_str)
}

pub fn from_yaml(yaml: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to a struct of defaults.
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Applies process-environment overrides on top of file values.
///
/// `lookup` stands in for `std::env::var` so callers can supply a fixed map.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("PORT must be a port number, got '{}'", port)))?;
    }

    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }

    if let Some(key) = lookup("GEMINI_API_KEY") {
        config.llm.api_key = Some(key);
    }

    if let Some(model) = lookup("GEMINI_MODEL") {
        config.llm.model = model;
    }

    if let Some(base_url) = lookup("GEMINI_BASE_URL") {
        config.llm.base_url = base_url;
    }

    if let Some(origins) = lookup("ALLOWED_ORIGINS") {
        config.server.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(path) = lookup("CATALOG_PATH") {
        config.catalog.path = Some(path);
    }

    if let Some(level) = lookup("LOG_LEVEL") {
        config.server.logs.level = level;
    }

    // Blank credentials count as unset.
    if config
        .llm
        .api_key
        .as_deref()
        .is_some_and(|key| key.trim().is_empty())
    {
        config.llm.api_key = None;
    }

    Ok(())
}

pub fn validate(config: &Config) -> Result<()> {
    if config.llm.model.trim().is_empty() {
        return Err(Error::config("llm.model must not be empty"));
    }

    if config.llm.base_url.trim().is_empty() {
        return Err(Error::config("llm.base_url must not be empty"));
    }

    if config.persona.assistant_name.trim().is_empty() {
        return Err(Error::config("persona.assistant_name must not be empty"));
    }

    Ok(())
}
