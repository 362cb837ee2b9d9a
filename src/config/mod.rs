mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads `CONFIG_PATH` (or `config.yaml` when present), then applies
/// environment overrides and validates the result.
pub async fn load() -> Result<Config> {
    let explicit = env::var("CONFIG_PATH").ok();
    let config_path = explicit
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if explicit.is_some() || Path::new(&config_path).exists() {
        debug!("Loading configuration from: {}", config_path);
        load_file(&config_path).await?
    } else {
        debug!("No {} found, using defaults", config_path);
        Config::default()
    };

    config.apply_env_overrides(|name| env::var(name).ok())?;
    config.validate()?;

    Ok(config)
}

pub async fn load_file(path: impl AsRef<Path>) -> Result<Config> {
    let config_str = tokio::fs::read_to_string(path.as_ref()).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to an all-defaults map.
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(config_str)?;
    Ok(config)
}

impl Config {
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SERVING_ENDPOINT_URL") {
            self.gateway.endpoint_url = url;
        }
        if let Some(scope) = lookup("SECRET_SCOPE_NAME") {
            self.secrets.scope = scope;
        }
        if let Some(key) = lookup("SECRET_SCOPE_KEY") {
            self.secrets.key = key;
        }
        if let Some(timeout) = lookup("QA_TIMEOUT_SECS") {
            self.gateway.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::config(format!("QA_TIMEOUT_SECS must be a whole number, got '{timeout}'"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway.endpoint_url.trim().is_empty() {
            return Err(Error::config(
                "gateway.endpoint_url is required (or set SERVING_ENDPOINT_URL)",
            ));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(Error::config("gateway.timeout_secs must be greater than zero"));
        }
        if self.gateway.auth_header.trim().is_empty() {
            return Err(Error::config("gateway.auth_header must not be empty"));
        }
        Ok(())
    }
}
