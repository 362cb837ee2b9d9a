mod env;
mod file;

pub use env::EnvSecretStore;
pub use file::FileSecretStore;

use crate::{
    Error, Result,
    config::{SecretBackend, SecretsConfig},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Yields a bearer token on demand. The gateway calls this once per request
/// and never caches the result, so rotation stays with the secret store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String>;
}

#[async_trait]
impl<F> TokenProvider for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    async fn token(&self) -> Result<String> {
        (self)()
    }
}

/// A fixed token, for local runs and tests.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String> {
        if self.0.is_empty() {
            return Err(Error::secret("static token is empty"));
        }
        Ok(self.0.clone())
    }
}

pub fn create_token_provider(config: &SecretsConfig) -> Result<Arc<dyn TokenProvider>> {
    if config.scope.is_empty() || config.key.is_empty() {
        return Err(Error::config("secrets.scope and secrets.key must both be set"));
    }

    debug!(
        "Using {:?} secret backend for scope '{}'",
        config.backend, config.scope
    );

    match config.backend {
        SecretBackend::Env => Ok(Arc::new(EnvSecretStore::new(&config.scope, &config.key))),
        SecretBackend::File => {
            let root = config
                .root
                .clone()
                .ok_or_else(|| Error::config("secrets.root is required for the file backend"))?;
            Ok(Arc::new(FileSecretStore::new(root, &config.scope, &config.key)))
        }
    }
}
