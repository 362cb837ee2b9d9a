use super::TokenProvider;
use crate::{Error, Result};
use async_trait::async_trait;
use tracing::debug;

/// Explicit token variable, checked before the scope/key derived one.
pub const TOKEN_ENV_VAR: &str = "QA_API_TOKEN";

/// Resolves a scope/key pair to an environment variable named
/// `<SCOPE>__<KEY>`, e.g. `copen-bot`/`token` -> `COPEN_BOT__TOKEN`.
#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    scope: String,
    key: String,
}

impl EnvSecretStore {
    pub fn new(scope: &str, key: &str) -> Self {
        Self {
            scope: scope.to_string(),
            key: key.to_string(),
        }
    }

    pub fn variable_name(&self) -> String {
        format!("{}__{}", normalize(&self.scope), normalize(&self.key))
    }

    pub fn resolve_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV_VAR).filter(|t| !t.trim().is_empty()) {
            debug!("Using token from {}", TOKEN_ENV_VAR);
            return Ok(token.trim().to_string());
        }

        let name = self.variable_name();
        match lookup(&name) {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Some(_) => Err(Error::secret(format!("secret variable {name} is empty"))),
            None => Err(Error::secret(format!(
                "no secret found for scope '{}' key '{}' (set {name} or {TOKEN_ENV_VAR})",
                self.scope, self.key
            ))),
        }
    }
}

fn normalize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl TokenProvider for EnvSecretStore {
    async fn token(&self) -> Result<String> {
        self.resolve_with(|name| std::env::var(name).ok())
    }
}
