use super::TokenProvider;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads tokens from a mounted secret tree laid out as `<root>/<scope>/<key>`.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(root: impl AsRef<Path>, scope: &str, key: &str) -> Self {
        Self {
            path: root.as_ref().join(scope).join(key),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenProvider for FileSecretStore {
    async fn token(&self) -> Result<String> {
        debug!("Reading secret from {}", self.path.display());

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::secret(format!("failed to read {}: {e}", self.path.display()))
        })?;

        let token = contents.trim();
        if token.is_empty() {
            return Err(Error::secret(format!(
                "secret file {} is empty",
                self.path.display()
            )));
        }

        Ok(token.to_string())
    }
}
