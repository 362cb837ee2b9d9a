use crate::gateway::CitationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
    #[serde(default)]
    pub citation: CitationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationConfig {
    #[serde(default)]
    pub strategy: CitationStrategy,
    #[serde(default = "default_citation_index")]
    pub index: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationStrategy {
    #[default]
    Index,
    FirstAvailable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub backend: SecretBackend,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub key: String,
    /// Root of the mounted secret tree; only read by the file backend.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretBackend {
    #[default]
    Env,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            timeout_secs: default_timeout_secs(),
            auth_header: default_auth_header(),
            citation: CitationConfig::default(),
        }
    }
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            strategy: CitationStrategy::default(),
            index: default_citation_index(),
        }
    }
}

impl From<&CitationConfig> for CitationPolicy {
    fn from(config: &CitationConfig) -> Self {
        match config.strategy {
            CitationStrategy::Index => CitationPolicy::Index(config.index),
            CitationStrategy::FirstAvailable => CitationPolicy::FirstAvailable,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            prompt: default_prompt(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_auth_header() -> String {
    "Authorization".to_string()
}

fn default_citation_index() -> usize {
    1
}

fn default_title() -> String {
    "Copen Q&A bot".to_string()
}

fn default_prompt() -> String {
    "What do you want to know about Copen?".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
