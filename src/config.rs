//! Client configuration

use crate::error::{Result, StoreError};
use crate::persist::{PersistConfig, DEFAULT_PERSIST_KEY, PERSIST_SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_API_BASE_URL: &str = "LUMOS_API_BASE_URL";
pub const ENV_API_TOKEN: &str = "LUMOS_API_TOKEN";
pub const ENV_DATA_FILE: &str = "LUMOS_DATA_FILE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Remote learning API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without trailing slash (e.g., "https://lumos.example.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size for the blog feed
    #[serde(default = "default_blogs_limit")]
    pub blogs_limit: u32,
    /// Session token sent as `Authorization: Bearer`
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Durable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Storage key of the persisted envelope
    #[serde(default = "default_persist_key")]
    pub key: String,
    /// Schema version; snapshots written under another version are discarded
    #[serde(default = "default_persist_version")]
    pub version: u32,
    /// JSON file holding all durable keys. In-memory only when absent.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            blogs_limit: default_blogs_limit(),
            bearer_token: None,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            key: default_persist_key(),
            version: default_persist_version(),
            data_file: None,
        }
    }
}

fn default_base_url() -> String { "http://127.0.0.1:8000".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_blogs_limit() -> u32 { 20 }
fn default_persist_key() -> String { DEFAULT_PERSIST_KEY.to_string() }
fn default_persist_version() -> u32 { PERSIST_SCHEMA_VERSION }

impl StoreConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    /// Apply `LUMOS_*` environment variables on top of the file values
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty()) {
            self.api.bearer_token = Some(token);
        }
        if let Some(file) = lookup(ENV_DATA_FILE).filter(|v| !v.is_empty()) {
            self.persistence.data_file = Some(PathBuf::from(file));
        }
        self.api.base_url = self.api.base_url.trim_end_matches('/').to_string();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(StoreError::Config("api.base_url must not be empty".into()));
        }
        if self.persistence.key.trim().is_empty() {
            return Err(StoreError::Config("persistence.key must not be empty".into()));
        }
        Ok(())
    }

    /// Persistence settings for the store; identity stays excluded
    pub fn persist_config(&self) -> PersistConfig {
        PersistConfig {
            key: self.persistence.key.clone(),
            version: self.persistence.version,
            ..Default::default()
        }
    }
}
