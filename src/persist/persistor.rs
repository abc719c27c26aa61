//! Snapshot and rehydration of the persisted subset of the state tree

use super::storage::{KeyValueReader, KeyValueStore};
use crate::error::{Result, StoreError};
use crate::slices::SliceName;
use crate::store::AppState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Storage key of the persisted envelope
pub const DEFAULT_PERSIST_KEY: &str = "persist:root";

/// Current schema version of the persisted envelope
pub const PERSIST_SCHEMA_VERSION: u32 = 1;

/// What gets persisted and where.
///
/// Identity is always excluded, whatever `blacklist` says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistConfig {
    pub key: String,
    pub version: u32,
    pub blacklist: BTreeSet<SliceName>,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_PERSIST_KEY.to_string(),
            version: PERSIST_SCHEMA_VERSION,
            blacklist: BTreeSet::from([SliceName::Identity]),
        }
    }
}

impl PersistConfig {
    pub fn persists(&self, name: SliceName) -> bool {
        name != SliceName::Identity && !self.blacklist.contains(&name)
    }

    /// Slices written to storage, in a stable order
    pub fn persisted_subset(&self) -> Vec<SliceName> {
        SliceName::ALL
            .into_iter()
            .filter(|name| self.persists(*name))
            .collect()
    }
}

/// Versioned envelope written under [`PersistConfig::key`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEnvelope {
    pub version: u32,
    pub slices: Map<String, Value>,
}

/// Writes snapshots on change and rebuilds state at startup.
pub struct Persistor {
    config: PersistConfig,
    storage: Arc<dyn KeyValueStore>,
}

impl Persistor {
    pub fn new(config: PersistConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { config, storage }
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    /// Serialize the persisted subset of `state` into storage.
    pub fn snapshot(&self, state: &AppState) -> Result<()> {
        let mut slices = Map::new();
        for name in self.config.persisted_subset() {
            if let Some(value) = state.slice_value(name)? {
                slices.insert(name.as_str().to_string(), value);
            }
        }

        let envelope = PersistedEnvelope {
            version: self.config.version,
            slices,
        };
        let json = serde_json::to_string(&envelope)?;
        self.storage.set(&self.config.key, &json)
    }

    /// Rebuild state from storage.
    ///
    /// Never fails: a missing, corrupt or incompatible snapshot yields the
    /// default state, and an undecodable slice falls back to its default
    /// while the others are restored. Identity always starts empty.
    pub fn rehydrate(&self) -> AppState {
        let mut state = AppState::default();

        let envelope = match self.load_envelope() {
            Ok(Some(envelope)) => envelope,
            Ok(None) => {
                tracing::debug!(key = %self.config.key, "No persisted state, starting fresh");
                return state;
            }
            Err(e) => {
                tracing::warn!(key = %self.config.key, error = %e, "Discarding persisted state");
                return state;
            }
        };

        let mut restored = 0usize;
        for (key, value) in envelope.slices {
            let Ok(name) = key.parse::<SliceName>() else {
                tracing::debug!(slice = %key, "Ignoring unknown persisted slice");
                continue;
            };
            if !self.config.persists(name) {
                continue;
            }
            match state.restore_slice(name, value) {
                Ok(()) => restored += 1,
                Err(e) => {
                    tracing::warn!(slice = %name, error = %e, "Persisted slice is unreadable, using defaults");
                }
            }
        }

        state.settle_fetches();
        tracing::info!(slices = restored, "Rehydrated persisted state");
        state
    }

    /// Remove the persisted snapshot
    pub fn purge(&self) -> Result<()> {
        self.storage.remove(&self.config.key)
    }

    fn load_envelope(&self) -> Result<Option<PersistedEnvelope>> {
        let Some(raw) = self.storage.get(&self.config.key)? else {
            return Ok(None);
        };

        let value: Value = serde_json::from_str(&raw)?;
        let version = value.get("version").and_then(Value::as_u64);
        if version != Some(u64::from(self.config.version)) {
            return Err(StoreError::Serialization(format!(
                "schema version {:?} does not match {}",
                version, self.config.version
            )));
        }

        Ok(Some(serde_json::from_value(value)?))
    }
}
