//! Client bootstrap and fetch orchestration

mod fetcher;

pub use fetcher::{Fetcher, RefreshReport, DEFAULT_BLOGS_LIMIT};

use crate::api::LearningApi;
use crate::clock::Clock;
use crate::migration::{MigrationGate, MigrationMarker, MigrationOutcome};
use crate::persist::{KeyValueStore, PersistConfig, Persistor};
use crate::store::Store;
use std::sync::Arc;

#[cfg(feature = "http")]
use crate::{
    api::HttpApi,
    clock::SystemClock,
    config::StoreConfig,
    error::Result,
    persist::{FileStorage, MemoryStorage},
};

/// Everything a running client needs, wired together.
///
/// Construction rehydrates the store; [`LearningClient::start`] finishes
/// the cold start by running the legacy migration at most once.
pub struct LearningClient {
    store: Arc<Store>,
    fetcher: Fetcher,
    gate: MigrationGate,
    storage: Arc<dyn KeyValueStore>,
}

impl LearningClient {
    /// Client backed by the HTTP API and the configured storage
    #[cfg(feature = "http")]
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match &config.persistence.data_file {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => {
                tracing::info!("No data file configured, state will not survive restarts");
                Arc::new(MemoryStorage::new())
            }
        };
        let api = Arc::new(HttpApi::new(&config.api)?);

        let client = Self::from_parts(storage, api, Arc::new(SystemClock), config.persist_config());
        Ok(Self {
            fetcher: client.fetcher.with_blogs_limit(config.api.blogs_limit),
            ..client
        })
    }

    /// Client over injected collaborators. Legacy data and the migration
    /// marker are read from the same storage as the persisted state.
    pub fn from_parts(
        storage: Arc<dyn KeyValueStore>,
        api: Arc<dyn LearningApi>,
        clock: Arc<dyn Clock>,
        persist: PersistConfig,
    ) -> Self {
        let persistor = Persistor::new(persist, storage.clone());
        let store = Arc::new(Store::persisted(persistor, clock));
        let fetcher = Fetcher::new(store.clone(), api);
        let gate = MigrationGate::new(MigrationMarker::new(storage.clone()));

        Self {
            store,
            fetcher,
            gate,
            storage,
        }
    }

    /// Run the gate-guarded legacy migration.
    ///
    /// Safe to call from every entry point; only the first call in a
    /// process can do work.
    pub fn start(&self) -> Option<MigrationOutcome> {
        self.gate.run(&*self.storage, &self.store)
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn gate(&self) -> &MigrationGate {
        &self.gate
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }
}
