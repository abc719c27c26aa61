//! Durable storage and state persistence
//!
//! Every slice except identity is written to storage as one versioned
//! envelope after each change, and read back at startup.

mod persistor;
mod storage;

pub use persistor::{
    PersistConfig, PersistedEnvelope, Persistor, DEFAULT_PERSIST_KEY, PERSIST_SCHEMA_VERSION,
};
pub use storage::{FileStorage, KeyValueReader, KeyValueStore, MemoryStorage};
