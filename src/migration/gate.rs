//! Run-once guard around the legacy migration

use super::legacy::{LegacyMigration, MigrationOutcome};
use crate::error::Result;
use crate::persist::{KeyValueReader, KeyValueStore};
use crate::store::Store;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Storage key of the durable completion marker
pub const MIGRATION_MARKER_KEY: &str = "redux_migration_complete";

const MARKER_SET: &str = "true";

/// Durable "migration has completed" flag.
///
/// Created absent, set once, never cleared by normal operation.
#[derive(Clone)]
pub struct MigrationMarker {
    storage: Arc<dyn KeyValueStore>,
}

impl MigrationMarker {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// True only when the stored value is exactly `"true"`
    pub fn is_set(&self) -> Result<bool> {
        Ok(self.storage.get(MIGRATION_MARKER_KEY)?.as_deref() == Some(MARKER_SET))
    }

    pub fn set(&self) -> Result<()> {
        self.storage.set(MIGRATION_MARKER_KEY, MARKER_SET)
    }
}

/// Two-layer guard: the durable marker across restarts, plus an in-process
/// latch so repeated startup calls within one run do no work.
pub struct MigrationGate {
    marker: MigrationMarker,
    latch: AtomicBool,
}

impl MigrationGate {
    pub fn new(marker: MigrationMarker) -> Self {
        Self {
            marker,
            latch: AtomicBool::new(false),
        }
    }

    pub fn marker(&self) -> &MigrationMarker {
        &self.marker
    }

    /// Whether the durable marker is absent or false.
    ///
    /// An unreadable marker counts as set for this run; the next startup
    /// reads it again.
    pub fn should_run(&self) -> bool {
        match self.marker.is_set() {
            Ok(set) => !set,
            Err(e) => {
                tracing::error!(error = %e, "[Migration] Cannot read migration marker, skipping");
                false
            }
        }
    }

    /// Whether this process already went through the gate
    pub fn has_run_this_session(&self) -> bool {
        self.latch.load(Ordering::SeqCst)
    }

    /// Gate-guarded migration entry point.
    ///
    /// Returns `None` without touching the store when the latch is already
    /// taken or the marker is set. The latch stays taken even if the
    /// migration fails; the unset marker makes the next startup retry.
    pub fn run<R>(&self, legacy: &R, store: &Store) -> Option<MigrationOutcome>
    where
        R: KeyValueReader + ?Sized,
    {
        if self.latch.swap(true, Ordering::SeqCst) {
            tracing::debug!("[Migration] Already ran in this session");
            return None;
        }
        if !self.should_run() {
            tracing::debug!("[Migration] Marker set, nothing to migrate");
            return None;
        }

        tracing::info!("[Migration] Starting legacy data migration");
        Some(LegacyMigration::new(legacy, &self.marker, store).run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;

    fn gate(storage: Arc<MemoryStorage>) -> MigrationGate {
        MigrationGate::new(MigrationMarker::new(storage))
    }

    #[test]
    fn test_marker_only_counts_exact_true() {
        let storage = Arc::new(MemoryStorage::with_entries([(MIGRATION_MARKER_KEY, "false")]));
        let marker = MigrationMarker::new(storage);
        assert!(!marker.is_set().unwrap());

        marker.set().unwrap();
        assert!(marker.is_set().unwrap());
    }

    #[test]
    fn test_latch_blocks_second_call() {
        let storage = Arc::new(MemoryStorage::new());
        let gate = gate(storage.clone());
        let store = Store::new();

        assert!(gate.should_run());
        let outcome = gate.run(storage.as_ref(), &store).unwrap();
        assert!(outcome.completed);
        assert!(!gate.should_run());
        assert!(gate.has_run_this_session());

        assert!(gate.run(storage.as_ref(), &store).is_none());
    }

    #[test]
    fn test_marker_blocks_fresh_process() {
        let storage = Arc::new(MemoryStorage::with_entries([
            (MIGRATION_MARKER_KEY, "true"),
            ("completedCourses", r#"[{"id": 1}]"#),
        ]));
        let store = Store::new();

        assert!(gate(storage.clone()).run(storage.as_ref(), &store).is_none());
        assert_eq!(store.dispatch_count(), 0);
    }
}
