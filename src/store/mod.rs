//! Store aggregator
//!
//! One process-wide state tree behind a single dispatch entry point.
//! Dispatch holds the write lock for the whole reduce + snapshot step, so
//! mutations are applied serially and no reader ever sees a half-applied
//! action.

mod state;

pub use state::{Action, AppState};

use crate::clock::{Clock, SystemClock};
use crate::persist::Persistor;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Shared, serialized application state
pub struct Store {
    state: RwLock<AppState>,
    persistor: Option<Persistor>,
    clock: Arc<dyn Clock>,
    dispatches: AtomicU64,
    revision: watch::Sender<u64>,
}

impl Store {
    /// In-memory store starting from the default state
    pub fn new() -> Self {
        Self::with_state(AppState::default(), Arc::new(SystemClock))
    }

    /// In-memory store starting from `state`
    pub fn with_state(state: AppState, clock: Arc<dyn Clock>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(state),
            persistor: None,
            clock,
            dispatches: AtomicU64::new(0),
            revision,
        }
    }

    /// Store rehydrated from `persistor`, snapshotting after every change
    pub fn persisted(persistor: Persistor, clock: Arc<dyn Clock>) -> Self {
        let state = persistor.rehydrate();
        let mut store = Self::with_state(state, clock);
        store.persistor = Some(persistor);
        store
    }

    /// Apply one action to the slice that owns it.
    ///
    /// Persistence failures are logged; the in-memory state still advances.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let slice = action.slice();
        tracing::debug!(action = %action.kind(), "dispatch");

        let now = self.clock.now();
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.reduce(action, now);

        if let Some(persistor) = &self.persistor {
            if persistor.config().persists(slice) {
                if let Err(e) = persistor.snapshot(&state) {
                    tracing::warn!(slice = %slice, error = %e, "Failed to persist state");
                }
            }
        }

        let count = self.dispatches.fetch_add(1, Ordering::SeqCst) + 1;
        drop(state);
        self.revision.send_replace(count);
    }

    /// Run a selector against the current state
    pub fn select<R>(&self, selector: impl FnOnce(&AppState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        selector(&state)
    }

    /// Owned copy of the whole tree
    pub fn snapshot(&self) -> AppState {
        self.select(AppState::clone)
    }

    /// Number of actions dispatched since construction
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches.load(Ordering::SeqCst)
    }

    /// Change feed: receives the dispatch count after every action
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn is_persisted(&self) -> bool {
        self.persistor.is_some()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{KeyValueReader, MemoryStorage, PersistConfig, DEFAULT_PERSIST_KEY};
    use crate::slices::{CertificatesAction, CourseProgressAction, IdentityAction};
    use crate::types::User;

    #[test]
    fn test_dispatch_routes_and_counts() {
        let store = Store::new();
        store.dispatch(CourseProgressAction::MarkLessonComplete { course_id: 1, lesson_id: 2 });
        store.dispatch(CertificatesAction::Clear);

        assert_eq!(store.dispatch_count(), 2);
        assert_eq!(store.select(|s| s.course_progress.completed_lessons(1)), vec![2]);
    }

    #[test]
    fn test_identity_changes_are_not_written() {
        let storage = Arc::new(MemoryStorage::new());
        let persistor = Persistor::new(PersistConfig::default(), storage.clone());
        let store = Store::persisted(persistor, Arc::new(SystemClock));

        let user: User =
            serde_json::from_value(serde_json::json!({"id": 1, "email": "a@b.c"})).unwrap();
        store.dispatch(IdentityAction::SetUser(user));
        assert!(storage.get(DEFAULT_PERSIST_KEY).unwrap().is_none());

        store.dispatch(CourseProgressAction::MarkQuizPassed { course_id: 1, quiz_id: 1 });
        assert!(storage.get(DEFAULT_PERSIST_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_subscribers_see_each_revision() {
        let store = Store::new();
        let mut changes = store.subscribe();
        store.dispatch(CertificatesAction::Clear);

        changes.changed().await.unwrap();
        assert_eq!(*changes.borrow(), 1);
    }
}
