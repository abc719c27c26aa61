//! Persistence and rehydration integration tests
//!
//! Covers the persisted subset across simulated restarts, both in memory
//! and through the JSON data file, plus degradation on bad snapshots.

mod common;

use chrono::{TimeZone, Utc};
use common::{event, user, FakeApi, Reply};
use lumos_store::persist::{DEFAULT_PERSIST_KEY, PERSIST_SCHEMA_VERSION};
use lumos_store::types::Certificate;
use lumos_store::{
    AppState, CertificatesAction, CourseProgressAction, EventsAction, FileStorage, IdentityAction,
    KeyValueReader, KeyValueStore, LearningClient, ManualClock, MemoryStorage, PersistConfig,
    SystemClock,
};
use std::sync::Arc;
use tempfile::TempDir;

fn client_with(storage: Arc<dyn KeyValueStore>, api: FakeApi, persist: PersistConfig) -> LearningClient {
    LearningClient::from_parts(storage, Arc::new(api), Arc::new(SystemClock), persist)
}

fn client(storage: Arc<dyn KeyValueStore>) -> LearningClient {
    client_with(storage, FakeApi::new(), PersistConfig::default())
}

fn certificate(id: &str, course_id: u64) -> Certificate {
    Certificate {
        id: id.to_string(),
        course_id,
        course_name: format!("Course {}", course_id),
        earned_at: Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap(),
        download_url: None,
    }
}

#[test]
fn test_restart_restores_everything_but_identity() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());

    let first = client(storage.clone());
    let store = first.store();
    store.dispatch(IdentityAction::LoginSuccess {
        user: user(1),
        token: "secret-session".into(),
    });
    store.dispatch(CourseProgressAction::MarkLessonComplete { course_id: 7, lesson_id: 3 });
    store.dispatch(CourseProgressAction::UpdateProgressPercentage { course_id: 7, percentage: 55 });
    store.dispatch(CertificatesAction::Add(certificate("cert-1", 7)));
    store.dispatch(EventsAction::Register(12));
    let before = store.snapshot();
    drop(first);

    let raw = storage.get(DEFAULT_PERSIST_KEY).unwrap().unwrap();
    assert!(!raw.contains("secret-session"));

    let second = client(storage);
    second.store().select(|s| {
        assert!(!s.auth.is_authenticated());
        assert!(s.auth.user().is_none());
        assert!(s.auth.session_token().is_none());
        assert_eq!(s.course_progress, before.course_progress);
        assert_eq!(s.course_progress.progress_percentage(7), 55);
        assert_eq!(s.certificates, before.certificates);
        assert!(s.events.is_registered(12));
    });
}

#[tokio::test]
async fn test_fetched_collections_survive_restart_settled() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());

    let first = client_with(
        storage.clone(),
        FakeApi::new().on_events(Reply::Ok(vec![event(1), event(2)])),
        PersistConfig::default(),
    );
    first.fetcher().fetch_events().await;
    // leave a fetch in flight at shutdown
    first.store().dispatch(EventsAction::Fetch(lumos_store::FetchEvent::Pending));
    drop(first);

    let second = client(storage);
    second.store().select(|s| {
        assert_eq!(s.events.events().len(), 2);
        assert!(!s.events.loading());
        assert!(s.events.last_fetched_at().is_some());
    });
}

#[test]
fn test_file_storage_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lumos").join("state.json");

    {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::open(&path).unwrap());
        let client = client(storage);
        client
            .store()
            .dispatch(CourseProgressAction::MarkQuizPassed { course_id: 2, quiz_id: 8 });
    }

    assert!(path.exists());
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::open(&path).unwrap());
    let client = client(storage);
    assert_eq!(client.store().select(|s| s.course_progress.passed_quizzes(2)), vec![8]);
}

#[test]
fn test_schema_version_bump_discards_snapshot() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());

    let first = client(storage.clone());
    first
        .store()
        .dispatch(CourseProgressAction::MarkLessonComplete { course_id: 1, lesson_id: 1 });
    drop(first);

    let bumped = PersistConfig {
        version: PERSIST_SCHEMA_VERSION + 1,
        ..Default::default()
    };
    let second = client_with(storage, FakeApi::new(), bumped);
    assert_eq!(second.store().snapshot(), AppState::default());
}

#[test]
fn test_garbage_snapshot_starts_fresh() {
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(MemoryStorage::with_entries([(DEFAULT_PERSIST_KEY, "\u{0}garbage")]));

    let client = client(storage.clone());
    assert_eq!(client.store().snapshot(), AppState::default());

    // the next change overwrites the bad snapshot
    client.store().dispatch(EventsAction::MarkAttended(3));
    let raw = storage.get(DEFAULT_PERSIST_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], PERSIST_SCHEMA_VERSION);
}

#[test]
fn test_progress_timestamps_strictly_increase() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    let client = LearningClient::from_parts(
        storage,
        Arc::new(FakeApi::new()),
        clock,
        PersistConfig::default(),
    );
    let store = client.store();

    store.dispatch(CourseProgressAction::MarkLessonComplete { course_id: 1, lesson_id: 1 });
    let first = store.select(|s| s.course_progress.course(1).unwrap().updated_at);
    store.dispatch(CourseProgressAction::MarkLessonComplete { course_id: 1, lesson_id: 2 });
    let second = store.select(|s| s.course_progress.course(1).unwrap().updated_at);

    assert!(second > first);
}
