//! Normalization and import of pre-store ad-hoc persisted data
//!
//! Legacy layout:
//! - `completedCourses`: JSON array of `{ id, title?, completedAt?, certificateId?, totalHours? }`
//! - `course_progress_<courseId>`: JSON object of
//!   `{ completedLessons?, passedQuizzes?, lastAccessedLesson?, progressPercentage?, updatedAt? }`
//!
//! Values are loosely typed: ids may be numbers or numeric strings.

use super::gate::MigrationMarker;
use crate::error::{Result, StoreError};
use crate::persist::KeyValueReader;
use crate::slices::{CompletedCoursesAction, CourseProgressAction};
use crate::store::Store;
use crate::types::{clamp_percentage, CompletedCourse, CourseProgress, Id};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Key of the flat legacy completed-courses list
pub const LEGACY_COMPLETED_COURSES_KEY: &str = "completedCourses";

/// Prefix of the per-course legacy progress keys
pub const LEGACY_PROGRESS_PREFIX: &str = "course_progress_";

/// Title used when a legacy entry has none
pub const UNKNOWN_COURSE_TITLE: &str = "Unknown Course";

/// What one migration run found and imported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationOutcome {
    /// Normalized completed courses dispatched to the store
    pub completed_courses: Vec<CompletedCourse>,
    /// Normalized progress dispatched to the store, by course id
    pub progress: BTreeMap<Id, CourseProgress>,
    /// Legacy keys that could not be migrated
    pub skipped_keys: Vec<String>,
    /// Whether the completion marker was written
    pub completed: bool,
}

/// Normalize the legacy completed-courses blob.
///
/// Fails only when the blob as a whole is not a JSON array; individual
/// entries without a usable id are dropped.
pub fn normalize_completed_courses(raw: &str, now: DateTime<Utc>) -> Result<Vec<CompletedCourse>> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(entries) = value else {
        return Err(StoreError::Serialization(
            "legacy completed courses is not a list".into(),
        ));
    };

    let mut courses = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(id) = entry.get("id").and_then(coerce_id) else {
            tracing::warn!(entry = %entry, "Dropping legacy completed course without id");
            continue;
        };

        let title = entry
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_COURSE_TITLE)
            .to_string();

        courses.push(CompletedCourse {
            id,
            title,
            completed_at: entry.get("completedAt").and_then(coerce_timestamp).unwrap_or(now),
            certificate_id: entry
                .get("certificateId")
                .and_then(Value::as_str)
                .map(str::to_string),
            total_hours: entry
                .get("totalHours")
                .and_then(coerce_number)
                .filter(|h| *h >= 0.0)
                .unwrap_or(0.0),
        });
    }
    Ok(courses)
}

/// Normalize one legacy per-course progress blob.
///
/// Fails only when the blob is not a JSON object; invalid list entries are
/// dropped and missing fields take their defaults.
pub fn normalize_progress(raw: &str, now: DateTime<Utc>) -> Result<CourseProgress> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(StoreError::Serialization(
            "legacy course progress is not an object".into(),
        ));
    }

    Ok(CourseProgress {
        completed_lessons: coerce_id_set(value.get("completedLessons")),
        passed_quizzes: coerce_id_set(value.get("passedQuizzes")),
        last_accessed_lesson: value.get("lastAccessedLesson").and_then(coerce_id),
        progress_percentage: value
            .get("progressPercentage")
            .and_then(coerce_number)
            .map(|p| clamp_percentage(p.round() as i64))
            .unwrap_or(0),
        updated_at: value.get("updatedAt").and_then(coerce_timestamp).unwrap_or(now),
    })
}

/// Course id encoded in a legacy progress key, if the key is one
pub fn progress_course_id(key: &str) -> Option<std::result::Result<Id, String>> {
    let suffix = key.strip_prefix(LEGACY_PROGRESS_PREFIX)?;
    Some(suffix.trim().parse::<Id>().map_err(|e| e.to_string()))
}

fn coerce_id(value: &Value) -> Option<Id> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_id_set(value: Option<&Value>) -> BTreeSet<Id> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_id).collect(),
        _ => BTreeSet::new(),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|f: &f64| f.is_finite())
}

fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// One-shot import of legacy data into the store.
pub struct LegacyMigration<'a, R: KeyValueReader + ?Sized> {
    legacy: &'a R,
    marker: &'a MigrationMarker,
    store: &'a Store,
}

impl<'a, R: KeyValueReader + ?Sized> LegacyMigration<'a, R> {
    pub fn new(legacy: &'a R, marker: &'a MigrationMarker, store: &'a Store) -> Self {
        Self { legacy, marker, store }
    }

    /// Run the migration.
    ///
    /// Never returns an error: unparseable legacy values are logged and
    /// skipped, and any other failure (including a storage read error) is
    /// logged with the marker left unset so the next startup retries. Parts
    /// already dispatched stay applied. Re-running is safe for completed
    /// courses (insert-if-absent), but progress import replaces wholesale,
    /// which is why callers go through the gate.
    pub fn run(&self) -> MigrationOutcome {
        let mut outcome = MigrationOutcome::default();
        let now = self.store.now();

        if let Err(e) = self.import(now, &mut outcome) {
            tracing::error!(error = %e, "[Migration] Migration failed, will retry on next start");
            return outcome;
        }

        match self.marker.set() {
            Ok(()) => {
                outcome.completed = true;
                tracing::info!(
                    completed_courses = outcome.completed_courses.len(),
                    progress_courses = outcome.progress.len(),
                    skipped = outcome.skipped_keys.len(),
                    "[Migration] Migration complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "[Migration] Failed to record completion, will retry on next start");
            }
        }
        outcome
    }

    fn import(&self, now: DateTime<Utc>, outcome: &mut MigrationOutcome) -> Result<()> {
        self.migrate_completed_courses(now, outcome)?;
        self.migrate_progress(now, outcome)
    }

    fn migrate_completed_courses(&self, now: DateTime<Utc>, outcome: &mut MigrationOutcome) -> Result<()> {
        let Some(raw) = self.legacy.get(LEGACY_COMPLETED_COURSES_KEY)? else {
            return Ok(());
        };

        match normalize_completed_courses(&raw, now) {
            Ok(courses) => {
                self.store
                    .dispatch(CompletedCoursesAction::AddMany(courses.clone()));
                tracing::info!(count = courses.len(), "[Migration] Completed courses migrated");
                outcome.completed_courses = courses;
            }
            Err(e) => {
                tracing::error!(error = %e, "[Migration] Failed to migrate completed courses");
                outcome.skipped_keys.push(LEGACY_COMPLETED_COURSES_KEY.to_string());
            }
        }
        Ok(())
    }

    fn migrate_progress(&self, now: DateTime<Utc>, outcome: &mut MigrationOutcome) -> Result<()> {
        let mut progress = BTreeMap::new();

        for key in self.legacy.keys()? {
            let course_id = match progress_course_id(&key) {
                None => continue,
                Some(Ok(id)) => id,
                Some(Err(e)) => {
                    tracing::warn!(key = %key, error = %e, "[Migration] Progress key has no course id");
                    outcome.skipped_keys.push(key);
                    continue;
                }
            };

            // a read failure aborts before anything is initialized
            let Some(raw) = self.legacy.get(&key)? else {
                continue;
            };

            match normalize_progress(&raw, now) {
                Ok(record) => {
                    progress.insert(course_id, record);
                }
                Err(e) => {
                    tracing::warn!(course_id, error = %e, "[Migration] Failed to migrate progress for course");
                    outcome.skipped_keys.push(key);
                }
            }
        }

        if !progress.is_empty() {
            self.store.dispatch(CourseProgressAction::Initialize(progress.clone()));
            tracing::info!(courses = progress.len(), "[Migration] Course progress migrated");
        }
        outcome.progress = progress;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_completed_course_defaults() {
        let now = Utc::now();
        let courses = normalize_completed_courses(r#"[{"id": 1, "title": "A"}, {"id": "2"}]"#, now).unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].total_hours, 0.0);
        assert_eq!(courses[0].completed_at, now);
        assert_eq!(courses[0].certificate_id, None);
        assert_eq!(courses[1].id, 2);
        assert_eq!(courses[1].title, UNKNOWN_COURSE_TITLE);
    }

    #[test]
    fn test_completed_course_passthrough() {
        let now = Utc::now();
        let raw = r#"[{"id": 4, "title": "B", "completedAt": "2024-03-01T10:00:00Z",
                       "certificateId": "cert-9", "totalHours": 12.5}]"#;
        let course = &normalize_completed_courses(raw, now).unwrap()[0];

        assert_eq!(course.certificate_id.as_deref(), Some("cert-9"));
        assert_eq!(course.total_hours, 12.5);
        assert_eq!(course.completed_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_completed_courses_rejects_non_list() {
        assert!(normalize_completed_courses(r#"{"id": 1}"#, Utc::now()).is_err());
        assert!(normalize_completed_courses("nope", Utc::now()).is_err());
    }

    #[test]
    fn test_progress_coercion() {
        let now = Utc::now();
        let raw = r#"{"completedLessons": ["3", 5, "x", null, 5, -1, 2.0],
                      "passedQuizzes": "not-a-list",
                      "lastAccessedLesson": "8",
                      "progressPercentage": 180}"#;
        let progress = normalize_progress(raw, now).unwrap();

        assert_eq!(progress.completed_lessons, BTreeSet::from([2, 3, 5]));
        assert!(progress.passed_quizzes.is_empty());
        assert_eq!(progress.last_accessed_lesson, Some(8));
        assert_eq!(progress.progress_percentage, 100);
        assert_eq!(progress.updated_at, now);
    }

    #[test]
    fn test_progress_keeps_valid_timestamp() {
        let now = Utc::now();
        let earlier = now - Duration::days(3);
        let raw = format!(r#"{{"updatedAt": "{}"}}"#, earlier.to_rfc3339());
        assert_eq!(normalize_progress(&raw, now).unwrap().updated_at, earlier);
    }

    #[test]
    fn test_progress_key_parsing() {
        assert_eq!(progress_course_id("course_progress_7"), Some(Ok(7)));
        assert!(matches!(progress_course_id("course_progress_abc"), Some(Err(_))));
        assert_eq!(progress_course_id("completedCourses"), None);
    }
}
