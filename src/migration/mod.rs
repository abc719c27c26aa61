//! One-shot import of legacy persisted data
//!
//! Before the store existed, completed courses and per-course progress
//! were written under ad-hoc keys. [`migrate`] normalizes whatever is
//! there into the store; [`MigrationGate`] makes sure that happens at most
//! once per persisted lifetime of the client.

mod gate;
mod legacy;

pub use gate::{MigrationGate, MigrationMarker, MIGRATION_MARKER_KEY};
pub use legacy::{
    normalize_completed_courses, normalize_progress, progress_course_id, LegacyMigration,
    MigrationOutcome, LEGACY_COMPLETED_COURSES_KEY, LEGACY_PROGRESS_PREFIX, UNKNOWN_COURSE_TITLE,
};

use crate::persist::KeyValueReader;
use crate::store::Store;

/// Run the legacy migration without the gate.
///
/// Never fails; see [`LegacyMigration::run`].
pub fn migrate<R>(legacy: &R, marker: &MigrationMarker, store: &Store) -> MigrationOutcome
where
    R: KeyValueReader + ?Sized,
{
    LegacyMigration::new(legacy, marker, store).run()
}
