//! Lumos Store - client-side application state for the Lumos learning platform
//!
//! One normalized state tree, split into domain slices, mutated only
//! through dispatched actions.
//!
//! # Architecture
//!
//! - **Slices**: identity, course progress, completed courses, events,
//!   certificates, surveys, blogs and the course catalog. Each owns its
//!   subtree and exposes pure reducers plus read-only selectors.
//! - **Fetch lifecycle**: remote collections move through
//!   idle → pending → fulfilled / rejected, keeping stale data visible.
//! - **Persistence**: every slice except identity is snapshotted into a
//!   versioned envelope after each change and rehydrated at startup.
//!   Sessions never survive a restart.
//! - **Legacy migration**: data written by older clients under ad-hoc keys
//!   is imported once, guarded by a durable marker and an in-process latch.
//!
//! # Example
//!
//! ```rust,ignore
//! use lumos_store::{LearningClient, StoreConfig, CourseProgressAction};
//!
//! let config = StoreConfig::load("lumos.toml")?.with_env_overrides();
//! let client = LearningClient::open(&config)?;
//! client.start();
//!
//! client.fetcher().refresh_all().await;
//! client.store().dispatch(CourseProgressAction::MarkLessonComplete {
//!     course_id: 7,
//!     lesson_id: 3,
//! });
//!
//! let done = client.store().select(|s| s.course_progress.completed_lessons(7));
//! ```

// Remote API seam
pub mod api;

// Client bootstrap and fetch orchestration
pub mod client;

// Time source for reducers
pub mod clock;

// Configuration
pub mod config;

// Error types
pub mod error;

// Fetch lifecycle state machine
pub mod lifecycle;

// Legacy data migration
pub mod migration;

// Durable storage and persistence
pub mod persist;

// Domain slices
pub mod slices;

// Store aggregator
pub mod store;

// Domain types
pub mod types;

// Re-export API types
pub use api::LearningApi;
#[cfg(feature = "http")]
pub use api::HttpApi;

// Re-export client types
pub use client::{Fetcher, LearningClient, RefreshReport};

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ApiConfig, PersistenceConfig, StoreConfig};
pub use error::{FetchError, Result, StoreError};
pub use lifecycle::{FetchEvent, FetchPhase, FetchState};

// Re-export migration types
pub use migration::{migrate, MigrationGate, MigrationMarker, MigrationOutcome};

// Re-export persistence types
pub use persist::{
    FileStorage, KeyValueReader, KeyValueStore, MemoryStorage, PersistConfig, Persistor,
};

// Re-export slice types
pub use slices::{
    BlogsAction, CertificatesAction, CompletedCoursesAction, CourseProgressAction, CoursesAction,
    EventsAction, IdentityAction, SliceName, SurveysAction,
};

pub use store::{Action, AppState, Store};
