//! Domain slices
//!
//! Each slice exclusively owns one region of the state tree. Reducers are
//! pure and total over their action type; selectors are plain `&self`
//! methods on the slice state.

pub mod blogs;
pub mod certificates;
pub mod completed_courses;
pub mod course_progress;
pub mod courses;
pub mod events;
pub mod identity;
pub mod surveys;

pub use blogs::{BlogFeed, BlogsAction, BlogsState};
pub use certificates::{CertificatesAction, CertificatesState};
pub use completed_courses::{CompletedCoursesAction, CompletedCoursesState};
pub use course_progress::{CourseProgressAction, CourseProgressState};
pub use courses::{CoursesAction, CoursesState};
pub use events::{EventsAction, EventsState};
pub use identity::{AuthView, IdentityAction, IdentityState};
pub use surveys::{SurveysAction, SurveysState};

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Namespace of a slice; also the key of its subtree in persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SliceName {
    #[serde(rename = "auth")]
    Identity,
    CourseProgress,
    CompletedCourses,
    Events,
    Certificates,
    Surveys,
    Blogs,
    Courses,
}

impl SliceName {
    pub const ALL: [SliceName; 8] = [
        SliceName::Identity,
        SliceName::CourseProgress,
        SliceName::CompletedCourses,
        SliceName::Events,
        SliceName::Certificates,
        SliceName::Surveys,
        SliceName::Blogs,
        SliceName::Courses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "auth",
            Self::CourseProgress => "courseProgress",
            Self::CompletedCourses => "completedCourses",
            Self::Events => "events",
            Self::Certificates => "certificates",
            Self::Surveys => "surveys",
            Self::Blogs => "blogs",
            Self::Courses => "courses",
        }
    }

}

impl std::str::FromStr for SliceName {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| StoreError::NotFound(format!("slice {}", s)))
    }
}

impl std::fmt::Display for SliceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract every slice state implements.
pub trait Slice: Default {
    /// Actions owned by this slice
    type Action;

    const NAME: SliceName;

    /// Apply one action. `now` is supplied by the store so reducers stay
    /// deterministic.
    fn reduce(&mut self, action: Self::Action, now: DateTime<Utc>);
}

/// Action type name without the slice prefix (e.g. `"markLessonComplete"`)
pub trait ActionName {
    fn name(&self) -> String;
}
