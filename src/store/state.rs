//! Composed state tree and namespaced actions

use crate::error::{Result, StoreError};
use crate::slices::{
    ActionName, BlogsAction, BlogsState, CertificatesAction, CertificatesState,
    CompletedCoursesAction, CompletedCoursesState, CourseProgressAction, CourseProgressState,
    CoursesAction, CoursesState, EventsAction, EventsState, IdentityAction, IdentityState, Slice,
    SliceName, SurveysAction, SurveysState,
};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Root of the state tree; one field per slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: IdentityState,
    pub course_progress: CourseProgressState,
    pub completed_courses: CompletedCoursesState,
    pub events: EventsState,
    pub certificates: CertificatesState,
    pub surveys: SurveysState,
    pub blogs: BlogsState,
    pub courses: CoursesState,
}

/// Any action the store accepts, tagged with the slice that owns it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Identity(IdentityAction),
    CourseProgress(CourseProgressAction),
    CompletedCourses(CompletedCoursesAction),
    Events(EventsAction),
    Certificates(CertificatesAction),
    Surveys(SurveysAction),
    Blogs(BlogsAction),
    Courses(CoursesAction),
}

impl Action {
    /// Slice this action is routed to
    pub fn slice(&self) -> SliceName {
        match self {
            Action::Identity(_) => SliceName::Identity,
            Action::CourseProgress(_) => SliceName::CourseProgress,
            Action::CompletedCourses(_) => SliceName::CompletedCourses,
            Action::Events(_) => SliceName::Events,
            Action::Certificates(_) => SliceName::Certificates,
            Action::Surveys(_) => SliceName::Surveys,
            Action::Blogs(_) => SliceName::Blogs,
            Action::Courses(_) => SliceName::Courses,
        }
    }

    /// Fully namespaced action type, e.g. `"events/fetchEvents/pending"`
    pub fn kind(&self) -> String {
        let name = match self {
            Action::Identity(a) => a.name(),
            Action::CourseProgress(a) => a.name(),
            Action::CompletedCourses(a) => a.name(),
            Action::Events(a) => a.name(),
            Action::Certificates(a) => a.name(),
            Action::Surveys(a) => a.name(),
            Action::Blogs(a) => a.name(),
            Action::Courses(a) => a.name(),
        };
        format!("{}/{}", self.slice(), name)
    }
}

macro_rules! impl_from_action {
    ($($variant:ident => $action:ty),* $(,)?) => {
        $(
            impl From<$action> for Action {
                fn from(action: $action) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from_action! {
    Identity => IdentityAction,
    CourseProgress => CourseProgressAction,
    CompletedCourses => CompletedCoursesAction,
    Events => EventsAction,
    Certificates => CertificatesAction,
    Surveys => SurveysAction,
    Blogs => BlogsAction,
    Courses => CoursesAction,
}

impl AppState {
    /// Route `action` to exactly one slice reducer.
    pub fn reduce(&mut self, action: Action, now: DateTime<Utc>) {
        match action {
            Action::Identity(a) => self.auth.reduce(a, now),
            Action::CourseProgress(a) => self.course_progress.reduce(a, now),
            Action::CompletedCourses(a) => self.completed_courses.reduce(a, now),
            Action::Events(a) => self.events.reduce(a, now),
            Action::Certificates(a) => self.certificates.reduce(a, now),
            Action::Surveys(a) => self.surveys.reduce(a, now),
            Action::Blogs(a) => self.blogs.reduce(a, now),
            Action::Courses(a) => self.courses.reduce(a, now),
        }
    }

    /// Serialize one slice subtree. Identity has no serialized form.
    pub fn slice_value(&self, name: SliceName) -> Result<Option<Value>> {
        let value = match name {
            SliceName::Identity => return Ok(None),
            SliceName::CourseProgress => serde_json::to_value(&self.course_progress)?,
            SliceName::CompletedCourses => serde_json::to_value(&self.completed_courses)?,
            SliceName::Events => serde_json::to_value(&self.events)?,
            SliceName::Certificates => serde_json::to_value(&self.certificates)?,
            SliceName::Surveys => serde_json::to_value(&self.surveys)?,
            SliceName::Blogs => serde_json::to_value(&self.blogs)?,
            SliceName::Courses => serde_json::to_value(&self.courses)?,
        };
        Ok(Some(value))
    }

    /// Replace one slice subtree from its serialized form. On error the
    /// slice is left untouched.
    pub fn restore_slice(&mut self, name: SliceName, value: Value) -> Result<()> {
        match name {
            SliceName::Identity => {
                return Err(StoreError::Serialization(
                    "identity state is never restored from storage".into(),
                ))
            }
            SliceName::CourseProgress => self.course_progress = serde_json::from_value(value)?,
            SliceName::CompletedCourses => self.completed_courses = serde_json::from_value(value)?,
            SliceName::Events => self.events = serde_json::from_value(value)?,
            SliceName::Certificates => self.certificates = serde_json::from_value(value)?,
            SliceName::Surveys => self.surveys = serde_json::from_value(value)?,
            SliceName::Blogs => self.blogs = serde_json::from_value(value)?,
            SliceName::Courses => self.courses = serde_json::from_value(value)?,
        }
        Ok(())
    }

    /// Clear in-flight flags on every fetch lifecycle
    pub fn settle_fetches(&mut self) {
        self.events.events.settle();
        self.surveys.surveys.settle();
        self.blogs.feed.settle();
        self.courses.courses.settle();
    }
}
