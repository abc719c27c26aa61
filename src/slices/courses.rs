//! Course catalog and the courses allocated to the learner's groups

use super::{ActionName, Slice, SliceName};
use crate::lifecycle::{FetchEvent, FetchState};
use crate::types::{Course, Group, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursesState {
    pub courses: FetchState<Vec<Course>>,
    pub allocated_course_ids: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoursesAction {
    /// Drops catalog, allocations and freshness
    Clear,
    /// `GET /api/courses-subjects` lifecycle
    Fetch(FetchEvent<Vec<Course>>),
    /// Allocation lifecycle; only a fulfilled fetch changes state
    FetchAllocations(FetchEvent<Vec<Id>>),
}

impl ActionName for CoursesAction {
    fn name(&self) -> String {
        match self {
            Self::Clear => "clearCourses".into(),
            Self::Fetch(event) => format!("fetchCourses/{}", event.label()),
            Self::FetchAllocations(event) => format!("fetchAllocations/{}", event.label()),
        }
    }
}

impl Slice for CoursesState {
    type Action = CoursesAction;
    const NAME: SliceName = SliceName::Courses;

    fn reduce(&mut self, action: CoursesAction, now: DateTime<Utc>) {
        match action {
            CoursesAction::Clear => {
                self.courses.data.clear();
                self.courses.last_fetched_at = None;
                self.allocated_course_ids.clear();
            }
            CoursesAction::Fetch(event) => self.courses.apply(event, now),
            CoursesAction::FetchAllocations(FetchEvent::Fulfilled(ids)) => {
                self.allocated_course_ids = ids;
            }
            CoursesAction::FetchAllocations(_) => {}
        }
    }
}

impl CoursesState {
    pub fn courses(&self) -> &[Course] {
        &self.courses.data
    }

    pub fn course(&self, course_id: Id) -> Option<&Course> {
        self.courses.data.iter().find(|c| c.id == course_id)
    }

    pub fn allocated_course_ids(&self) -> &[Id] {
        &self.allocated_course_ids
    }

    pub fn is_allocated(&self, course_id: Id) -> bool {
        self.allocated_course_ids.contains(&course_id)
    }

    /// Catalog entries allocated to the learner
    pub fn allocated_courses(&self) -> Vec<&Course> {
        self.courses
            .data
            .iter()
            .filter(|c| self.is_allocated(c.id))
            .collect()
    }

    pub fn loading(&self) -> bool {
        self.courses.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.courses.error_message()
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.courses.last_fetched_at
    }
}

/// Course ids allocated to any group `user_id` belongs to, de-duplicated,
/// in first-seen order.
pub fn allocated_course_ids(groups: &[Group], user_id: Id) -> Vec<Id> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .filter(|group| group.users.iter().any(|member| member.id == user_id))
        .flat_map(|group| group.course_allocations.iter().map(|a| a.course_id))
        .filter(|id| seen.insert(*id))
        .collect()
}
