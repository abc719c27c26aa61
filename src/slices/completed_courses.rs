//! Courses the learner has finished

use super::{ActionName, Slice, SliceName};
use crate::types::{CompletedCourse, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletedCoursesState {
    pub courses: Vec<CompletedCourse>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompletedCoursesAction {
    /// Insert-if-absent by course id
    Add(CompletedCourse),
    /// Insert-if-absent for each entry, in order
    AddMany(Vec<CompletedCourse>),
    Clear,
}

impl ActionName for CompletedCoursesAction {
    fn name(&self) -> String {
        match self {
            Self::Add(_) => "addCompletedCourse",
            Self::AddMany(_) => "addCompletedCourses",
            Self::Clear => "clearCompletedCourses",
        }
        .to_string()
    }
}

impl Slice for CompletedCoursesState {
    type Action = CompletedCoursesAction;
    const NAME: SliceName = SliceName::CompletedCourses;

    fn reduce(&mut self, action: CompletedCoursesAction, _now: DateTime<Utc>) {
        match action {
            CompletedCoursesAction::Add(course) => self.insert(course),
            CompletedCoursesAction::AddMany(courses) => {
                for course in courses {
                    self.insert(course);
                }
            }
            CompletedCoursesAction::Clear => self.courses.clear(),
        }
    }
}

impl CompletedCoursesState {
    fn insert(&mut self, course: CompletedCourse) {
        if !self.is_completed(course.id) {
            self.courses.push(course);
        }
    }

    pub fn all(&self) -> &[CompletedCourse] {
        &self.courses
    }

    pub fn count(&self) -> usize {
        self.courses.len()
    }

    pub fn total_learning_hours(&self) -> f64 {
        self.courses.iter().map(|c| c.total_hours).sum()
    }

    pub fn is_completed(&self, course_id: Id) -> bool {
        self.courses.iter().any(|c| c.id == course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: Id, hours: f64) -> CompletedCourse {
        CompletedCourse {
            id,
            title: format!("Course {}", id),
            completed_at: Utc::now(),
            certificate_id: None,
            total_hours: hours,
        }
    }

    #[test]
    fn test_add_is_insert_if_absent() {
        let now = Utc::now();
        let mut state = CompletedCoursesState::default();
        state.reduce(CompletedCoursesAction::Add(course(1, 2.0)), now);

        let mut renamed = course(1, 9.0);
        renamed.title = "Other".into();
        state.reduce(CompletedCoursesAction::Add(renamed), now);

        assert_eq!(state.count(), 1);
        assert_eq!(state.all()[0].title, "Course 1");
    }

    #[test]
    fn test_add_many_twice_has_no_duplicates() {
        let now = Utc::now();
        let mut state = CompletedCoursesState::default();
        let batch = vec![course(1, 1.5), course(2, 3.0), course(1, 1.5)];
        state.reduce(CompletedCoursesAction::AddMany(batch.clone()), now);
        state.reduce(CompletedCoursesAction::AddMany(batch), now);

        assert_eq!(state.count(), 2);
        assert!((state.total_learning_hours() - 4.5).abs() < f64::EPSILON);
        assert!(state.is_completed(2));
        assert!(!state.is_completed(3));
    }
}
