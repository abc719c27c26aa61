//! Per-course lesson and quiz progress

use super::{ActionName, Slice, SliceName};
use crate::clock::advance_timestamp;
use crate::types::{clamp_percentage, CourseProgress, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseProgressState {
    pub progress: BTreeMap<Id, CourseProgress>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CourseProgressAction {
    MarkLessonComplete { course_id: Id, lesson_id: Id },
    MarkQuizPassed { course_id: Id, quiz_id: Id },
    /// Clamped into 0..=100; ignored for courses without a record
    UpdateProgressPercentage { course_id: Id, percentage: i64 },
    /// Wipes a course back to an empty record (e.g. quiz attempts exhausted)
    ResetCourseProgress(Id),
    SetLastAccessedLesson { course_id: Id, lesson_id: Id },
    /// Wholesale replace of every course's progress. Not idempotent
    /// against local edits; only the one-shot migration uses it.
    Initialize(BTreeMap<Id, CourseProgress>),
}

impl ActionName for CourseProgressAction {
    fn name(&self) -> String {
        match self {
            Self::MarkLessonComplete { .. } => "markLessonComplete",
            Self::MarkQuizPassed { .. } => "markQuizPassed",
            Self::UpdateProgressPercentage { .. } => "updateProgressPercentage",
            Self::ResetCourseProgress(_) => "resetCourseProgress",
            Self::SetLastAccessedLesson { .. } => "setLastAccessedLesson",
            Self::Initialize(_) => "initializeCourseProgress",
        }
        .to_string()
    }
}

impl Slice for CourseProgressState {
    type Action = CourseProgressAction;
    const NAME: SliceName = SliceName::CourseProgress;

    fn reduce(&mut self, action: CourseProgressAction, now: DateTime<Utc>) {
        match action {
            CourseProgressAction::MarkLessonComplete { course_id, lesson_id } => {
                let record = self.record_or_insert(course_id, now);
                if record.completed_lessons.insert(lesson_id) {
                    record.updated_at = advance_timestamp(record.updated_at, now);
                }
            }
            CourseProgressAction::MarkQuizPassed { course_id, quiz_id } => {
                let record = self.record_or_insert(course_id, now);
                if record.passed_quizzes.insert(quiz_id) {
                    record.updated_at = advance_timestamp(record.updated_at, now);
                }
            }
            CourseProgressAction::UpdateProgressPercentage { course_id, percentage } => {
                if let Some(record) = self.progress.get_mut(&course_id) {
                    record.progress_percentage = clamp_percentage(percentage);
                    record.updated_at = advance_timestamp(record.updated_at, now);
                }
            }
            CourseProgressAction::ResetCourseProgress(course_id) => {
                if let Some(record) = self.progress.get_mut(&course_id) {
                    let updated_at = advance_timestamp(record.updated_at, now);
                    *record = CourseProgress::empty(updated_at);
                }
            }
            CourseProgressAction::SetLastAccessedLesson { course_id, lesson_id } => {
                if let Some(record) = self.progress.get_mut(&course_id) {
                    record.last_accessed_lesson = Some(lesson_id);
                    record.updated_at = advance_timestamp(record.updated_at, now);
                }
            }
            CourseProgressAction::Initialize(progress) => {
                self.progress = progress
                    .into_iter()
                    .map(|(id, mut record)| {
                        record.progress_percentage = record.progress_percentage.min(100);
                        (id, record)
                    })
                    .collect();
            }
        }
    }
}

impl CourseProgressState {
    fn record_or_insert(&mut self, course_id: Id, now: DateTime<Utc>) -> &mut CourseProgress {
        self.progress
            .entry(course_id)
            .or_insert_with(|| CourseProgress::empty(now))
    }

    pub fn course(&self, course_id: Id) -> Option<&CourseProgress> {
        self.progress.get(&course_id)
    }

    pub fn completed_lessons(&self, course_id: Id) -> Vec<Id> {
        self.course(course_id)
            .map(|p| p.completed_lessons.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn passed_quizzes(&self, course_id: Id) -> Vec<Id> {
        self.course(course_id)
            .map(|p| p.passed_quizzes.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_lesson_completed(&self, course_id: Id, lesson_id: Id) -> bool {
        self.course(course_id)
            .map_or(false, |p| p.completed_lessons.contains(&lesson_id))
    }

    pub fn progress_percentage(&self, course_id: Id) -> u8 {
        self.course(course_id).map_or(0, |p| p.progress_percentage)
    }

    pub fn last_accessed_lesson(&self, course_id: Id) -> Option<Id> {
        self.course(course_id).and_then(|p| p.last_accessed_lesson)
    }

    pub fn all(&self) -> &BTreeMap<Id, CourseProgress> {
        &self.progress
    }

    /// Course ids with any recorded progress
    pub fn tracked_courses(&self) -> BTreeSet<Id> {
        self.progress.keys().copied().collect()
    }
}
