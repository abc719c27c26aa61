//! Domain types shared by slices, the remote API and the migration unit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Course, lesson, quiz and user identifiers
pub type Id = u64;

/// Signed-in user as returned by `GET /api/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl User {
    /// "First Last", falling back to username, then email
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        self.username.clone().unwrap_or_else(|| self.email.clone())
    }
}

/// Per-course learning progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub completed_lessons: BTreeSet<Id>,
    pub passed_quizzes: BTreeSet<Id>,
    pub last_accessed_lesson: Option<Id>,
    /// Always within 0..=100, also when read back from storage
    #[serde(deserialize_with = "deserialize_percentage")]
    pub progress_percentage: u8,
    pub updated_at: DateTime<Utc>,
}

impl CourseProgress {
    /// Fresh record with nothing completed
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            completed_lessons: BTreeSet::new(),
            passed_quizzes: BTreeSet::new(),
            last_accessed_lesson: None,
            progress_percentage: 0,
            updated_at: now,
        }
    }
}

/// Clamp an arbitrary percentage into 0..=100
pub fn clamp_percentage(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

fn deserialize_percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Ok(0);
    }
    Ok(clamp_percentage(value.round() as i64))
}

/// A course the user has finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedCourse {
    pub id: Id,
    pub title: String,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    pub total_hours: f64,
}

/// Earned certificate; at most one per course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub course_id: Id,
    pub course_name: String,
    pub earned_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParticipant {
    pub attended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Id,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<EventParticipant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
}

/// Catalog entry from `GET /api/courses-subjects`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyRole {
    #[serde(rename = "SELF")]
    Respondent,
    Reviewer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyInfo {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyParticipant {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAssignment {
    pub survey: SurveyInfo,
    pub participant: SurveyParticipant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyTask {
    pub id: Id,
    pub assignment_id: Id,
    pub status: SurveyStatus,
    pub role: SurveyRole,
    pub created_at: String,
    pub assignment: SurveyAssignment,
}

/// Survey tasks split by who has to answer them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyBuckets {
    #[serde(rename = "self", default)]
    pub own: Vec<SurveyTask>,
    #[serde(default)]
    pub reviews: Vec<SurveyTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogTag {
    pub id: Id,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogAuthor {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Id,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Rich-text document or plain string, passed through untouched
    #[serde(default)]
    pub content_text: serde_json::Value,
    #[serde(default)]
    pub tags: Vec<BlogTag>,
    pub author: BlogAuthor,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAllocation {
    pub course_id: Id,
}

/// Learner group from `GET /api/groups`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub users: Vec<GroupMember>,
    #[serde(default)]
    pub course_allocations: Vec<CourseAllocation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_percentage() {
        assert_eq!(clamp_percentage(-5), 0);
        assert_eq!(clamp_percentage(42), 42);
        assert_eq!(clamp_percentage(250), 100);
    }

    #[test]
    fn test_stored_percentage_is_clamped_on_read() {
        let read = |pct: serde_json::Value| -> u8 {
            let progress: CourseProgress = serde_json::from_value(serde_json::json!({
                "completedLessons": [],
                "passedQuizzes": [],
                "lastAccessedLesson": null,
                "progressPercentage": pct,
                "updatedAt": "2024-01-01T00:00:00Z"
            }))
            .unwrap();
            progress.progress_percentage
        };

        assert_eq!(read(serde_json::json!(250)), 100);
        assert_eq!(read(serde_json::json!(-3)), 0);
        assert_eq!(read(serde_json::json!(42.6)), 43);
        assert_eq!(read(serde_json::json!(70)), 70);
    }

    #[test]
    fn test_survey_buckets_use_self_key() {
        let buckets: SurveyBuckets =
            serde_json::from_value(serde_json::json!({"self": [], "reviews": []})).unwrap();
        assert!(buckets.own.is_empty());
        let json = serde_json::to_value(&buckets).unwrap();
        assert!(json.get("self").is_some());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = User {
            id: 1,
            email: "ada@example.com".into(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            username: None,
            profile_picture: None,
            is_admin: false,
            is_staff: false,
            is_superuser: false,
        };
        assert_eq!(user.display_name(), "Ada Lovelace");
        user.first_name = None;
        user.last_name = None;
        assert_eq!(user.display_name(), "ada@example.com");
    }
}
