//! Remote learning API seam
//!
//! The store only depends on [`LearningApi`]; [`HttpApi`] talks to the
//! real server, tests plug in a fake.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

use crate::error::Result;
use crate::types::{Blog, Course, Event, Group, SurveyBuckets, User};
use async_trait::async_trait;

/// Endpoints the store consumes
#[async_trait]
pub trait LearningApi: Send + Sync {
    /// `GET /api/me`
    async fn me(&self) -> Result<User>;

    /// `GET /api/events`
    async fn events(&self) -> Result<Vec<Event>>;

    /// `GET /api/surveys`
    async fn surveys(&self) -> Result<SurveyBuckets>;

    /// `GET /api/blogs?limit=N`, newest first
    async fn blogs(&self, limit: u32) -> Result<Vec<Blog>>;

    /// `GET /api/courses-subjects`
    async fn courses(&self) -> Result<Vec<Course>>;

    /// `GET /api/groups`
    async fn groups(&self) -> Result<Vec<Group>>;
}
