//! Fetch orchestration
//!
//! Every fetch runs the same three steps: dispatch `Pending`, await the
//! API, dispatch `Fulfilled` or `Rejected`. Failures end up in the slice,
//! never in the caller's `Result`.

use crate::api::LearningApi;
use crate::error::{FetchError, Result};
use crate::lifecycle::{FetchEvent, FetchPhase};
use crate::slices::courses::allocated_course_ids;
use crate::slices::{BlogFeed, BlogsAction, CoursesAction, EventsAction, IdentityAction, SurveysAction};
use crate::store::{Action, Store};
use std::future::Future;
use std::sync::Arc;

pub const DEFAULT_BLOGS_LIMIT: u32 = 20;

/// Terminal phase of each collection after [`Fetcher::refresh_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub courses: FetchPhase,
    pub events: FetchPhase,
    pub surveys: FetchPhase,
    pub blogs: FetchPhase,
}

impl RefreshReport {
    pub fn all_fulfilled(&self) -> bool {
        [self.courses, self.events, self.surveys, self.blogs]
            .iter()
            .all(|phase| *phase == FetchPhase::Fulfilled)
    }
}

/// Drives remote fetches into the store
#[derive(Clone)]
pub struct Fetcher {
    store: Arc<Store>,
    api: Arc<dyn LearningApi>,
    blogs_limit: u32,
}

impl Fetcher {
    pub fn new(store: Arc<Store>, api: Arc<dyn LearningApi>) -> Self {
        Self {
            store,
            api,
            blogs_limit: DEFAULT_BLOGS_LIMIT,
        }
    }

    pub fn with_blogs_limit(mut self, limit: u32) -> Self {
        self.blogs_limit = limit;
        self
    }

    /// Validate the session; a 401 signs the user out
    pub async fn fetch_user_me(&self) -> FetchPhase {
        self.run(
            "Failed to fetch user profile",
            |event| IdentityAction::FetchMe(event).into(),
            self.api.me(),
        )
        .await
    }

    pub async fn fetch_events(&self) -> FetchPhase {
        self.run(
            "Failed to fetch events",
            |event| EventsAction::Fetch(event).into(),
            self.api.events(),
        )
        .await
    }

    pub async fn fetch_surveys(&self) -> FetchPhase {
        self.run(
            "Failed to fetch surveys",
            |event| SurveysAction::Fetch(event).into(),
            self.api.surveys(),
        )
        .await
    }

    /// Fetch the newest posts and split off the featured one
    pub async fn fetch_blogs(&self) -> FetchPhase {
        let limit = self.blogs_limit;
        self.run(
            "Failed to fetch blogs",
            |event| BlogsAction::Fetch(event).into(),
            async move { self.api.blogs(limit).await.map(BlogFeed::from_listing) },
        )
        .await
    }

    pub async fn fetch_courses(&self) -> FetchPhase {
        self.run(
            "Failed to fetch courses",
            |event| CoursesAction::Fetch(event).into(),
            self.api.courses(),
        )
        .await
    }

    /// Resolve which courses the signed-in user's groups allocate.
    ///
    /// Without a user this settles on an empty allocation and makes no
    /// request.
    pub async fn fetch_allocations(&self) -> FetchPhase {
        let Some(user_id) = self.store.select(|s| s.auth.user_id()) else {
            self.store
                .dispatch(CoursesAction::FetchAllocations(FetchEvent::Fulfilled(Vec::new())));
            return FetchPhase::Fulfilled;
        };

        self.run(
            "Failed to fetch course allocations",
            |event| CoursesAction::FetchAllocations(event).into(),
            async move {
                let groups = self.api.groups().await?;
                Ok(allocated_course_ids(&groups, user_id))
            },
        )
        .await
    }

    /// Refresh catalog, events, surveys and blogs concurrently
    pub async fn refresh_all(&self) -> RefreshReport {
        let (courses, events, surveys, blogs) = tokio::join!(
            self.fetch_courses(),
            self.fetch_events(),
            self.fetch_surveys(),
            self.fetch_blogs(),
        );
        let report = RefreshReport { courses, events, surveys, blogs };
        tracing::debug!(?report, "Refresh finished");
        report
    }

    async fn run<T, F>(
        &self,
        context: &str,
        wrap: impl Fn(FetchEvent<T>) -> Action,
        request: F,
    ) -> FetchPhase
    where
        F: Future<Output = Result<T>>,
    {
        self.store.dispatch(wrap(FetchEvent::Pending));

        let result = request.await.map_err(|e| {
            tracing::warn!(error = %e, "{}", context);
            FetchError::from_store(&e, context)
        });
        let phase = if result.is_ok() {
            FetchPhase::Fulfilled
        } else {
            FetchPhase::Rejected
        };

        self.store.dispatch(wrap(FetchEvent::from_result(result)));
        phase
    }
}
