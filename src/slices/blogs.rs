//! Blog feed with a single featured post

use super::{ActionName, Slice, SliceName};
use crate::lifecycle::{FetchEvent, FetchState};
use crate::types::Blog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Featured post plus the remaining posts (never containing the featured one)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogFeed {
    pub featured_blog: Option<Blog>,
    pub blogs: Vec<Blog>,
}

impl BlogFeed {
    /// Split a listing into featured + rest.
    ///
    /// The featured post is the first one flagged `is_featured`, else the
    /// first in the returned order (the endpoint lists newest first).
    pub fn from_listing(mut blogs: Vec<Blog>) -> Self {
        if blogs.is_empty() {
            return Self::default();
        }
        let index = blogs.iter().position(|b| b.is_featured).unwrap_or(0);
        let featured = blogs.remove(index);
        Self {
            featured_blog: Some(featured),
            blogs,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogsState {
    pub feed: FetchState<BlogFeed>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlogsAction {
    Clear,
    /// `GET /api/blogs` lifecycle
    Fetch(FetchEvent<BlogFeed>),
}

impl ActionName for BlogsAction {
    fn name(&self) -> String {
        match self {
            Self::Clear => "clearBlogs".into(),
            Self::Fetch(event) => format!("fetchBlogs/{}", event.label()),
        }
    }
}

impl Slice for BlogsState {
    type Action = BlogsAction;
    const NAME: SliceName = SliceName::Blogs;

    fn reduce(&mut self, action: BlogsAction, now: DateTime<Utc>) {
        match action {
            BlogsAction::Clear => self.feed.clear(),
            BlogsAction::Fetch(event) => self.feed.apply(event, now),
        }
    }
}

impl BlogsState {
    pub fn featured(&self) -> Option<&Blog> {
        self.feed.data.featured_blog.as_ref()
    }

    pub fn blogs(&self) -> &[Blog] {
        &self.feed.data.blogs
    }

    pub fn loading(&self) -> bool {
        self.feed.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.feed.error_message()
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.feed.last_fetched_at
    }
}
