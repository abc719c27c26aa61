//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use lumos_store::types::{Blog, Course, Event, Group, SurveyBuckets, User};
use lumos_store::{LearningApi, Result, StoreError};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted reply for one call
pub enum Reply<T> {
    Ok(T),
    Unauthorized,
    Status(u16),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Reply::Ok(data) => Ok(data),
            Reply::Unauthorized => Err(StoreError::Unauthorized),
            Reply::Status(status) => Err(StoreError::Server {
                status,
                message: "boom".into(),
            }),
        }
    }
}

struct Script<T>(Mutex<VecDeque<Reply<T>>>);

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T> Script<T> {
    fn push(&self, reply: Reply<T>) {
        self.0.lock().unwrap().push_back(reply);
    }

    fn next(&self, endpoint: &str) -> Result<T> {
        match self.0.lock().unwrap().pop_front() {
            Some(reply) => reply.into_result(),
            None => Err(StoreError::Network(format!("no scripted reply for {}", endpoint))),
        }
    }
}

/// In-memory stand-in for the learning API
#[derive(Default)]
pub struct FakeApi {
    me: Script<User>,
    events: Script<Vec<Event>>,
    surveys: Script<SurveyBuckets>,
    blogs: Script<Vec<Blog>>,
    courses: Script<Vec<Course>>,
    groups: Script<Vec<Group>>,
    events_release: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_me(self, reply: Reply<User>) -> Self {
        self.me.push(reply);
        self
    }

    pub fn on_events(self, reply: Reply<Vec<Event>>) -> Self {
        self.events.push(reply);
        self
    }

    pub fn on_surveys(self, reply: Reply<SurveyBuckets>) -> Self {
        self.surveys.push(reply);
        self
    }

    pub fn on_blogs(self, reply: Reply<Vec<Blog>>) -> Self {
        self.blogs.push(reply);
        self
    }

    pub fn on_courses(self, reply: Reply<Vec<Course>>) -> Self {
        self.courses.push(reply);
        self
    }

    pub fn on_groups(self, reply: Reply<Vec<Group>>) -> Self {
        self.groups.push(reply);
        self
    }

    /// Hold every `events()` reply until `release` is notified
    pub fn hold_events(mut self, release: Arc<Notify>) -> Self {
        self.events_release = Some(release);
        self
    }

    /// Number of requests made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LearningApi for FakeApi {
    async fn me(&self) -> Result<User> {
        self.record();
        self.me.next("me")
    }

    async fn events(&self) -> Result<Vec<Event>> {
        self.record();
        if let Some(release) = &self.events_release {
            release.notified().await;
        }
        self.events.next("events")
    }

    async fn surveys(&self) -> Result<SurveyBuckets> {
        self.record();
        self.surveys.next("surveys")
    }

    async fn blogs(&self, _limit: u32) -> Result<Vec<Blog>> {
        self.record();
        self.blogs.next("blogs")
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        self.record();
        self.courses.next("courses")
    }

    async fn groups(&self) -> Result<Vec<Group>> {
        self.record();
        self.groups.next("groups")
    }
}

pub fn user(id: u64) -> User {
    serde_json::from_value(json!({ "id": id, "email": format!("learner{}@lumos.test", id) })).unwrap()
}

pub fn event(id: u64) -> Event {
    serde_json::from_value(json!({ "id": id, "title": format!("Event {}", id), "date": "2024-06-01" }))
        .unwrap()
}

pub fn course(id: u64) -> Course {
    serde_json::from_value(json!({ "id": id, "title": format!("Course {}", id) })).unwrap()
}

pub fn blog(id: u64, featured: bool) -> Blog {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Post {}", id),
        "slug": format!("post-{}", id),
        "contentText": "hello",
        "author": { "id": 1, "username": "editor", "email": "editor@lumos.test" },
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
        "isFeatured": featured
    }))
    .unwrap()
}

pub fn group(members: &[u64], courses: &[u64]) -> Group {
    serde_json::from_value(json!({
        "users": members.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>(),
        "course_allocations": courses.iter().map(|id| json!({ "course_id": id })).collect::<Vec<_>>(),
    }))
    .unwrap()
}
