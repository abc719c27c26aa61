//! Three-phase fetch lifecycle shared by every remotely sourced slice
//!
//! Transition table:
//!
//! | from                         | event       | to        | effect                                   |
//! |------------------------------|-------------|-----------|------------------------------------------|
//! | idle / fulfilled / rejected  | `Pending`   | pending   | `loading = true`, `error` cleared        |
//! | pending (or any)             | `Fulfilled` | fulfilled | data replaced, `last_fetched_at = now`   |
//! | pending (or any)             | `Rejected`  | rejected  | `error` set, data untouched              |
//!
//! A refetch keeps the last good data visible until it is replaced.
//! Overlapping fetches of the same collection are not de-duplicated:
//! whichever response is applied last wins.

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable phase of a fetchable collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// Lifecycle event produced by the fetch orchestration layer
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent<T> {
    Pending,
    Fulfilled(T),
    Rejected(FetchError),
}

impl<T> FetchEvent<T> {
    /// Short name used in namespaced action types
    pub fn label(&self) -> &'static str {
        match self {
            FetchEvent::Pending => "pending",
            FetchEvent::Fulfilled(_) => "fulfilled",
            FetchEvent::Rejected(_) => "rejected",
        }
    }

    /// Build the terminal event from an API result
    pub fn from_result(result: std::result::Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => FetchEvent::Fulfilled(data),
            Err(err) => FetchEvent::Rejected(err),
        }
    }
}

/// Data plus loading/error/freshness bookkeeping.
///
/// `loading` and a present `error` are never observable together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl<T: Default> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: None,
            last_fetched_at: None,
        }
    }
}

impl<T> FetchState<T> {
    /// Apply one lifecycle event
    pub fn apply(&mut self, event: FetchEvent<T>, now: DateTime<Utc>) {
        match event {
            FetchEvent::Pending => self.begin(),
            FetchEvent::Fulfilled(data) => self.fulfill(data, now),
            FetchEvent::Rejected(err) => self.reject(err),
        }
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fulfill(&mut self, data: T, now: DateTime<Utc>) {
        self.data = data;
        self.loading = false;
        self.error = None;
        self.last_fetched_at = Some(now);
    }

    pub fn reject(&mut self, err: FetchError) {
        self.loading = false;
        self.error = Some(err);
    }

    /// Replace the data outside of a fetch (no freshness change)
    pub fn replace(&mut self, data: T) {
        self.data = data;
        self.loading = false;
        self.error = None;
    }

    /// Manually toggle loading; raising it clears any error.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.error = None;
        }
    }

    pub fn set_error(&mut self, err: FetchError) {
        self.reject(err);
    }

    /// Drop the in-flight flag; used after rehydration since no fetch
    /// survives a restart.
    pub fn settle(&mut self) {
        self.loading = false;
    }

    pub fn phase(&self) -> FetchPhase {
        if self.loading {
            FetchPhase::Pending
        } else if self.error.is_some() {
            FetchPhase::Rejected
        } else if self.last_fetched_at.is_some() {
            FetchPhase::Fulfilled
        } else {
            FetchPhase::Idle
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(FetchError::message)
    }
}

impl<T: Default> FetchState<T> {
    /// Back to the initial, never-fetched state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
