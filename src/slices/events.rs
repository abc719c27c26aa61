//! Events catalog plus the learner's registrations and attendance

use super::{ActionName, Slice, SliceName};
use crate::error::FetchError;
use crate::lifecycle::{FetchEvent, FetchState};
use crate::types::{Event, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsState {
    pub events: FetchState<Vec<Event>>,
    pub registered_events: BTreeSet<Id>,
    pub attended_events: BTreeSet<Id>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventsAction {
    SetEvents(Vec<Event>),
    Register(Id),
    MarkAttended(Id),
    SetLoading(bool),
    SetError(String),
    /// `GET /api/events` lifecycle
    Fetch(FetchEvent<Vec<Event>>),
}

impl ActionName for EventsAction {
    fn name(&self) -> String {
        match self {
            Self::SetEvents(_) => "setEvents".into(),
            Self::Register(_) => "registerForEvent".into(),
            Self::MarkAttended(_) => "markEventAttended".into(),
            Self::SetLoading(_) => "setLoading".into(),
            Self::SetError(_) => "setError".into(),
            Self::Fetch(event) => format!("fetchEvents/{}", event.label()),
        }
    }
}

impl Slice for EventsState {
    type Action = EventsAction;
    const NAME: SliceName = SliceName::Events;

    fn reduce(&mut self, action: EventsAction, now: DateTime<Utc>) {
        match action {
            EventsAction::SetEvents(events) => self.events.replace(events),
            EventsAction::Register(id) => {
                self.registered_events.insert(id);
            }
            EventsAction::MarkAttended(id) => {
                self.attended_events.insert(id);
            }
            EventsAction::SetLoading(loading) => self.events.set_loading(loading),
            EventsAction::SetError(message) => self.events.set_error(FetchError::Failed(message)),
            EventsAction::Fetch(event) => self.events.apply(event, now),
        }
    }
}

impl EventsState {
    pub fn events(&self) -> &[Event] {
        &self.events.data
    }

    pub fn registered(&self) -> &BTreeSet<Id> {
        &self.registered_events
    }

    pub fn attended(&self) -> &BTreeSet<Id> {
        &self.attended_events
    }

    pub fn attended_count(&self) -> usize {
        self.attended_events.len()
    }

    pub fn is_registered(&self, event_id: Id) -> bool {
        self.registered_events.contains(&event_id)
    }

    pub fn loading(&self) -> bool {
        self.events.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.events.error_message()
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.events.last_fetched_at
    }
}
