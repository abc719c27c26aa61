//! Survey tasks assigned to the learner

use super::{ActionName, Slice, SliceName};
use crate::lifecycle::{FetchEvent, FetchState};
use crate::types::{SurveyBuckets, SurveyTask};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveysState {
    pub surveys: FetchState<SurveyBuckets>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurveysAction {
    Clear,
    /// `GET /api/surveys` lifecycle
    Fetch(FetchEvent<SurveyBuckets>),
}

impl ActionName for SurveysAction {
    fn name(&self) -> String {
        match self {
            Self::Clear => "clearSurveys".into(),
            Self::Fetch(event) => format!("fetchSurveys/{}", event.label()),
        }
    }
}

impl Slice for SurveysState {
    type Action = SurveysAction;
    const NAME: SliceName = SliceName::Surveys;

    fn reduce(&mut self, action: SurveysAction, now: DateTime<Utc>) {
        match action {
            SurveysAction::Clear => self.surveys.clear(),
            SurveysAction::Fetch(event) => self.surveys.apply(event, now),
        }
    }
}

impl SurveysState {
    pub fn buckets(&self) -> &SurveyBuckets {
        &self.surveys.data
    }

    pub fn own(&self) -> &[SurveyTask] {
        &self.surveys.data.own
    }

    pub fn reviews(&self) -> &[SurveyTask] {
        &self.surveys.data.reviews
    }

    pub fn loading(&self) -> bool {
        self.surveys.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.surveys.error_message()
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.surveys.last_fetched_at
    }
}
