//! GitHub activity event structures
//!
//! Events come from `/users/{user}/events/public`. Only the fields needed for
//! scoring are modelled; everything is optional so a sparse or odd payload
//! never fails to decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{PULL_REQUEST_EVENT, PULL_REQUEST_REVIEW_EVENT, PUSH_EVENT};

/// Activity event as returned by the GitHub events API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actor: Option<Actor>,
    #[serde(default)]
    pub repo: Option<Repo>,
    #[serde(default)]
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

/// Payload structure, shape depends on the event type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub merged: Option<bool>,
}

/// Scoring view of an event with absent fields already defaulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Push,
    PullRequest { action: Option<String>, merged: bool },
    PullRequestReview,
    Other(String),
    /// Event without a `type`
    Unknown,
}

impl Event {
    /// Event with only its type tag set
    pub fn of_type(event_type: &str) -> Self {
        Self {
            event_type: Some(event_type.to_string()),
            ..Self::default()
        }
    }

    /// Pull request event with the given action and merged flag
    pub fn pull_request(action: Option<&str>, merged: bool) -> Self {
        Self {
            event_type: Some(PULL_REQUEST_EVENT.to_string()),
            payload: Some(Payload {
                action: action.map(str::to_string),
                pull_request: Some(PullRequest {
                    merged: Some(merged),
                    ..PullRequest::default()
                }),
            }),
            ..Self::default()
        }
    }

    pub fn action(&self) -> Option<&str> {
        self.payload.as_ref()?.action.as_deref()
    }

    /// `payload.pull_request.merged`, false when any level is missing
    pub fn is_merged(&self) -> bool {
        self.payload
            .as_ref()
            .and_then(|p| p.pull_request.as_ref())
            .and_then(|pr| pr.merged)
            .unwrap_or(false)
    }

    pub fn kind(&self) -> EventKind {
        match self.event_type.as_deref() {
            None => EventKind::Unknown,
            Some(PUSH_EVENT) => EventKind::Push,
            Some(PULL_REQUEST_EVENT) => EventKind::PullRequest {
                action: self.action().map(str::to_string),
                merged: self.is_merged(),
            },
            Some(PULL_REQUEST_REVIEW_EVENT) => EventKind::PullRequestReview,
            Some(other) => EventKind::Other(other.to_string()),
        }
    }
}
