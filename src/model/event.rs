//! Event aggregate: an event holds editions, an edition holds slots.
//!
//! Listing endpoints return each tier bare; the `editions` and `slots`
//! vectors are only populated by enrichment before export.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scheduled event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    /// RFC 3339 start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// RFC 3339 end date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub editions: Vec<Edition>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A publishing edition within an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<Slot>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A content slot scheduled in an edition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Create an event with a name and no remote identity.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_dates(mut self, start: &str, end: &str) -> Self {
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self
    }

    /// Whether the event lies within the optional date window.
    ///
    /// An event without a parseable date is kept: the window only
    /// excludes what it can prove lies outside it.
    #[must_use]
    pub fn within(
        &self,
        from: Option<&DateTime<FixedOffset>>,
        to: Option<&DateTime<FixedOffset>>,
    ) -> bool {
        let parse = |s: &Option<String>| {
            s.as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        };

        if let (Some(from), Some(start)) = (from, parse(&self.start)) {
            if start < *from {
                return false;
            }
        }
        if let (Some(to), Some(end)) = (to, parse(&self.end)) {
            if end > *to {
                return false;
            }
        }
        true
    }
}
