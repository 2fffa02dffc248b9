//! Content item model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityStatus;

/// A content item as returned by the content API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Remote identifier; absent for items that were never created remotely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display label
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub status: EntityStatus,

    /// Optimistic-locking version, required by archive/unarchive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Repository the item lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_repository_id: Option<String>,

    /// Content body, schema-defined and opaque here
    #[serde(default)]
    pub body: Value,

    /// Fields not modelled above, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentItem {
    /// Create a new, never-created item.
    pub fn new(label: &str, body: Value) -> Self {
        Self {
            label: label.to_string(),
            body,
            ..Self::default()
        }
    }

    /// Set the remote identifier.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = status;
        self
    }

    /// Copy of this item suitable for creation in another repository:
    /// no remote identity, no version, no repository binding, active.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            id: None,
            version: None,
            content_repository_id: None,
            status: EntityStatus::Active,
            ..self.clone()
        }
    }
}
