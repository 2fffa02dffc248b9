//! Data models for content hub entities.
//!
//! Only the fields that drive moving, diffing and enrichment are typed.
//! Everything else is carried through untouched in a flattened `extra` map
//! so that exported files round-trip on re-import.
//!
//! - [`ContentItem`] - a piece of content in a repository
//! - [`Event`], [`Edition`], [`Slot`] - the scheduling aggregate

pub mod content_item;
pub mod event;

pub use content_item::ContentItem;
pub use event::{Edition, Event, Slot};

use serde::{Deserialize, Serialize};

/// Visibility status of a remote entity.
///
/// Archiving is a soft delete: the entity stays fetchable by ID but no
/// longer shows up in listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityStatus {
    #[default]
    Active,
    Archived,
    Deleted,
    /// A status this tool does not know about.
    Other(String),
}

impl EntityStatus {
    /// Wire representation used by the content API.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Archived => "ARCHIVED",
            Self::Deleted => "DELETED",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl From<String> for EntityStatus {
    fn from(s: String) -> Self {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Self::Active,
            "ARCHIVED" => Self::Archived,
            "DELETED" => Self::Deleted,
            _ => Self::Other(s),
        }
    }
}

impl From<EntityStatus> for String {
    fn from(status: EntityStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
