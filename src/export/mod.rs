//! Exporting remote entities to a directory of JSON files.
//!
//! # Diffing against earlier exports
//!
//! An export directory may already hold files from a previous run. Before
//! writing, every `*.json` file is read back and fetched entities are
//! matched to files by remote ID:
//!
//! - a match is [`ExportStatus::Updated`] and rewrites its existing file
//! - no match is [`ExportStatus::Created`] and gets a fresh filename
//!   derived from the entity's display name
//!
//! Files whose entity was not fetched are left alone.
//!
//! # Confirmation
//!
//! Overwriting is gated: when any record is `Updated`, the caller's confirm
//! callback sees those records first, and a refusal writes nothing (the
//! output directory is not even created). Pass a callback returning `true`
//! to force.
//!
//! Written files never contain the top-level remote `id`.

mod diff;
pub mod enrich;
mod file;

pub use diff::{classify, sanitize_filename, unique_filename, ExportedEntityIndex};
pub use enrich::{fetch_events, EnrichedEvents};
pub use file::{atomic_write, export_json};

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{ContentItem, Event};

/// An entity that can be written to and matched in an export directory.
pub trait Exportable: Serialize + DeserializeOwned {
    /// Identity on the remote service, if known.
    fn remote_id(&self) -> Option<&str>;

    /// Human-readable name used to derive a filename.
    fn display_name(&self) -> &str;
}

impl Exportable for Event {
    fn remote_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Exportable for ContentItem {
    fn remote_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        &self.label
    }
}

/// How an entity relates to the existing export directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStatus {
    #[serde(rename = "CREATED")]
    Created,
    #[serde(rename = "UPDATED")]
    Updated,
    /// Matched and unchanged. Nothing is written for these.
    #[serde(rename = "UP-TO-DATE")]
    UpToDate,
}

impl ExportStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
            Self::UpToDate => "UP-TO-DATE",
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entity paired with the file it goes to.
#[derive(Debug, Clone)]
pub struct ExportRecord<T> {
    pub filename: PathBuf,
    pub status: ExportStatus,
    pub entity: T,
}

/// Counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub created: usize,
    pub updated: usize,
    pub up_to_date: usize,
}

impl ExportStats {
    /// Tally the statuses of a set of records.
    pub fn from_records<T>(records: &[ExportRecord<T>]) -> Self {
        let mut stats = Self::default();
        for record in records {
            match record.status {
                ExportStatus::Created => stats.created += 1,
                ExportStatus::Updated => stats.updated += 1,
                ExportStatus::UpToDate => stats.up_to_date += 1,
            }
        }
        stats
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.created + self.updated
    }
}

/// Result of an export run.
#[derive(Debug)]
pub enum ExportOutcome<T> {
    /// Nothing was fetched; nothing was touched.
    NothingToExport,
    /// The overwrite was refused; nothing was written.
    Declined(Vec<ExportRecord<T>>),
    /// Files were written.
    Written(Vec<ExportRecord<T>>),
}

impl<T> ExportOutcome<T> {
    /// Records classified by the run, written or not.
    #[must_use]
    pub fn records(&self) -> &[ExportRecord<T>] {
        match self {
            Self::NothingToExport => &[],
            Self::Declined(records) | Self::Written(records) => records,
        }
    }
}

/// Writes entities into one output directory.
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Diff `entities` against the directory and write them.
    ///
    /// `confirm` is called only when at least one existing file would be
    /// overwritten, with exactly those records.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or written, or if
    /// `confirm` fails. Files written before a write error stay written.
    pub fn export<T, F>(&self, entities: Vec<T>, confirm: F) -> Result<ExportOutcome<T>>
    where
        T: Exportable,
        F: FnOnce(&[&ExportRecord<T>]) -> Result<bool>,
    {
        if entities.is_empty() {
            info!(dir = %self.output_dir.display(), "Nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let index = ExportedEntityIndex::<T>::scan(&self.output_dir)?;
        let records = classify(&self.output_dir, &index, entities);

        let updated: Vec<&ExportRecord<T>> = records
            .iter()
            .filter(|r| r.status == ExportStatus::Updated)
            .collect();
        if !updated.is_empty() && !confirm(&updated)? {
            info!(updated = updated.len(), "Export declined");
            return Ok(ExportOutcome::Declined(records));
        }

        fs::create_dir_all(&self.output_dir)?;
        for record in &records {
            if record.status == ExportStatus::UpToDate {
                continue;
            }
            atomic_write(&record.filename, &export_json(&record.entity)?)?;
            debug!(file = %record.filename.display(), status = %record.status, "Wrote export file");
        }

        let stats = ExportStats::from_records(&records);
        info!(
            created = stats.created,
            updated = stats.updated,
            dir = %self.output_dir.display(),
            "Export complete"
        );
        Ok(ExportOutcome::Written(records))
    }
}
