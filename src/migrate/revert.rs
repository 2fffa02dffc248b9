//! Reverting a move from its action log.
//!
//! The source side is restored here: every `MOVED` item is unarchived,
//! each one independently. The destination side is handed to an
//! [`ImportRevert`] with the same log. There is no rollback of a revert;
//! it is a best-effort corrective pass.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::ImportRevert;
use crate::action_log::{ActionKind, FileLog};
use crate::api::ContentApi;
use crate::config::Credentials;
use crate::error::Result;

/// Why an item was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    NotFound,
    FetchFailed(String),
    AlreadyActive,
    UnarchiveFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::FetchFailed(e) => write!(f, "could not be fetched: {e}"),
            Self::AlreadyActive => write!(f, "already active"),
            Self::UnarchiveFailed(e) => write!(f, "could not be unarchived: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevertSkip {
    pub id: String,
    pub reason: SkipReason,
}

/// Outcome of a revert.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RevertReport {
    /// Source IDs unarchived by this run.
    pub restored: Vec<String>,
    pub skipped: Vec<RevertSkip>,
    /// Set when the destination-side revert failed.
    pub destination_error: Option<String>,
}

/// Revert the move recorded in `log_path`.
///
/// # Errors
///
/// Fails only if the log cannot be loaded, before anything is changed.
/// Per-item problems become [`RevertSkip`]s and a destination failure is
/// reported in [`RevertReport::destination_error`].
pub async fn revert_move<A, R>(
    source: &A,
    import_revert: &R,
    log_path: &Path,
    destination: &Credentials,
) -> Result<RevertReport>
where
    A: ContentApi,
    R: ImportRevert,
{
    let log = FileLog::load_from_file(log_path)?;
    let moved: Vec<String> = log
        .get_data(&ActionKind::Moved)
        .into_iter()
        .map(str::to_string)
        .collect();
    info!(count = moved.len(), log = %log_path.display(), "Reverting moved items");

    let mut report = RevertReport::default();
    for id in moved {
        let skip = |reason: SkipReason| RevertSkip {
            id: id.clone(),
            reason,
        };

        let item = match source.get_content_item(&id).await {
            Ok(item) => item,
            Err(e) if e.is_not_found() => {
                warn!(id, "Skipping revert: item not found");
                report.skipped.push(skip(SkipReason::NotFound));
                continue;
            }
            Err(e) => {
                warn!(id, error = %e, "Skipping revert: fetch failed");
                report.skipped.push(skip(SkipReason::FetchFailed(e.to_string())));
                continue;
            }
        };

        if item.status.is_active() {
            info!(id, "Skipping revert: already active");
            report.skipped.push(skip(SkipReason::AlreadyActive));
            continue;
        }

        match source.unarchive_content_item(&item).await {
            Ok(_) => report.restored.push(id.clone()),
            Err(e) => {
                warn!(id, error = %e, "Skipping revert: unarchive failed");
                report
                    .skipped
                    .push(skip(SkipReason::UnarchiveFailed(e.to_string())));
            }
        }
    }

    info!(hub = %destination.hub_id, "Reverting destination changes");
    if let Err(e) = import_revert.revert(destination, log_path).await {
        warn!(error = %e, "Destination revert failed");
        report.destination_error = Some(e.to_string());
    }

    Ok(report)
}
