//! Move orchestration: copy, then archive the copied sources.
//!
//! Archiving starts only after the copy phase as a whole reports success,
//! so a failed copy never leaves an item missing from both places. Archive
//! failures are per item: they are logged and the remaining items are still
//! archived. Already-copied destination items are never rolled back.

use serde::Serialize;
use tracing::{info, warn};

use super::{CopyCollaborator, CopyOptions};
use crate::action_log::{ActionKind, FileLog};
use crate::api::ContentApi;

/// Phase a move ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    Copying,
    Archiving,
    Done,
    /// The copy phase failed; no source item was touched.
    Aborted,
}

/// A source item that could not be archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of a move.
#[derive(Debug, Clone, Serialize)]
pub struct MoveReport {
    pub state: MoveState,
    /// Source IDs reported copied by the copy phase.
    pub copied: Vec<String>,
    /// Source IDs archived by this run.
    pub moved: Vec<String>,
    /// Source IDs that were already archived.
    pub already_archived: Vec<String>,
    pub failed: Vec<ArchiveFailure>,
}

impl MoveReport {
    fn new(state: MoveState, copied: Vec<String>) -> Self {
        Self {
            state,
            copied,
            moved: Vec::new(),
            already_archived: Vec::new(),
            failed: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.state == MoveState::Aborted
    }
}

/// Run a full move and close the log on every path.
///
/// Returns a report in state [`MoveState::Done`] or [`MoveState::Aborted`].
pub async fn move_items<A, C>(
    source: &A,
    copier: &C,
    options: &CopyOptions,
    log: &mut FileLog,
) -> MoveReport
where
    A: ContentApi,
    C: CopyCollaborator,
{
    info!(state = ?MoveState::Copying, "Starting move");
    let outcome = copier.copy(options, log).await;

    if !outcome.success {
        warn!(
            copied = outcome.exported_ids.len(),
            "Copy phase failed; skipping archive"
        );
        log.add_comment("Copy phase failed; no source items were archived");
        let _ = log.close();
        return MoveReport::new(MoveState::Aborted, outcome.exported_ids);
    }

    info!(state = ?MoveState::Archiving, count = outcome.exported_ids.len(), "Archiving sources");
    let mut report = MoveReport::new(MoveState::Archiving, outcome.exported_ids);
    let ids = report.copied.clone();
    archive_phase(source, &ids, log, &mut report).await;

    report.state = MoveState::Done;
    let _ = log.close();
    info!(
        moved = report.moved.len(),
        already_archived = report.already_archived.len(),
        failed = report.failed.len(),
        "Move complete"
    );
    report
}

/// Archive each source item in order, skipping ones already archived.
///
/// Every successful archive appends one `MOVED` entry; every failure a
/// comment. Re-running over the same IDs archives nothing twice.
pub async fn archive_phase<A: ContentApi>(
    source: &A,
    ids: &[String],
    log: &mut FileLog,
    report: &mut MoveReport,
) {
    for id in ids {
        let item = match source.get_content_item(id).await {
            Ok(item) => item,
            Err(e) => {
                warn!(id, error = %e, "Failed to fetch source item for archiving");
                log.add_comment(&format!("Failed to fetch {id} for archiving: {e}"));
                report.failed.push(ArchiveFailure {
                    id: id.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        if item.status.is_archived() {
            report.already_archived.push(id.clone());
            continue;
        }

        match source.archive_content_item(&item).await {
            Ok(_) => {
                log.add_action(ActionKind::Moved, id);
                report.moved.push(id.clone());
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to archive source item");
                log.add_comment(&format!("Failed to archive {id}: {e}"));
                report.failed.push(ArchiveFailure {
                    id: id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}
