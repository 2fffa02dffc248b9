//! Moving content between repositories, and undoing moves.
//!
//! A move is a copy followed by archiving the copied sources:
//!
//! ```text
//! Copying ──success──▶ Archiving ──▶ Done
//!    │
//!    └──failure──▶ Aborted   (no source touched)
//! ```
//!
//! Both halves write to one [`FileLog`]: the copy logs a `CREATE` per
//! destination item, the archive phase a `MOVED` per archived source. A
//! revert reads that log back, restores every `MOVED` source and hands
//! the `CREATE`s to the destination-side revert.
//!
//! The copy and destination revert are collaborators behind
//! [`CopyCollaborator`] and [`ImportRevert`]; [`HubCopier`] and
//! [`HubImportRevert`] are the implementations the CLI uses.

mod copy;
mod import_revert;
mod move_items;
mod revert;

pub use copy::HubCopier;
pub use import_revert::{revert_created, HubImportRevert};
pub use move_items::{archive_phase, move_items, ArchiveFailure, MoveReport, MoveState};
pub use revert::{revert_move, RevertReport, RevertSkip, SkipReason};

use std::future::Future;
use std::path::Path;

use crate::action_log::FileLog;
use crate::config::Credentials;
use crate::error::Result;

/// What to copy, and where to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Copy every (non-archived) item of this repository...
    pub source_repository: Option<String>,
    /// ...or exactly these item IDs. Takes precedence when non-empty.
    pub ids: Vec<String>,
    /// Repository that receives the copies.
    pub destination_repository: String,
}

/// Result of a copy run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    /// False if any item could not be copied.
    pub success: bool,
    /// Source IDs of the items copied, in copy order.
    pub exported_ids: Vec<String>,
}

/// Creates copies of source content at the destination.
pub trait CopyCollaborator {
    /// Copy the selected items, logging each creation to `log`.
    ///
    /// Failures are reported through [`CopyOutcome::success`], never by
    /// abandoning items already created: `exported_ids` always lists
    /// every item that now exists at the destination.
    fn copy(&self, options: &CopyOptions, log: &mut FileLog) -> impl Future<Output = CopyOutcome>;
}

/// Undoes destination-side changes recorded in a move log.
pub trait ImportRevert {
    /// Revert what the copy created at the destination.
    fn revert(&self, destination: &Credentials, log_path: &Path) -> impl Future<Output = Result<()>>;
}
