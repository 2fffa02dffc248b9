//! Destination-side revert: archive what a copy created.

use std::path::Path;

use tracing::{info, warn};

use super::ImportRevert;
use crate::action_log::{ActionKind, FileLog};
use crate::api::{ContentApi, HubClient};
use crate::config::{Credentials, Endpoints};
use crate::error::Result;

/// Connects to the destination hub and archives every `CREATE`d item.
pub struct HubImportRevert {
    endpoints: Endpoints,
}

impl HubImportRevert {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

impl ImportRevert for HubImportRevert {
    async fn revert(&self, destination: &Credentials, log_path: &Path) -> Result<()> {
        let client = HubClient::connect(destination, &self.endpoints).await?;
        revert_created(&client, log_path).await.map(|_| ())
    }
}

/// Archive every item logged as `CREATE` in `log_path`.
///
/// Returns the IDs archived by this call. Items already archived or gone
/// are skipped, so running it twice is harmless.
///
/// # Errors
///
/// Fails only if the log cannot be loaded.
pub async fn revert_created<D: ContentApi>(destination: &D, log_path: &Path) -> Result<Vec<String>> {
    let log = FileLog::load_from_file(log_path)?;
    let created = log.get_data(&ActionKind::Create);
    info!(count = created.len(), "Archiving created destination items");

    let mut archived = Vec::new();
    for id in created {
        let item = match destination.get_content_item(id).await {
            Ok(item) => item,
            Err(e) => {
                warn!(id, error = %e, "Skipping destination item: fetch failed");
                continue;
            }
        };

        if item.status.is_archived() {
            continue;
        }

        match destination.archive_content_item(&item).await {
            Ok(_) => archived.push(id.to_string()),
            Err(e) => warn!(id, error = %e, "Failed to archive destination item"),
        }
    }

    Ok(archived)
}
