//! Copying content items between repositories.

use tracing::{debug, info, warn};

use super::{CopyCollaborator, CopyOptions, CopyOutcome};
use crate::action_log::{ActionKind, FileLog};
use crate::api::{list_all, ContentApi};
use crate::model::ContentItem;

/// Copies items from a source hub into a destination repository.
///
/// Source and destination may be the same client when moving within a hub.
pub struct HubCopier<'a, S, D> {
    source: &'a S,
    destination: &'a D,
}

impl<'a, S: ContentApi, D: ContentApi> HubCopier<'a, S, D> {
    pub fn new(source: &'a S, destination: &'a D) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Resolve the selection to items. The flag is false if anything
    /// selected could not be fetched.
    async fn gather(&self, options: &CopyOptions, log: &mut FileLog) -> (Vec<ContentItem>, bool) {
        if !options.ids.is_empty() {
            let mut items = Vec::with_capacity(options.ids.len());
            let mut complete = true;
            for id in &options.ids {
                match self.source.get_content_item(id).await {
                    Ok(item) if item.status.is_archived() => {
                        warn!(id, "Skipping archived source item");
                        log.add_comment(&format!("Skipped {id}: already archived at the source"));
                    }
                    Ok(item) => items.push(item),
                    Err(e) => {
                        warn!(id, error = %e, "Failed to fetch source item");
                        log.add_comment(&format!("Failed to fetch {id}: {e}"));
                        complete = false;
                    }
                }
            }
            return (items, complete);
        }

        let Some(repository) = options.source_repository.as_deref() else {
            log.add_comment("No source repository or item IDs given; nothing copied");
            return (Vec::new(), false);
        };

        match list_all(|page| self.source.list_content_items(repository, page)).await {
            Ok(items) => (items, true),
            Err(e) => {
                warn!(repository, error = %e, "Failed to list source repository");
                log.add_comment(&format!("Failed to list repository {repository}: {e}"));
                (Vec::new(), false)
            }
        }
    }
}

impl<S: ContentApi, D: ContentApi> CopyCollaborator for HubCopier<'_, S, D> {
    async fn copy(&self, options: &CopyOptions, log: &mut FileLog) -> CopyOutcome {
        let (items, mut success) = self.gather(options, log).await;
        let mut exported_ids = Vec::with_capacity(items.len());

        info!(count = items.len(), destination = %options.destination_repository, "Copying items");

        for item in items {
            let Some(source_id) = item.id.clone() else {
                continue;
            };

            match self
                .destination
                .create_content_item(&options.destination_repository, &item.detached())
                .await
            {
                Ok(created) => match created.id.filter(|id| !id.is_empty()) {
                    Some(new_id) => {
                        debug!(source = %source_id, created = %new_id, "Copied item");
                        log.add_action(ActionKind::Create, &new_id);
                        exported_ids.push(source_id);
                    }
                    None => {
                        warn!(id = %source_id, "Destination returned no id for copied item");
                        log.add_comment(&format!(
                            "Failed to copy {source_id} ({}): destination returned no id",
                            item.label
                        ));
                        success = false;
                    }
                },
                Err(e) => {
                    warn!(id = %source_id, error = %e, "Failed to copy item");
                    log.add_comment(&format!("Failed to copy {source_id} ({}): {e}", item.label));
                    success = false;
                }
            }
        }

        CopyOutcome {
            success,
            exported_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryHub;
    use crate::model::EntityStatus;

    fn options_for_repo(repo: &str) -> CopyOptions {
        CopyOptions {
            source_repository: Some(repo.to_string()),
            ids: Vec::new(),
            destination_repository: "dst".to_string(),
        }
    }

    #[tokio::test]
    async fn test_copies_whole_repository() {
        let hub = MemoryHub::new();
        hub.insert_item("src", "a", "Item A", EntityStatus::Active);
        hub.insert_item("src", "b", "Item B", EntityStatus::Active);
        hub.insert_item("src", "c", "Item C", EntityStatus::Active);
        hub.insert_item("src", "old", "Old", EntityStatus::Archived);

        let mut log = FileLog::disabled();
        let outcome = HubCopier::new(&hub, &hub)
            .copy(&options_for_repo("src"), &mut log)
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.exported_ids, vec!["a", "b", "c"]);
        assert_eq!(hub.items_in("dst").len(), 3);
        assert_eq!(log.get_data(&ActionKind::Create).len(), 3);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_ids() {
        let hub = MemoryHub::new();
        hub.insert_item("src", "a", "Item A", EntityStatus::Active);
        hub.insert_item("src", "b", "Item B", EntityStatus::Active);
        hub.fail_create("Item A");

        let mut log = FileLog::disabled();
        let outcome = HubCopier::new(&hub, &hub)
            .copy(&options_for_repo("src"), &mut log)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.exported_ids, vec!["b"]);
        assert_eq!(log.comments().len(), 1);
        assert!(log.comments()[0].contains("Failed to copy a"));
    }

    #[tokio::test]
    async fn test_created_item_without_id_is_a_failure() {
        let hub = MemoryHub::new();
        hub.insert_item("src", "a", "Item A", EntityStatus::Active);
        hub.insert_item("src", "b", "Item B", EntityStatus::Active);
        hub.create_without_id("Item A");

        let mut log = FileLog::disabled();
        let outcome = HubCopier::new(&hub, &hub)
            .copy(&options_for_repo("src"), &mut log)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.exported_ids, vec!["b"]);
        assert_eq!(log.get_data(&ActionKind::Create), vec!["created-2"]);
        assert!(log.comments()[0].contains("destination returned no id"));
    }

    #[tokio::test]
    async fn test_copy_by_ids_reports_missing() {
        let hub = MemoryHub::new();
        hub.insert_item("src", "a", "Item A", EntityStatus::Active);

        let options = CopyOptions {
            source_repository: None,
            ids: vec!["a".to_string(), "missing".to_string()],
            destination_repository: "dst".to_string(),
        };
        let mut log = FileLog::disabled();
        let outcome = HubCopier::new(&hub, &hub).copy(&options, &mut log).await;

        assert!(!outcome.success);
        assert_eq!(outcome.exported_ids, vec!["a"]);
    }

    #[tokio::test]
    async fn test_empty_selection_fails() {
        let hub = MemoryHub::new();
        let mut log = FileLog::disabled();
        let outcome = HubCopier::new(&hub, &hub)
            .copy(&CopyOptions::default(), &mut log)
            .await;

        assert!(!outcome.success);
        assert!(outcome.exported_ids.is_empty());
    }
}
