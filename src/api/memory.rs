//! In-memory content hub for tests.
//!
//! Behaves like the remote service closely enough for the migration
//! logic: archived items are hidden from listings, archive/unarchive
//! bump the version, and every tier of the event aggregate is paginated
//! with a small page size. Failures can be injected per ID.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::{ContentApi, Page};
use crate::error::{Error, Result};
use crate::model::{ContentItem, Edition, EntityStatus, Event, Slot};

const MEMORY_PAGE_SIZE: usize = 2;

#[derive(Default)]
struct State {
    items: Vec<ContentItem>,
    events: Vec<Event>,
    editions: HashMap<String, Vec<Edition>>,
    slots: HashMap<String, Vec<Slot>>,
    next_id: usize,

    fail_get: HashSet<String>,
    fail_archive: HashSet<String>,
    fail_unarchive: HashSet<String>,
    fail_create_labels: HashSet<String>,
    idless_create_labels: HashSet<String>,
    fail_editions: HashSet<String>,
    fail_slots: HashSet<String>,

    archive_calls: Vec<String>,
    unarchive_calls: Vec<String>,
}

/// A fake hub holding everything in memory.
#[derive(Default)]
pub struct MemoryHub {
    state: Mutex<State>,
}

fn injected(what: &str, id: &str) -> Error {
    Error::Api {
        status: 500,
        message: format!("injected {what} failure for {id}"),
    }
}

fn paginate<T: Clone>(all: &[T], page: u32) -> Page<T> {
    let total_pages = all.len().div_ceil(MEMORY_PAGE_SIZE);
    let start = page as usize * MEMORY_PAGE_SIZE;
    let items = all.iter().skip(start).take(MEMORY_PAGE_SIZE).cloned().collect();
    Page {
        items,
        number: page,
        total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
    }
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Add an item to a repository.
    pub fn insert_item(&self, repository_id: &str, id: &str, label: &str, status: EntityStatus) {
        let mut item = ContentItem::new(label, serde_json::json!({"label": label}))
            .with_id(id)
            .with_status(status);
        item.version = Some(1);
        item.content_repository_id = Some(repository_id.to_string());
        self.state().items.push(item);
    }

    pub fn insert_event(&self, event: Event) {
        self.state().events.push(event);
    }

    pub fn insert_edition(&self, event_id: &str, edition: Edition) {
        self.state()
            .editions
            .entry(event_id.to_string())
            .or_default()
            .push(edition);
    }

    pub fn insert_slot(&self, edition_id: &str, slot: Slot) {
        self.state()
            .slots
            .entry(edition_id.to_string())
            .or_default()
            .push(slot);
    }

    pub fn fail_get(&self, id: &str) {
        self.state().fail_get.insert(id.to_string());
    }

    pub fn fail_archive(&self, id: &str) {
        self.state().fail_archive.insert(id.to_string());
    }

    pub fn fail_unarchive(&self, id: &str) {
        self.state().fail_unarchive.insert(id.to_string());
    }

    pub fn fail_create(&self, label: &str) {
        self.state().fail_create_labels.insert(label.to_string());
    }

    /// Creating an item with this label succeeds but returns no ID.
    pub fn create_without_id(&self, label: &str) {
        self.state().idless_create_labels.insert(label.to_string());
    }

    pub fn fail_editions(&self, event_id: &str) {
        self.state().fail_editions.insert(event_id.to_string());
    }

    pub fn fail_slots(&self, edition_id: &str) {
        self.state().fail_slots.insert(edition_id.to_string());
    }

    /// Current status of an item, if it exists.
    pub fn status_of(&self, id: &str) -> Option<EntityStatus> {
        self.state()
            .items
            .iter()
            .find(|i| i.id.as_deref() == Some(id))
            .map(|i| i.status.clone())
    }

    /// Items in a repository, archived ones included.
    pub fn items_in(&self, repository_id: &str) -> Vec<ContentItem> {
        self.state()
            .items
            .iter()
            .filter(|i| i.content_repository_id.as_deref() == Some(repository_id))
            .cloned()
            .collect()
    }

    /// IDs passed to `archive_content_item`, in call order.
    pub fn archive_calls(&self) -> Vec<String> {
        self.state().archive_calls.clone()
    }

    /// IDs passed to `unarchive_content_item`, in call order.
    pub fn unarchive_calls(&self) -> Vec<String> {
        self.state().unarchive_calls.clone()
    }

    fn set_status(&self, item: &ContentItem, status: EntityStatus) -> Result<ContentItem> {
        let id = item.id.clone().unwrap_or_default();
        let mut state = self.state();
        let stored = state
            .items
            .iter_mut()
            .find(|i| i.id.as_deref() == Some(id.as_str()))
            .ok_or(Error::NotFound {
                resource: "Content item",
                id: id.clone(),
            })?;
        stored.status = status;
        stored.version = stored.version.map(|v| v + 1);
        Ok(stored.clone())
    }
}

impl ContentApi for MemoryHub {
    async fn get_content_item(&self, id: &str) -> Result<ContentItem> {
        let state = self.state();
        if state.fail_get.contains(id) {
            return Err(injected("get", id));
        }
        state
            .items
            .iter()
            .find(|i| i.id.as_deref() == Some(id))
            .cloned()
            .ok_or(Error::NotFound {
                resource: "Content item",
                id: id.to_string(),
            })
    }

    async fn archive_content_item(&self, item: &ContentItem) -> Result<ContentItem> {
        let id = item.id.clone().unwrap_or_default();
        {
            let mut state = self.state();
            state.archive_calls.push(id.clone());
            if state.fail_archive.contains(&id) {
                return Err(injected("archive", &id));
            }
        }
        self.set_status(item, EntityStatus::Archived)
    }

    async fn unarchive_content_item(&self, item: &ContentItem) -> Result<ContentItem> {
        let id = item.id.clone().unwrap_or_default();
        {
            let mut state = self.state();
            state.unarchive_calls.push(id.clone());
            if state.fail_unarchive.contains(&id) {
                return Err(injected("unarchive", &id));
            }
        }
        self.set_status(item, EntityStatus::Active)
    }

    async fn list_content_items(&self, repository_id: &str, page: u32) -> Result<Page<ContentItem>> {
        let visible: Vec<ContentItem> = self
            .items_in(repository_id)
            .into_iter()
            .filter(|i| !i.status.is_archived())
            .collect();
        Ok(paginate(&visible, page))
    }

    async fn create_content_item(
        &self,
        repository_id: &str,
        item: &ContentItem,
    ) -> Result<ContentItem> {
        let mut state = self.state();
        if state.fail_create_labels.contains(&item.label) {
            return Err(injected("create", &item.label));
        }
        state.next_id += 1;
        let mut created = item.clone();
        created.id = Some(format!("created-{}", state.next_id));
        created.version = Some(1);
        created.status = EntityStatus::Active;
        created.content_repository_id = Some(repository_id.to_string());
        state.items.push(created.clone());
        if state.idless_create_labels.contains(&item.label) {
            created.id = None;
        }
        Ok(created)
    }

    async fn list_events(&self, page: u32) -> Result<Page<Event>> {
        Ok(paginate(&self.state().events, page))
    }

    async fn list_editions(&self, event_id: &str, page: u32) -> Result<Page<Edition>> {
        let state = self.state();
        if state.fail_editions.contains(event_id) {
            return Err(injected("editions", event_id));
        }
        let editions = state.editions.get(event_id).cloned().unwrap_or_default();
        Ok(paginate(&editions, page))
    }

    async fn list_slots(&self, edition_id: &str, page: u32) -> Result<Page<Slot>> {
        let state = self.state();
        if state.fail_slots.contains(edition_id) {
            return Err(injected("slots", edition_id));
        }
        let slots = state.slots.get(edition_id).cloned().unwrap_or_default();
        Ok(paginate(&slots, page))
    }
}
