//! Content API access.
//!
//! [`ContentApi`] is the seam between the migration logic and the remote
//! service. [`HubClient`] implements it over HTTP; tests use an in-memory
//! hub instead.
//!
//! Listing endpoints are paginated. [`list_all`] walks every page of one
//! listing in order, one request at a time.

mod client;
#[cfg(test)]
pub mod memory;

pub use client::{Hub, HubClient};

use std::future::Future;

use crate::error::Result;
use crate::model::{ContentItem, Edition, Event, Slot};

/// Page size requested from listing endpoints.
pub const PAGE_SIZE: u32 = 100;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page number
    pub number: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.items.is_empty() && self.number.saturating_add(1) < self.total_pages
    }
}

/// Operations the migration and export logic needs from the content service.
///
/// Listings take a zero-based page number; use [`list_all`] to collect every
/// page. Archive and unarchive take the fetched item because the service
/// requires its current version.
pub trait ContentApi: Send + Sync {
    /// Fetch a content item by ID. A missing item is [`crate::Error::NotFound`].
    fn get_content_item(&self, id: &str) -> impl Future<Output = Result<ContentItem>> + Send;

    /// Archive an item, returning its new state.
    fn archive_content_item(
        &self,
        item: &ContentItem,
    ) -> impl Future<Output = Result<ContentItem>> + Send;

    /// Restore an archived item, returning its new state.
    fn unarchive_content_item(
        &self,
        item: &ContentItem,
    ) -> impl Future<Output = Result<ContentItem>> + Send;

    /// List the items of a repository. Archived items are not listed.
    fn list_content_items(
        &self,
        repository_id: &str,
        page: u32,
    ) -> impl Future<Output = Result<Page<ContentItem>>> + Send;

    /// Create an item in a repository, returning it with its new ID.
    fn create_content_item(
        &self,
        repository_id: &str,
        item: &ContentItem,
    ) -> impl Future<Output = Result<ContentItem>> + Send;

    /// List the events of the hub.
    fn list_events(&self, page: u32) -> impl Future<Output = Result<Page<Event>>> + Send;

    /// List the editions of an event.
    fn list_editions(
        &self,
        event_id: &str,
        page: u32,
    ) -> impl Future<Output = Result<Page<Edition>>> + Send;

    /// List the slots of an edition.
    fn list_slots(
        &self,
        edition_id: &str,
        page: u32,
    ) -> impl Future<Output = Result<Page<Slot>>> + Send;
}

/// Collect every page of a listing, in page order.
///
/// # Errors
///
/// Returns the first page error; items from earlier pages are discarded.
pub async fn list_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all = Vec::new();
    let mut page_number = 0;

    loop {
        let page = fetch(page_number).await?;
        let has_next = page.has_next();
        all.extend(page.items);

        if !has_next {
            break;
        }
        page_number += 1;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn page(items: Vec<u32>, number: u32, total_pages: u32) -> Page<u32> {
        Page {
            items,
            number,
            total_pages,
        }
    }

    #[tokio::test]
    async fn test_list_all_walks_pages_in_order() {
        let pages = vec![
            page(vec![1, 2], 0, 3),
            page(vec![3, 4], 1, 3),
            page(vec![5], 2, 3),
        ];
        let mut requested = Vec::new();

        let all = list_all(|n| {
            requested.push(n);
            let p = pages[n as usize].clone();
            async move { Ok(p) }
        })
        .await
        .unwrap();

        assert_eq!(all, vec![1, 2, 3, 4, 5]);
        assert_eq!(requested, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_list_all_stops_on_empty_page() {
        let all = list_all(|_| async { Ok(page(vec![], 0, 5)) }).await.unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_last_possible_page_number_has_no_next() {
        assert!(!page(vec![1], u32::MAX, u32::MAX).has_next());
        assert!(page(vec![1], u32::MAX - 2, u32::MAX).has_next());
    }

    #[tokio::test]
    async fn test_list_all_propagates_error() {
        let result: Result<Vec<u32>> = list_all(|n| async move {
            if n == 0 {
                Ok(page(vec![1], 0, 2))
            } else {
                Err(Error::Api {
                    status: 500,
                    message: "boom".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
    }
}
