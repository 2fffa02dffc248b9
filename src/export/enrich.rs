//! Building full event aggregates for export.
//!
//! The event listing returns events without their editions, and the
//! edition listing returns editions without their slots. Enrichment walks
//! each tier with [`list_all`]. A failure at any tier drops that event from
//! the export instead of writing it with missing children.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{list_all, ContentApi};
use crate::error::Result;
use crate::model::{Edition, Event};

/// An event left out of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEvent {
    pub id: Option<String>,
    pub name: String,
    pub error: String,
}

/// Enriched events plus the ones that could not be enriched.
#[derive(Debug, Default)]
pub struct EnrichedEvents {
    pub events: Vec<Event>,
    pub dropped: Vec<DroppedEvent>,
}

/// List every event in the date window and enrich each one.
///
/// # Errors
///
/// Fails if the event listing itself fails. Per-event failures are
/// reported in [`EnrichedEvents::dropped`].
pub async fn fetch_events<A: ContentApi>(
    api: &A,
    from: Option<&DateTime<FixedOffset>>,
    to: Option<&DateTime<FixedOffset>>,
) -> Result<EnrichedEvents> {
    let listed = list_all(|page| api.list_events(page)).await?;
    let total = listed.len();
    let events: Vec<Event> = listed.into_iter().filter(|e| e.within(from, to)).collect();
    info!(total, in_window = events.len(), "Fetched events");

    Ok(enrich_events(api, events).await)
}

/// Attach editions, and their slots, to each event.
pub async fn enrich_events<A: ContentApi>(api: &A, events: Vec<Event>) -> EnrichedEvents {
    let mut result = EnrichedEvents::default();

    for mut event in events {
        match load_editions(api, &event).await {
            Ok(editions) => {
                debug!(event = %event.name, editions = editions.len(), "Enriched event");
                event.editions = editions;
                result.events.push(event);
            }
            Err(error) => {
                warn!(event = %event.name, %error, "Dropping event from export");
                result.dropped.push(DroppedEvent {
                    id: event.id,
                    name: event.name,
                    error,
                });
            }
        }
    }

    result
}

async fn load_editions<A: ContentApi>(
    api: &A,
    event: &Event,
) -> std::result::Result<Vec<Edition>, String> {
    let event_id = event
        .id
        .as_deref()
        .ok_or_else(|| "event has no id".to_string())?;

    let mut editions = list_all(|page| api.list_editions(event_id, page))
        .await
        .map_err(|e| format!("listing editions failed: {e}"))?;

    for edition in &mut editions {
        let edition_id = edition
            .id
            .clone()
            .ok_or_else(|| format!("edition '{}' has no id", edition.name))?;
        edition.slots = list_all(|page| api.list_slots(&edition_id, page))
            .await
            .map_err(|e| format!("listing slots of edition {edition_id} failed: {e}"))?;
    }

    Ok(editions)
}
