//! Odds data acquisition.
//!
//! Defines the `OddsSource` trait the transport pulls event batches from,
//! plus the concrete sources: the live Odds API, the bundled sample file,
//! and the fallback chain that combines them.

pub mod bundled;
pub mod fallback;
pub mod odds_api;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::types::Event;

/// Abstraction over event-batch providers.
///
/// Every call returns a fresh batch; implementations may cache raw payloads
/// on disk but never hand back state from a previous call in place of a
/// fetch they were asked to make.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Fetch the current batch of events.
    ///
    /// An error means no batch could be produced at all.
    async fn fetch_events(&self) -> Result<Vec<Event>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Decode a provider payload into events.
///
/// The payload must be a JSON array. Each element is decoded on its own so
/// one malformed event is dropped instead of poisoning the batch.
pub fn decode_events(payload: Value) -> Result<Vec<Event>> {
    let Value::Array(items) = payload else {
        bail!("Odds payload is not a JSON array");
    };

    let total = items.len();
    let events: Vec<Event> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Event>(item) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(index, error = %e, "Dropping malformed event");
                None
            }
        })
        .collect();

    if events.len() < total {
        warn!(kept = events.len(), total, "Some events could not be decoded");
    }

    Ok(events)
}
