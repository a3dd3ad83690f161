//! Live-first source with a bundled fallback.
//!
//! Tries the live feed when a client is configured. A successful live payload
//! is snapshotted to disk and returned; any live failure (or a missing API
//! key) drops through to the bundled dataset. Only when the bundled dataset
//! is also unusable does the call fail, with `DataSourceUnavailable`.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::bundled::BundledSource;
use super::odds_api::OddsApiClient;
use super::{decode_events, OddsSource};
use crate::storage;
use crate::types::{ArbError, Event};

pub struct FallbackSource {
    live: Option<OddsApiClient>,
    snapshot_path: Option<PathBuf>,
    bundled: BundledSource,
}

impl FallbackSource {
    pub fn new(
        live: Option<OddsApiClient>,
        snapshot_path: Option<PathBuf>,
        bundled: BundledSource,
    ) -> Self {
        Self {
            live,
            snapshot_path,
            bundled,
        }
    }

    /// Fetch from the live feed and snapshot the raw payload.
    async fn fetch_live(&self, live: &OddsApiClient) -> Result<Vec<Event>> {
        let payload = live.fetch_payload().await?;
        self.accept_payload(payload)
    }

    /// Decode a live payload, snapshotting it only once it decodes.
    ///
    /// A payload that is not an event batch never replaces the last good
    /// snapshot.
    fn accept_payload(&self, payload: Value) -> Result<Vec<Event>> {
        let events = decode_events(payload.clone())?;

        if let Some(path) = &self.snapshot_path {
            // The batch is still good even if it cannot be cached.
            if let Err(e) = storage::save_snapshot(&payload, path) {
                error!(error = %e, "Failed to persist live odds snapshot");
            }
        }

        Ok(events)
    }
}

#[async_trait]
impl OddsSource for FallbackSource {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        if let Some(live) = &self.live {
            match self.fetch_live(live).await {
                Ok(events) => {
                    info!(count = events.len(), source = live.name(), "Live odds fetched");
                    return Ok(events);
                }
                Err(e) => {
                    warn!(error = %e, "Live odds fetch failed, using bundled data");
                }
            }
        }

        match self.bundled.fetch_events().await {
            Ok(events) => {
                info!(
                    count = events.len(),
                    path = %self.bundled.path().display(),
                    "Bundled odds loaded"
                );
                Ok(events)
            }
            Err(e) => {
                error!(error = %e, "No odds data available");
                Err(ArbError::DataSourceUnavailable(format!("{e:#}")).into())
            }
        }
    }

    fn name(&self) -> &str {
        match self.live {
            Some(_) => "live+bundled",
            None => "bundled",
        }
    }
}
