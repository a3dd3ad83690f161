//! Bundled static dataset.
//!
//! Reads a previously saved provider payload from disk. Used when no API key
//! is configured or the live feed fails.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use super::{decode_events, OddsSource};
use crate::storage;
use crate::types::{ArbError, Event};

pub struct BundledSource {
    path: PathBuf,
}

impl BundledSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl OddsSource for BundledSource {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        let payload = storage::load_snapshot(&self.path)?.ok_or_else(|| {
            ArbError::DataSourceUnavailable(format!(
                "bundled dataset {} not found",
                self.path.display()
            ))
        })?;
        decode_events(payload)
            .with_context(|| format!("Bundled dataset {} is unusable", self.path.display()))
    }

    fn name(&self) -> &str {
        "bundled"
    }
}
