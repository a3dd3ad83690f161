//! Raw odds snapshots on disk.
//!
//! A successful live fetch is written out verbatim (pretty-printed) so the
//! same batch can be replayed offline, and the bundled fallback dataset is
//! read back through the same functions.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Default snapshot path for live fetches.
pub const DEFAULT_SNAPSHOT_FILE: &str = "data/odds.json";

/// Write a raw payload to `path`, creating parent directories as needed.
pub fn save_snapshot(payload: &Value, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(payload).context("Failed to serialise odds snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;

    debug!(path = %path.display(), "Snapshot saved");
    Ok(())
}

/// Read a raw payload from `path`.
/// Returns `None` if the file doesn't exist.
pub fn load_snapshot(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        info!(path = %path.display(), "No snapshot found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
    let payload: Value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    debug!(path = %path.display(), "Snapshot loaded");
    Ok(Some(payload))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
