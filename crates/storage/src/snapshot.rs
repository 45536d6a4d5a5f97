// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Snapshot persistence for crash recovery.
//!
//! A snapshot stores the complete [`MaterializedState`] at a point in time,
//! identified by the WAL sequence number it was built through. Recovery
//! loads the snapshot and replays WAL entries after that sequence rather
//! than the whole log (§4.1, §4.7).

use crate::state::MaterializedState;
use chrono::Utc;
use ft_core::SNAPSHOT_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A materialized-state snapshot, persisted to a single JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSnapshot {
    #[serde(rename = "v")]
    pub version: u32,
    pub sequence: u64,
    pub state: MaterializedState,
    pub created_at: chrono::DateTime<Utc>,
}

impl StoredSnapshot {
    pub fn new(sequence: u64, state: MaterializedState) -> Self {
        Self { version: SNAPSHOT_SCHEMA_VERSION, sequence, state, created_at: Utc::now() }
    }

    pub fn is_compatible(&self) -> bool {
        self.version <= SNAPSHOT_SCHEMA_VERSION
    }
}

/// Write `snapshot` to `path` atomically: serialize to a `.tmp` sibling,
/// flush, then rename over the destination so a reader never observes a
/// partially-written file.
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &StoredSnapshot) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut f = File::create(&tmp)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        f.write_all(json.as_bytes())?;
        f.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load a snapshot from `path`. A missing file is not an error: callers
/// treat it as "no snapshot yet" and replay the WAL from the start.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Option<StoredSnapshot>, SnapshotError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

const MAX_BAK_FILES: u32 = ft_core::MAX_BAK_FILES as u32;

/// Pick the next `.bak` / `.bak.N` path for `path`, rotating older backups
/// out. Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
/// The oldest backup is removed once the limit is reached.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
