// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Snapshot: a projection rollup of a single stream covering a sequence
//! range, written by compaction (C9) so replay of that stream can resume
//! from `to_sequence + 1` instead of its first event (§4.9, GLOSSARY
//! "Snapshot").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rollup of one `(stream_type, stream_id)`'s projection state covering
/// `[from_sequence, to_sequence]`.
///
/// `state` is whatever projection row(s) that stream produces, serialized
/// generically so `ft-core` does not depend on `ft-storage`'s concrete
/// projection types. This is distinct from `ft-storage`'s `StoredSnapshot`,
/// which rolls up the *entire* store for fast restart rather than a single
/// stream for compaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub stream_type: String,
    pub stream_id: String,
    pub from_sequence: u64,
    pub to_sequence: u64,
    pub state: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Current schema version snapshots are written with.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

impl Snapshot {
    pub fn new(
        stream_type: impl Into<String>,
        stream_id: impl Into<String>,
        from_sequence: u64,
        to_sequence: u64,
        state: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            version: SNAPSHOT_SCHEMA_VERSION,
            stream_type: stream_type.into(),
            stream_id: stream_id.into(),
            from_sequence,
            to_sequence,
            state,
            created_at: now,
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.version <= SNAPSHOT_SCHEMA_VERSION
    }

    pub fn covers(&self, sequence: u64) -> bool {
        sequence >= self.from_sequence && sequence <= self.to_sequence
    }
}

/// Maximum number of rotated `.bak` backups kept for a snapshot file before
/// the oldest is discarded (§4.1 "Snapshot rotation").
pub const MAX_BAK_FILES: usize = 3;

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
