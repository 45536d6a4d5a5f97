// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Archive: the durable home compaction (C9, §4.9) copies a stream's events
//! into once a covering snapshot has been written. Archival never deletes
//! from the live WAL or projections (§4.9: "do not delete from
//! projection-relevant truth") — it is a second, additive copy, zstd-compressed
//! since archived streams are written once and read rarely (§6 "Persisted
//! state layout": `archive/events_<to_sequence>.log`).

use ft_core::event::StoredEvent;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("compression error: {0}")]
    Codec(String),
}

fn archive_path(archive_dir: &Path, to_sequence: u64) -> PathBuf {
    archive_dir.join(format!("events_{to_sequence}.log"))
}

/// Append `events` (already filtered to the range being archived) to the
/// run's archive file, compressing the whole run's batch with zstd. Multiple
/// streams compacted in the same run share one file, named by the run's
/// cutoff sequence, matching `archive/events_<to_sequence>.log`.
///
/// A file already present at that path (a prior stream compacted to the same
/// cutoff in an earlier run) is decompressed, extended, and rewritten rather
/// than appended to byte-for-byte, since zstd frames are not concatenable
/// without a streaming decoder on the read side.
pub fn append_archive(archive_dir: &Path, to_sequence: u64, events: &[StoredEvent]) -> Result<PathBuf, ArchiveError> {
    fs::create_dir_all(archive_dir)?;
    let path = archive_path(archive_dir, to_sequence);

    let mut all = read_archive(archive_dir, to_sequence)?;
    all.extend_from_slice(events);

    let mut plain = Vec::new();
    for event in &all {
        serde_json::to_writer(&mut plain, event)?;
        plain.push(b'\n');
    }
    let compressed = zstd::stream::encode_all(plain.as_slice(), 0).map_err(|e| ArchiveError::Codec(e.to_string()))?;

    let tmp = path.with_extension("tmp");
    {
        let mut f = File::create(&tmp)?;
        f.write_all(&compressed)?;
        f.flush()?;
    }
    fs::rename(&tmp, &path)?;
    Ok(path)
}

/// Read every archived event from `<archive_dir>/events_<to_sequence>.log`.
/// A missing file yields an empty list: a stream may be the first to compact
/// to a given cutoff.
pub fn read_archive(archive_dir: &Path, to_sequence: u64) -> Result<Vec<StoredEvent>, ArchiveError> {
    let path = archive_path(archive_dir, to_sequence);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let compressed = fs::read(&path)?;
    let plain = zstd::stream::decode_all(compressed.as_slice()).map_err(|e| ArchiveError::Codec(e.to_string()))?;
    let mut events = Vec::new();
    for line in plain.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        events.push(serde_json::from_slice(line)?);
    }
    Ok(events)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
