// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! The write-ahead log: one JSON object per line, append-only, the durable
//! truth underlying the Event Store (§4.1 "Event Store").
//!
//! Recovery from a corrupt tail must never lose previously-durable entries.
//! On open, any trailing line that fails to parse is treated as torn-write
//! corruption: the file up to that point is kept, the corrupt suffix is
//! rotated to a `.bak` file (see [`crate::snapshot::rotate_bak_path`]), and
//! the WAL reopens clean. `entries_after`/`next_unprocessed` apply the same
//! rule at read time, in case corruption was appended after `open`.

use ft_core::event::StoredEvent;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::snapshot::rotate_bak_path;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One durable WAL record: a sequence number plus the stored event it was
/// assigned to.
#[derive(Debug, Clone)]
pub struct WalEntry {
    pub seq: u64,
    pub event: StoredEvent,
}

/// Number of buffered appends after which [`Wal::needs_flush`] reports true.
const FLUSH_THRESHOLD: usize = 100;

/// An append-only, line-delimited JSON log of [`StoredEvent`]s.
pub struct Wal {
    path: PathBuf,
    file: File,
    write_seq: u64,
    processed_seq: u64,
    unflushed: usize,
}

impl Wal {
    /// Open (creating if absent) the WAL at `path`. `processed_seq` is the
    /// sequence number of the last entry already folded into a snapshot;
    /// [`Wal::next_unprocessed`] and [`Wal::entries_after`] start just past it.
    ///
    /// Any unparseable trailing content is rotated out to a `.bak` file so
    /// previously-durable entries are never lost to a torn write.
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        let (valid, write_seq, had_corruption) = Self::read_valid_prefix(&path)?;

        if had_corruption {
            Self::quarantine_and_rewrite(&path, &valid)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self { path, file, write_seq, processed_seq, unflushed: 0 })
    }

    /// Highest sequence number ever appended (0 if empty).
    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    /// Sequence number through which entries are considered already folded
    /// into a snapshot.
    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    /// Append `event`, assigning it the next sequence number. Does not imply
    /// durability; call [`Wal::flush`] or rely on [`Wal::needs_flush`].
    pub fn append(&mut self, event: &StoredEvent) -> Result<u64, WalError> {
        self.write_seq += 1;
        let mut entry = event.clone();
        entry.sequence_number = self.write_seq;
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{line}")?;
        self.unflushed += 1;
        Ok(self.write_seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.file.flush()?;
        self.unflushed = 0;
        Ok(())
    }

    /// `true` once enough unflushed appends have accumulated to warrant a
    /// background flush.
    pub fn needs_flush(&self) -> bool {
        self.unflushed >= FLUSH_THRESHOLD
    }

    /// Mark entries through `seq` as folded into a snapshot.
    pub fn mark_processed(&mut self, seq: u64) {
        if seq > self.processed_seq {
            self.processed_seq = seq;
        }
    }

    /// Read and return the next entry after `processed_seq`, without
    /// advancing `processed_seq` itself (the caller does that once the entry
    /// has been durably applied, via [`Wal::mark_processed`]).
    pub fn next_unprocessed(&self) -> Result<Option<WalEntry>, WalError> {
        let entries = self.entries_after(self.processed_seq)?;
        Ok(entries.into_iter().next())
    }

    /// All durable entries with `seq > after`, in order. Stops (without
    /// erroring) at the first unparseable line, since only entries before a
    /// corruption point are considered durable.
    pub fn entries_after(&self, after: u64) -> Result<Vec<WalEntry>, WalError> {
        let (valid, _, _) = Self::read_valid_prefix(&self.path)?;
        Ok(valid.into_iter().filter(|e| e.seq > after).collect())
    }

    /// Rewrite the WAL file keeping only entries with `seq >= floor`.
    pub fn truncate_before(&mut self, floor: u64) -> Result<(), WalError> {
        let (valid, _, _) = Self::read_valid_prefix(&self.path)?;
        let keep: Vec<WalEntry> = valid.into_iter().filter(|e| e.seq >= floor).collect();
        self.rewrite(&keep)?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        Ok(())
    }

    fn rewrite(&self, entries: &[WalEntry]) -> Result<(), WalError> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut f = File::create(&tmp)?;
            for entry in entries {
                let line = serde_json::to_string(&entry.event)?;
                writeln!(f, "{line}")?;
            }
            f.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Parse every `\n`-delimited segment in `path` as JSON up to (but not
    /// including) the first failure. Works directly on bytes rather than
    /// `BufRead::lines` so that non-UTF-8 content (a torn write can land
    /// mid-multibyte-character, or the tail can be raw garbage) is detected
    /// as corruption instead of being silently skipped.
    ///
    /// Returns the valid prefix, the highest sequence number observed in it,
    /// and whether anything beyond that prefix failed to parse.
    fn read_valid_prefix(path: &Path) -> Result<(Vec<WalEntry>, u64, bool), WalError> {
        if !path.exists() {
            File::create(path)?;
            return Ok((Vec::new(), 0, false));
        }
        let bytes = fs::read(path)?;
        let mut entries = Vec::new();
        let mut max_seq = 0;
        let mut corrupted = false;
        for segment in bytes.split(|&b| b == b'\n') {
            if segment.is_empty() {
                continue;
            }
            let parsed = std::str::from_utf8(segment)
                .ok()
                .and_then(|s| serde_json::from_str::<StoredEvent>(s).ok());
            match parsed {
                Some(event) => {
                    max_seq = max_seq.max(event.sequence_number);
                    entries.push(WalEntry { seq: event.sequence_number, event });
                }
                None => {
                    corrupted = true;
                    break;
                }
            }
        }
        Ok((entries, max_seq, corrupted))
    }

    /// Rotate the existing (corrupt-tailed) file to `.bak` and rewrite a
    /// clean copy containing only `valid`.
    fn quarantine_and_rewrite(path: &Path, valid: &[WalEntry]) -> Result<(), WalError> {
        let bak = rotate_bak_path(path);
        if path.exists() {
            fs::rename(path, &bak)?;
        }
        let mut f = File::create(path)?;
        for entry in valid {
            let line = serde_json::to_string(&entry.event)?;
            writeln!(f, "{line}")?;
        }
        f.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
