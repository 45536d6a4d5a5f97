// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Compaction & Retention (C9, §4.9): for each `(stream_type, stream_id)`
//! whose event count or age exceeds a configured threshold, write a
//! covering [`ft_core::Snapshot`] and archive the stream's events.
//!
//! Archival never removes anything from the live log or projections (§4.9
//! "do not delete from projection-relevant truth") — it durably copies the
//! stream's events into `ft_storage::archive` and records the fact with a
//! `context_compacted` event, the same event C7's staleness detection uses
//! for a different purpose (flagging a quiet mission rather than recording
//! an archival run); both are legitimate per §4.7/§4.9.

use crate::config::Config;
use crate::error::CompactionError;
use ft_core::event::{ContextCompacted, Event};
use ft_core::{Clock, Snapshot};
use ft_storage::{archive, EventStore, NewEvent, StreamSummary};
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// One stream compacted during a [`Compactor::run`].
#[derive(Debug, Clone)]
pub struct CompactionOutcome {
    pub stream_type: String,
    pub stream_id: String,
    pub from_sequence: u64,
    pub to_sequence: u64,
    pub events_archived: usize,
}

pub struct Compactor<C: Clock> {
    store: Arc<EventStore<C>>,
    clock: C,
    archive_dir: PathBuf,
}

impl<C: Clock> Compactor<C> {
    pub fn new(store: Arc<EventStore<C>>, clock: C, config: &Config) -> Self {
        Self { store, clock, archive_dir: config.archive_dir() }
    }

    /// Streams whose event count exceeds `threshold_events` or whose oldest
    /// event is older than `threshold_age_days` (§4.9, defaults
    /// `compact_threshold_events`/`compact_age_days`).
    pub fn candidates(&self, threshold_events: u64, threshold_age_days: u32) -> Vec<StreamSummary> {
        let now = self.clock.now_utc();
        self.store
            .stream_summaries()
            .into_iter()
            .filter(|s| {
                s.event_count as u64 > threshold_events
                    || now.signed_duration_since(s.oldest_at).num_days() >= threshold_age_days as i64
            })
            .collect()
    }

    /// Snapshot and archive one stream's entire current event range.
    pub fn compact_stream(&self, summary: &StreamSummary) -> Result<CompactionOutcome, CompactionError> {
        let events = self.store.get_by_stream(&summary.stream_type, &summary.stream_id, None, None);
        if events.is_empty() {
            return Err(CompactionError::EmptyStream {
                stream_type: summary.stream_type.clone(),
                stream_id: summary.stream_id.clone(),
            });
        }
        let from_sequence = summary.min_sequence;
        let to_sequence = summary.max_sequence;

        let rollup = self.rollup_state(&summary.stream_type, &summary.stream_id);
        let snapshot =
            Snapshot::new(&summary.stream_type, &summary.stream_id, from_sequence, to_sequence, rollup, self.clock.now_utc());
        self.write_snapshot(&snapshot)?;

        archive::append_archive(&self.archive_dir, to_sequence, &events).map_err(|e| CompactionError::Io(e.to_string()))?;

        self.store.append(NewEvent::root(
            summary.stream_type.clone(),
            summary.stream_id.clone(),
            Event::ContextCompacted(ContextCompacted {
                stream_type: summary.stream_type.clone(),
                stream_id: summary.stream_id.clone(),
                from_sequence,
                to_sequence,
            }),
        ))?;

        info!(
            stream_type = %summary.stream_type, stream_id = %summary.stream_id,
            from_sequence, to_sequence, events_archived = events.len(),
            "stream compacted"
        );
        Ok(CompactionOutcome {
            stream_type: summary.stream_type.clone(),
            stream_id: summary.stream_id.clone(),
            from_sequence,
            to_sequence,
            events_archived: events.len(),
        })
    }

    /// Compact every current candidate. Run periodically (default daily,
    /// §4.9) by the background runtime.
    pub fn run(&self, threshold_events: u64, threshold_age_days: u32) -> Result<Vec<CompactionOutcome>, CompactionError> {
        let mut outcomes = Vec::new();
        for summary in self.candidates(threshold_events, threshold_age_days) {
            outcomes.push(self.compact_stream(&summary)?);
        }
        Ok(outcomes)
    }

    /// Read back the most recently written snapshot for a stream, if any.
    pub fn latest_snapshot(&self, stream_type: &str, stream_id: &str) -> Result<Option<Snapshot>, CompactionError> {
        let path = self.snapshot_path(stream_type, stream_id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|e| CompactionError::Io(e.to_string()))?;
        let snapshot = serde_json::from_slice(&bytes).map_err(|e| CompactionError::Io(e.to_string()))?;
        Ok(Some(snapshot))
    }

    /// The projection rollup a stream's snapshot carries: whatever row(s)
    /// that stream currently owns, serialized generically since `ft-core`
    /// has no single "the" row type across stream kinds.
    fn rollup_state(&self, stream_type: &str, stream_id: &str) -> Value {
        self.store.with_state(|s| match stream_type {
            "mission" => s.get_mission(stream_id).map(to_value).unwrap_or(Value::Null),
            "sortie" => s.get_sortie(stream_id).map(to_value).unwrap_or(Value::Null),
            "specialist" => s.get_specialist(stream_id).map(to_value).unwrap_or(Value::Null),
            "lock" => s.get_lock(stream_id).map(to_value).unwrap_or(Value::Null),
            "mailbox" => {
                let messages: Vec<_> = s
                    .mailboxes
                    .get(stream_id)
                    .into_iter()
                    .flatten()
                    .filter_map(|id| s.messages.get(id))
                    .collect();
                to_value(&messages)
            }
            _ => Value::Null,
        })
    }

    fn snapshot_path(&self, stream_type: &str, stream_id: &str) -> PathBuf {
        self.archive_dir.join("snapshots").join(format!("{stream_type}_{stream_id}.json"))
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), CompactionError> {
        let path = self.snapshot_path(&snapshot.stream_type, &snapshot.stream_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CompactionError::Io(e.to_string()))?;
        }
        let json = serde_json::to_vec_pretty(snapshot).map_err(|e| CompactionError::Io(e.to_string()))?;
        write_atomic(&path, &json)
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CompactionError> {
    let tmp = path.with_extension("tmp");
    {
        let mut f = File::create(&tmp).map_err(|e| CompactionError::Io(e.to_string()))?;
        f.write_all(bytes).map_err(|e| CompactionError::Io(e.to_string()))?;
        f.flush().map_err(|e| CompactionError::Io(e.to_string()))?;
    }
    fs::rename(&tmp, path).map_err(|e| CompactionError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
#[path = "compaction_tests.rs"]
mod tests;
