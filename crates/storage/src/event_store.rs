// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! The Event Store (§4.1 "Event Store"): the sole write path for the log,
//! wiring the durable [`Wal`] to the in-memory [`MaterializedState`] it
//! projects into and to the indices `get_by_id`/`get_by_stream`/
//! `get_by_correlation` read against.
//!
//! Append is the only mutation. It validates the envelope (duplicate
//! `event_id`, dangling `causation_id`), assigns the next sequence number,
//! persists to the WAL, and folds the event into the projection — one
//! transaction, guarded by a single mutex so the global sequence is strictly
//! increasing across concurrent callers (§4.1 "Concurrency", §5).

use crate::snapshot::{load_snapshot, save_snapshot, StoredSnapshot};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use ft_core::event::{Event, EventId, StoredEvent, EVENT_SCHEMA_VERSION};
use ft_core::{Clock, ErrorKind, FleetError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error("duplicate event id: {0}")]
    DuplicateEventId(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] WalError),
}

impl From<EventStoreError> for FleetError {
    fn from(err: EventStoreError) -> Self {
        match &err {
            EventStoreError::InvalidEvent(_) => FleetError::validation(err.to_string()),
            EventStoreError::DuplicateEventId(_) => FleetError::new(ErrorKind::Conflict, err.to_string()),
            EventStoreError::StoreUnavailable(_) => FleetError::store_unavailable(err.to_string()),
        }
    }
}

/// A new event to append, before sequence assignment. Construct via
/// [`NewEvent::root`] or [`NewEvent::caused_by`].
pub struct NewEvent {
    pub stream_type: String,
    pub stream_id: String,
    pub data: Event,
    pub causation_id: Option<EventId>,
    pub correlation_id: Option<EventId>,
    pub metadata: Option<serde_json::Value>,
    pub event_id: Option<EventId>,
}

impl NewEvent {
    pub fn root(stream_type: impl Into<String>, stream_id: impl Into<String>, data: Event) -> Self {
        Self {
            stream_type: stream_type.into(),
            stream_id: stream_id.into(),
            data,
            causation_id: None,
            correlation_id: None,
            metadata: None,
            event_id: None,
        }
    }

    pub fn caused_by(
        stream_type: impl Into<String>,
        stream_id: impl Into<String>,
        data: Event,
        cause: EventId,
    ) -> Self {
        Self {
            stream_type: stream_type.into(),
            stream_id: stream_id.into(),
            data,
            causation_id: Some(cause),
            correlation_id: None,
            metadata: None,
            event_id: None,
        }
    }

    /// Pre-mint the `event_id` rather than letting [`EventStore::append`]
    /// generate one (§4.1 "Failure semantics"): a caller that gets
    /// `StoreUnavailable` can retry the same `NewEvent` built with the same
    /// id here, and the duplicate-id guard makes the retry idempotent
    /// instead of double-applying the event.
    pub fn with_event_id(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }
}

/// Indices kept alongside the WAL so `get_by_id`/`get_by_stream`/
/// `get_by_correlation` don't have to re-scan the durable log on every call.
/// Rebuilt from scratch on [`EventStore::open`]; purely a read-path cache,
/// never consulted for correctness of the append path itself.
#[derive(Default)]
struct Indices {
    by_id: HashMap<EventId, StoredEvent>,
    by_stream: HashMap<(String, String), Vec<EventId>>,
    by_correlation: HashMap<EventId, Vec<EventId>>,
    order: Vec<EventId>,
}

impl Indices {
    fn index(&mut self, event: StoredEvent) {
        let key = (event.stream_type.clone(), event.stream_id.clone());
        self.by_stream.entry(key).or_default().push(event.event_id);
        self.by_correlation.entry(event.correlation_id).or_default().push(event.event_id);
        self.order.push(event.event_id);
        self.by_id.insert(event.event_id, event);
    }
}

struct Inner {
    wal: Wal,
    state: MaterializedState,
    indices: Indices,
    snapshot_path: Option<PathBuf>,
}

/// The append-only Event Store: C1 + C2 behind one lock (§4.2 "Atomicity":
/// append and projection update commit together or not at all).
pub struct EventStore<C: Clock> {
    inner: RwLock<Inner>,
    clock: C,
}

impl<C: Clock> EventStore<C> {
    /// Open (or create) a store backed by a WAL at `wal_path`, optionally
    /// seeded from a snapshot at `snapshot_path`.
    pub fn open(
        wal_path: impl AsRef<Path>,
        snapshot_path: Option<PathBuf>,
        clock: C,
    ) -> Result<Self, EventStoreError> {
        let (state, processed_seq) = match snapshot_path.as_deref().map(load_snapshot) {
            Some(Ok(Some(snap))) if snap.is_compatible() => (snap.state, snap.sequence),
            _ => (MaterializedState::default(), 0),
        };

        let wal = Wal::open(wal_path, processed_seq)?;
        let mut indices = Indices::default();
        for entry in wal.entries_after(0)? {
            indices.index(entry.event);
        }

        let mut state = state;
        for entry in wal.entries_after(state.last_sequence)? {
            state.apply_event(&entry.event);
        }

        Ok(Self { inner: RwLock::new(Inner { wal, state, indices, snapshot_path }), clock })
    }

    /// Append `new_event`, assigning the next sequence number (§4.1
    /// "Append"). Rejects a duplicate `event_id` or a `causation_id` that
    /// does not name an already-appended event; neither touches durable
    /// state. Idempotent by `event_id`: a caller retrying after
    /// `StoreUnavailable` pre-mints the id via [`NewEvent::with_event_id`]
    /// and resubmits the same `NewEvent`; the duplicate-id guard below
    /// rejects the retry as a conflict instead of double-applying the event
    /// once the original append actually landed, and lets it through
    /// unchanged if it didn't.
    pub fn append(&self, new_event: NewEvent) -> Result<StoredEvent, EventStoreError> {
        let mut inner = self.inner.write();

        let event_id = new_event.event_id.unwrap_or_else(EventId::new);
        if inner.indices.by_id.contains_key(&event_id) {
            return Err(EventStoreError::DuplicateEventId(event_id.to_string()));
        }

        let correlation_id = match new_event.causation_id {
            Some(cause_id) => {
                let cause = inner.indices.by_id.get(&cause_id).ok_or_else(|| {
                    EventStoreError::InvalidEvent(format!("causation_id {cause_id} not found"))
                })?;
                new_event.correlation_id.unwrap_or(cause.correlation_id)
            }
            None => new_event.correlation_id.unwrap_or(event_id),
        };

        let now = self.clock.now_utc();
        let mut stored = StoredEvent {
            sequence_number: 0,
            event_id,
            stream_type: new_event.stream_type,
            stream_id: new_event.stream_id,
            data: new_event.data,
            causation_id: new_event.causation_id,
            correlation_id,
            metadata: new_event.metadata,
            occurred_at: now,
            recorded_at: now,
            schema_version: EVENT_SCHEMA_VERSION,
        };

        let seq = inner.wal.append(&stored)?;
        stored.sequence_number = seq;
        inner.wal.flush()?;

        inner.state.apply_event(&stored);
        inner.indices.index(stored.clone());

        Ok(stored)
    }

    pub fn get_by_id(&self, event_id: EventId) -> Option<StoredEvent> {
        self.inner.read().indices.by_id.get(&event_id).cloned()
    }

    pub fn get_by_stream(
        &self,
        stream_type: &str,
        stream_id: &str,
        after_sequence: Option<u64>,
        limit: Option<usize>,
    ) -> Vec<StoredEvent> {
        let inner = self.inner.read();
        let key = (stream_type.to_string(), stream_id.to_string());
        let ids = inner.indices.by_stream.get(&key).cloned().unwrap_or_default();
        let after = after_sequence.unwrap_or(0);
        let mut events: Vec<StoredEvent> = ids
            .into_iter()
            .filter_map(|id| inner.indices.by_id.get(&id).cloned())
            .filter(|e| e.sequence_number > after)
            .collect();
        events.sort_by_key(|e| e.sequence_number);
        if let Some(limit) = limit {
            events.truncate(limit);
        }
        events
    }

    pub fn get_by_correlation(&self, correlation_id: EventId) -> Vec<StoredEvent> {
        let inner = self.inner.read();
        let mut events: Vec<StoredEvent> = inner
            .indices
            .by_correlation
            .get(&correlation_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| inner.indices.by_id.get(&id).cloned())
            .collect();
        events.sort_by_key(|e| e.sequence_number);
        events
    }

    /// Per-`(stream_type, stream_id)` counts and age, for compaction (C9) to
    /// pick candidates against `compact_threshold_events`/`compact_age_days`
    /// without scanning the whole log on every run.
    pub fn stream_summaries(&self) -> Vec<StreamSummary> {
        let inner = self.inner.read();
        inner
            .indices
            .by_stream
            .iter()
            .filter_map(|((stream_type, stream_id), ids)| {
                let events: Vec<&StoredEvent> = ids.iter().filter_map(|id| inner.indices.by_id.get(id)).collect();
                let min_sequence = events.iter().map(|e| e.sequence_number).min()?;
                let max_sequence = events.iter().map(|e| e.sequence_number).max()?;
                let oldest_at = events.iter().map(|e| e.occurred_at).min()?;
                Some(StreamSummary {
                    stream_type: stream_type.clone(),
                    stream_id: stream_id.clone(),
                    event_count: events.len(),
                    min_sequence,
                    max_sequence,
                    oldest_at,
                })
            })
            .collect()
    }

    pub fn get_after(&self, sequence: u64, limit: Option<usize>) -> Vec<StoredEvent> {
        let inner = self.inner.read();
        let mut events: Vec<StoredEvent> = inner
            .indices
            .order
            .iter()
            .filter_map(|id| inner.indices.by_id.get(id).cloned())
            .filter(|e| e.sequence_number > sequence)
            .collect();
        events.sort_by_key(|e| e.sequence_number);
        if let Some(limit) = limit {
            events.truncate(limit);
        }
        events
    }

    /// Run `f` against a read-only view of the current projection state.
    pub fn with_state<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        f(&self.inner.read().state)
    }

    /// Highest sequence number ever appended.
    pub fn current_sequence(&self) -> u64 {
        self.inner.read().wal.write_seq()
    }

    /// Rebuild the entire projection from the durable log (§4.2
    /// "Rebuildability"). Replaces the in-memory state and indices in place;
    /// must produce byte-identical state to the incrementally-maintained one
    /// for the same event prefix (§8 invariant 4).
    pub fn rebuild_all(&self) -> Result<(), EventStoreError> {
        let mut inner = self.inner.write();
        let events = inner.wal.entries_after(0)?.into_iter().map(|e| e.event).collect::<Vec<_>>();
        inner.state = MaterializedState::rebuild(&events);
        let mut indices = Indices::default();
        for event in events {
            indices.index(event);
        }
        inner.indices = indices;
        Ok(())
    }

    /// Reachability/mode/pending-append counts for the `Health.status`
    /// surface operation (§6, SPEC_FULL.md §D).
    pub fn health(&self) -> StoreHealth {
        let inner = self.inner.read();
        StoreHealth {
            reachable: true,
            wal_mode: "append-only-json".to_string(),
            write_sequence: inner.wal.write_seq(),
            processed_sequence: inner.wal.processed_seq(),
            pending_appends: inner.wal.write_seq().saturating_sub(inner.wal.processed_seq()),
        }
    }

    /// Insert or overwrite a [`ft_core::Checkpoint`] row directly into the
    /// projection, bypassing the event log (§9 "File-backed JSON alongside a
    /// primary store": the checkpoint's bulky snapshot payload is the one
    /// piece of state this store keeps outside the replay path; the decision
    /// to checkpoint and the fact that it happened are still logged as
    /// `fleet_checkpointed`/`checkpoint_created` events, just without this
    /// payload). Marks the mission's `latest` pointer.
    pub fn put_checkpoint(&self, checkpoint: ft_core::Checkpoint) {
        let mut inner = self.inner.write();
        let mission_id = checkpoint.mission_id;
        let id = checkpoint.id;
        inner.state.checkpoints.insert(id, checkpoint);
        inner.state.latest_checkpoint.insert(mission_id, id);
    }

    /// Remove a checkpoint row (§4.7 "Retention"). If it was the mission's
    /// `latest`, the pointer is left dangling to the most recently inserted
    /// remaining checkpoint for that mission, if any.
    pub fn remove_checkpoint(&self, checkpoint_id: &ft_core::CheckpointId, mission_id: &ft_core::MissionId) {
        let mut inner = self.inner.write();
        inner.state.checkpoints.remove(checkpoint_id);
        if inner.state.latest_checkpoint.get(mission_id) == Some(checkpoint_id) {
            inner.state.latest_checkpoint.remove(mission_id);
            if let Some((newest_id, _)) = inner
                .state
                .checkpoints
                .values()
                .filter(|c| &c.mission_id == mission_id)
                .map(|c| (c.id, c.timestamp))
                .max_by_key(|(_, ts)| *ts)
            {
                inner.state.latest_checkpoint.insert(*mission_id, newest_id);
            }
        }
    }

    /// Write a snapshot of the current projection state to `snapshot_path`
    /// (if configured), and mark the WAL as processed through the current
    /// sequence so future opens replay less.
    pub fn snapshot(&self) -> Result<(), EventStoreError> {
        let mut inner = self.inner.write();
        let seq = inner.wal.write_seq();
        inner.wal.mark_processed(seq);
        if let Some(path) = inner.snapshot_path.clone() {
            let snap = StoredSnapshot::new(seq, inner.state.clone());
            save_snapshot(&path, &snap).map_err(|e| {
                EventStoreError::InvalidEvent(format!("snapshot write failed: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Liveness summary returned by [`EventStore::health`] (§6 "Health" surface).
#[derive(Debug, Clone)]
pub struct StoreHealth {
    pub reachable: bool,
    pub wal_mode: String,
    pub write_sequence: u64,
    pub processed_sequence: u64,
    pub pending_appends: u64,
}

/// One stream's event count, sequence bounds, and age, used to decide
/// whether compaction (C9) should cover it this run.
#[derive(Debug, Clone)]
pub struct StreamSummary {
    pub stream_type: String,
    pub stream_id: String,
    pub event_count: usize,
    pub min_sequence: u64,
    pub max_sequence: u64,
    pub oldest_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
#[path = "event_store_tests.rs"]
mod tests;
