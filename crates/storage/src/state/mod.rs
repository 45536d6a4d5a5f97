// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Materialized state built from event replay (§4.2 "Projection Engine").
//!
//! Each sub-module owns one group of projection rows and exposes a single
//! `apply(state, event)` handler. [`MaterializedState::apply_event`] is the
//! dispatcher every appended event passes through exactly once; replaying the
//! same prefix of events through it twice must produce byte-identical state
//! (§8 invariant 4), which is why every handler below is written to be
//! idempotent against a duplicated event rather than relying on the store to
//! never replay one.

mod helpers;
mod locks;
mod mailbox;
mod missions;
mod sorties;
mod specialists;

use ft_core::event::StoredEvent;
use ft_core::{
    Checkpoint, CheckpointId, Cursor, Lock, LockId, Message, MessageId, Mission, MissionId,
    Sortie, SortieId, Specialist, SpecialistId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub(crate) use helpers::find_by_prefix;

/// The full set of derived projection rows, rebuildable byte-for-byte from
/// the event log (§4.2 "Rebuildability", §8 invariant 4).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub missions: HashMap<MissionId, Mission>,
    pub sorties: HashMap<SortieId, Sortie>,
    pub specialists: HashMap<SpecialistId, Specialist>,
    pub locks: HashMap<LockId, Lock>,
    /// Index from `normalized_path` to the one `status=active` lock id on it
    /// (§3 "Lock" invariant). Absence means the path is currently free.
    #[serde(default)]
    pub locks_by_path: HashMap<String, LockId>,
    pub messages: HashMap<MessageId, Message>,
    /// Ordered message ids per mailbox; insertion order equals the sequence
    /// order of the `squawk_sent` events that produced each entry (§4.4
    /// "Ordering guarantee").
    #[serde(default)]
    pub mailboxes: HashMap<String, Vec<MessageId>>,
    /// Cursor rows keyed by [`mailbox::cursor_key`] `(stream_type, stream_id,
    /// consumer_id)`.
    #[serde(default)]
    pub cursors: HashMap<String, Cursor>,
    pub checkpoints: HashMap<CheckpointId, Checkpoint>,
    /// `mission_id -> latest checkpoint id` (§3 "Checkpoint": exactly one
    /// `latest` per mission).
    #[serde(default)]
    pub latest_checkpoint: HashMap<MissionId, CheckpointId>,
    /// Highest sequence number folded into this state. Mirrors the WAL's
    /// `processed_seq` so a freshly-loaded snapshot knows where replay must
    /// resume from.
    #[serde(default)]
    pub last_sequence: u64,
}

impl MaterializedState {
    pub fn get_mission(&self, id: &str) -> Option<&Mission> {
        find_by_prefix(&self.missions, id)
    }

    pub fn get_sortie(&self, id: &str) -> Option<&Sortie> {
        find_by_prefix(&self.sorties, id)
    }

    pub fn get_specialist(&self, id: &str) -> Option<&Specialist> {
        find_by_prefix(&self.specialists, id)
    }

    pub fn get_lock(&self, id: &str) -> Option<&Lock> {
        find_by_prefix(&self.locks, id)
    }

    /// The single active lock on `normalized_path`, if any (§3 "Lock"
    /// invariant: at most one `status=active` row per path).
    pub fn active_lock_on(&self, normalized_path: &str) -> Option<&Lock> {
        self.locks_by_path.get(normalized_path).and_then(|id| self.locks.get(id))
    }

    pub fn sorties_for_mission<'a>(&'a self, mission_id: &'a MissionId) -> impl Iterator<Item = &'a Sortie> {
        self.sorties.values().filter(move |s| s.mission_id.as_ref() == Some(mission_id))
    }

    pub fn cursor_position(&self, stream_type: &str, stream_id: &str, consumer_id: &str) -> u64 {
        let key = mailbox::cursor_key(stream_type, stream_id, consumer_id);
        self.cursors.get(&key).map(|c| c.position).unwrap_or(0)
    }

    pub fn latest_checkpoint_for(&self, mission_id: &MissionId) -> Option<&Checkpoint> {
        self.latest_checkpoint.get(mission_id).and_then(|id| self.checkpoints.get(id))
    }

    /// Apply one stored event to every projection it touches, then advance
    /// [`Self::last_sequence`]. Applying an event whose sequence number is
    /// `<= last_sequence` already is a no-op: replay must never double-apply
    /// (§4.1 "Concurrency": readers observe a consistent prefix).
    pub fn apply_event(&mut self, stored: &StoredEvent) {
        if stored.sequence_number != 0 && stored.sequence_number <= self.last_sequence {
            return;
        }
        missions::apply(self, stored);
        sorties::apply(self, stored);
        specialists::apply(self, stored);
        locks::apply(self, stored);
        mailbox::apply(self, stored);
        checkpoints::apply(self, stored);
        if stored.sequence_number > self.last_sequence {
            self.last_sequence = stored.sequence_number;
        }
    }

    /// Reconstruct state by replaying `events` in order from empty. Used by
    /// [`MaterializedState::apply_event`]'s caller for `rebuild()` (§4.2).
    pub fn rebuild(events: &[StoredEvent]) -> Self {
        let mut state = Self::default();
        for event in events {
            state.apply_event(event);
        }
        state
    }
}

mod checkpoints {
    use super::MaterializedState;
    use ft_core::event::{Event, StoredEvent};

    /// Checkpoint events only ever *record* that a checkpoint was taken; the
    /// durable [`ft_core::Checkpoint`] payload itself is written by the
    /// engine's Checkpoint & Recovery component directly into
    /// [`MaterializedState::checkpoints`] (it is too large and too rarely
    /// queried to round-trip through the event envelope). This handler keeps
    /// `latest_checkpoint` consistent for replay of historical logs where the
    /// checkpoint row was supplied out of band.
    pub(crate) fn apply(state: &mut MaterializedState, stored: &StoredEvent) {
        if let Event::FleetCheckpointed(e) = &stored.data {
            let id = ft_core::CheckpointId::from_string(&e.checkpoint_id);
            if state.checkpoints.contains_key(&id) {
                state.latest_checkpoint.insert(e.mission_id, id);
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
