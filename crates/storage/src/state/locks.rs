// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Lock Manager projection handlers (§4.2 "Lock Manager").
//!
//! `ctk_conflict` is a pure signal event: an `acquire` that found an
//! existing active lock produces no state change of its own. `ctk_reacquired`
//! is the same during recovery — it records that a lock id was minted fresh
//! for an id that no longer resolves, but the reacquired lock's durable state
//! arrives through the paired `ctk_reserved` event the recovery orchestrator
//! emits alongside it (§9 Open Questions #4), not through this payload, which
//! carries too little to reconstruct a full [`Lock`] row on its own.

use super::MaterializedState;
use ft_core::event::{Event, StoredEvent};
use ft_core::{Lock, LockId, LockStatus};

pub(crate) fn apply(state: &mut MaterializedState, stored: &StoredEvent) {
    match &stored.data {
        Event::CtkReserved(e) => {
            let lock_id = LockId::from_string(&e.lock_id);
            if state.locks.contains_key(&lock_id) {
                return;
            }
            let lock = Lock {
                id: lock_id,
                file: e.normalized_path.clone(),
                normalized_path: e.normalized_path.clone(),
                reserved_by: e.reserved_by,
                reserved_at: stored.occurred_at,
                expires_at: e.expires_at,
                released_at: None,
                purpose: e.purpose,
                checksum: e.checksum.clone(),
                status: LockStatus::Active,
            };
            state.locks_by_path.insert(e.normalized_path.clone(), lock_id);
            state.locks.insert(lock_id, lock);
        }
        Event::CtkConflict(_) | Event::CtkReacquired(_) => {}
        Event::CtkReleased(e) => {
            let lock_id = LockId::from_string(&e.lock_id);
            if let Some(l) = state.locks.get_mut(&lock_id) {
                if l.status.is_active() {
                    l.status = LockStatus::Released;
                    l.released_at = Some(stored.occurred_at);
                    state.locks_by_path.remove(&l.normalized_path);
                }
            }
        }
        Event::CtkForceReleased(e) => {
            let lock_id = LockId::from_string(&e.lock_id);
            if let Some(l) = state.locks.get_mut(&lock_id) {
                if l.status.is_active() {
                    l.status = LockStatus::ForceReleased;
                    l.released_at = Some(stored.occurred_at);
                    state.locks_by_path.remove(&l.normalized_path);
                }
            }
        }
        Event::CtkExpired(e) => {
            let lock_id = LockId::from_string(&e.lock_id);
            if let Some(l) = state.locks.get_mut(&lock_id) {
                if l.status.is_active() {
                    l.status = LockStatus::Expired;
                    state.locks_by_path.remove(&l.normalized_path);
                }
            }
        }
        Event::CtkExtended(e) => {
            let lock_id = LockId::from_string(&e.lock_id);
            if let Some(l) = state.locks.get_mut(&lock_id) {
                if l.status.is_active() {
                    l.expires_at = e.new_expires_at;
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
