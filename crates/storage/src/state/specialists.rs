// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Specialist lifecycle event handlers (§4.5 "Specialist lifecycle",
//! §4.3 "Specialist liveness").

use super::MaterializedState;
use ft_core::event::{Event, StoredEvent};
use ft_core::{Specialist, SpecialistStatus};

pub(crate) fn apply(state: &mut MaterializedState, stored: &StoredEvent) {
    match &stored.data {
        Event::SpecialistSpawned(e) => {
            state.specialists.entry(e.specialist_id).or_insert_with(|| {
                let mut s = Specialist::new(e.name.clone(), stored.occurred_at);
                s.id = e.specialist_id;
                s.capabilities = e.capabilities.clone();
                s
            });
        }
        Event::SpecialistRegistered(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                if s.status == SpecialistStatus::Spawned {
                    s.status = SpecialistStatus::Registered;
                }
                s.last_seen = stored.occurred_at;
            }
        }
        Event::SpecialistHeartbeat(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                s.last_seen = stored.occurred_at;
                if s.status == SpecialistStatus::Stale {
                    s.status = SpecialistStatus::Registered;
                }
            }
        }
        Event::SpecialistWorking(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                s.status = SpecialistStatus::Working;
                s.current_sortie = Some(e.sortie_id);
                s.last_seen = stored.occurred_at;
            }
        }
        Event::SpecialistBlocked(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                s.status = SpecialistStatus::Blocked;
                s.last_seen = stored.occurred_at;
            }
        }
        Event::SpecialistCompleting(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                s.status = SpecialistStatus::Completing;
                s.last_seen = stored.occurred_at;
            }
        }
        Event::SpecialistCompleted(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                if !s.status.is_terminal() {
                    s.status = SpecialistStatus::Completed;
                    s.current_sortie = None;
                }
                s.last_seen = stored.occurred_at;
            }
        }
        Event::SpecialistFailed(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                if !s.status.is_terminal() {
                    s.status = SpecialistStatus::Failed;
                }
                s.last_seen = stored.occurred_at;
            }
        }
        Event::SpecialistWentStale(e) => {
            if let Some(s) = state.specialists.get_mut(&e.specialist_id) {
                if !s.status.is_terminal() {
                    s.status = SpecialistStatus::Stale;
                }
            }
        }
        Event::SpecialistDeregistered(e) => {
            state.specialists.remove(&e.specialist_id);
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "specialists_tests.rs"]
mod tests;
