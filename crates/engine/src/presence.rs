// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Specialist presence surface (§4.5 "Specialist", §6 "Specialist: register,
//! heartbeat, get, list, deregister"). [`Dispatch`](crate::dispatch::Dispatch)
//! mints and registers a specialist itself when it spawns one for a ready
//! sortie; this module is the matching external-facing surface a specialist
//! process calls on its own behalf — announcing readiness for the sortie it
//! was spawned for, reporting liveness, and leaving the fleet.

use crate::error::PresenceError;
use ft_core::event::{Event, SpecialistDeregistered, SpecialistHeartbeat, SpecialistRegistered, SpecialistWorking};
use ft_core::{Clock, MissionId, Specialist, SpecialistId, SpecialistStatus, SortieId};
use ft_storage::{EventStore, NewEvent};
use std::sync::Arc;
use tracing::info;

/// Filter for [`Presence::list`].
#[derive(Debug, Clone, Default)]
pub struct PresenceFilter {
    pub status: Option<SpecialistStatus>,
    pub current_sortie: Option<SortieId>,
}

pub struct Presence<C: Clock> {
    store: Arc<EventStore<C>>,
}

impl<C: Clock> Presence<C> {
    pub fn new(store: Arc<EventStore<C>>) -> Self {
        Self { store }
    }

    /// A specialist announces itself ready for `sortie_id` (§6 "Specialist.register").
    /// `mission_id`, if given, is validated against the sortie's own mission rather
    /// than stored — `Specialist` carries no mission pointer of its own (§9
    /// "Cyclic references ... replace pointer graphs with id-based lookups").
    pub fn register(
        &self,
        specialist_id: SpecialistId,
        sortie_id: SortieId,
        mission_id: Option<MissionId>,
    ) -> Result<Specialist, PresenceError> {
        let specialist = self.get(specialist_id.as_str())?;
        if let Some(mission_id) = mission_id {
            let sortie = self.store.with_state(|s| s.get_sortie(sortie_id.as_str()).cloned());
            if let Some(sortie) = sortie {
                if sortie.mission_id != Some(mission_id) {
                    return Err(PresenceError::NotAssigned {
                        sortie_id: sortie_id.to_string(),
                        specialist_id: specialist_id.to_string(),
                    });
                }
            }
        }
        if specialist.status == SpecialistStatus::Spawned {
            self.store.append(NewEvent::root(
                "specialist",
                specialist_id.to_string(),
                Event::SpecialistRegistered(SpecialistRegistered { specialist_id }),
            ))?;
        }
        self.store.append(NewEvent::root(
            "specialist",
            specialist_id.to_string(),
            Event::SpecialistWorking(SpecialistWorking { specialist_id, sortie_id }),
        ))?;
        info!(specialist_id = %specialist_id, sortie_id = %sortie_id, "specialist registered");
        self.get(specialist_id.as_str())
    }

    /// Refresh `last_seen` (§4.5 "A specialist is stale iff now - last_seen >
    /// STALE_THRESHOLD"). A heartbeat from a `stale` specialist brings it back
    /// to `registered` (storage/state/specialists.rs).
    pub fn heartbeat(&self, specialist_id: &str) -> Result<Specialist, PresenceError> {
        let specialist = self.get(specialist_id)?;
        self.store.append(NewEvent::root(
            "specialist",
            specialist.id.to_string(),
            Event::SpecialistHeartbeat(SpecialistHeartbeat { specialist_id: specialist.id }),
        ))?;
        self.get(specialist_id)
    }

    pub fn get(&self, specialist_id: &str) -> Result<Specialist, PresenceError> {
        self.store
            .with_state(|s| s.get_specialist(specialist_id).cloned())
            .ok_or_else(|| PresenceError::NotFound(specialist_id.to_string()))
    }

    pub fn list(&self, filter: &PresenceFilter) -> Vec<Specialist> {
        self.store.with_state(|s| {
            s.specialists
                .values()
                .filter(|sp| filter.status.map_or(true, |status| sp.status == status))
                .filter(|sp| filter.current_sortie.map_or(true, |sortie_id| sp.current_sortie == Some(sortie_id)))
                .cloned()
                .collect()
        })
    }

    /// Leave the fleet, gracefully or forced (§6 "Specialist.deregister").
    /// The projection row is removed on this event (storage/state/specialists.rs);
    /// the pre-removal snapshot is returned to the caller.
    pub fn deregister(&self, specialist_id: &str, reason: Option<String>) -> Result<Specialist, PresenceError> {
        let specialist = self.get(specialist_id)?;
        self.store.append(NewEvent::root(
            "specialist",
            specialist.id.to_string(),
            Event::SpecialistDeregistered(SpecialistDeregistered { specialist_id: specialist.id, reason }),
        ))?;
        info!(specialist_id = %specialist.id, "specialist deregistered");
        Ok(specialist)
    }
}

#[cfg(test)]
#[path = "presence_tests.rs"]
mod tests;
