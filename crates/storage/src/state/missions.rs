// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Mission lifecycle event handlers (§4.5 "Mission lifecycle").
//!
//! `total_sorties`/`completed_sorties` are derived invariants maintained here
//! and in [`super::sorties`] from sortie lifecycle events, not trusted from
//! caller input — except on `mission_completed`, whose payload carries the
//! scheduler's own final tally, which this handler simply assigns.

use super::MaterializedState;
use ft_core::event::{Event, StoredEvent};
use ft_core::{Mission, MissionStatus};

pub(crate) fn apply(state: &mut MaterializedState, stored: &StoredEvent) {
    match &stored.data {
        Event::MissionCreated(e) => {
            state.missions.entry(e.mission_id).or_insert_with(|| {
                let mut m = Mission::new(e.title.clone(), stored.occurred_at);
                m.id = e.mission_id;
                m.description = e.description.clone();
                m.priority = e.priority;
                m.strategy = e.strategy.clone();
                m
            });
        }
        Event::MissionStarted(e) => {
            if let Some(m) = state.missions.get_mut(&e.mission_id) {
                if m.status == MissionStatus::Pending {
                    m.status = MissionStatus::InProgress;
                    m.updated_at = stored.occurred_at;
                }
            }
        }
        Event::MissionReviewOpened(e) => {
            if let Some(m) = state.missions.get_mut(&e.mission_id) {
                if !m.is_terminal() {
                    m.status = MissionStatus::Review;
                    m.updated_at = stored.occurred_at;
                }
            }
        }
        Event::MissionCompleted(e) => {
            if let Some(m) = state.missions.get_mut(&e.mission_id) {
                if !m.is_terminal() {
                    m.status = MissionStatus::Completed;
                    m.total_sorties = e.total_sorties;
                    m.completed_sorties = e.completed_sorties;
                    m.updated_at = stored.occurred_at;
                }
            }
        }
        Event::MissionCancelled(e) => {
            if let Some(m) = state.missions.get_mut(&e.mission_id) {
                if !m.is_terminal() {
                    m.status = MissionStatus::Cancelled;
                    m.updated_at = stored.occurred_at;
                }
            }
        }
        Event::MissionStatusChanged(e) => {
            if let Some(m) = state.missions.get_mut(&e.mission_id) {
                m.status = e.status;
                m.updated_at = stored.occurred_at;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "missions_tests.rs"]
mod tests;
