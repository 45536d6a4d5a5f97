// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Sortie lifecycle event handlers (§4.5 "Sortie lifecycle").
//!
//! Status transitions are guarded by [`ft_core::sortie::SortieStatus::can_transition`]
//! rather than re-checked here; a handler that sees an illegal transition
//! (e.g. a duplicate `sortie_completed` replayed twice) is a no-op, which is
//! exactly the idempotency this projection requires.

use super::MaterializedState;
use ft_core::event::{Event, StoredEvent};
use ft_core::{Sortie, SortieResult, SortieStatus};

pub(crate) fn apply(state: &mut MaterializedState, stored: &StoredEvent) {
    match &stored.data {
        Event::SortieRestored(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                s.status = e.status;
                s.assigned_to = e.assigned_to;
                s.progress = e.progress;
                s.files = e.files.clone();
                s.blocked_reason = e.blocked_reason.clone();
                s.blocked_category = e.blocked_category;
                s.blocked_since = if e.status == SortieStatus::Blocked { Some(stored.occurred_at) } else { None };
                s.updated_at = stored.occurred_at;
            }
        }
        Event::SortieCreated(e) => {
            if state.sorties.contains_key(&e.sortie_id) {
                return;
            }
            let mut sortie = Sortie::new(e.title.clone(), e.mission_id, stored.occurred_at);
            sortie.id = e.sortie_id;
            sortie.priority = e.priority;
            sortie.dependencies = e.dependencies.clone();
            sortie.files = e.files.clone();
            if let Some(mission_id) = e.mission_id {
                if let Some(m) = state.missions.get_mut(&mission_id) {
                    m.total_sorties += 1;
                    m.updated_at = stored.occurred_at;
                }
            }
            state.sorties.insert(e.sortie_id, sortie);
        }
        Event::SortieAssigned(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if s.status.can_transition(SortieStatus::Assigned) {
                    s.status = SortieStatus::Assigned;
                    s.assigned_to = Some(e.specialist_id);
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieStarted(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if s.status.can_transition(SortieStatus::InProgress) {
                    s.status = SortieStatus::InProgress;
                    s.assigned_to = Some(e.specialist_id);
                    s.started_at.get_or_insert(stored.occurred_at);
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieProgressUpdated(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if !s.would_regress(e.progress) {
                    s.progress = e.progress;
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieBlocked(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if s.status.can_transition(SortieStatus::Blocked) {
                    s.status = SortieStatus::Blocked;
                    s.blocked_category = Some(e.category);
                    s.blocked_reason = Some(e.reason.clone());
                    s.blocked_since = Some(stored.occurred_at);
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieUnblocked(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if s.status == SortieStatus::Blocked {
                    s.status = SortieStatus::InProgress;
                    s.blocked_category = None;
                    s.blocked_reason = None;
                    s.blocked_since = None;
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieReviewOpened(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if s.status.can_transition(SortieStatus::Review) {
                    s.status = SortieStatus::Review;
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieReviewApproved(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if s.status == SortieStatus::Review {
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieReviewRejected(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if s.status.can_transition(SortieStatus::InProgress) {
                    s.status = SortieStatus::InProgress;
                    // The review event resets progress itself (§4.5 "Rules");
                    // a plain `sortie_progress_updated` could never do this,
                    // since going from review's 100 back down would be a
                    // regression under the normal monotonicity guard.
                    s.progress = 0;
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieCompleted(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if !s.is_terminal() {
                    s.status = SortieStatus::Completed;
                    s.progress = 100;
                    s.result = Some(SortieResult {
                        summary: e.summary.clone(),
                        files: e.files.clone(),
                        tests_passed: e.tests_passed,
                    });
                    s.completed_at = Some(stored.occurred_at);
                    s.updated_at = stored.occurred_at;
                    if let Some(mission_id) = s.mission_id {
                        if let Some(m) = state.missions.get_mut(&mission_id) {
                            m.completed_sorties += 1;
                            m.updated_at = stored.occurred_at;
                        }
                    }
                }
            }
        }
        Event::SortieCancelled(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if !s.is_terminal() {
                    s.status = SortieStatus::Cancelled;
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        Event::SortieFailed(e) => {
            if let Some(s) = state.sorties.get_mut(&e.sortie_id) {
                if !s.is_terminal() {
                    s.status = SortieStatus::Failed;
                    s.blocked_reason = Some(e.reason.clone());
                    s.updated_at = stored.occurred_at;
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "sorties_tests.rs"]
mod tests;
