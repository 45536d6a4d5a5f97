// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Sortie/Mission Lifecycle (C5, §4.5): authorises and validates every
//! transition before it is appended, so the event log never carries an
//! illegal state change. The projection side (`ft_storage::state`) trusts
//! [`ft_core::sortie::SortieStatus::can_transition`] alone and is written to
//! be a no-op on anything this layer should have already rejected; this
//! layer is what makes that assumption hold in practice.

use crate::error::LifecycleError;
use ft_core::event::{
    Event, MissionCancelled, MissionCompleted, MissionCreated, MissionReviewOpened, MissionStarted, SortieAssigned,
    SortieBlocked, SortieCancelled, SortieCompleted, SortieCreated, SortieFailed, SortieProgressUpdated,
    SortieReviewApproved, SortieReviewOpened, SortieReviewRejected, SortieStarted, SortieUnblocked,
};
use ft_core::{
    BlockerCategory, Clock, Mission, MissionId, MissionStatus, Priority, Sortie, SortieId, SortieResult,
    SortieStatus, SpecialistId,
};
use ft_storage::{EventStore, NewEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Holds a specialist's reported [`SortieResult`] between `report_complete`
/// opening review and the scheduler's `approve_review`/`reject_review`
/// verdict, since the `sortie_review_opened` event carries no payload of
/// its own (§4.5 "Review gating").
pub struct Lifecycle<C: Clock> {
    store: Arc<EventStore<C>>,
    pending_results: Mutex<HashMap<SortieId, SortieResult>>,
}

impl<C: Clock> Lifecycle<C> {
    pub fn new(store: Arc<EventStore<C>>) -> Self {
        Self { store, pending_results: Mutex::new(HashMap::new()) }
    }

    pub fn create_mission(
        &self,
        title: &str,
        description: Option<String>,
        priority: Priority,
        strategy: Option<String>,
    ) -> Result<Mission, LifecycleError> {
        let mission_id = MissionId::new();
        self.store.append(NewEvent::root(
            "mission",
            mission_id.to_string(),
            Event::MissionCreated(MissionCreated { mission_id, title: title.to_string(), description, priority, strategy }),
        ))?;
        self.get_mission(mission_id.as_str())
    }

    pub fn create_sortie(
        &self,
        mission_id: Option<MissionId>,
        title: &str,
        priority: Priority,
        dependencies: Vec<SortieId>,
        files: Vec<String>,
    ) -> Result<Sortie, LifecycleError> {
        if let Some(mission_id) = mission_id {
            self.get_mission(mission_id.as_str())?;
        }
        let sortie_id = SortieId::new();
        self.store.append(NewEvent::root(
            "sortie",
            sortie_id.to_string(),
            Event::SortieCreated(SortieCreated {
                sortie_id,
                mission_id,
                title: title.to_string(),
                priority,
                dependencies,
                files,
            }),
        ))?;
        self.get_sortie(sortie_id.as_str())
    }

    pub fn assign_sortie(&self, sortie_id: &str, specialist_id: SpecialistId) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        self.require_transition(&sortie, SortieStatus::Assigned)?;
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieAssigned(SortieAssigned { sortie_id: sortie.id, specialist_id }),
        ))?;
        self.get_sortie(sortie_id)
    }

    /// Only the assigned specialist may start the sortie (§4.5 "Rules").
    /// Starting the mission's first sortie also opens the mission.
    pub fn start_sortie(&self, sortie_id: &str, specialist_id: SpecialistId) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        self.authorize(&sortie, specialist_id)?;
        self.require_transition(&sortie, SortieStatus::InProgress)?;
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieStarted(SortieStarted { sortie_id: sortie.id, specialist_id }),
        ))?;
        if let Some(mission_id) = sortie.mission_id {
            let mission = self.get_mission(mission_id.as_str())?;
            if mission.status == MissionStatus::Pending {
                self.store.append(NewEvent::root(
                    "mission",
                    mission_id.to_string(),
                    Event::MissionStarted(MissionStarted { mission_id }),
                ))?;
            }
        }
        self.get_sortie(sortie_id)
    }

    pub fn update_progress(
        &self,
        sortie_id: &str,
        specialist_id: SpecialistId,
        progress: u8,
        note: Option<String>,
    ) -> Result<Sortie, LifecycleError> {
        if progress > 100 {
            return Err(LifecycleError::InvalidProgress(progress));
        }
        let sortie = self.get_sortie(sortie_id)?;
        self.authorize(&sortie, specialist_id)?;
        if sortie.status != SortieStatus::InProgress {
            return Err(LifecycleError::InvalidTransition {
                from: sortie.status.to_string(),
                to: SortieStatus::InProgress.to_string(),
            });
        }
        if sortie.would_regress(progress) {
            return Err(LifecycleError::ProgressRegression { current: sortie.progress, requested: progress });
        }
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieProgressUpdated(SortieProgressUpdated { sortie_id: sortie.id, progress, note }),
        ))?;
        self.get_sortie(sortie_id)
    }

    pub fn block_sortie(
        &self,
        sortie_id: &str,
        category: BlockerCategory,
        reason: &str,
    ) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        self.require_transition(&sortie, SortieStatus::Blocked)?;
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieBlocked(SortieBlocked { sortie_id: sortie.id, category, reason: reason.to_string() }),
        ))?;
        info!(sortie_id, ?category, "sortie blocked");
        self.get_sortie(sortie_id)
    }

    pub fn unblock_sortie(&self, sortie_id: &str) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        if sortie.status != SortieStatus::Blocked {
            return Err(LifecycleError::InvalidTransition {
                from: sortie.status.to_string(),
                to: SortieStatus::InProgress.to_string(),
            });
        }
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieUnblocked(SortieUnblocked { sortie_id: sortie.id }),
        ))?;
        self.get_sortie(sortie_id)
    }

    /// A specialist reports completion. `tests_passed=false` is rejected
    /// outright (§4.5 "Rules": "`complete` requires `tests_passed=true`").
    /// The sortie moves into `review` for the scheduler's automatic
    /// validators rather than straight to `completed`.
    pub fn report_complete(
        &self,
        sortie_id: &str,
        specialist_id: SpecialistId,
        result: SortieResult,
    ) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        self.authorize(&sortie, specialist_id)?;
        if !result.tests_passed {
            return Err(LifecycleError::InvalidTransition {
                from: sortie.status.to_string(),
                to: SortieStatus::Completed.to_string(),
            });
        }
        self.require_transition(&sortie, SortieStatus::Review)?;
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieReviewOpened(SortieReviewOpened { sortie_id: sortie.id }),
        ))?;
        self.pending_results.lock().insert(sortie.id, result);
        self.get_sortie(sortie_id)
    }

    /// Approval finalises the completion: it records the review verdict and
    /// then appends the `sortie_completed` event that actually performs the
    /// status transition (`sortie_review_approved` alone leaves the
    /// projection in `review`; §4.5 "Review gating").
    pub fn approve_review(&self, sortie_id: &str, reviewer_id: Option<SpecialistId>) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        if sortie.status != SortieStatus::Review {
            return Err(LifecycleError::InvalidTransition {
                from: sortie.status.to_string(),
                to: SortieStatus::Completed.to_string(),
            });
        }
        let result = self.pending_results.lock().remove(&sortie.id);
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieReviewApproved(SortieReviewApproved { sortie_id: sortie.id, reviewer_id }),
        ))?;
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieCompleted(SortieCompleted {
                sortie_id: sortie.id,
                summary: result.as_ref().map(|r| r.summary.clone()).unwrap_or_default(),
                files: result.as_ref().map(|r| r.files.clone()).unwrap_or_default(),
                tests_passed: result.as_ref().map(|r| r.tests_passed).unwrap_or(true),
            }),
        ))?;
        self.maybe_complete_mission(&sortie)?;
        self.get_sortie(sortie_id)
    }

    pub fn reject_review(
        &self,
        sortie_id: &str,
        reason: &str,
        reviewer_id: Option<SpecialistId>,
    ) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        if sortie.status != SortieStatus::Review {
            return Err(LifecycleError::InvalidTransition {
                from: sortie.status.to_string(),
                to: SortieStatus::InProgress.to_string(),
            });
        }
        self.pending_results.lock().remove(&sortie.id);
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieReviewRejected(SortieReviewRejected {
                sortie_id: sortie.id,
                reason: reason.to_string(),
                reviewer_id,
            }),
        ))?;
        self.get_sortie(sortie_id)
    }

    pub fn cancel_sortie(&self, sortie_id: &str, reason: Option<String>) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        self.require_transition(&sortie, SortieStatus::Cancelled)?;
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieCancelled(SortieCancelled { sortie_id: sortie.id, reason }),
        ))?;
        self.maybe_complete_mission(&sortie)?;
        self.get_sortie(sortie_id)
    }

    pub fn fail_sortie(&self, sortie_id: &str, reason: &str) -> Result<Sortie, LifecycleError> {
        let sortie = self.get_sortie(sortie_id)?;
        if sortie.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                from: sortie.status.to_string(),
                to: SortieStatus::Failed.to_string(),
            });
        }
        self.store.append(NewEvent::root(
            "sortie",
            sortie.id.to_string(),
            Event::SortieFailed(SortieFailed { sortie_id: sortie.id, reason: reason.to_string() }),
        ))?;
        self.maybe_complete_mission(&sortie)?;
        self.get_sortie(sortie_id)
    }

    /// Final sign-off on a mission parked in `review` by [`Self::maybe_complete_mission`]
    /// because at least one of its sorties ended cancelled or failed rather
    /// than completed (§4.5 "Mission state machine": "`complete` is refused
    /// if any child sortie is not terminal-successful"). Approval accepts the
    /// partial result as the mission's final outcome.
    pub fn approve_mission_review(&self, mission_id: &str) -> Result<Mission, LifecycleError> {
        let mission = self.get_mission(mission_id)?;
        if mission.status != MissionStatus::Review {
            return Err(LifecycleError::InvalidTransition {
                from: mission.status.to_string(),
                to: MissionStatus::Completed.to_string(),
            });
        }
        self.store.append(NewEvent::root(
            "mission",
            mission.id.to_string(),
            Event::MissionCompleted(MissionCompleted {
                mission_id: mission.id,
                total_sorties: mission.total_sorties,
                completed_sorties: mission.completed_sorties,
            }),
        ))?;
        self.get_mission(mission_id)
    }

    /// Rejecting the partial result cancels the mission outright — the
    /// mission state diagram has no edge back from `review` to `in_progress`
    /// (§4.5: `pending → in_progress → (review) → completed | cancelled`).
    pub fn reject_mission_review(&self, mission_id: &str, reason: Option<String>) -> Result<Mission, LifecycleError> {
        let mission = self.get_mission(mission_id)?;
        if mission.status != MissionStatus::Review {
            return Err(LifecycleError::InvalidTransition {
                from: mission.status.to_string(),
                to: MissionStatus::Cancelled.to_string(),
            });
        }
        self.store.append(NewEvent::root(
            "mission",
            mission.id.to_string(),
            Event::MissionCancelled(MissionCancelled { mission_id: mission.id, reason }),
        ))?;
        self.get_mission(mission_id)
    }

    pub fn cancel_mission(&self, mission_id: &str, reason: Option<String>) -> Result<Mission, LifecycleError> {
        let mission = self.get_mission(mission_id)?;
        if mission.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                from: mission.status.to_string(),
                to: MissionStatus::Cancelled.to_string(),
            });
        }
        self.store.append(NewEvent::root(
            "mission",
            mission.id.to_string(),
            Event::MissionCancelled(MissionCancelled { mission_id: mission.id, reason }),
        ))?;
        self.get_mission(mission_id)
    }

    pub fn get_mission(&self, mission_id: &str) -> Result<Mission, LifecycleError> {
        self.store
            .with_state(|s| s.get_mission(mission_id).cloned())
            .ok_or_else(|| LifecycleError::MissionNotFound(mission_id.to_string()))
    }

    pub fn get_sortie(&self, sortie_id: &str) -> Result<Sortie, LifecycleError> {
        self.store
            .with_state(|s| s.get_sortie(sortie_id).cloned())
            .ok_or_else(|| LifecycleError::SortieNotFound(sortie_id.to_string()))
    }

    fn authorize(&self, sortie: &Sortie, specialist_id: SpecialistId) -> Result<(), LifecycleError> {
        if sortie.assigned_to != Some(specialist_id) {
            return Err(LifecycleError::NotAssigned {
                sortie_id: sortie.id.to_string(),
                specialist_id: specialist_id.to_string(),
            });
        }
        Ok(())
    }

    fn require_transition(&self, sortie: &Sortie, next: SortieStatus) -> Result<(), LifecycleError> {
        if !sortie.status.can_transition(next) {
            return Err(LifecycleError::InvalidTransition { from: sortie.status.to_string(), to: next.to_string() });
        }
        Ok(())
    }

    /// Called after any sortie reaches a terminal state (`completed`,
    /// `cancelled`, or `failed`). Once every sortie of the mission is
    /// terminal: if all of them completed successfully the mission completes
    /// immediately; otherwise it parks in `review` awaiting
    /// [`Self::approve_mission_review`]/[`Self::reject_mission_review`]
    /// (§4.5 "Mission state machine": "`complete` is refused if any child
    /// sortie is not terminal-successful").
    fn maybe_complete_mission(&self, sortie: &Sortie) -> Result<(), LifecycleError> {
        let Some(mission_id) = sortie.mission_id else { return Ok(()) };
        let mission = self.get_mission(mission_id.as_str())?;
        if mission.is_terminal() {
            return Ok(());
        }
        let sorties: Vec<Sortie> = self.store.with_state(|s| s.sorties_for_mission(&mission_id).cloned().collect());
        if sorties.is_empty() || mission.total_sorties == 0 || !sorties.iter().all(|s| s.is_terminal()) {
            return Ok(());
        }
        if sorties.iter().all(|s| s.status == SortieStatus::Completed) {
            // `mission` was fetched after this sortie's own terminal event
            // was applied, so `completed_sorties` already reflects it.
            self.store.append(NewEvent::root(
                "mission",
                mission_id.to_string(),
                Event::MissionCompleted(MissionCompleted {
                    mission_id,
                    total_sorties: mission.total_sorties,
                    completed_sorties: mission.completed_sorties,
                }),
            ))?;
            return Ok(());
        }
        self.store.append(NewEvent::root(
            "mission",
            mission_id.to_string(),
            Event::MissionReviewOpened(MissionReviewOpened { mission_id }),
        ))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
