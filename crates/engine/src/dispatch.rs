// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Dispatch Scheduler (C6, §4.6): dependency-aware spawning, completion
//! propagation, blocker handling, review gating, and stale-specialist
//! sweeps. `Dispatch` is the single entry point the background runtime
//! drives on a timer and the one a test can call synchronously to assert a
//! deterministic tick's effects.

use crate::dag::topological_order;
use crate::error::SchedulerError;
use crate::lifecycle::Lifecycle;
use crate::locks::LockManager;
use crate::mailbox::{Mailbox, NewMessage};
use chrono::Duration as ChronoDuration;
use ft_core::event::{Event, SpecialistRegistered, SpecialistSpawned, SpecialistWentStale, SpecialistWorking};
use ft_core::{
    BlockerCategory, Clock, Mission, MissionId, Priority, Sortie, SortieId, SortieResult, SortieStatus,
    SpecialistId, SpecialistStatus,
};
use ft_storage::{EventStore, NewEvent};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// One sortie the scheduler spawned a specialist for during a tick.
#[derive(Debug, Clone)]
pub struct Spawned {
    pub sortie_id: SortieId,
    pub specialist_id: SpecialistId,
}

/// Outcome of [`Dispatch::handle_blocker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockerAction {
    /// The blocker was resolved and the sortie returned to `in_progress`.
    Cleared,
    /// The condition may resolve on its own; caller should retry later.
    Retryable,
    /// A clarifying or resolution message was sent; no state change yet.
    MessageSent,
    /// The sortie is still waiting; no action was possible.
    Deferred,
}

/// Result of [`Dispatch::validate_review`]: `Ok(())` approves, `Err` rejects
/// with the listed reasons (§4.6 "Review gating").
pub type ReviewVerdict = Result<(), Vec<String>>;

pub struct Dispatch<C: Clock> {
    store: Arc<EventStore<C>>,
    lifecycle: Lifecycle<C>,
    locks: LockManager<C>,
    mailbox: Mailbox<C>,
    clock: C,
    blocker_timeout_ms: u64,
}

impl<C: Clock> Dispatch<C> {
    pub fn new(store: Arc<EventStore<C>>, clock: C, blocker_timeout_ms: u64) -> Self {
        let lifecycle = Lifecycle::new(store.clone());
        let locks = LockManager::new(store.clone(), clock.clone());
        let mailbox = Mailbox::new(store.clone());
        Self { store, lifecycle, locks, mailbox, clock, blocker_timeout_ms }
    }

    pub fn lifecycle(&self) -> &Lifecycle<C> {
        &self.lifecycle
    }

    pub fn locks(&self) -> &LockManager<C> {
        &self.locks
    }

    pub fn mailbox(&self) -> &Mailbox<C> {
        &self.mailbox
    }

    /// Validate the mission's dependency graph, compute the ready set, and
    /// spawn + assign + start a fresh specialist for every ready sortie
    /// (§4.6 "Spawn policy"). Independent ready sorties are all spawned in
    /// this one call, satisfying "same scheduler tick" (§4.6 step 3).
    pub fn tick(&self, mission_id: MissionId) -> Result<Vec<Spawned>, SchedulerError> {
        let sorties: Vec<Sortie> =
            self.store.with_state(|s| s.sorties_for_mission(&mission_id).cloned().collect());
        if topological_order(&sorties).is_none() {
            return Err(SchedulerError::CyclicDependency(mission_id.to_string()));
        }

        let ready = self.ready_set(&sorties);
        let mut spawned = Vec::with_capacity(ready.len());
        for sortie in ready {
            let specialist_id = self.spawn_specialist(&sortie)?;
            self.lifecycle.assign_sortie(sortie.id.as_str(), specialist_id)?;
            self.mark_working(specialist_id, sortie.id)?;
            self.lifecycle.start_sortie(sortie.id.as_str(), specialist_id)?;
            spawned.push(Spawned { sortie_id: sortie.id, specialist_id });
        }
        info!(mission_id = %mission_id, spawned = spawned.len(), "scheduler tick");
        Ok(spawned)
    }

    /// `sortie_completed` triggers a fresh tick over the same mission so any
    /// sortie whose only remaining dependency just finished becomes ready
    /// (§4.6 "Completion propagation").
    pub fn on_sortie_completed(&self, sortie_id: &str) -> Result<Vec<Spawned>, SchedulerError> {
        let sortie = self.lifecycle.get_sortie(sortie_id)?;
        match sortie.mission_id {
            Some(mission_id) => self.tick(mission_id),
            None => Ok(Vec::new()),
        }
    }

    fn ready_set(&self, sorties: &[Sortie]) -> Vec<Sortie> {
        sorties
            .iter()
            .filter(|s| s.status == SortieStatus::Pending)
            .filter(|s| {
                s.dependencies.iter().all(|dep| {
                    sorties.iter().find(|d| d.id == *dep).map(|d| d.status == SortieStatus::Completed).unwrap_or(true)
                })
            })
            .cloned()
            .collect()
    }

    fn spawn_specialist(&self, sortie: &Sortie) -> Result<SpecialistId, SchedulerError> {
        let specialist_id = SpecialistId::new();
        self.store.append(NewEvent::root(
            "specialist",
            specialist_id.to_string(),
            Event::SpecialistSpawned(SpecialistSpawned {
                specialist_id,
                name: format!("specialist-for-{}", sortie.id),
                capabilities: Vec::new(),
            }),
        ))?;
        self.store.append(NewEvent::root(
            "specialist",
            specialist_id.to_string(),
            Event::SpecialistRegistered(SpecialistRegistered { specialist_id }),
        ))?;
        Ok(specialist_id)
    }

    fn mark_working(&self, specialist_id: SpecialistId, sortie_id: SortieId) -> Result<(), SchedulerError> {
        self.store.append(NewEvent::root(
            "specialist",
            specialist_id.to_string(),
            Event::SpecialistWorking(SpecialistWorking { specialist_id, sortie_id }),
        ))?;
        Ok(())
    }

    /// Automatic validators run before a reviewed sortie is approved (§4.6
    /// "Review gating"): the reported tests must have passed, the declared
    /// file set must not be empty when files were touched, and every
    /// touched file must appear in the sortie's declared file list.
    pub fn validate_review(&self, sortie: &Sortie, result: &SortieResult) -> ReviewVerdict {
        let mut failures = Vec::new();
        if !result.tests_passed {
            failures.push("tests_passed is false".to_string());
        }
        let undeclared: Vec<&String> = result.files.iter().filter(|f| !sortie.files.contains(f)).collect();
        if !undeclared.is_empty() {
            failures.push(format!("touched files not declared on the sortie: {undeclared:?}"));
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }

    /// Runs [`Self::validate_review`] against a `review` sortie and its
    /// reported result, approving or rejecting accordingly.
    pub fn gate_review(&self, sortie_id: &str, result: &SortieResult) -> Result<Sortie, SchedulerError> {
        let sortie = self.lifecycle.get_sortie(sortie_id)?;
        match self.validate_review(&sortie, result) {
            Ok(()) => Ok(self.lifecycle.approve_review(sortie_id, None)?),
            Err(failures) => {
                warn!(sortie_id, ?failures, "review rejected by automatic validators");
                Ok(self.lifecycle.reject_review(sortie_id, &failures.join("; "), None)?)
            }
        }
    }

    /// Apply the per-category policy from §4.6 "Blocker handling" to a
    /// currently-blocked sortie.
    pub fn handle_blocker(&self, sortie_id: &str) -> Result<BlockerAction, SchedulerError> {
        let sortie = self.lifecycle.get_sortie(sortie_id)?;
        if sortie.status != SortieStatus::Blocked {
            return Ok(BlockerAction::Deferred);
        }
        match sortie.blocked_category {
            Some(BlockerCategory::Dependency) => self.handle_dependency_blocker(&sortie),
            Some(BlockerCategory::FileConflict) => self.handle_file_conflict_blocker(&sortie),
            Some(BlockerCategory::Clarification) => self.handle_clarification_blocker(&sortie),
            Some(BlockerCategory::Error) | None => Ok(BlockerAction::Deferred),
        }
    }

    fn handle_dependency_blocker(&self, sortie: &Sortie) -> Result<BlockerAction, SchedulerError> {
        let deps_complete = self.store.with_state(|s| {
            sortie.dependencies.iter().all(|dep| s.get_sortie(dep.as_str()).map(|d| d.is_terminal()).unwrap_or(false))
        });
        if !deps_complete {
            return Ok(BlockerAction::Deferred);
        }
        self.lifecycle.unblock_sortie(sortie.id.as_str())?;
        if let Some(specialist_id) = sortie.assigned_to {
            self.mailbox.append(
                specialist_id.as_str(),
                vec![NewMessage {
                    message_type: "blocker_resolved".to_string(),
                    content: serde_json::json!({ "sortie_id": sortie.id.to_string() }),
                    sender_id: None,
                    thread_id: None,
                    priority: Priority::High,
                }],
            )?;
        }
        Ok(BlockerAction::Cleared)
    }

    fn handle_file_conflict_blocker(&self, sortie: &Sortie) -> Result<BlockerAction, SchedulerError> {
        // `Sortie` has no dedicated "contested path" field; by convention the
        // caller blocking with category `file_conflict` passes the
        // normalized path itself as `reason` (§4.6 "file_conflict").
        let conflicting = sortie.blocked_reason.as_deref().unwrap_or("");
        let active = self.store.with_state(|s| s.active_lock_on(conflicting).cloned());
        match active {
            Some(lock) if !lock.is_expired(self.clock.now_utc()) => Ok(BlockerAction::Deferred),
            _ => Ok(BlockerAction::Retryable),
        }
    }

    fn handle_clarification_blocker(&self, sortie: &Sortie) -> Result<BlockerAction, SchedulerError> {
        if let Some(specialist_id) = sortie.assigned_to {
            self.mailbox.append(
                specialist_id.as_str(),
                vec![NewMessage {
                    message_type: "clarification_requested".to_string(),
                    content: serde_json::json!({
                        "sortie_id": sortie.id.to_string(),
                        "reason": sortie.blocked_reason,
                    }),
                    sender_id: None,
                    thread_id: None,
                    priority: Priority::Normal,
                }],
            )?;
        }
        Ok(BlockerAction::MessageSent)
    }

    /// Sorties blocked past `blocker_timeout_ms` (default `BLOCKER_TIMEOUT`,
    /// §4.6) are marked `failed`; every dependent still pending is cascaded
    /// to `cancelled` rather than spawned against a failed dependency.
    pub fn escalate_stale_blockers(&self, mission_id: MissionId) -> Result<Vec<SortieId>, SchedulerError> {
        let now = self.clock.now_utc();
        let sorties: Vec<Sortie> =
            self.store.with_state(|s| s.sorties_for_mission(&mission_id).cloned().collect());
        let mut failed = Vec::new();
        for sortie in &sorties {
            let Some(blocked_since) = sortie.blocked_since else { continue };
            let elapsed = now.signed_duration_since(blocked_since);
            if elapsed < ChronoDuration::milliseconds(self.blocker_timeout_ms as i64) {
                continue;
            }
            self.lifecycle.fail_sortie(sortie.id.as_str(), "blocker exceeded timeout")?;
            failed.push(sortie.id);
            for dependent in &sorties {
                if dependent.dependencies.contains(&sortie.id) && !dependent.is_terminal() {
                    self.lifecycle.cancel_sortie(dependent.id.as_str(), Some("dependency failed".to_string()))?;
                }
            }
        }
        Ok(failed)
    }

    /// Background liveness sweep (§4.6 "Stale specialist handling"): marks
    /// specialists stale past `threshold` and blocks their in-flight sortie
    /// with category `error` so it becomes reassignable.
    pub fn sweep_stale_specialists(&self, threshold: Duration) -> Result<Vec<SpecialistId>, SchedulerError> {
        let now = self.clock.now_utc();
        let stale: Vec<(SpecialistId, Option<SortieId>)> = self.store.with_state(|s| {
            s.specialists
                .values()
                .filter(|sp| sp.is_stale(now, threshold))
                .map(|sp| (sp.id, sp.current_sortie))
                .collect()
        });
        let mut marked = Vec::with_capacity(stale.len());
        for (specialist_id, current_sortie) in stale {
            self.store.append(NewEvent::root(
                "specialist",
                specialist_id.to_string(),
                Event::SpecialistWentStale(SpecialistWentStale { specialist_id }),
            ))?;
            if let Some(sortie_id) = current_sortie {
                let sortie = self.lifecycle.get_sortie(sortie_id.as_str())?;
                if sortie.status == SortieStatus::InProgress {
                    self.lifecycle.block_sortie(
                        sortie_id.as_str(),
                        BlockerCategory::Error,
                        "owning specialist went stale",
                    )?;
                }
            }
            marked.push(specialist_id);
        }
        Ok(marked)
    }

    pub fn mission(&self, mission_id: &str) -> Result<Mission, SchedulerError> {
        Ok(self.lifecycle.get_mission(mission_id)?)
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
