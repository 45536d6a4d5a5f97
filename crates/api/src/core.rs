// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! `Core`: the composition root wiring the Event Store, Dispatch Scheduler,
//! Specialist Presence, Checkpoint Manager, and Compactor behind the single
//! `Request`/`Query` surface (§6), plus the background runner that drives
//! heartbeat sweep, lock sweep, blocker escalation, and compaction on a
//! timer (§4.8 "Scheduling model": "long-running operations ... run as
//! independent background tasks").
//!
//! Every transport this process might grow (HTTP, a local socket, an
//! in-process call from a test) talks to the fleet exclusively through this
//! type; none of it depends on how a caller reached `Core`.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use ft_core::{Clock, EventId, FleetError, SystemClock};
use ft_engine::{
    AcquireOutcome, CheckpointManager, Compactor, Config, Dispatch, LockFilter, NewMessage, Presence,
    PresenceFilter, ReacquireResult,
};
use ft_storage::EventStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::query::Query;
use crate::request::Request;
use crate::response::{
    Envelope, LockAcquireResult, MissionStats, ReacquireEntry, RecoveryOutcome, Response, SpawnedEntry,
};
use crate::status::{CoordinatorStatus, HealthStatus};

/// The fleet coordinator, generic over [`Clock`] so tests can drive it with
/// [`ft_core::FakeClock`] the same way every `ft-engine` component is tested.
pub struct Core<C: Clock = SystemClock> {
    store: Arc<EventStore<C>>,
    dispatch: Dispatch<C>,
    presence: Presence<C>,
    checkpoints: CheckpointManager<C>,
    compactor: Compactor<C>,
    config: Config,
    clock: C,
}

impl<C: Clock> Core<C> {
    pub fn new(store: Arc<EventStore<C>>, clock: C, config: Config) -> Self {
        let dispatch = Dispatch::new(Arc::clone(&store), clock.clone(), config.blocker_timeout_ms);
        let presence = Presence::new(Arc::clone(&store));
        let checkpoints = CheckpointManager::new(Arc::clone(&store), clock.clone(), &config);
        let compactor = Compactor::new(Arc::clone(&store), clock.clone(), &config);
        Self { store, dispatch, presence, checkpoints, compactor, config, clock }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one mutating request and wrap the outcome in the stable
    /// `{data, error?, timestamp}` envelope (§6).
    pub fn call(&self, request: Request) -> Envelope {
        let now = self.clock.now_utc();
        match self.handle(request) {
            Ok(data) => Envelope::ok(data, now),
            Err(err) => Envelope::err(err, now),
        }
    }

    /// Execute one read-only query.
    pub fn query(&self, query: Query) -> Envelope {
        let now = self.clock.now_utc();
        match self.handle_query(query) {
            Ok(data) => Envelope::ok(data, now),
            Err(err) => Envelope::err(err, now),
        }
    }

    fn handle(&self, request: Request) -> Result<Response, FleetError> {
        match request {
            Request::CreateMission { title, description, priority, strategy } => {
                let mission = self.dispatch.lifecycle().create_mission(&title, description, priority, strategy)?;
                Ok(Response::Mission { mission })
            }
            Request::CancelMission { mission_id, reason } => {
                let mission = self.dispatch.lifecycle().cancel_mission(mission_id.as_str(), reason)?;
                Ok(Response::Mission { mission })
            }
            Request::ApproveMissionReview { mission_id } => {
                let mission = self.dispatch.lifecycle().approve_mission_review(mission_id.as_str())?;
                Ok(Response::Mission { mission })
            }
            Request::RejectMissionReview { mission_id, reason } => {
                let mission = self.dispatch.lifecycle().reject_mission_review(mission_id.as_str(), reason)?;
                Ok(Response::Mission { mission })
            }

            Request::CreateSortie { mission_id, title, priority, dependencies, files } => {
                let sortie =
                    self.dispatch.lifecycle().create_sortie(mission_id, &title, priority, dependencies, files)?;
                Ok(Response::Sortie { sortie })
            }
            Request::AssignSortie { sortie_id, specialist_id } => {
                let sortie = self.dispatch.lifecycle().assign_sortie(sortie_id.as_str(), specialist_id)?;
                Ok(Response::Sortie { sortie })
            }
            Request::StartSortie { sortie_id, specialist_id } => {
                let sortie = self.dispatch.lifecycle().start_sortie(sortie_id.as_str(), specialist_id)?;
                Ok(Response::Sortie { sortie })
            }
            Request::UpdateSortieProgress { sortie_id, specialist_id, progress, note } => {
                let sortie =
                    self.dispatch.lifecycle().update_progress(sortie_id.as_str(), specialist_id, progress, note)?;
                Ok(Response::Sortie { sortie })
            }
            Request::BlockSortie { sortie_id, category, reason } => {
                let sortie = self.dispatch.lifecycle().block_sortie(sortie_id.as_str(), category, &reason)?;
                Ok(Response::Sortie { sortie })
            }
            Request::UnblockSortie { sortie_id } => {
                let sortie = self.dispatch.lifecycle().unblock_sortie(sortie_id.as_str())?;
                Ok(Response::Sortie { sortie })
            }
            Request::CompleteSortie { sortie_id, specialist_id, result } => {
                self.dispatch.lifecycle().report_complete(sortie_id.as_str(), specialist_id, result.clone())?;
                let sortie = self.dispatch.gate_review(sortie_id.as_str(), &result)?;
                if sortie.is_terminal() {
                    self.dispatch.on_sortie_completed(sortie_id.as_str())?;
                    if let Some(mission_id) = sortie.mission_id {
                        self.checkpoints.maybe_checkpoint_progress(mission_id, &self.config.checkpoint_thresholds)?;
                    }
                }
                Ok(Response::Sortie { sortie })
            }
            Request::CancelSortie { sortie_id, reason } => {
                let sortie = self.dispatch.lifecycle().cancel_sortie(sortie_id.as_str(), reason)?;
                Ok(Response::Sortie { sortie })
            }
            Request::FailSortie { sortie_id, reason } => {
                let sortie = self.dispatch.lifecycle().fail_sortie(sortie_id.as_str(), &reason)?;
                Ok(Response::Sortie { sortie })
            }

            Request::RegisterSpecialist { specialist_id, sortie_id, mission_id } => {
                let specialist = self.presence.register(specialist_id, sortie_id, mission_id)?;
                Ok(Response::Specialist { specialist })
            }
            Request::SpecialistHeartbeat { specialist_id } => {
                let specialist = self.presence.heartbeat(specialist_id.as_str())?;
                Ok(Response::Specialist { specialist })
            }
            Request::DeregisterSpecialist { specialist_id, reason } => {
                let specialist = self.presence.deregister(specialist_id.as_str(), reason)?;
                Ok(Response::Specialist { specialist })
            }

            Request::AcquireLock { file, specialist_id, timeout_ms, purpose, checksum } => {
                let outcome = self.dispatch.locks().acquire(&file, specialist_id, timeout_ms, purpose, checksum)?;
                let result = match outcome {
                    AcquireOutcome::Acquired(lock) => LockAcquireResult::Acquired { lock },
                    AcquireOutcome::Conflict { existing_lock_id, existing_reserved_by } => {
                        LockAcquireResult::Conflict { existing_lock_id, existing_reserved_by }
                    }
                };
                Ok(Response::LockAcquire { result })
            }
            Request::ReleaseLock { lock_id, specialist_id } => {
                let lock = self.dispatch.locks().release(&lock_id, specialist_id)?;
                Ok(Response::Lock { lock })
            }
            Request::ForceReleaseLock { lock_id, reason } => {
                let lock = self.dispatch.locks().force_release(&lock_id, &reason)?;
                Ok(Response::Lock { lock })
            }
            Request::ExtendLock { lock_id, specialist_id, additional_ms } => {
                let lock = self.dispatch.locks().extend(&lock_id, specialist_id, additional_ms)?;
                Ok(Response::Lock { lock })
            }
            Request::ReacquireLocks { snapshots } => {
                let results = self
                    .dispatch
                    .locks()
                    .reacquire(&snapshots)?
                    .into_iter()
                    .map(|r| match r {
                        ReacquireResult::Acquired { new_lock_id, original_lock_id } => {
                            ReacquireEntry::Acquired { new_lock_id, original_lock_id }
                        }
                        ReacquireResult::Conflict { original_lock_id } => ReacquireEntry::Conflict { original_lock_id },
                        ReacquireResult::Expired { original_lock_id } => ReacquireEntry::Expired { original_lock_id },
                    })
                    .collect();
                Ok(Response::LocksReacquired { results })
            }

            Request::AppendMessages { mailbox_id, messages } => {
                let new_messages = messages
                    .into_iter()
                    .map(|m| NewMessage {
                        message_type: m.message_type,
                        content: m.content,
                        sender_id: m.sender_id,
                        thread_id: m.thread_id,
                        priority: m.priority,
                    })
                    .collect();
                self.dispatch.mailbox().append(&mailbox_id, new_messages)?;
                Ok(Response::Ok)
            }
            Request::CreateThread => {
                let thread_id = format!("thr-{}", nanoid::nanoid!(20));
                Ok(Response::Thread { thread_id })
            }
            Request::MarkMessageRead { message_id, reader_id } => {
                let message = self.dispatch.mailbox().mark_read(&message_id, reader_id)?;
                Ok(Response::Message { message })
            }
            Request::AckMessage { message_id, acker_id, response } => {
                let message = self.dispatch.mailbox().ack(&message_id, acker_id, response)?;
                Ok(Response::Message { message })
            }
            Request::AdvanceCursor { stream_type, stream_id, consumer_id, position } => {
                self.dispatch.mailbox().advance_cursor(&stream_type, &stream_id, &consumer_id, position)?;
                Ok(Response::Cursor {
                    cursor: ft_core::Cursor { stream_type, stream_id, consumer_id, position },
                })
            }

            Request::CreateCheckpoint { mission_id, trigger, created_by } => {
                let checkpoint = self.checkpoints.create(mission_id, trigger, created_by)?;
                Ok(Response::Checkpoint { checkpoint })
            }
            Request::RecoverCheckpoint { checkpoint_id, dry_run } => {
                let outcome = self.checkpoints.recover(&checkpoint_id, dry_run)?;
                Ok(Response::Recovery {
                    outcome: RecoveryOutcome {
                        checkpoint: outcome.checkpoint,
                        sorties_restored: outcome.sorties_restored,
                        locks_reacquired: outcome.locks_reacquired,
                        locks_expired: outcome.locks_expired,
                        locks_conflicted: outcome.locks_conflicted,
                        messages_requeued: outcome.messages_requeued,
                        already_recovered: outcome.already_recovered,
                    },
                })
            }
            Request::DeleteCheckpoint { checkpoint_id } => {
                let checkpoint = self.checkpoints.delete(&checkpoint_id)?;
                Ok(Response::CheckpointDeleted { checkpoint_id: checkpoint.id })
            }
            Request::PruneCheckpoints { mission_id, min_keep, retention_days, completed_retention_days } => {
                let removed = self.checkpoints.prune(&mission_id, min_keep, retention_days, completed_retention_days)?;
                Ok(Response::CheckpointsPruned { removed })
            }

            Request::Tick { mission_id } => {
                let spawned = self
                    .dispatch
                    .tick(mission_id)?
                    .into_iter()
                    .map(|s| SpawnedEntry { sortie_id: s.sortie_id.to_string(), specialist_id: s.specialist_id })
                    .collect();
                Ok(Response::Spawned { spawned })
            }
        }
    }

    fn handle_query(&self, query: Query) -> Result<Response, FleetError> {
        match query {
            Query::GetMission { mission_id } => {
                let mission = self.dispatch.lifecycle().get_mission(mission_id.as_str())?;
                Ok(Response::Mission { mission })
            }
            Query::ListMissions { status, priority } => {
                let missions = self.store.with_state(|s| {
                    s.missions
                        .values()
                        .filter(|m| status.map_or(true, |st| m.status == st))
                        .filter(|m| priority.map_or(true, |p| m.priority == p))
                        .cloned()
                        .collect()
                });
                Ok(Response::Missions { missions })
            }
            Query::GetMissionStats { mission_id } => {
                let mission = self.dispatch.lifecycle().get_mission(mission_id.as_str())?;
                Ok(Response::MissionStats {
                    stats: MissionStats {
                        mission_id: mission.id,
                        total_sorties: mission.total_sorties,
                        completed_sorties: mission.completed_sorties,
                        progress_percent: mission.progress_percent(),
                    },
                })
            }
            Query::ListSorties { mission_id } => {
                let sorties = self.store.with_state(|s| s.sorties_for_mission(&mission_id).cloned().collect());
                Ok(Response::Sorties { sorties })
            }
            Query::GetSortie { sortie_id } => {
                let sortie = self.dispatch.lifecycle().get_sortie(sortie_id.as_str())?;
                Ok(Response::Sortie { sortie })
            }
            Query::GetSpecialist { specialist_id } => {
                let specialist = self.presence.get(&specialist_id)?;
                Ok(Response::Specialist { specialist })
            }
            Query::ListSpecialists { status, current_sortie } => {
                let specialists = self.presence.list(&PresenceFilter { status, current_sortie });
                Ok(Response::Specialists { specialists })
            }
            Query::ReadMailbox { mailbox_id, after_position, limit } => {
                let messages = self.dispatch.mailbox().read(&mailbox_id, after_position, limit);
                Ok(Response::Messages { messages })
            }
            Query::GetMessage { message_id } => {
                let message = self.dispatch.mailbox().get(&message_id)?;
                Ok(Response::Message { message })
            }
            Query::GetCursor { stream_type, stream_id, consumer_id } => {
                let position = self.dispatch.mailbox().cursor(&stream_type, &stream_id, &consumer_id);
                Ok(Response::Cursor { cursor: ft_core::Cursor { stream_type, stream_id, consumer_id, position } })
            }
            Query::GetLock { lock_id } => {
                let lock = self.dispatch.locks().get(&lock_id)?;
                Ok(Response::Lock { lock })
            }
            Query::ListActiveLocks { reserved_by, path_prefix } => {
                let locks = self.dispatch.locks().list_active(&LockFilter { reserved_by, path_prefix });
                Ok(Response::Locks { locks })
            }
            Query::GetCheckpoint { checkpoint_id } => {
                let checkpoint = self.checkpoints.get(&checkpoint_id)?;
                Ok(Response::Checkpoint { checkpoint })
            }
            Query::ListCheckpoints { mission_id } => {
                Ok(Response::Checkpoints { checkpoints: self.checkpoints.list(&mission_id) })
            }
            Query::GetLatestCheckpoint { mission_id } => match self.checkpoints.latest(&mission_id) {
                Some(checkpoint) => Ok(Response::Checkpoint { checkpoint }),
                None => Ok(Response::Ok),
            },
            Query::GetEventById { event_id } => {
                let event = self
                    .store
                    .get_by_id(EventId::from_string(event_id.clone()))
                    .ok_or_else(|| FleetError::not_found(format!("no such event: {event_id}")))?;
                Ok(Response::Event { event })
            }
            Query::GetEventsByStream { stream_type, stream_id } => {
                Ok(Response::Events { events: self.store.get_by_stream(&stream_type, &stream_id, None, None) })
            }
            Query::GetEventsByCorrelation { correlation_id } => {
                Ok(Response::Events { events: self.store.get_by_correlation(EventId::from_string(correlation_id)) })
            }
            Query::GetEventsAfter { sequence, limit } => {
                Ok(Response::Events { events: self.store.get_after(sequence, limit) })
            }
            Query::CoordinatorStatus => Ok(Response::CoordinatorStatus { status: self.coordinator_status() }),
            Query::Health => Ok(Response::Health { health: self.store.health().into() }),
        }
    }

    fn coordinator_status(&self) -> CoordinatorStatus {
        self.store.with_state(|s| CoordinatorStatus {
            missions_total: s.missions.len(),
            missions_active: s.missions.values().filter(|m| !m.is_terminal()).count(),
            sorties_total: s.sorties.len(),
            sorties_in_progress: s
                .sorties
                .values()
                .filter(|sortie| sortie.status == ft_core::SortieStatus::InProgress)
                .count(),
            sorties_blocked: s.sorties.values().filter(|sortie| sortie.is_blocked()).count(),
            specialists_total: s.specialists.len(),
            specialists_working: s
                .specialists
                .values()
                .filter(|sp| sp.status == ft_core::SpecialistStatus::Working)
                .count(),
            locks_active: s.locks.values().filter(|l| l.status.is_active()).count(),
            messages_pending: s.messages.values().filter(|m| !m.is_delivered()).count(),
            last_sequence: self.store.current_sequence(),
        })
    }

    /// Run one pass of every periodic maintenance task the background
    /// runner otherwise drives on a timer: blocker escalation, stale
    /// specialist sweep, lock sweep, and compaction, for every currently
    /// active mission (§4.8 "long-running operations ... run as
    /// independent background tasks").
    pub fn run_maintenance(&self) {
        let active_missions: Vec<_> =
            self.store.with_state(|s| s.missions.values().filter(|m| !m.is_terminal()).map(|m| m.id).collect());
        for mission_id in active_missions {
            if let Err(err) = self.dispatch.escalate_stale_blockers(mission_id) {
                warn!(%mission_id, error = %err, "blocker escalation failed");
            }
        }
        let threshold = StdDuration::from_millis(self.config.stale_threshold_ms);
        if let Err(err) = self.dispatch.sweep_stale_specialists(threshold) {
            warn!(error = %err, "stale specialist sweep failed");
        }
        match self.dispatch.locks().sweep() {
            Ok(expired) if expired > 0 => info!(expired, "lock sweep expired stale reservations"),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "lock sweep failed"),
        }
        match self.compactor.run(self.config.compact_threshold_events, self.config.compact_age_days) {
            Ok(outcomes) if !outcomes.is_empty() => info!(streams = outcomes.len(), "compaction pass completed"),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "compaction pass failed"),
        }
    }
}

impl Core<SystemClock> {
    /// Spawn the background maintenance loop (§4.8). Cancel via the
    /// returned token; the task exits on its own once cancelled rather than
    /// being aborted mid-append.
    pub fn spawn_background_runner(self: Arc<Self>, interval: StdDuration) -> CancellationToken {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = child.cancelled() => {
                        info!("background runner stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.run_maintenance();
                    }
                }
            }
        });
        token
    }
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
