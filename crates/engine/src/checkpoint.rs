// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Checkpoint & Recovery (C7, §4.7): assembles a point-in-time [`Checkpoint`]
//! from the current projection, writes it to both the store and a JSON
//! artifact on disk, and restores a mission's in-flight state from one.
//!
//! A checkpoint's bulky snapshot payload lives in two places by design
//! (§9 "File-backed JSON alongside a primary store"): [`EventStore::put_checkpoint`]
//! for fast in-process lookup, and a `<mission>/<checkpoint>.json` file (plus
//! a `latest.json` pointer) so an operator can inspect or ship one without
//! the running process. The log only ever records that the checkpoint was
//! taken (`fleet_checkpointed`, `checkpoint_created`), never the payload
//! itself.

use crate::config::Config;
use crate::error::CheckpointError;
use crate::locks::{LockManager, ReacquireResult};
use crate::mailbox::{Mailbox, NewMessage};
use ft_core::event::{CheckpointCreated, ContextCompacted, Event, FleetCheckpointed, FleetRecovered, SortieRestored};
use ft_core::{
    Checkpoint, CheckpointId, CheckpointTrigger, Clock, LockSnapshot, Mission, MissionId, MessageId, MessageSnapshot,
    MessageStatus, Priority, RecoveryContext, SortieId, SortieSnapshot, SpecialistId,
};
use ft_storage::{EventStore, NewEvent};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of [`CheckpointManager::recover`].
#[derive(Debug, Clone)]
pub struct RecoveryOutcome {
    pub checkpoint: Checkpoint,
    pub recovery_context: RecoveryContext,
    pub sorties_restored: u32,
    pub locks_reacquired: u32,
    pub locks_expired: u32,
    pub locks_conflicted: u32,
    pub messages_requeued: u32,
    /// `true` if this checkpoint had already been recovered; no new events
    /// were appended (§8 invariant: recovery from the same checkpoint is
    /// idempotent).
    pub already_recovered: bool,
}

pub struct CheckpointManager<C: Clock> {
    store: Arc<EventStore<C>>,
    locks: LockManager<C>,
    mailbox: Mailbox<C>,
    clock: C,
    checkpoints_dir: PathBuf,
    max_checkpoint_bytes: u64,
    checkpoint_warn_bytes: u64,
    activity_threshold_ms: u64,
}

impl<C: Clock> CheckpointManager<C> {
    pub fn new(store: Arc<EventStore<C>>, clock: C, config: &Config) -> Self {
        let locks = LockManager::new(store.clone(), clock.clone());
        let mailbox = Mailbox::new(store.clone());
        Self {
            store,
            locks,
            mailbox,
            clock,
            checkpoints_dir: config.checkpoints_dir(),
            max_checkpoint_bytes: config.max_checkpoint_bytes,
            checkpoint_warn_bytes: config.checkpoint_warn_bytes,
            activity_threshold_ms: config.activity_threshold_ms,
        }
    }

    /// Assemble and durably write a checkpoint for `mission_id` (§4.7
    /// "Assembly"). Rejects a payload over `max_checkpoint_bytes`; logs a
    /// warning past `checkpoint_warn_bytes`.
    pub fn create(
        &self,
        mission_id: MissionId,
        trigger: CheckpointTrigger,
        created_by: impl Into<String>,
    ) -> Result<Checkpoint, CheckpointError> {
        let mission = self
            .store
            .with_state(|s| s.get_mission(mission_id.as_str()).cloned())
            .ok_or_else(|| CheckpointError::MissionNotFound(mission_id.to_string()))?;

        let sorties = self.store.with_state(|s| {
            s.sorties_for_mission(&mission_id).filter(|sortie| !sortie.is_terminal()).cloned().collect::<Vec<_>>()
        });

        let assigned: HashSet<SpecialistId> = sorties.iter().filter_map(|s| s.assigned_to).collect();

        let active_locks: Vec<LockSnapshot> = self.store.with_state(|s| {
            s.locks
                .values()
                .filter(|lock| lock.status.is_active() && assigned.contains(&lock.reserved_by))
                .map(|lock| LockSnapshot {
                    lock_id: lock.id.to_string(),
                    normalized_path: lock.normalized_path.clone(),
                    reserved_by: lock.reserved_by.to_string(),
                    purpose: lock.purpose,
                    status: lock.status,
                    expires_at: lock.expires_at,
                })
                .collect()
        });

        let pending_messages: Vec<MessageSnapshot> = self.store.with_state(|s| {
            assigned
                .iter()
                .flat_map(|specialist_id| s.mailboxes.get(specialist_id.as_str()).cloned().unwrap_or_default())
                .filter_map(|message_id| s.messages.get(&message_id).cloned())
                .filter(|message| message.status == MessageStatus::Pending)
                .map(|message| MessageSnapshot {
                    message_id: message.id.to_string(),
                    mailbox_id: message.mailbox_id.clone(),
                    message_type: message.message_type.clone(),
                    content: message.content.clone(),
                    status: message.status,
                })
                .collect()
        });

        let sortie_snapshots: Vec<SortieSnapshot> = sorties
            .iter()
            .map(|sortie| SortieSnapshot {
                sortie_id: sortie.id.to_string(),
                title: sortie.title.clone(),
                status: sortie.status,
                assigned_to: sortie.assigned_to.map(|id| id.to_string()),
                priority: sortie.priority,
                progress: sortie.progress,
                files: sortie.files.clone(),
                blocked_reason: sortie.blocked_reason.clone(),
                blocked_category: sortie.blocked_category,
            })
            .collect();

        let now = self.clock.now_utc();
        let files_modified: BTreeSet<String> = sorties.iter().flat_map(|s| s.files.iter().cloned()).collect();
        let blockers: Vec<String> = sorties
            .iter()
            .filter_map(|s| s.blocked_reason.as_ref().map(|reason| format!("{}: {reason}", s.title)))
            .collect();
        let next_steps: Vec<String> = sorties
            .iter()
            .filter(|s| !s.is_blocked())
            .map(|s| format!("resume sortie {} ({})", s.title, s.status))
            .collect();

        let recovery_context = RecoveryContext {
            last_action: format!("mission \"{}\" last updated at {}", mission.title, mission.updated_at),
            next_steps,
            blockers,
            files_modified: files_modified.into_iter().collect(),
            mission_summary: mission.description.clone().unwrap_or_else(|| mission.title.clone()),
            elapsed_time_ms: now.signed_duration_since(mission.created_at).num_milliseconds().max(0) as u64,
            last_activity_at: mission.updated_at,
            last_event_sequence: self.store.current_sequence(),
        };

        let checkpoint = Checkpoint {
            id: CheckpointId::new(),
            mission_id,
            timestamp: now,
            trigger,
            progress_percent: mission.progress_percent(),
            sorties: sortie_snapshots,
            active_locks,
            pending_messages,
            recovery_context,
            created_by: created_by.into(),
            version: ft_core::CHECKPOINT_SCHEMA_VERSION,
            last_event_sequence: self.store.current_sequence(),
        };

        let size = serde_json::to_vec(&checkpoint).map_err(|e| CheckpointError::Io(e.to_string()))?.len() as u64;
        if size > self.max_checkpoint_bytes {
            return Err(CheckpointError::TooLarge { size, max: self.max_checkpoint_bytes });
        }
        if size > self.checkpoint_warn_bytes {
            warn!(mission_id = %mission_id, size, "checkpoint payload is larger than checkpoint_warn_bytes");
        }

        self.store.put_checkpoint(checkpoint.clone());
        let path = self.write_checkpoint_file(&checkpoint)?;

        let checkpointed = self.store.append(NewEvent::root(
            "checkpoint",
            checkpoint.id.to_string(),
            Event::FleetCheckpointed(FleetCheckpointed {
                checkpoint_id: checkpoint.id.to_string(),
                mission_id,
                trigger,
                progress_percent: checkpoint.progress_percent,
            }),
        ))?;
        self.store.append(NewEvent::caused_by(
            "checkpoint",
            checkpoint.id.to_string(),
            Event::CheckpointCreated(CheckpointCreated {
                checkpoint_id: checkpoint.id.to_string(),
                mission_id,
                path: path.display().to_string(),
            }),
            checkpointed.event_id,
        ))?;

        info!(mission_id = %mission_id, checkpoint_id = %checkpoint.id, size, "checkpoint created");
        Ok(checkpoint)
    }

    /// Create a checkpoint the first time mission progress crosses each of
    /// `thresholds` (§4.7 "Triggers", default `[25, 50, 75]`). Returns
    /// `None` when no new threshold has been crossed.
    pub fn maybe_checkpoint_progress(
        &self,
        mission_id: MissionId,
        thresholds: &[u8],
    ) -> Result<Option<Checkpoint>, CheckpointError> {
        let mission = self
            .store
            .with_state(|s| s.get_mission(mission_id.as_str()).cloned())
            .ok_or_else(|| CheckpointError::MissionNotFound(mission_id.to_string()))?;
        let pct = mission.progress_percent();
        let Some(&threshold) = thresholds.iter().filter(|&&t| pct >= t).max() else {
            return Ok(None);
        };
        let already_covered = self
            .list(&mission_id)
            .iter()
            .any(|c| c.trigger == CheckpointTrigger::Progress && c.progress_percent >= threshold);
        if already_covered {
            return Ok(None);
        }
        Ok(Some(self.create(mission_id, CheckpointTrigger::Progress, "scheduler")?))
    }

    pub fn get(&self, checkpoint_id: &str) -> Result<Checkpoint, CheckpointError> {
        self.store
            .with_state(|s| s.checkpoints.get(&CheckpointId::from_string(checkpoint_id)).cloned())
            .ok_or_else(|| CheckpointError::NotFound(checkpoint_id.to_string()))
    }

    /// Every checkpoint for `mission_id`, newest first.
    pub fn list(&self, mission_id: &MissionId) -> Vec<Checkpoint> {
        let mut checkpoints = self
            .store
            .with_state(|s| s.checkpoints.values().filter(|c| &c.mission_id == mission_id).cloned().collect::<Vec<_>>());
        checkpoints.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        checkpoints
    }

    pub fn latest(&self, mission_id: &MissionId) -> Option<Checkpoint> {
        self.store.with_state(|s| s.latest_checkpoint_for(mission_id).cloned())
    }

    /// Remove a single checkpoint by id (§6 "Checkpoint: ... delete").
    /// The JSON artifact on disk is left in place — it is a durability copy,
    /// not projection-relevant truth, and `prune` already governs its
    /// lifetime on a retention schedule rather than per-call deletion.
    pub fn delete(&self, checkpoint_id: &str) -> Result<Checkpoint, CheckpointError> {
        let checkpoint = self.get(checkpoint_id)?;
        self.store.remove_checkpoint(&checkpoint.id, &checkpoint.mission_id);
        Ok(checkpoint)
    }

    /// Restore a mission's in-flight state from a checkpoint (§4.7 "Recovery
    /// algorithm"). `dry_run` previews the outcome without appending any
    /// events or mutating projections, for a caller that wants to show an
    /// operator the recovery context before committing to it.
    ///
    /// Recovering the same checkpoint twice is a no-op the second time
    /// (`already_recovered: true`): locks are reacquired under fresh ids, so
    /// re-running the mutating path would mint duplicate lock rows rather
    /// than converge to the same state.
    pub fn recover(&self, checkpoint_id: &str, dry_run: bool) -> Result<RecoveryOutcome, CheckpointError> {
        let checkpoint = self.get(checkpoint_id)?;
        if !checkpoint.is_compatible() {
            return Err(CheckpointError::IncompatibleSchema {
                found: checkpoint.version,
                supported: ft_core::CHECKPOINT_SCHEMA_VERSION,
            });
        }

        let already_recovered = self.store.get_by_stream("checkpoint", checkpoint_id, None, None).iter().any(|e| {
            matches!(&e.data, Event::FleetRecovered(fr) if fr.checkpoint_id == checkpoint_id)
        });

        if dry_run || already_recovered {
            return Ok(RecoveryOutcome {
                recovery_context: checkpoint.recovery_context.clone(),
                sorties_restored: checkpoint.sorties.len() as u32,
                locks_reacquired: 0,
                locks_expired: 0,
                locks_conflicted: 0,
                messages_requeued: if already_recovered { 0 } else { checkpoint.pending_messages.len() as u32 },
                checkpoint,
                already_recovered,
            });
        }

        let mut sorties_restored = 0u32;
        for snap in &checkpoint.sorties {
            self.store.append(NewEvent::root(
                "sortie",
                snap.sortie_id.clone(),
                Event::SortieRestored(SortieRestored {
                    sortie_id: SortieId::from_string(&snap.sortie_id),
                    status: snap.status,
                    assigned_to: snap.assigned_to.as_deref().map(SpecialistId::from_string),
                    progress: snap.progress,
                    files: snap.files.clone(),
                    blocked_reason: snap.blocked_reason.clone(),
                    blocked_category: snap.blocked_category,
                    checkpoint_id: checkpoint.id.to_string(),
                }),
            ))?;
            sorties_restored += 1;
        }

        let reacquired = self.locks.reacquire(&checkpoint.active_locks)?;
        let mut locks_reacquired = 0u32;
        let mut locks_expired = 0u32;
        let mut locks_conflicted = 0u32;
        let mut blockers = checkpoint.recovery_context.blockers.clone();
        for result in &reacquired {
            match result {
                ReacquireResult::Acquired { .. } => locks_reacquired += 1,
                ReacquireResult::Expired { original_lock_id } => {
                    locks_expired += 1;
                    blockers.push(format!("lock {original_lock_id} had expired by the time of recovery"));
                }
                ReacquireResult::Conflict { original_lock_id } => {
                    locks_conflicted += 1;
                    blockers.push(format!("lock {original_lock_id} conflicts with a newer reservation"));
                }
            }
        }

        let mut messages_requeued = 0u32;
        for snap in &checkpoint.pending_messages {
            let exists = self.store.with_state(|s| s.messages.contains_key(&MessageId::from_string(&snap.message_id)));
            if exists {
                continue;
            }
            self.mailbox.append(
                &snap.mailbox_id,
                vec![NewMessage {
                    message_type: snap.message_type.clone(),
                    content: snap.content.clone(),
                    sender_id: None,
                    thread_id: None,
                    priority: Priority::Normal,
                }],
            )?;
            messages_requeued += 1;
        }

        self.store.append(NewEvent::root(
            "checkpoint",
            checkpoint.id.to_string(),
            Event::FleetRecovered(FleetRecovered {
                mission_id: checkpoint.mission_id,
                checkpoint_id: checkpoint.id.to_string(),
                sorties_restored,
                locks_reacquired,
                locks_expired,
                messages_requeued,
            }),
        ))?;

        info!(
            checkpoint_id = %checkpoint.id,
            sorties_restored, locks_reacquired, locks_expired, locks_conflicted, messages_requeued,
            "recovered from checkpoint"
        );

        Ok(RecoveryOutcome {
            recovery_context: RecoveryContext { blockers, ..checkpoint.recovery_context.clone() },
            checkpoint,
            sorties_restored,
            locks_reacquired,
            locks_expired,
            locks_conflicted,
            messages_requeued,
            already_recovered: false,
        })
    }

    /// If `mission` has gone quiet past `activity_threshold_ms` and its
    /// latest checkpoint is not yet at 100% progress, emit `context_compacted`
    /// to flag it as a recovery candidate (§4.7 "Compaction detection").
    /// Returns the checkpoint an operator would resume from.
    pub fn detect_staleness(&self, mission: &Mission) -> Result<Option<Checkpoint>, CheckpointError> {
        if mission.is_terminal() {
            return Ok(None);
        }
        let now = self.clock.now_utc();
        let elapsed = now.signed_duration_since(mission.updated_at).num_milliseconds().max(0) as u64;
        if elapsed < self.activity_threshold_ms {
            return Ok(None);
        }
        let Some(checkpoint) = self.latest(&mission.id) else {
            return Ok(None);
        };
        if checkpoint.progress_percent >= 100 {
            return Ok(None);
        }
        self.store.append(NewEvent::root(
            "mission",
            mission.id.to_string(),
            Event::ContextCompacted(ContextCompacted {
                stream_type: "mission".to_string(),
                stream_id: mission.id.to_string(),
                from_sequence: checkpoint.last_event_sequence,
                to_sequence: self.store.current_sequence(),
            }),
        ))?;
        info!(mission_id = %mission.id, elapsed_ms = elapsed, "mission flagged stale, recovery candidate available");
        Ok(Some(checkpoint))
    }

    /// Drop checkpoints past `min_keep_checkpoints` that are older than the
    /// applicable retention window (§4.7 "Retention": `completed_retention_days`
    /// for a terminal mission, `retention_days` otherwise). Returns the
    /// number removed.
    pub fn prune(
        &self,
        mission_id: &MissionId,
        min_keep: u32,
        retention_days: u32,
        completed_retention_days: u32,
    ) -> Result<u32, CheckpointError> {
        let mission = self.store.with_state(|s| s.get_mission(mission_id.as_str()).cloned());
        let max_age_days = match &mission {
            Some(m) if m.is_terminal() => completed_retention_days,
            _ => retention_days,
        };
        let checkpoints = self.list(mission_id);
        if checkpoints.len() <= min_keep as usize {
            return Ok(0);
        }
        let now = self.clock.now_utc();
        let mut removed = 0u32;
        for checkpoint in checkpoints.into_iter().skip(min_keep as usize) {
            let age_days = now.signed_duration_since(checkpoint.timestamp).num_days();
            if age_days >= max_age_days as i64 {
                self.store.remove_checkpoint(&checkpoint.id, mission_id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn write_checkpoint_file(&self, checkpoint: &Checkpoint) -> Result<PathBuf, CheckpointError> {
        let dir = self.checkpoints_dir.join(checkpoint.mission_id.to_string());
        fs::create_dir_all(&dir).map_err(|e| CheckpointError::Io(e.to_string()))?;
        let json = serde_json::to_vec_pretty(checkpoint).map_err(|e| CheckpointError::Io(e.to_string()))?;
        let path = dir.join(format!("{}.json", checkpoint.id));
        write_atomic(&path, &json)?;
        write_atomic(&dir.join("latest.json"), &json)?;
        Ok(path)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CheckpointError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| CheckpointError::Io(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| CheckpointError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
