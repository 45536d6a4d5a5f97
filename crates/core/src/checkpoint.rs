// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Checkpoint: a point-in-time capture of mission state for recovery
//! (§3 "Checkpoint", §4.7 "Checkpoint & Recovery").

use crate::lock::{LockPurpose, LockStatus};
use crate::message::MessageStatus;
use crate::mission::MissionId;
use crate::priority::Priority;
use crate::sortie::{BlockerCategory, SortieStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for a [`Checkpoint`].
    pub struct CheckpointId("chk-");
}

/// What caused a checkpoint to be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointTrigger {
    Progress,
    Error,
    Manual,
    Compaction,
}

crate::simple_display! {
    CheckpointTrigger {
        Progress => "progress",
        Error => "error",
        Manual => "manual",
        Compaction => "compaction",
    }
}

/// A point-in-time snapshot of a single sortie, captured into a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieSnapshot {
    pub sortie_id: String,
    pub title: String,
    pub status: SortieStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub priority: Priority,
    pub progress: u8,
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_category: Option<BlockerCategory>,
}

/// A point-in-time snapshot of a single active lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockSnapshot {
    pub lock_id: String,
    pub normalized_path: String,
    pub reserved_by: String,
    pub purpose: LockPurpose,
    pub status: LockStatus,
    pub expires_at: DateTime<Utc>,
}

/// A point-in-time snapshot of one undelivered message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSnapshot {
    pub message_id: String,
    pub mailbox_id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: serde_json::Value,
    pub status: MessageStatus,
}

/// The natural-language and structural context needed to resume a mission
/// after recovery (§4.7 "Assembly").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryContext {
    pub last_action: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
    pub mission_summary: String,
    pub elapsed_time_ms: u64,
    pub last_activity_at: DateTime<Utc>,
    pub last_event_sequence: u64,
}

/// A durable, recoverable capture of an in-flight mission's state.
///
/// Exactly one checkpoint per mission is designated `latest`; recovery always
/// reads through that pointer (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub mission_id: MissionId,
    pub timestamp: DateTime<Utc>,
    pub trigger: CheckpointTrigger,
    pub progress_percent: u8,
    pub sorties: Vec<SortieSnapshot>,
    pub active_locks: Vec<LockSnapshot>,
    pub pending_messages: Vec<MessageSnapshot>,
    pub recovery_context: RecoveryContext,
    pub created_by: String,
    pub version: u32,
    pub last_event_sequence: u64,
}

/// The schema version new checkpoints are written with. Recovery rejects
/// checkpoints with a newer version than this binary understands.
pub const CHECKPOINT_SCHEMA_VERSION: u32 = 1;

impl Checkpoint {
    pub fn is_compatible(&self) -> bool {
        self.version <= CHECKPOINT_SCHEMA_VERSION
    }
}

crate::builder! {
    pub struct CheckpointBuilder => Checkpoint {
        set { mission_id: MissionId = MissionId::new() }
        set { trigger: CheckpointTrigger = CheckpointTrigger::Manual }
        set { progress_percent: u8 = 0 }
        set { sorties: Vec<SortieSnapshot> = Vec::new() }
        set { active_locks: Vec<LockSnapshot> = Vec::new() }
        set { pending_messages: Vec<MessageSnapshot> = Vec::new() }
        set { version: u32 = CHECKPOINT_SCHEMA_VERSION }
        set { last_event_sequence: u64 = 0 }
        into { created_by: String = "fleet" }
        computed { id: CheckpointId = CheckpointId::new() }
        computed { timestamp: DateTime<Utc> = Utc::now() }
        computed { recovery_context: RecoveryContext = RecoveryContext {
            last_action: String::new(),
            next_steps: Vec::new(),
            blockers: Vec::new(),
            files_modified: Vec::new(),
            mission_summary: String::new(),
            elapsed_time_ms: 0,
            last_activity_at: Utc::now(),
            last_event_sequence: 0,
        } }
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
