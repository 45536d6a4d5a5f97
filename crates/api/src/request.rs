// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Mutating request types for the coordinator surface (§6).
//!
//! Every variant corresponds to one write operation exposed by a component
//! (C5 Lifecycle, C6 Dispatch, C3 Lock Manager, C4 Mailbox/Cursor, C7
//! Checkpoint & Recovery, plus the Specialist presence surface). `Core`
//! (`crate::core::Core`) is the sole interpreter of this enum; it never
//! reaches a transport.

use ft_core::{
    BlockerCategory, CheckpointTrigger, LockPurpose, LockSnapshot, MissionId, Priority, SortieId, SortieResult,
    SpecialistId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One message within an [`Request::AppendMessages`] batch, mirroring
/// `ft_engine::mailbox::NewMessage` in a serializable shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMessageItem {
    pub message_type: String,
    pub content: Value,
    #[serde(default)]
    pub sender_id: Option<SpecialistId>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    // --- Mission (C5) ---
    CreateMission {
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        priority: Priority,
        #[serde(default)]
        strategy: Option<String>,
    },
    CancelMission {
        mission_id: MissionId,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Accept a mission parked in `review` (some child sortie ended
    /// cancelled or failed rather than completed) as its final outcome.
    ApproveMissionReview {
        mission_id: MissionId,
    },
    /// Reject a mission parked in `review`, cancelling it.
    RejectMissionReview {
        mission_id: MissionId,
        #[serde(default)]
        reason: Option<String>,
    },

    // --- Sortie (C5) ---
    CreateSortie {
        #[serde(default)]
        mission_id: Option<MissionId>,
        title: String,
        #[serde(default)]
        priority: Priority,
        #[serde(default)]
        dependencies: Vec<SortieId>,
        #[serde(default)]
        files: Vec<String>,
    },
    AssignSortie {
        sortie_id: SortieId,
        specialist_id: SpecialistId,
    },
    StartSortie {
        sortie_id: SortieId,
        specialist_id: SpecialistId,
    },
    UpdateSortieProgress {
        sortie_id: SortieId,
        specialist_id: SpecialistId,
        progress: u8,
        #[serde(default)]
        note: Option<String>,
    },
    BlockSortie {
        sortie_id: SortieId,
        category: BlockerCategory,
        reason: String,
    },
    UnblockSortie {
        sortie_id: SortieId,
    },
    CompleteSortie {
        sortie_id: SortieId,
        specialist_id: SpecialistId,
        result: SortieResult,
    },
    CancelSortie {
        sortie_id: SortieId,
        #[serde(default)]
        reason: Option<String>,
    },
    FailSortie {
        sortie_id: SortieId,
        reason: String,
    },

    // --- Specialist presence ---
    RegisterSpecialist {
        specialist_id: SpecialistId,
        sortie_id: SortieId,
        #[serde(default)]
        mission_id: Option<MissionId>,
    },
    SpecialistHeartbeat {
        specialist_id: SpecialistId,
    },
    DeregisterSpecialist {
        specialist_id: SpecialistId,
        #[serde(default)]
        reason: Option<String>,
    },

    // --- Lock (C3) ---
    AcquireLock {
        file: String,
        specialist_id: SpecialistId,
        timeout_ms: u64,
        purpose: LockPurpose,
        #[serde(default)]
        checksum: Option<String>,
    },
    ReleaseLock {
        lock_id: String,
        specialist_id: SpecialistId,
    },
    ForceReleaseLock {
        lock_id: String,
        reason: String,
    },
    ExtendLock {
        lock_id: String,
        specialist_id: SpecialistId,
        additional_ms: u64,
    },
    ReacquireLocks {
        snapshots: Vec<LockSnapshot>,
    },

    // --- Mailbox & Cursor (C4) ---
    /// `Mailbox.append(stream_id, events)` (§6): one call may deliver several
    /// messages to the same mailbox in a single append batch.
    AppendMessages {
        mailbox_id: String,
        messages: Vec<NewMessageItem>,
    },
    /// Mint a fresh `thread_id` to group a run of related messages. No
    /// `Thread` entity exists in the data model — `Message::thread_id` is an
    /// opaque caller-supplied string, so this is pure ID minting with no
    /// event to append.
    CreateThread,
    MarkMessageRead {
        message_id: String,
        reader_id: SpecialistId,
    },
    AckMessage {
        message_id: String,
        acker_id: SpecialistId,
        #[serde(default)]
        response: Option<Value>,
    },
    AdvanceCursor {
        stream_type: String,
        stream_id: String,
        consumer_id: String,
        position: u64,
    },

    // --- Checkpoint & Recovery (C7) ---
    CreateCheckpoint {
        mission_id: MissionId,
        trigger: CheckpointTrigger,
        created_by: String,
    },
    RecoverCheckpoint {
        checkpoint_id: String,
        #[serde(default)]
        dry_run: bool,
    },
    DeleteCheckpoint {
        checkpoint_id: String,
    },
    PruneCheckpoints {
        mission_id: MissionId,
        min_keep: u32,
        retention_days: u32,
        completed_retention_days: u32,
    },

    // --- Dispatch (C6), driven on demand as well as by the background runner ---
    Tick {
        mission_id: MissionId,
    },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
