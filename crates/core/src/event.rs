// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! The append-only event envelope and the closed tagged union of domain
//! events it carries (§3 "Event", §4 throughout).
//!
//! Every mutation to projection state happens because an [`Event`] was
//! appended. `Event` is serialized as a tagged union keyed by `type`; unknown
//! historical event types deserialize into [`Event::Custom`] rather than
//! failing, so replay of an older log never breaks after new event types are
//! added (§8 REDESIGN FLAGS "Dynamic payload types").

use crate::checkpoint::CheckpointTrigger;
use crate::lock::{LockPurpose, LockStatus};
use crate::mission::{MissionId, MissionStatus};
use crate::priority::Priority;
use crate::sortie::{BlockerCategory, SortieId, SortieStatus};
use crate::specialist::SpecialistId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for an [`Event`]'s envelope.
    pub struct EventId("evt-");
}

/// A mission was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionCreated {
    pub mission_id: MissionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

/// A mission's first sortie started; the mission left `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionStarted {
    pub mission_id: MissionId,
}

/// All of a mission's sorties reached a terminal state and the mission is
/// awaiting final review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionReviewOpened {
    pub mission_id: MissionId,
}

/// A mission finished successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionCompleted {
    pub mission_id: MissionId,
    pub total_sorties: u32,
    pub completed_sorties: u32,
}

/// A mission was cancelled before completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionCancelled {
    pub mission_id: MissionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A sortie was created and attached to a mission (or created standalone).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieCreated {
    pub sortie_id: SortieId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<MissionId>,
    pub title: String,
    pub priority: Priority,
    #[serde(default)]
    pub dependencies: Vec<SortieId>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// A sortie was assigned to a specialist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieAssigned {
    pub sortie_id: SortieId,
    pub specialist_id: SpecialistId,
}

/// A specialist began active work on an assigned sortie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieStarted {
    pub sortie_id: SortieId,
    pub specialist_id: SpecialistId,
}

/// Progress on an in-progress sortie advanced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieProgressUpdated {
    pub sortie_id: SortieId,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A sortie became blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieBlocked {
    pub sortie_id: SortieId,
    pub category: BlockerCategory,
    pub reason: String,
}

/// A sortie's blocker was cleared and work resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieUnblocked {
    pub sortie_id: SortieId,
}

/// A sortie was submitted for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieReviewOpened {
    pub sortie_id: SortieId,
}

/// A sortie in review was approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieReviewApproved {
    pub sortie_id: SortieId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<SpecialistId>,
}

/// A sortie in review was rejected and returned to active work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieReviewRejected {
    pub sortie_id: SortieId,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<SpecialistId>,
}

/// A sortie completed successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieCompleted {
    pub sortie_id: SortieId,
    pub summary: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub tests_passed: bool,
}

/// A sortie was cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieCancelled {
    pub sortie_id: SortieId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A sortie failed unrecoverably.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieFailed {
    pub sortie_id: SortieId,
    pub reason: String,
}

/// A specialist process came up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistSpawned {
    pub specialist_id: SpecialistId,
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// A specialist announced itself ready to take work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistRegistered {
    pub specialist_id: SpecialistId,
}

/// A specialist's liveness heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistHeartbeat {
    pub specialist_id: SpecialistId,
}

/// A specialist began work on a sortie (mirrors `SortieAssigned`/`SortieStarted`
/// on the specialist's own projection row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistWorking {
    pub specialist_id: SpecialistId,
    pub sortie_id: SortieId,
}

/// A specialist reported it is blocked on its current sortie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistBlocked {
    pub specialist_id: SpecialistId,
}

/// A specialist finished its current sortie and is wrapping up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistCompleting {
    pub specialist_id: SpecialistId,
}

/// A specialist shut down cleanly after completing its work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistCompleted {
    pub specialist_id: SpecialistId,
}

/// A specialist failed unrecoverably.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistFailed {
    pub specialist_id: SpecialistId,
    pub reason: String,
}

/// A specialist's heartbeat exceeded the liveness threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistWentStale {
    pub specialist_id: SpecialistId,
}

/// A specialist was explicitly deregistered (graceful or forced).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistDeregistered {
    pub specialist_id: SpecialistId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A file path was reserved exclusively (§4.2 "Algorithm" step 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtkReserved {
    pub lock_id: String,
    pub normalized_path: String,
    pub reserved_by: SpecialistId,
    pub purpose: LockPurpose,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// An `acquire` found an existing active lock on the same path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtkConflict {
    pub normalized_path: String,
    pub requested_by: SpecialistId,
    pub existing_lock_id: String,
    pub existing_reserved_by: SpecialistId,
}

/// A lock was released by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtkReleased {
    pub lock_id: String,
    pub released_by: SpecialistId,
}

/// A lock was released by an operator bypassing ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtkForceReleased {
    pub lock_id: String,
    pub reason: String,
}

/// A lock's TTL elapsed before it was released.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtkExpired {
    pub lock_id: String,
    pub normalized_path: String,
}

/// An active lock's TTL was extended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtkExtended {
    pub lock_id: String,
    pub new_expires_at: DateTime<Utc>,
}

/// A lock was re-acquired during recovery, possibly under a new id
/// (§9 Open Questions: lock ids are not guaranteed stable across recovery).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtkReacquired {
    pub lock_id: String,
    pub original_lock_id: String,
    pub normalized_path: String,
    pub status: LockStatus,
}

/// A message was appended to a mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquawkSent {
    pub message_id: String,
    pub mailbox_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<SpecialistId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: serde_json::Value,
    pub priority: Priority,
}

/// A message was marked read by its addressee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquawkRead {
    pub message_id: String,
    pub reader_id: SpecialistId,
}

/// A message was acknowledged, optionally with a response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquawkAcked {
    pub message_id: String,
    pub acker_id: SpecialistId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

/// A consumer's cursor advanced to a new position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorAdvanced {
    pub stream_type: String,
    pub stream_id: String,
    pub consumer_id: String,
    pub position: u64,
}

/// A mission checkpoint was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetCheckpointed {
    pub checkpoint_id: String,
    pub mission_id: MissionId,
    pub trigger: CheckpointTrigger,
    pub progress_percent: u8,
}

/// The checkpoint's file artifact was durably written (§9 Open Questions:
/// distinct from `fleet_checkpointed`, which marks the logical decision to
/// checkpoint; this marks the write having completed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointCreated {
    pub checkpoint_id: String,
    pub mission_id: MissionId,
    pub path: String,
}

/// Recovery from a checkpoint completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetRecovered {
    pub mission_id: MissionId,
    pub checkpoint_id: String,
    pub sorties_restored: u32,
    pub locks_reacquired: u32,
    pub locks_expired: u32,
    pub messages_requeued: u32,
}

/// A stream was compacted: a covering snapshot was written and the events it
/// covers were archived (§4.8 "Compaction").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextCompacted {
    pub stream_type: String,
    pub stream_id: String,
    pub from_sequence: u64,
    pub to_sequence: u64,
}

/// A mission's status changed outside the more specific lifecycle events
/// above (used for ad hoc projection corrections during recovery).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionStatusChanged {
    pub mission_id: MissionId,
    pub status: MissionStatus,
}

/// A sortie's projection row was overwritten wholesale from a checkpoint
/// snapshot (§4.7 "Recovery algorithm" step 2, §6 Sortie `restore(snapshot)`).
/// Any progress recorded after the checkpoint was taken is discarded by this
/// event, not merely superseded by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortieRestored {
    pub sortie_id: SortieId,
    pub status: SortieStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<SpecialistId>,
    pub progress: u8,
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_category: Option<BlockerCategory>,
    pub checkpoint_id: String,
}

/// Mirrors [`Event`] one-for-one except for `Custom`: this is the shape the
/// derive macro actually tags and matches against. [`Event`] wraps it so the
/// public enum can carry an untagged catch-all variant, which
/// `#[serde(tag = "type")]` cannot express directly on a data-carrying
/// variant (§8 REDESIGN FLAGS "Dynamic payload types").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum WireEvent {
    #[serde(rename = "mission_created")]
    MissionCreated(MissionCreated),
    #[serde(rename = "mission_started")]
    MissionStarted(MissionStarted),
    #[serde(rename = "mission_review_opened")]
    MissionReviewOpened(MissionReviewOpened),
    #[serde(rename = "mission_completed")]
    MissionCompleted(MissionCompleted),
    #[serde(rename = "mission_cancelled")]
    MissionCancelled(MissionCancelled),
    #[serde(rename = "mission_status_changed")]
    MissionStatusChanged(MissionStatusChanged),

    #[serde(rename = "sortie_restored")]
    SortieRestored(SortieRestored),
    #[serde(rename = "sortie_created")]
    SortieCreated(SortieCreated),
    #[serde(rename = "sortie_assigned")]
    SortieAssigned(SortieAssigned),
    #[serde(rename = "sortie_started")]
    SortieStarted(SortieStarted),
    #[serde(rename = "sortie_progress_updated")]
    SortieProgressUpdated(SortieProgressUpdated),
    #[serde(rename = "sortie_blocked")]
    SortieBlocked(SortieBlocked),
    #[serde(rename = "sortie_unblocked")]
    SortieUnblocked(SortieUnblocked),
    #[serde(rename = "sortie_review_opened")]
    SortieReviewOpened(SortieReviewOpened),
    #[serde(rename = "sortie_review_approved")]
    SortieReviewApproved(SortieReviewApproved),
    #[serde(rename = "sortie_review_rejected")]
    SortieReviewRejected(SortieReviewRejected),
    #[serde(rename = "sortie_completed")]
    SortieCompleted(SortieCompleted),
    #[serde(rename = "sortie_cancelled")]
    SortieCancelled(SortieCancelled),
    #[serde(rename = "sortie_failed")]
    SortieFailed(SortieFailed),

    #[serde(rename = "specialist_spawned")]
    SpecialistSpawned(SpecialistSpawned),
    #[serde(rename = "specialist_registered")]
    SpecialistRegistered(SpecialistRegistered),
    #[serde(rename = "specialist_heartbeat")]
    SpecialistHeartbeat(SpecialistHeartbeat),
    #[serde(rename = "specialist_working")]
    SpecialistWorking(SpecialistWorking),
    #[serde(rename = "specialist_blocked")]
    SpecialistBlocked(SpecialistBlocked),
    #[serde(rename = "specialist_completing")]
    SpecialistCompleting(SpecialistCompleting),
    #[serde(rename = "specialist_completed")]
    SpecialistCompleted(SpecialistCompleted),
    #[serde(rename = "specialist_failed")]
    SpecialistFailed(SpecialistFailed),
    #[serde(rename = "specialist_went_stale")]
    SpecialistWentStale(SpecialistWentStale),
    #[serde(rename = "specialist_deregistered")]
    SpecialistDeregistered(SpecialistDeregistered),

    #[serde(rename = "ctk_reserved")]
    CtkReserved(CtkReserved),
    #[serde(rename = "ctk_conflict")]
    CtkConflict(CtkConflict),
    #[serde(rename = "ctk_released")]
    CtkReleased(CtkReleased),
    #[serde(rename = "ctk_force_released")]
    CtkForceReleased(CtkForceReleased),
    #[serde(rename = "ctk_expired")]
    CtkExpired(CtkExpired),
    #[serde(rename = "ctk_extended")]
    CtkExtended(CtkExtended),
    #[serde(rename = "ctk_reacquired")]
    CtkReacquired(CtkReacquired),

    #[serde(rename = "squawk_sent")]
    SquawkSent(SquawkSent),
    #[serde(rename = "squawk_read")]
    SquawkRead(SquawkRead),
    #[serde(rename = "squawk_acked")]
    SquawkAcked(SquawkAcked),

    #[serde(rename = "cursor_advanced")]
    CursorAdvanced(CursorAdvanced),

    #[serde(rename = "fleet_checkpointed")]
    FleetCheckpointed(FleetCheckpointed),
    #[serde(rename = "checkpoint_created")]
    CheckpointCreated(CheckpointCreated),
    #[serde(rename = "fleet_recovered")]
    FleetRecovered(FleetRecovered),
    #[serde(rename = "context_compacted")]
    ContextCompacted(ContextCompacted),
}

impl From<WireEvent> for Event {
    fn from(wire: WireEvent) -> Self {
        match wire {
            WireEvent::MissionCreated(v) => Event::MissionCreated(v),
            WireEvent::MissionStarted(v) => Event::MissionStarted(v),
            WireEvent::MissionReviewOpened(v) => Event::MissionReviewOpened(v),
            WireEvent::MissionCompleted(v) => Event::MissionCompleted(v),
            WireEvent::MissionCancelled(v) => Event::MissionCancelled(v),
            WireEvent::MissionStatusChanged(v) => Event::MissionStatusChanged(v),
            WireEvent::SortieRestored(v) => Event::SortieRestored(v),
            WireEvent::SortieCreated(v) => Event::SortieCreated(v),
            WireEvent::SortieAssigned(v) => Event::SortieAssigned(v),
            WireEvent::SortieStarted(v) => Event::SortieStarted(v),
            WireEvent::SortieProgressUpdated(v) => Event::SortieProgressUpdated(v),
            WireEvent::SortieBlocked(v) => Event::SortieBlocked(v),
            WireEvent::SortieUnblocked(v) => Event::SortieUnblocked(v),
            WireEvent::SortieReviewOpened(v) => Event::SortieReviewOpened(v),
            WireEvent::SortieReviewApproved(v) => Event::SortieReviewApproved(v),
            WireEvent::SortieReviewRejected(v) => Event::SortieReviewRejected(v),
            WireEvent::SortieCompleted(v) => Event::SortieCompleted(v),
            WireEvent::SortieCancelled(v) => Event::SortieCancelled(v),
            WireEvent::SortieFailed(v) => Event::SortieFailed(v),
            WireEvent::SpecialistSpawned(v) => Event::SpecialistSpawned(v),
            WireEvent::SpecialistRegistered(v) => Event::SpecialistRegistered(v),
            WireEvent::SpecialistHeartbeat(v) => Event::SpecialistHeartbeat(v),
            WireEvent::SpecialistWorking(v) => Event::SpecialistWorking(v),
            WireEvent::SpecialistBlocked(v) => Event::SpecialistBlocked(v),
            WireEvent::SpecialistCompleting(v) => Event::SpecialistCompleting(v),
            WireEvent::SpecialistCompleted(v) => Event::SpecialistCompleted(v),
            WireEvent::SpecialistFailed(v) => Event::SpecialistFailed(v),
            WireEvent::SpecialistWentStale(v) => Event::SpecialistWentStale(v),
            WireEvent::SpecialistDeregistered(v) => Event::SpecialistDeregistered(v),
            WireEvent::CtkReserved(v) => Event::CtkReserved(v),
            WireEvent::CtkConflict(v) => Event::CtkConflict(v),
            WireEvent::CtkReleased(v) => Event::CtkReleased(v),
            WireEvent::CtkForceReleased(v) => Event::CtkForceReleased(v),
            WireEvent::CtkExpired(v) => Event::CtkExpired(v),
            WireEvent::CtkExtended(v) => Event::CtkExtended(v),
            WireEvent::CtkReacquired(v) => Event::CtkReacquired(v),
            WireEvent::SquawkSent(v) => Event::SquawkSent(v),
            WireEvent::SquawkRead(v) => Event::SquawkRead(v),
            WireEvent::SquawkAcked(v) => Event::SquawkAcked(v),
            WireEvent::CursorAdvanced(v) => Event::CursorAdvanced(v),
            WireEvent::FleetCheckpointed(v) => Event::FleetCheckpointed(v),
            WireEvent::CheckpointCreated(v) => Event::CheckpointCreated(v),
            WireEvent::FleetRecovered(v) => Event::FleetRecovered(v),
            WireEvent::ContextCompacted(v) => Event::ContextCompacted(v),
        }
    }
}

/// The closed tagged union of every domain event FleetTools appends.
///
/// `Custom` is the forward-compatibility escape hatch: any JSON object whose
/// `type` tag does not match a known variant deserializes here as the raw
/// `serde_json::Value` instead of failing, so a log containing event types
/// from a newer binary can still be replayed, and re-serializes byte-for-byte
/// the same way (§8 REDESIGN FLAGS).
#[derive(Debug, Clone)]
pub enum Event {
    MissionCreated(MissionCreated),
    MissionStarted(MissionStarted),
    MissionReviewOpened(MissionReviewOpened),
    MissionCompleted(MissionCompleted),
    MissionCancelled(MissionCancelled),
    MissionStatusChanged(MissionStatusChanged),

    SortieRestored(SortieRestored),
    SortieCreated(SortieCreated),
    SortieAssigned(SortieAssigned),
    SortieStarted(SortieStarted),
    SortieProgressUpdated(SortieProgressUpdated),
    SortieBlocked(SortieBlocked),
    SortieUnblocked(SortieUnblocked),
    SortieReviewOpened(SortieReviewOpened),
    SortieReviewApproved(SortieReviewApproved),
    SortieReviewRejected(SortieReviewRejected),
    SortieCompleted(SortieCompleted),
    SortieCancelled(SortieCancelled),
    SortieFailed(SortieFailed),

    SpecialistSpawned(SpecialistSpawned),
    SpecialistRegistered(SpecialistRegistered),
    SpecialistHeartbeat(SpecialistHeartbeat),
    SpecialistWorking(SpecialistWorking),
    SpecialistBlocked(SpecialistBlocked),
    SpecialistCompleting(SpecialistCompleting),
    SpecialistCompleted(SpecialistCompleted),
    SpecialistFailed(SpecialistFailed),
    SpecialistWentStale(SpecialistWentStale),
    SpecialistDeregistered(SpecialistDeregistered),

    CtkReserved(CtkReserved),
    CtkConflict(CtkConflict),
    CtkReleased(CtkReleased),
    CtkForceReleased(CtkForceReleased),
    CtkExpired(CtkExpired),
    CtkExtended(CtkExtended),
    CtkReacquired(CtkReacquired),

    SquawkSent(SquawkSent),
    SquawkRead(SquawkRead),
    SquawkAcked(SquawkAcked),

    CursorAdvanced(CursorAdvanced),

    FleetCheckpointed(FleetCheckpointed),
    CheckpointCreated(CheckpointCreated),
    FleetRecovered(FleetRecovered),
    ContextCompacted(ContextCompacted),

    /// Forward-compatibility catch-all for unrecognized historical event
    /// types, carrying the full original JSON object (tag included) so
    /// replay can write it back out verbatim.
    Custom(serde_json::Value),
}

impl Serialize for Event {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Event::Custom(value) => value.serialize(serializer),
            Event::MissionCreated(v) => WireEvent::MissionCreated(v.clone()).serialize(serializer),
            Event::MissionStarted(v) => WireEvent::MissionStarted(v.clone()).serialize(serializer),
            Event::MissionReviewOpened(v) => WireEvent::MissionReviewOpened(v.clone()).serialize(serializer),
            Event::MissionCompleted(v) => WireEvent::MissionCompleted(v.clone()).serialize(serializer),
            Event::MissionCancelled(v) => WireEvent::MissionCancelled(v.clone()).serialize(serializer),
            Event::MissionStatusChanged(v) => WireEvent::MissionStatusChanged(v.clone()).serialize(serializer),
            Event::SortieRestored(v) => WireEvent::SortieRestored(v.clone()).serialize(serializer),
            Event::SortieCreated(v) => WireEvent::SortieCreated(v.clone()).serialize(serializer),
            Event::SortieAssigned(v) => WireEvent::SortieAssigned(v.clone()).serialize(serializer),
            Event::SortieStarted(v) => WireEvent::SortieStarted(v.clone()).serialize(serializer),
            Event::SortieProgressUpdated(v) => WireEvent::SortieProgressUpdated(v.clone()).serialize(serializer),
            Event::SortieBlocked(v) => WireEvent::SortieBlocked(v.clone()).serialize(serializer),
            Event::SortieUnblocked(v) => WireEvent::SortieUnblocked(v.clone()).serialize(serializer),
            Event::SortieReviewOpened(v) => WireEvent::SortieReviewOpened(v.clone()).serialize(serializer),
            Event::SortieReviewApproved(v) => WireEvent::SortieReviewApproved(v.clone()).serialize(serializer),
            Event::SortieReviewRejected(v) => WireEvent::SortieReviewRejected(v.clone()).serialize(serializer),
            Event::SortieCompleted(v) => WireEvent::SortieCompleted(v.clone()).serialize(serializer),
            Event::SortieCancelled(v) => WireEvent::SortieCancelled(v.clone()).serialize(serializer),
            Event::SortieFailed(v) => WireEvent::SortieFailed(v.clone()).serialize(serializer),
            Event::SpecialistSpawned(v) => WireEvent::SpecialistSpawned(v.clone()).serialize(serializer),
            Event::SpecialistRegistered(v) => WireEvent::SpecialistRegistered(v.clone()).serialize(serializer),
            Event::SpecialistHeartbeat(v) => WireEvent::SpecialistHeartbeat(v.clone()).serialize(serializer),
            Event::SpecialistWorking(v) => WireEvent::SpecialistWorking(v.clone()).serialize(serializer),
            Event::SpecialistBlocked(v) => WireEvent::SpecialistBlocked(v.clone()).serialize(serializer),
            Event::SpecialistCompleting(v) => WireEvent::SpecialistCompleting(v.clone()).serialize(serializer),
            Event::SpecialistCompleted(v) => WireEvent::SpecialistCompleted(v.clone()).serialize(serializer),
            Event::SpecialistFailed(v) => WireEvent::SpecialistFailed(v.clone()).serialize(serializer),
            Event::SpecialistWentStale(v) => WireEvent::SpecialistWentStale(v.clone()).serialize(serializer),
            Event::SpecialistDeregistered(v) => WireEvent::SpecialistDeregistered(v.clone()).serialize(serializer),
            Event::CtkReserved(v) => WireEvent::CtkReserved(v.clone()).serialize(serializer),
            Event::CtkConflict(v) => WireEvent::CtkConflict(v.clone()).serialize(serializer),
            Event::CtkReleased(v) => WireEvent::CtkReleased(v.clone()).serialize(serializer),
            Event::CtkForceReleased(v) => WireEvent::CtkForceReleased(v.clone()).serialize(serializer),
            Event::CtkExpired(v) => WireEvent::CtkExpired(v.clone()).serialize(serializer),
            Event::CtkExtended(v) => WireEvent::CtkExtended(v.clone()).serialize(serializer),
            Event::CtkReacquired(v) => WireEvent::CtkReacquired(v.clone()).serialize(serializer),
            Event::SquawkSent(v) => WireEvent::SquawkSent(v.clone()).serialize(serializer),
            Event::SquawkRead(v) => WireEvent::SquawkRead(v.clone()).serialize(serializer),
            Event::SquawkAcked(v) => WireEvent::SquawkAcked(v.clone()).serialize(serializer),
            Event::CursorAdvanced(v) => WireEvent::CursorAdvanced(v.clone()).serialize(serializer),
            Event::FleetCheckpointed(v) => WireEvent::FleetCheckpointed(v.clone()).serialize(serializer),
            Event::CheckpointCreated(v) => WireEvent::CheckpointCreated(v.clone()).serialize(serializer),
            Event::FleetRecovered(v) => WireEvent::FleetRecovered(v.clone()).serialize(serializer),
            Event::ContextCompacted(v) => WireEvent::ContextCompacted(v.clone()).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match serde_json::from_value::<WireEvent>(value.clone()) {
            Ok(wire) => Ok(wire.into()),
            Err(_) => Ok(Event::Custom(value)),
        }
    }
}

impl Event {
    /// The wire `type` tag for this event, for logging and projection
    /// dispatch keys. Mirrors the `#[serde(rename = ...)]` above.
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::MissionCreated(_) => "mission_created",
            Event::MissionStarted(_) => "mission_started",
            Event::MissionReviewOpened(_) => "mission_review_opened",
            Event::MissionCompleted(_) => "mission_completed",
            Event::MissionCancelled(_) => "mission_cancelled",
            Event::MissionStatusChanged(_) => "mission_status_changed",
            Event::SortieRestored(_) => "sortie_restored",
            Event::SortieCreated(_) => "sortie_created",
            Event::SortieAssigned(_) => "sortie_assigned",
            Event::SortieStarted(_) => "sortie_started",
            Event::SortieProgressUpdated(_) => "sortie_progress_updated",
            Event::SortieBlocked(_) => "sortie_blocked",
            Event::SortieUnblocked(_) => "sortie_unblocked",
            Event::SortieReviewOpened(_) => "sortie_review_opened",
            Event::SortieReviewApproved(_) => "sortie_review_approved",
            Event::SortieReviewRejected(_) => "sortie_review_rejected",
            Event::SortieCompleted(_) => "sortie_completed",
            Event::SortieCancelled(_) => "sortie_cancelled",
            Event::SortieFailed(_) => "sortie_failed",
            Event::SpecialistSpawned(_) => "specialist_spawned",
            Event::SpecialistRegistered(_) => "specialist_registered",
            Event::SpecialistHeartbeat(_) => "specialist_heartbeat",
            Event::SpecialistWorking(_) => "specialist_working",
            Event::SpecialistBlocked(_) => "specialist_blocked",
            Event::SpecialistCompleting(_) => "specialist_completing",
            Event::SpecialistCompleted(_) => "specialist_completed",
            Event::SpecialistFailed(_) => "specialist_failed",
            Event::SpecialistWentStale(_) => "specialist_went_stale",
            Event::SpecialistDeregistered(_) => "specialist_deregistered",
            Event::CtkReserved(_) => "ctk_reserved",
            Event::CtkConflict(_) => "ctk_conflict",
            Event::CtkReleased(_) => "ctk_released",
            Event::CtkForceReleased(_) => "ctk_force_released",
            Event::CtkExpired(_) => "ctk_expired",
            Event::CtkExtended(_) => "ctk_extended",
            Event::CtkReacquired(_) => "ctk_reacquired",
            Event::SquawkSent(_) => "squawk_sent",
            Event::SquawkRead(_) => "squawk_read",
            Event::SquawkAcked(_) => "squawk_acked",
            Event::CursorAdvanced(_) => "cursor_advanced",
            Event::FleetCheckpointed(_) => "fleet_checkpointed",
            Event::CheckpointCreated(_) => "checkpoint_created",
            Event::FleetRecovered(_) => "fleet_recovered",
            Event::ContextCompacted(_) => "context_compacted",
            Event::Custom(_) => "custom",
        }
    }

    pub fn stream_type(&self) -> &'static str {
        match self {
            Event::MissionCreated(_)
            | Event::MissionStarted(_)
            | Event::MissionReviewOpened(_)
            | Event::MissionCompleted(_)
            | Event::MissionCancelled(_)
            | Event::MissionStatusChanged(_) => "mission",
            Event::SortieRestored(_)
            | Event::SortieCreated(_)
            | Event::SortieAssigned(_)
            | Event::SortieStarted(_)
            | Event::SortieProgressUpdated(_)
            | Event::SortieBlocked(_)
            | Event::SortieUnblocked(_)
            | Event::SortieReviewOpened(_)
            | Event::SortieReviewApproved(_)
            | Event::SortieReviewRejected(_)
            | Event::SortieCompleted(_)
            | Event::SortieCancelled(_)
            | Event::SortieFailed(_) => "sortie",
            Event::SpecialistSpawned(_)
            | Event::SpecialistRegistered(_)
            | Event::SpecialistHeartbeat(_)
            | Event::SpecialistWorking(_)
            | Event::SpecialistBlocked(_)
            | Event::SpecialistCompleting(_)
            | Event::SpecialistCompleted(_)
            | Event::SpecialistFailed(_)
            | Event::SpecialistWentStale(_)
            | Event::SpecialistDeregistered(_) => "specialist",
            Event::CtkReserved(_)
            | Event::CtkConflict(_)
            | Event::CtkReleased(_)
            | Event::CtkForceReleased(_)
            | Event::CtkExpired(_)
            | Event::CtkExtended(_)
            | Event::CtkReacquired(_) => "lock",
            Event::SquawkSent(_) | Event::SquawkRead(_) | Event::SquawkAcked(_) => "mailbox",
            Event::CursorAdvanced(_) => "cursor",
            Event::FleetCheckpointed(_) | Event::CheckpointCreated(_) | Event::FleetRecovered(_) => {
                "checkpoint"
            }
            Event::ContextCompacted(_) => "compaction",
            Event::Custom(_) => "unknown",
        }
    }
}

/// The schema version new event envelopes are written with (§3 "Event").
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// The immutable, appended-once envelope around a domain [`Event`].
///
/// Sequence numbers are assigned by the Event Store at append time and are
/// strictly increasing and gap-free within a store. `correlation_id` equals
/// `event_id` for a root event, otherwise it is inherited from the event
/// named by `causation_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    pub sequence_number: u64,
    pub event_id: EventId,
    pub stream_type: String,
    pub stream_id: String,
    pub data: Event,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<EventId>,
    pub correlation_id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub occurred_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
    pub schema_version: u32,
}

impl StoredEvent {
    pub fn event_type(&self) -> &'static str {
        self.data.event_type()
    }

    /// `true` if this event is its own correlation root.
    pub fn is_root(&self) -> bool {
        self.causation_id.is_none()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
