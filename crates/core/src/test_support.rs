// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Test-only event fixtures shared by this crate's own tests and by the
//! other workspace crates' test suites (gated behind the `test-support`
//! feature so production builds never link it in).

use crate::checkpoint::CheckpointTrigger;
use crate::event::*;
use crate::lock::LockPurpose;
use crate::priority::Priority;
use crate::sortie::BlockerCategory;
use chrono::Utc;

/// Wrap `data` in a root [`StoredEvent`] envelope (no causation, fresh
/// correlation id, `occurred_at`/`recorded_at` set to now). Tests that need
/// specific sequence numbers or causation chains adjust the returned value.
pub fn stored_event(stream_type: &str, stream_id: &str, data: Event) -> StoredEvent {
    let event_id = EventId::new();
    let now = Utc::now();
    StoredEvent {
        sequence_number: 0,
        event_id,
        stream_type: stream_type.to_string(),
        stream_id: stream_id.to_string(),
        data,
        causation_id: None,
        correlation_id: event_id,
        metadata: None,
        occurred_at: now,
        recorded_at: now,
        schema_version: EVENT_SCHEMA_VERSION,
    }
}

/// A `StoredEvent` caused by `cause`, inheriting its correlation id.
pub fn caused_event(stream_type: &str, stream_id: &str, data: Event, cause: &StoredEvent) -> StoredEvent {
    let mut event = stored_event(stream_type, stream_id, data);
    event.causation_id = Some(cause.event_id);
    event.correlation_id = cause.correlation_id;
    event
}

pub fn mission_created_event(mission_id: crate::MissionId, title: &str) -> StoredEvent {
    stored_event(
        "mission",
        mission_id.as_str(),
        Event::MissionCreated(MissionCreated {
            mission_id,
            title: title.to_string(),
            description: None,
            priority: Priority::Normal,
            strategy: None,
        }),
    )
}

pub fn sortie_created_event(
    sortie_id: crate::SortieId,
    mission_id: Option<crate::MissionId>,
    title: &str,
) -> StoredEvent {
    stored_event(
        "sortie",
        sortie_id.as_str(),
        Event::SortieCreated(SortieCreated {
            sortie_id,
            mission_id,
            title: title.to_string(),
            priority: Priority::Normal,
            dependencies: Vec::new(),
            files: Vec::new(),
        }),
    )
}

pub fn sortie_completed_event(sortie_id: crate::SortieId, summary: &str) -> StoredEvent {
    stored_event(
        "sortie",
        sortie_id.as_str(),
        Event::SortieCompleted(SortieCompleted {
            sortie_id,
            summary: summary.to_string(),
            files: Vec::new(),
            tests_passed: true,
        }),
    )
}

pub fn specialist_spawned_event(specialist_id: crate::SpecialistId, name: &str) -> StoredEvent {
    stored_event(
        "specialist",
        specialist_id.as_str(),
        Event::SpecialistSpawned(SpecialistSpawned {
            specialist_id,
            name: name.to_string(),
            capabilities: Vec::new(),
        }),
    )
}

pub fn ctk_reserved_event(
    lock_id: &str,
    normalized_path: &str,
    reserved_by: crate::SpecialistId,
) -> StoredEvent {
    stored_event(
        "lock",
        lock_id,
        Event::CtkReserved(CtkReserved {
            lock_id: lock_id.to_string(),
            normalized_path: normalized_path.to_string(),
            reserved_by,
            purpose: LockPurpose::Edit,
            expires_at: Utc::now() + chrono::Duration::minutes(10),
            checksum: None,
        }),
    )
}

pub fn squawk_sent_event(message_id: &str, mailbox_id: &str, message_type: &str) -> StoredEvent {
    stored_event(
        "mailbox",
        mailbox_id,
        Event::SquawkSent(SquawkSent {
            message_id: message_id.to_string(),
            mailbox_id: mailbox_id.to_string(),
            sender_id: None,
            thread_id: None,
            message_type: message_type.to_string(),
            content: serde_json::Value::Null,
            priority: Priority::Normal,
        }),
    )
}

pub fn fleet_checkpointed_event(checkpoint_id: &str, mission_id: crate::MissionId) -> StoredEvent {
    stored_event(
        "checkpoint",
        checkpoint_id,
        Event::FleetCheckpointed(FleetCheckpointed {
            checkpoint_id: checkpoint_id.to_string(),
            mission_id,
            trigger: CheckpointTrigger::Manual,
            progress_percent: 0,
        }),
    )
}

pub fn sortie_blocked_event(sortie_id: crate::SortieId, reason: &str) -> StoredEvent {
    stored_event(
        "sortie",
        sortie_id.as_str(),
        Event::SortieBlocked(SortieBlocked {
            sortie_id,
            category: BlockerCategory::Dependency,
            reason: reason.to_string(),
        }),
    )
}
