// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Response payloads returned by `Core` (§6 "Responses include
//! `{data, error?, timestamp}`"). `Response` carries the data half; the
//! envelope and error shape live alongside it in this module.

use chrono::{DateTime, Utc};
use ft_core::event::StoredEvent;
use ft_core::{
    Checkpoint, CheckpointId, ConflictDetail, Cursor, ErrorKind, FleetError, Lock, LockId, Message, Mission,
    MissionId, Sortie, Specialist, SpecialistId,
};
use serde::{Deserialize, Serialize};

use crate::status::{CoordinatorStatus, HealthStatus};

/// Outcome of [`crate::request::Request::AcquireLock`]: either the lock was
/// granted, or the caller learns who already holds the path (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum LockAcquireResult {
    Acquired { lock: Lock },
    Conflict { existing_lock_id: LockId, existing_reserved_by: SpecialistId },
}

/// Per-snapshot outcome of [`crate::request::Request::ReacquireLocks`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum ReacquireEntry {
    Acquired { new_lock_id: LockId, original_lock_id: String },
    Conflict { original_lock_id: String },
    Expired { original_lock_id: String },
}

/// A mission's derived counters (§6 "Mission: ... get_stats").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionStats {
    pub mission_id: MissionId,
    pub total_sorties: u32,
    pub completed_sorties: u32,
    pub progress_percent: u8,
}

/// One sortie a [`crate::request::Request::Tick`] spawned a specialist for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnedEntry {
    pub sortie_id: String,
    pub specialist_id: SpecialistId,
}

/// Flattened, serializable mirror of `ft_engine::checkpoint::RecoveryOutcome`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    pub checkpoint: Checkpoint,
    pub sorties_restored: u32,
    pub locks_reacquired: u32,
    pub locks_expired: u32,
    pub locks_conflicted: u32,
    pub messages_requeued: u32,
    pub already_recovered: bool,
}

/// Data payload of a successful `Core` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success with no further data (e.g. `unblock_sortie`).
    Ok,

    Mission { mission: Mission },
    Missions { missions: Vec<Mission> },
    MissionStats { stats: MissionStats },

    Sortie { sortie: Sortie },
    Sorties { sorties: Vec<Sortie> },
    /// One scheduler tick's spawn decisions (§4.6).
    Spawned { spawned: Vec<SpawnedEntry> },

    Specialist { specialist: Specialist },
    Specialists { specialists: Vec<Specialist> },

    LockAcquire { result: LockAcquireResult },
    Lock { lock: Lock },
    Locks { locks: Vec<Lock> },
    LocksReacquired { results: Vec<ReacquireEntry> },

    Message { message: Message },
    Messages { messages: Vec<Message> },
    Thread { thread_id: String },
    Cursor { cursor: Cursor },

    Checkpoint { checkpoint: Checkpoint },
    Checkpoints { checkpoints: Vec<Checkpoint> },
    CheckpointDeleted { checkpoint_id: CheckpointId },
    CheckpointsPruned { removed: u32 },
    Recovery { outcome: RecoveryOutcome },

    Event { event: StoredEvent },
    Events { events: Vec<StoredEvent> },

    CoordinatorStatus { status: CoordinatorStatus },
    Health { health: HealthStatus },
}

/// Transport-agnostic error shape (§6 "Error codes").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictDetail>,
}

impl From<FleetError> for ErrorBody {
    fn from(err: FleetError) -> Self {
        Self {
            code: err.kind.to_string(),
            status: err.kind.status_code(),
            message: err.message,
            correlation_id: err.correlation_id,
            conflict: err.conflict,
        }
    }
}

impl ErrorBody {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self.code.as_str() {
            "VALIDATION_ERROR" => Some(ErrorKind::Validation),
            "NOT_FOUND" => Some(ErrorKind::NotFound),
            "CONFLICT" => Some(ErrorKind::Conflict),
            "PRECONDITION_FAILED" => Some(ErrorKind::Precondition),
            "CYCLIC_DEPENDENCY" => Some(ErrorKind::CyclicDependency),
            "STORE_UNAVAILABLE" => Some(ErrorKind::StoreUnavailable),
            "INTERNAL_ERROR" => Some(ErrorKind::Internal),
            _ => None,
        }
    }
}

/// `{data, error?, timestamp}` (§6), the one shape every `Core` call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub timestamp: DateTime<Utc>,
}

impl Envelope {
    pub fn ok(data: Response, timestamp: DateTime<Utc>) -> Self {
        Self { data: Some(data), error: None, timestamp }
    }

    pub fn err(error: impl Into<ErrorBody>, timestamp: DateTime<Utc>) -> Self {
        Self { data: None, error: Some(error.into()), timestamp }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
