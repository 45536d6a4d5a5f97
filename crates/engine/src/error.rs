// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Per-component error enums (§7). Each converts into [`ft_core::FleetError`]
//! so `ft-api` can map any engine failure to a stable [`ft_core::ErrorKind`]
//! without depending on the engine's internal error types.

use ft_core::{ConflictDetail, ErrorKind, FleetError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("no such lock: {0}")]
    NotFound(String),
    #[error("lock {lock_id} is active, held by a different specialist")]
    NotOwner { lock_id: String },
    #[error("path conflict on {path}")]
    Conflict { path: String, existing_lock_id: String, existing_reserved_by: String },
    #[error("timeout_ms must be > 0 and <= {max_ms}")]
    InvalidTimeout { max_ms: u64 },
    #[error(transparent)]
    Store(#[from] ft_storage::EventStoreError),
}

impl From<LockError> for FleetError {
    fn from(err: LockError) -> Self {
        match &err {
            LockError::NotFound(_) => FleetError::not_found(err.to_string()),
            LockError::NotOwner { .. } => FleetError::precondition(err.to_string()),
            LockError::Conflict { path, existing_lock_id, existing_reserved_by } => {
                FleetError::conflict(
                    err.to_string(),
                    ConflictDetail {
                        resource: "lock".to_string(),
                        value: serde_json::json!({
                            "normalized_path": path,
                            "existing_lock_id": existing_lock_id,
                            "existing_reserved_by": existing_reserved_by,
                        }),
                    },
                )
            }
            LockError::InvalidTimeout { .. } => FleetError::validation(err.to_string()),
            LockError::Store(_) => FleetError::store_unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("no such message: {0}")]
    NotFound(String),
    #[error("cursor would regress: current={current} requested={requested}")]
    NonMonotonicCursor { current: u64, requested: u64 },
    #[error(transparent)]
    Store(#[from] ft_storage::EventStoreError),
}

impl From<MailboxError> for FleetError {
    fn from(err: MailboxError) -> Self {
        match &err {
            MailboxError::NotFound(_) => FleetError::not_found(err.to_string()),
            MailboxError::NonMonotonicCursor { .. } => FleetError::precondition(err.to_string()),
            MailboxError::Store(_) => FleetError::store_unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("no such mission: {0}")]
    MissionNotFound(String),
    #[error("no such sortie: {0}")]
    SortieNotFound(String),
    #[error("illegal transition {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("specialist {specialist_id} is not assigned to sortie {sortie_id}")]
    NotAssigned { sortie_id: String, specialist_id: String },
    #[error("progress must be non-decreasing within an episode: current={current} requested={requested}")]
    ProgressRegression { current: u8, requested: u8 },
    #[error("progress must be in 0..=100, got {0}")]
    InvalidProgress(u8),
    #[error("mission {0} has open sorties")]
    OpenSorties(String),
    #[error(transparent)]
    Store(#[from] ft_storage::EventStoreError),
}

impl From<LifecycleError> for FleetError {
    fn from(err: LifecycleError) -> Self {
        match &err {
            LifecycleError::MissionNotFound(_) | LifecycleError::SortieNotFound(_) => {
                FleetError::not_found(err.to_string())
            }
            LifecycleError::InvalidTransition { .. }
            | LifecycleError::NotAssigned { .. }
            | LifecycleError::ProgressRegression { .. }
            | LifecycleError::OpenSorties(_) => FleetError::precondition(err.to_string()),
            LifecycleError::InvalidProgress(_) => FleetError::validation(err.to_string()),
            LifecycleError::Store(_) => FleetError::store_unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("dependency graph for mission {0} is not acyclic")]
    CyclicDependency(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Mailbox(#[from] MailboxError),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error(transparent)]
    Store(#[from] ft_storage::EventStoreError),
}

impl From<SchedulerError> for FleetError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::CyclicDependency(msg) => {
                FleetError::cyclic_dependency(format!("dependency graph for mission {msg} is not acyclic"))
            }
            SchedulerError::Lifecycle(inner) => FleetError::from(inner),
            SchedulerError::Mailbox(inner) => FleetError::from(inner),
            SchedulerError::Lock(inner) => FleetError::from(inner),
            SchedulerError::Store(inner) => FleetError::store_unavailable(inner.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("no such checkpoint: {0}")]
    NotFound(String),
    #[error("no such mission: {0}")]
    MissionNotFound(String),
    #[error("checkpoint exceeds max_checkpoint_bytes: {size} > {max}")]
    TooLarge { size: u64, max: u64 },
    #[error("checkpoint schema version {found} is newer than supported {supported}")]
    IncompatibleSchema { found: u32, supported: u32 },
    #[error("checkpoint io failure: {0}")]
    Io(String),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error(transparent)]
    Mailbox(#[from] MailboxError),
    #[error(transparent)]
    Store(#[from] ft_storage::EventStoreError),
}

impl From<CheckpointError> for FleetError {
    fn from(err: CheckpointError) -> Self {
        match &err {
            CheckpointError::NotFound(_) | CheckpointError::MissionNotFound(_) => {
                FleetError::not_found(err.to_string())
            }
            CheckpointError::TooLarge { .. } | CheckpointError::IncompatibleSchema { .. } => {
                FleetError::validation(err.to_string())
            }
            CheckpointError::Io(_) => FleetError::internal(err.to_string()),
            CheckpointError::Lock(_) => FleetError::internal(err.to_string()),
            CheckpointError::Mailbox(_) => FleetError::internal(err.to_string()),
            CheckpointError::Store(_) => FleetError::store_unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompactionError {
    #[error("stream {stream_type}/{stream_id} has no events to compact")]
    EmptyStream { stream_type: String, stream_id: String },
    #[error("compaction io failure: {0}")]
    Io(String),
    #[error(transparent)]
    Store(#[from] ft_storage::EventStoreError),
}

impl From<CompactionError> for FleetError {
    fn from(err: CompactionError) -> Self {
        match &err {
            CompactionError::EmptyStream { .. } => FleetError::precondition(err.to_string()),
            CompactionError::Io(_) => FleetError::internal(err.to_string()),
            CompactionError::Store(_) => FleetError::store_unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("no such specialist: {0}")]
    NotFound(String),
    #[error("specialist {specialist_id} is not assigned to sortie {sortie_id}")]
    NotAssigned { sortie_id: String, specialist_id: String },
    #[error(transparent)]
    Store(#[from] ft_storage::EventStoreError),
}

impl From<PresenceError> for FleetError {
    fn from(err: PresenceError) -> Self {
        match &err {
            PresenceError::NotFound(_) => FleetError::not_found(err.to_string()),
            PresenceError::NotAssigned { .. } => FleetError::precondition(err.to_string()),
            PresenceError::Store(_) => FleetError::store_unavailable(err.to_string()),
        }
    }
}
