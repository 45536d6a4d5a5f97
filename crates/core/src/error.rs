// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! The stable error taxonomy shared by every component (§6, §7).
//!
//! Components return their own `thiserror` enums (`LockError`, `WalError`, ...);
//! each implements `Into<FleetError>` so the API surface (C8) can map any
//! failure to one of the stable `ErrorKind`s without components depending on
//! each other's error types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stable, transport-agnostic error kind (§6 "Error codes").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad input, schema mismatch.
    Validation,
    /// Referenced entity does not exist.
    NotFound,
    /// Active lock or state conflict (duplicate event id, etc).
    Conflict,
    /// State machine precondition failed (illegal transition, non-owner
    /// release, non-monotonic cursor, completion with open children).
    Precondition,
    /// The scheduler's dependency DAG is not acyclic.
    CyclicDependency,
    /// The event store is busy or unreachable; retryable.
    StoreUnavailable,
    /// Corrupted log / unrecoverable snapshot; isolates the affected stream.
    Internal,
}

impl ErrorKind {
    /// The numeric status code associated with this kind (§6).
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Precondition => 412,
            ErrorKind::CyclicDependency => 409,
            ErrorKind::StoreUnavailable => 503,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Precondition => "PRECONDITION_FAILED",
            ErrorKind::CyclicDependency => "CYCLIC_DEPENDENCY",
            ErrorKind::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorKind::Internal => "INTERNAL_ERROR",
        };
        f.write_str(s)
    }
}

/// A resource snapshot attached to `Conflict` errors, so callers can inspect
/// the conflicting state without a follow-up query (§7 "Propagation policy").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictDetail {
    pub resource: String,
    pub value: serde_json::Value,
}

/// The stable, user-visible error carried by every fallible operation.
///
/// Carries a correlation id for log lookup (§7 "User-visible failure
/// behaviour") when the failure originated from an event-producing
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FleetError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictDetail>,
}

impl FleetError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), correlation_id: None, conflict: None }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition, message)
    }

    pub fn conflict(message: impl Into<String>, detail: ConflictDetail) -> Self {
        Self {
            kind: ErrorKind::Conflict,
            message: message.into(),
            correlation_id: None,
            conflict: Some(detail),
        }
    }

    pub fn cyclic_dependency(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CyclicDependency, message)
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
