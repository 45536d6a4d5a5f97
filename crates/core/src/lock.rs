// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Lock: exclusive reservation of a file path for conflict prevention
//! (§3 "Lock", §4.2 "Lock Manager").

use crate::specialist::SpecialistId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for a [`Lock`].
    pub struct LockId("lock-");
}

/// Why a file was reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPurpose {
    Edit,
    Read,
    Delete,
}

crate::simple_display! {
    LockPurpose {
        Edit => "edit",
        Read => "read",
        Delete => "delete",
    }
}

/// Current state of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    Active,
    Released,
    Expired,
    ForceReleased,
}

crate::simple_display! {
    LockStatus {
        Active => "active",
        Released => "released",
        Expired => "expired",
        ForceReleased => "force_released",
    }
}

impl LockStatus {
    pub fn is_active(self) -> bool {
        self == LockStatus::Active
    }
}

/// A reservation of exclusive access to a single file path.
///
/// `normalized_path` is the canonical key locks are indexed and compared by
/// (§4.2 "Path normalization"); `file` preserves the caller-supplied spelling
/// for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lock {
    pub id: LockId,
    pub file: String,
    pub normalized_path: String,
    pub reserved_by: SpecialistId,
    pub reserved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
    pub purpose: LockPurpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub status: LockStatus,
}

impl Lock {
    pub fn new(
        file: impl Into<String>,
        normalized_path: impl Into<String>,
        reserved_by: SpecialistId,
        purpose: LockPurpose,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            id: LockId::new(),
            file: file.into(),
            normalized_path: normalized_path.into(),
            reserved_by,
            reserved_at: now,
            expires_at: now + ttl,
            released_at: None,
            purpose,
            checksum: None,
            status: LockStatus::Active,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active() && now >= self.expires_at
    }

    pub fn is_owned_by(&self, specialist: &SpecialistId) -> bool {
        &self.reserved_by == specialist
    }
}

/// Canonicalize a file path for lock comparison: forward slashes, no leading
/// `./`, no trailing slash. This is the sole key locks are compared by so
/// `./src/main.rs` and `src/main.rs` collide correctly (§4.2 "Path
/// normalization").
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let trimmed = replaced.trim_start_matches("./").trim_end_matches('/');
    trimmed.to_string()
}

crate::builder! {
    pub struct LockBuilder => Lock {
        into { file: String = "src/main.rs" }
        into { normalized_path: String = "src/main.rs" }
        set { status: LockStatus = LockStatus::Active }
        set { purpose: LockPurpose = LockPurpose::Edit }
        option { checksum: String = None }
        computed { id: LockId = LockId::new() }
        computed { reserved_by: SpecialistId = SpecialistId::new() }
        computed { reserved_at: DateTime<Utc> = Utc::now() }
        computed { expires_at: DateTime<Utc> = Utc::now() + chrono::Duration::minutes(10) }
        computed { released_at: Option<DateTime<Utc>> = None }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
