// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Sortie: a single unit of assignable work within a mission (§3 "Sortie").

use crate::mission::MissionId;
use crate::priority::Priority;
use crate::specialist::SpecialistId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for a [`Sortie`].
    pub struct SortieId("srt-");
}

/// Lifecycle status of a sortie (§4.5 "Sortie lifecycle").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortieStatus {
    Pending,
    Assigned,
    InProgress,
    Blocked,
    Review,
    Completed,
    Cancelled,
    Failed,
}

crate::simple_display! {
    SortieStatus {
        Pending => "pending",
        Assigned => "assigned",
        InProgress => "in_progress",
        Blocked => "blocked",
        Review => "review",
        Completed => "completed",
        Cancelled => "cancelled",
        Failed => "failed",
    }
}

impl SortieStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SortieStatus::Completed | SortieStatus::Cancelled | SortieStatus::Failed)
    }

    /// Whether `self -> next` is a legal transition. The scheduler (C6) is the
    /// sole caller of this; it never mutates a sortie through any other path.
    pub fn can_transition(self, next: SortieStatus) -> bool {
        use SortieStatus::*;
        if self == next {
            return false;
        }
        matches!(
            (self, next),
            (Pending, Assigned)
                | (Pending, Cancelled)
                | (Assigned, InProgress)
                | (Assigned, Cancelled)
                | (InProgress, Blocked)
                | (InProgress, Review)
                | (InProgress, Completed)
                | (InProgress, Failed)
                | (InProgress, Cancelled)
                | (Blocked, InProgress)
                | (Blocked, Cancelled)
                | (Blocked, Failed)
                | (Review, InProgress)
                | (Review, Completed)
                | (Review, Cancelled)
        )
    }
}

/// Why a sortie is currently blocked (§4.6 "Blocker categories").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerCategory {
    Dependency,
    FileConflict,
    Error,
    Clarification,
}

crate::simple_display! {
    BlockerCategory {
        Dependency => "dependency",
        FileConflict => "file_conflict",
        Error => "error",
        Clarification => "clarification",
    }
}

/// The outcome a specialist reports when finishing a sortie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortieResult {
    pub summary: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub tests_passed: bool,
}

/// A sortie: one unit of work assignable to a single specialist at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sortie {
    pub id: SortieId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<MissionId>,
    pub title: String,
    pub status: SortieStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<SpecialistId>,
    #[serde(default)]
    pub priority: Priority,
    /// Monotonically non-decreasing while the sortie is active; reset to `0`
    /// only when the sortie re-enters `pending` for a fresh episode (§4.5
    /// "Progress monotonicity").
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<SortieId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_category: Option<BlockerCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_since: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SortieResult>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Sortie {
    pub fn new(title: impl Into<String>, mission_id: Option<MissionId>, now: DateTime<Utc>) -> Self {
        Self {
            id: SortieId::new(),
            mission_id,
            title: title.into(),
            status: SortieStatus::Pending,
            assigned_to: None,
            priority: Priority::default(),
            progress: 0,
            files: Vec::new(),
            dependencies: Vec::new(),
            blocked_reason: None,
            blocked_category: None,
            blocked_since: None,
            result: None,
            created_at: now,
            started_at: None,
            completed_at: None,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_blocked(&self) -> bool {
        self.status == SortieStatus::Blocked
    }

    /// Returns `true` if setting progress to `value` would violate the
    /// non-decreasing invariant for the current episode.
    pub fn would_regress(&self, value: u8) -> bool {
        !self.is_terminal() && self.status != SortieStatus::Pending && value < self.progress
    }
}

crate::builder! {
    pub struct SortieBuilder => Sortie {
        into { title: String = "test sortie" }
        set { status: SortieStatus = SortieStatus::Pending }
        set { priority: Priority = Priority::Normal }
        set { progress: u8 = 0 }
        set { files: Vec<String> = Vec::new() }
        set { dependencies: Vec<SortieId> = Vec::new() }
        option { mission_id: MissionId = None }
        option { assigned_to: SpecialistId = None }
        option { blocked_reason: String = None }
        option { blocked_category: BlockerCategory = None }
        computed { id: SortieId = SortieId::new() }
        computed { blocked_since: Option<DateTime<Utc>> = None }
        computed { result: Option<SortieResult> = None }
        computed { created_at: DateTime<Utc> = Utc::now() }
        computed { started_at: Option<DateTime<Utc>> = None }
        computed { completed_at: Option<DateTime<Utc>> = None }
        computed { updated_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "sortie_tests.rs"]
mod tests;
