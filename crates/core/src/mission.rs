// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Mission: a unit of work decomposed into sorties (§3 "Mission").

use crate::priority::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for a [`Mission`].
    pub struct MissionId("msn-");
}

/// Lifecycle status of a mission (§4.5 "Mission lifecycle").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Pending,
    InProgress,
    Review,
    Completed,
    Cancelled,
}

crate::simple_display! {
    MissionStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Review => "review",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl MissionStatus {
    /// Terminal statuses never transition further.
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Cancelled)
    }
}

/// A mission: the top-level unit of work a fleet works toward completing.
///
/// `strategy` is opaque, caller-supplied decomposition metadata (e.g. the name
/// of a planning strategy used to split the mission into sorties). The
/// scheduler (C6) never inspects it; it is persisted purely for operator and
/// client visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: MissionStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub total_sorties: u32,
    #[serde(default)]
    pub completed_sorties: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: MissionId::new(),
            title: title.into(),
            description: None,
            status: MissionStatus::Pending,
            priority: Priority::default(),
            total_sorties: 0,
            completed_sorties: 0,
            strategy: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fraction of sorties completed, in `0..=100`. Zero sorties reports `0`.
    pub fn progress_percent(&self) -> u8 {
        if self.total_sorties == 0 {
            return 0;
        }
        ((self.completed_sorties as u64 * 100) / self.total_sorties as u64) as u8
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

crate::builder! {
    pub struct MissionBuilder => Mission {
        into { title: String = "test mission" }
        set { status: MissionStatus = MissionStatus::Pending }
        set { priority: Priority = Priority::Normal }
        set { total_sorties: u32 = 0 }
        set { completed_sorties: u32 = 0 }
        option { description: String = None }
        option { strategy: String = None }
        computed { id: MissionId = MissionId::new() }
        computed { created_at: DateTime<Utc> = Utc::now() }
        computed { updated_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "mission_tests.rs"]
mod tests;
