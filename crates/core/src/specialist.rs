// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Specialist: a worker that executes sorties (§3 "Specialist").

use crate::sortie::SortieId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

crate::define_id! {
    /// Opaque identifier for a [`Specialist`].
    pub struct SpecialistId("spc-");
}

/// Lifecycle status of a specialist (§4.5 "Specialist lifecycle").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistStatus {
    Spawned,
    Registered,
    Working,
    Blocked,
    Completing,
    Completed,
    Failed,
    Stale,
}

crate::simple_display! {
    SpecialistStatus {
        Spawned => "spawned",
        Registered => "registered",
        Working => "working",
        Blocked => "blocked",
        Completing => "completing",
        Completed => "completed",
        Failed => "failed",
        Stale => "stale",
    }
}

impl SpecialistStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SpecialistStatus::Completed | SpecialistStatus::Failed)
    }

    pub fn is_available(self) -> bool {
        matches!(self, SpecialistStatus::Registered)
    }
}

/// A specialist: an executor of sorties, identified by capability set and
/// heartbeat liveness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialist {
    pub id: SpecialistId,
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub status: SpecialistStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_sortie: Option<SortieId>,
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl Specialist {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: SpecialistId::new(),
            name: name.into(),
            capabilities: Vec::new(),
            status: SpecialistStatus::Spawned,
            current_sortie: None,
            last_seen: now,
            metadata: HashMap::new(),
            created_at: now,
        }
    }

    /// `true` once `now - last_seen` exceeds `threshold` (§4.4 "Specialist
    /// liveness"). Terminal specialists are never considered stale.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        if self.status.is_terminal() || self.status == SpecialistStatus::Stale {
            return false;
        }
        let elapsed = now.signed_duration_since(self.last_seen);
        elapsed.to_std().map(|d| d >= threshold).unwrap_or(true)
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

crate::builder! {
    pub struct SpecialistBuilder => Specialist {
        into { name: String = "test specialist" }
        set { status: SpecialistStatus = SpecialistStatus::Spawned }
        set { capabilities: Vec<String> = Vec::new() }
        set { metadata: HashMap<String, String> = HashMap::new() }
        option { current_sortie: SortieId = None }
        computed { id: SpecialistId = SpecialistId::new() }
        computed { last_seen: DateTime<Utc> = Utc::now() }
        computed { created_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "specialist_tests.rs"]
mod tests;
