// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Aggregated observability types for the `Coordinator` and `Health`
//! surfaces (§6).

use ft_storage::StoreHealth;
use serde::{Deserialize, Serialize};

/// Aggregated projection counters (§6 "Coordinator: status (aggregated
/// projections)").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorStatus {
    pub missions_total: usize,
    pub missions_active: usize,
    pub sorties_total: usize,
    pub sorties_in_progress: usize,
    pub sorties_blocked: usize,
    pub specialists_total: usize,
    pub specialists_working: usize,
    pub locks_active: usize,
    pub messages_pending: usize,
    pub last_sequence: u64,
}

/// Store reachability and WAL backlog (§6 "Health: status"), wrapping
/// [`StoreHealth`] with the naming the external surface uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub reachable: bool,
    pub wal_mode: String,
    pub write_sequence: u64,
    pub processed_sequence: u64,
    pub pending_appends: u64,
}

impl From<StoreHealth> for HealthStatus {
    fn from(h: StoreHealth) -> Self {
        Self {
            reachable: h.reachable,
            wal_mode: h.wal_mode,
            write_sequence: h.write_sequence,
            processed_sequence: h.processed_sequence,
            pending_appends: h.pending_appends,
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
