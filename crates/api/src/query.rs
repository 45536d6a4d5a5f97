// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Read-only query types for the coordinator surface (§6). Unlike
//! [`crate::request::Request`], these never append an event.

use ft_core::{MissionId, MissionStatus, Priority, SortieId, SpecialistId, SpecialistStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Query {
    GetMission { mission_id: MissionId },
    /// `Mission.list(filter: status, priority, mission)` (§6).
    ListMissions {
        #[serde(default)]
        status: Option<MissionStatus>,
        #[serde(default)]
        priority: Option<Priority>,
    },
    GetMissionStats { mission_id: MissionId },
    ListSorties { mission_id: MissionId },
    GetSortie { sortie_id: SortieId },
    GetSpecialist { specialist_id: String },
    /// List registered specialists, optionally filtered by status and/or the
    /// sortie they currently hold.
    ListSpecialists {
        #[serde(default)]
        status: Option<SpecialistStatus>,
        #[serde(default)]
        current_sortie: Option<SortieId>,
    },
    ReadMailbox {
        mailbox_id: String,
        #[serde(default)]
        after_position: Option<u64>,
        #[serde(default)]
        limit: Option<usize>,
    },
    GetMessage { message_id: String },
    GetCursor { stream_type: String, stream_id: String, consumer_id: String },
    GetLock { lock_id: String },
    ListActiveLocks {
        #[serde(default)]
        reserved_by: Option<SpecialistId>,
        #[serde(default)]
        path_prefix: Option<String>,
    },
    GetCheckpoint { checkpoint_id: String },
    ListCheckpoints { mission_id: MissionId },
    GetLatestCheckpoint { mission_id: MissionId },
    GetEventById { event_id: String },
    GetEventsByStream { stream_type: String, stream_id: String },
    GetEventsByCorrelation { correlation_id: String },
    GetEventsAfter {
        sequence: u64,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Aggregated projection counters (§6 "Coordinator: status").
    CoordinatorStatus,
    /// Store reachability and WAL backlog (§6 "Health: status").
    Health,
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
