// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Shared priority scale for missions, sorties, and mailbox messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

crate::simple_display! {
    Priority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
