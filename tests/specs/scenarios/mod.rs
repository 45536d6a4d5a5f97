// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

mod blocker_timeout;
mod checkpoint_recovery;
mod cursor_monotonicity;
mod lock_conflict;
mod parallel_mission;
mod sequential_chain;
