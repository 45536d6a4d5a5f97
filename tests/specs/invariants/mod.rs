// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

mod lock_and_cursor;
mod mailbox_ordering;
mod review_gating;
mod sequence_and_causation;
