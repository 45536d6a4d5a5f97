// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Cursor: a consumer's position within a stream (§3 "Cursor",
//! §4.4 "Mailbox & Cursor").

use serde::{Deserialize, Serialize};

/// A consumer's last-consumed sequence number for a given stream.
///
/// Positions are monotonically non-decreasing (§7 invariant 7); advancing
/// below the current position is rejected by the owning component rather
/// than represented here, so this type carries no fallible behaviour itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub stream_type: String,
    pub stream_id: String,
    pub consumer_id: String,
    pub position: u64,
}

impl Cursor {
    pub fn new(
        stream_type: impl Into<String>,
        stream_id: impl Into<String>,
        consumer_id: impl Into<String>,
    ) -> Self {
        Self {
            stream_type: stream_type.into(),
            stream_id: stream_id.into(),
            consumer_id: consumer_id.into(),
            position: 0,
        }
    }

    /// `true` if `position` would move the cursor backward.
    pub fn would_regress(&self, position: u64) -> bool {
        position < self.position
    }

    /// The stable key identifying this cursor's `(stream, consumer)` pair.
    pub fn key(&self) -> (String, String, String) {
        (self.stream_type.clone(), self.stream_id.clone(), self.consumer_id.clone())
    }
}

crate::builder! {
    pub struct CursorBuilder => Cursor {
        into { stream_type: String = "mailbox" }
        into { stream_id: String = "spc-test" }
        into { consumer_id: String = "spc-test" }
        set { position: u64 = 0 }
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
