// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;

#[test]
fn new_cursor_starts_at_zero() {
    let cursor = Cursor::new("mailbox", "spc-1", "spc-1");
    assert_eq!(cursor.position, 0);
}

#[test]
fn regression_detection() {
    let cursor = CursorBuilder::default().position(42).build();
    assert!(cursor.would_regress(40));
    assert!(!cursor.would_regress(42));
    assert!(!cursor.would_regress(43));
}

#[test]
fn key_identifies_stream_and_consumer() {
    let a = Cursor::new("mailbox", "spc-1", "spc-1");
    let b = Cursor::new("mailbox", "spc-1", "spc-2");
    assert_ne!(a.key(), b.key());
}

#[test]
fn serde_round_trip() {
    let cursor = Cursor::new("mailbox", "spc-1", "spc-1");
    let json = serde_json::to_string(&cursor).expect("serialize");
    let back: Cursor = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, cursor);
}
