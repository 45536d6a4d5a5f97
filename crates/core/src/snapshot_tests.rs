// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;

#[test]
fn new_snapshot_is_compatible() {
    let snap = Snapshot::new("sortie", "srt-abc", 1, 10, serde_json::json!({}), Utc::now());
    assert!(snap.is_compatible());
    assert_eq!(snap.to_sequence, 10);
}

#[test]
fn future_version_incompatible() {
    let mut snap = Snapshot::new("sortie", "srt-abc", 0, 0, serde_json::json!({}), Utc::now());
    snap.version = SNAPSHOT_SCHEMA_VERSION + 1;
    assert!(!snap.is_compatible());
}

#[test]
fn serde_round_trip() {
    let snap = Snapshot::new("mission", "msn-abc", 1, 42, serde_json::json!({"missions": []}), Utc::now());
    let json = serde_json::to_string(&snap).expect("serialize");
    let back: Snapshot = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.to_sequence, 42);
    assert_eq!(back.stream_id, "msn-abc");
}

#[test]
fn covers_is_inclusive_of_both_bounds() {
    let snap = Snapshot::new("lock", "lock-1", 5, 10, serde_json::json!({}), Utc::now());
    assert!(!snap.covers(4));
    assert!(snap.covers(5));
    assert!(snap.covers(10));
    assert!(!snap.covers(11));
}
