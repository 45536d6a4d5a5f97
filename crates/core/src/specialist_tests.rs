// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;

#[test]
fn new_specialist_starts_spawned() {
    let spec = Specialist::new("coder-1", Utc::now());
    assert_eq!(spec.status, SpecialistStatus::Spawned);
    assert!(spec.current_sortie.is_none());
}

#[test]
fn stale_detection_respects_threshold() {
    let now = Utc::now();
    let spec = SpecialistBuilder::default()
        .status(SpecialistStatus::Registered)
        .build();
    assert!(!spec.is_stale(now, Duration::from_secs(30)));
    let later = now + chrono::Duration::seconds(120);
    assert!(spec.is_stale(later, Duration::from_secs(30)));
}

#[test]
fn terminal_specialists_are_never_stale() {
    let spec = SpecialistBuilder::default().status(SpecialistStatus::Completed).build();
    let far_future = Utc::now() + chrono::Duration::days(1);
    assert!(!spec.is_stale(far_future, Duration::from_secs(30)));
}

#[test]
fn stale_specialists_stay_stale_not_re_flagged() {
    let spec = SpecialistBuilder::default().status(SpecialistStatus::Stale).build();
    let far_future = Utc::now() + chrono::Duration::days(1);
    assert!(!spec.is_stale(far_future, Duration::from_secs(30)));
}

#[test]
fn capability_lookup() {
    let spec = SpecialistBuilder::default().capabilities(vec!["rust".into(), "python".into()]).build();
    assert!(spec.has_capability("rust"));
    assert!(!spec.has_capability("go"));
}

#[test]
fn available_only_when_registered() {
    assert!(SpecialistStatus::Registered.is_available());
    assert!(!SpecialistStatus::Working.is_available());
}
