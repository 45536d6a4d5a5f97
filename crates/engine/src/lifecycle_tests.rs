// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;
use ft_core::{FakeClock, MissionStatus, Priority, SortieResult, SortieStatus, SpecialistId};
use ft_storage::EventStore;
use tempfile::tempdir;

fn lifecycle(dir: &tempfile::TempDir) -> Lifecycle<FakeClock> {
    let clock = FakeClock::new();
    let store = Arc::new(EventStore::open(dir.path().join("wal.jsonl"), None, clock).unwrap());
    Lifecycle::new(store)
}

fn passing_result() -> SortieResult {
    SortieResult { summary: "done".into(), files: vec!["src/a.rs".into()], tests_passed: true }
}

#[test]
fn create_mission_and_sortie() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let mission = lc.create_mission("m1", Some("desc".into()), Priority::High, None).unwrap();
    assert_eq!(mission.status, MissionStatus::Pending);
    assert_eq!(mission.description.as_deref(), Some("desc"));

    let sortie = lc.create_sortie(Some(mission.id), "s1", Priority::Normal, vec![], vec![]).unwrap();
    assert_eq!(sortie.status, SortieStatus::Pending);
    assert_eq!(lc.get_mission(mission.id.as_str()).unwrap().total_sorties, 1);
}

#[test]
fn start_sortie_starts_mission() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let mission = lc.create_mission("m1", None, Priority::Normal, None).unwrap();
    let sortie = lc.create_sortie(Some(mission.id), "s1", Priority::Normal, vec![], vec![]).unwrap();
    let specialist = SpecialistId::new();
    lc.assign_sortie(sortie.id.as_str(), specialist).unwrap();

    let started = lc.start_sortie(sortie.id.as_str(), specialist).unwrap();
    assert_eq!(started.status, SortieStatus::InProgress);
    assert_eq!(lc.get_mission(mission.id.as_str()).unwrap().status, MissionStatus::InProgress);
}

#[test]
fn start_by_non_owner_is_rejected() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let sortie = lc.create_sortie(None, "s1", Priority::Normal, vec![], vec![]).unwrap();
    let owner = SpecialistId::new();
    let impostor = SpecialistId::new();
    lc.assign_sortie(sortie.id.as_str(), owner).unwrap();

    let result = lc.start_sortie(sortie.id.as_str(), impostor);
    assert!(matches!(result, Err(LifecycleError::NotAssigned { .. })));
}

#[test]
fn progress_regression_is_rejected() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let sortie = lc.create_sortie(None, "s1", Priority::Normal, vec![], vec![]).unwrap();
    let specialist = SpecialistId::new();
    lc.assign_sortie(sortie.id.as_str(), specialist).unwrap();
    lc.start_sortie(sortie.id.as_str(), specialist).unwrap();
    lc.update_progress(sortie.id.as_str(), specialist, 50, None).unwrap();

    let result = lc.update_progress(sortie.id.as_str(), specialist, 10, None);
    assert!(matches!(result, Err(LifecycleError::ProgressRegression { current: 50, requested: 10 })));
}

#[test]
fn complete_without_tests_passed_is_rejected() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let sortie = lc.create_sortie(None, "s1", Priority::Normal, vec![], vec![]).unwrap();
    let specialist = SpecialistId::new();
    lc.assign_sortie(sortie.id.as_str(), specialist).unwrap();
    lc.start_sortie(sortie.id.as_str(), specialist).unwrap();

    let failing = SortieResult { summary: "partial".into(), files: vec![], tests_passed: false };
    let result = lc.report_complete(sortie.id.as_str(), specialist, failing);
    assert!(result.is_err());
}

#[test]
fn approve_review_completes_sortie_and_mission() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let mission = lc.create_mission("m1", None, Priority::Normal, None).unwrap();
    let sortie = lc.create_sortie(Some(mission.id), "s1", Priority::Normal, vec![], vec![]).unwrap();
    let specialist = SpecialistId::new();
    lc.assign_sortie(sortie.id.as_str(), specialist).unwrap();
    lc.start_sortie(sortie.id.as_str(), specialist).unwrap();

    let reviewed = lc.report_complete(sortie.id.as_str(), specialist, passing_result()).unwrap();
    assert_eq!(reviewed.status, SortieStatus::Review);

    let completed = lc.approve_review(sortie.id.as_str(), None).unwrap();
    assert_eq!(completed.status, SortieStatus::Completed);
    assert_eq!(completed.result.unwrap().summary, "done");
    assert_eq!(lc.get_mission(mission.id.as_str()).unwrap().status, MissionStatus::Completed);
}

#[test]
fn reject_review_returns_to_in_progress_and_resets_progress() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let sortie = lc.create_sortie(None, "s1", Priority::Normal, vec![], vec![]).unwrap();
    let specialist = SpecialistId::new();
    lc.assign_sortie(sortie.id.as_str(), specialist).unwrap();
    lc.start_sortie(sortie.id.as_str(), specialist).unwrap();
    lc.update_progress(sortie.id.as_str(), specialist, 90, None).unwrap();
    lc.report_complete(sortie.id.as_str(), specialist, passing_result()).unwrap();

    let rejected = lc.reject_review(sortie.id.as_str(), "missing coverage", None).unwrap();
    assert_eq!(rejected.status, SortieStatus::InProgress);
    assert_eq!(rejected.progress, 0);
}

#[test]
fn block_and_unblock_round_trip() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let sortie = lc.create_sortie(None, "s1", Priority::Normal, vec![], vec![]).unwrap();
    let specialist = SpecialistId::new();
    lc.assign_sortie(sortie.id.as_str(), specialist).unwrap();
    lc.start_sortie(sortie.id.as_str(), specialist).unwrap();

    let blocked = lc.block_sortie(sortie.id.as_str(), ft_core::BlockerCategory::Dependency, "waiting").unwrap();
    assert_eq!(blocked.status, SortieStatus::Blocked);

    let unblocked = lc.unblock_sortie(sortie.id.as_str()).unwrap();
    assert_eq!(unblocked.status, SortieStatus::InProgress);
}

#[test]
fn cancel_mission_requires_non_terminal() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let mission = lc.create_mission("m1", None, Priority::Normal, None).unwrap();
    lc.cancel_mission(mission.id.as_str(), Some("scope change".into())).unwrap();

    let result = lc.cancel_mission(mission.id.as_str(), None);
    assert!(result.is_err());
}

/// A mission whose sorties don't all land on `completed` parks in `review`
/// instead of auto-completing (§4.5 "Mission state machine").
#[test]
fn mission_with_a_cancelled_sortie_opens_for_review() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let mission = lc.create_mission("m1", None, Priority::Normal, None).unwrap();
    let done = lc.create_sortie(Some(mission.id), "s1", Priority::Normal, vec![], vec![]).unwrap();
    let dropped = lc.create_sortie(Some(mission.id), "s2", Priority::Normal, vec![], vec![]).unwrap();
    let specialist = SpecialistId::new();
    lc.assign_sortie(done.id.as_str(), specialist).unwrap();
    lc.start_sortie(done.id.as_str(), specialist).unwrap();
    lc.report_complete(done.id.as_str(), specialist, passing_result()).unwrap();
    lc.approve_review(done.id.as_str(), None).unwrap();
    assert_eq!(lc.get_mission(mission.id.as_str()).unwrap().status, MissionStatus::InProgress);

    lc.cancel_sortie(dropped.id.as_str(), Some("no longer needed".into())).unwrap();
    assert_eq!(lc.get_mission(mission.id.as_str()).unwrap().status, MissionStatus::Review);
}

#[test]
fn approve_mission_review_completes_the_partial_result() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let mission = lc.create_mission("m1", None, Priority::Normal, None).unwrap();
    let sortie = lc.create_sortie(Some(mission.id), "s1", Priority::Normal, vec![], vec![]).unwrap();
    lc.cancel_sortie(sortie.id.as_str(), None).unwrap();
    assert_eq!(lc.get_mission(mission.id.as_str()).unwrap().status, MissionStatus::Review);

    let approved = lc.approve_mission_review(mission.id.as_str()).unwrap();
    assert_eq!(approved.status, MissionStatus::Completed);
}

#[test]
fn reject_mission_review_cancels_the_mission() {
    let dir = tempdir().unwrap();
    let lc = lifecycle(&dir);
    let mission = lc.create_mission("m1", None, Priority::Normal, None).unwrap();
    let sortie = lc.create_sortie(Some(mission.id), "s1", Priority::Normal, vec![], vec![]).unwrap();
    lc.cancel_sortie(sortie.id.as_str(), None).unwrap();

    let rejected = lc.reject_mission_review(mission.id.as_str(), Some("scrap it".into())).unwrap();
    assert_eq!(rejected.status, MissionStatus::Cancelled);

    let result = lc.approve_mission_review(mission.id.as_str());
    assert!(result.is_err());
}
