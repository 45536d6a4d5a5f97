// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;
use ft_core::event::{
    Event, SpecialistCompleted, SpecialistDeregistered, SpecialistFailed, SpecialistHeartbeat,
    SpecialistRegistered, SpecialistWentStale, SpecialistWorking,
};
use ft_core::test_support::{specialist_spawned_event, stored_event};
use ft_core::{SortieId, SpecialistId, SpecialistStatus};

#[test]
fn spawned_then_registered() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &specialist_spawned_event(specialist_id, "alice"));
    assert_eq!(state.specialists[&specialist_id].status, SpecialistStatus::Spawned);

    apply(
        &mut state,
        &stored_event(
            "specialist",
            specialist_id.as_str(),
            Event::SpecialistRegistered(SpecialistRegistered { specialist_id }),
        ),
    );
    assert_eq!(state.specialists[&specialist_id].status, SpecialistStatus::Registered);
}

#[test]
fn heartbeat_clears_staleness() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &specialist_spawned_event(specialist_id, "alice"));
    state.specialists.get_mut(&specialist_id).unwrap().status = SpecialistStatus::Stale;

    apply(
        &mut state,
        &stored_event(
            "specialist",
            specialist_id.as_str(),
            Event::SpecialistHeartbeat(SpecialistHeartbeat { specialist_id }),
        ),
    );
    assert_eq!(state.specialists[&specialist_id].status, SpecialistStatus::Registered);
}

#[test]
fn working_sets_current_sortie() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    let sortie_id = SortieId::new();
    apply(&mut state, &specialist_spawned_event(specialist_id, "alice"));
    apply(
        &mut state,
        &stored_event(
            "specialist",
            specialist_id.as_str(),
            Event::SpecialistWorking(SpecialistWorking { specialist_id, sortie_id }),
        ),
    );
    assert_eq!(state.specialists[&specialist_id].status, SpecialistStatus::Working);
    assert_eq!(state.specialists[&specialist_id].current_sortie, Some(sortie_id));
}

#[test]
fn terminal_status_is_sticky() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &specialist_spawned_event(specialist_id, "alice"));
    apply(
        &mut state,
        &stored_event(
            "specialist",
            specialist_id.as_str(),
            Event::SpecialistCompleted(SpecialistCompleted { specialist_id }),
        ),
    );
    apply(
        &mut state,
        &stored_event(
            "specialist",
            specialist_id.as_str(),
            Event::SpecialistFailed(SpecialistFailed { specialist_id, reason: "too late".into() }),
        ),
    );
    assert_eq!(state.specialists[&specialist_id].status, SpecialistStatus::Completed);
}

#[test]
fn went_stale_marks_status() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &specialist_spawned_event(specialist_id, "alice"));
    apply(
        &mut state,
        &stored_event(
            "specialist",
            specialist_id.as_str(),
            Event::SpecialistWentStale(SpecialistWentStale { specialist_id }),
        ),
    );
    assert_eq!(state.specialists[&specialist_id].status, SpecialistStatus::Stale);
}

#[test]
fn deregistered_removes_row() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &specialist_spawned_event(specialist_id, "alice"));
    apply(
        &mut state,
        &stored_event(
            "specialist",
            specialist_id.as_str(),
            Event::SpecialistDeregistered(SpecialistDeregistered { specialist_id, reason: None }),
        ),
    );
    assert!(!state.specialists.contains_key(&specialist_id));
}
