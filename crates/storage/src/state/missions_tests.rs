// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;
use ft_core::event::{Event, MissionCancelled, MissionCompleted, MissionReviewOpened, MissionStarted};
use ft_core::test_support::{mission_created_event, stored_event};
use ft_core::MissionId;

#[test]
fn mission_created_inserts_row() {
    let mut state = MaterializedState::default();
    let mission_id = MissionId::new();
    apply(&mut state, &mission_created_event(mission_id, "ship the thing"));

    let mission = state.missions.get(&mission_id).unwrap();
    assert_eq!(mission.title, "ship the thing");
    assert_eq!(mission.status, ft_core::MissionStatus::Pending);
}

#[test]
fn mission_created_is_idempotent() {
    let mut state = MaterializedState::default();
    let mission_id = MissionId::new();
    let event = mission_created_event(mission_id, "ship the thing");
    apply(&mut state, &event);
    apply(&mut state, &event);
    assert_eq!(state.missions.len(), 1);
}

#[test]
fn mission_started_moves_pending_to_in_progress() {
    let mut state = MaterializedState::default();
    let mission_id = MissionId::new();
    apply(&mut state, &mission_created_event(mission_id, "t"));
    apply(
        &mut state,
        &stored_event("mission", mission_id.as_str(), Event::MissionStarted(MissionStarted { mission_id })),
    );
    assert_eq!(state.missions[&mission_id].status, ft_core::MissionStatus::InProgress);
}

#[test]
fn mission_started_is_noop_once_in_progress() {
    let mut state = MaterializedState::default();
    let mission_id = MissionId::new();
    apply(&mut state, &mission_created_event(mission_id, "t"));
    let start = stored_event("mission", mission_id.as_str(), Event::MissionStarted(MissionStarted { mission_id }));
    apply(&mut state, &start);
    apply(&mut state, &start);
    assert_eq!(state.missions[&mission_id].status, ft_core::MissionStatus::InProgress);
}

#[test]
fn mission_completed_carries_scheduler_tally() {
    let mut state = MaterializedState::default();
    let mission_id = MissionId::new();
    apply(&mut state, &mission_created_event(mission_id, "t"));
    apply(
        &mut state,
        &stored_event(
            "mission",
            mission_id.as_str(),
            Event::MissionCompleted(MissionCompleted { mission_id, total_sorties: 3, completed_sorties: 3 }),
        ),
    );
    let mission = &state.missions[&mission_id];
    assert_eq!(mission.status, ft_core::MissionStatus::Completed);
    assert_eq!(mission.total_sorties, 3);
    assert_eq!(mission.completed_sorties, 3);
}

#[test]
fn review_opened_moves_to_review_then_completes() {
    let mut state = MaterializedState::default();
    let mission_id = MissionId::new();
    apply(&mut state, &mission_created_event(mission_id, "t"));
    apply(
        &mut state,
        &stored_event(
            "mission",
            mission_id.as_str(),
            Event::MissionReviewOpened(MissionReviewOpened { mission_id }),
        ),
    );
    assert_eq!(state.missions[&mission_id].status, ft_core::MissionStatus::Review);

    apply(
        &mut state,
        &stored_event(
            "mission",
            mission_id.as_str(),
            Event::MissionCompleted(MissionCompleted { mission_id, total_sorties: 2, completed_sorties: 1 }),
        ),
    );
    assert_eq!(state.missions[&mission_id].status, ft_core::MissionStatus::Completed);
}

#[test]
fn terminal_mission_ignores_further_transitions() {
    let mut state = MaterializedState::default();
    let mission_id = MissionId::new();
    apply(&mut state, &mission_created_event(mission_id, "t"));
    apply(
        &mut state,
        &stored_event(
            "mission",
            mission_id.as_str(),
            Event::MissionCancelled(MissionCancelled { mission_id, reason: None }),
        ),
    );
    apply(
        &mut state,
        &stored_event(
            "mission",
            mission_id.as_str(),
            Event::MissionCompleted(MissionCompleted { mission_id, total_sorties: 1, completed_sorties: 1 }),
        ),
    );
    assert_eq!(state.missions[&mission_id].status, ft_core::MissionStatus::Cancelled);
}
