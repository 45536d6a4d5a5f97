// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Universal invariants 2 and 3 (spec.md §8): sequence numbers are strictly
//! increasing with no gaps, and every `causation_id` resolves to an earlier
//! event in the log.

use crate::prelude::Fixture;
use ft_api::Query;
use ft_api::Response;

#[test]
fn sequence_numbers_are_strictly_increasing_with_no_gaps() {
    let fx = Fixture::new();
    let mission_id = fx.create_mission("m");
    fx.create_sortie(mission_id, "a", vec![], vec![]);
    fx.create_sortie(mission_id, "b", vec![], vec![]);
    fx.tick(mission_id);

    let events = match fx.core.query(Query::GetEventsAfter { sequence: 0, limit: None }).data {
        Some(Response::Events { events }) => events,
        other => panic!("expected Events, got {other:?}"),
    };
    assert!(events.len() >= 6, "mission + 2 sorties + spawn/register for each ready sortie");
    for pair in events.windows(2) {
        assert_eq!(
            pair[1].sequence_number,
            pair[0].sequence_number + 1,
            "sequence must increase by exactly one with no gaps"
        );
    }
}

#[test]
fn causation_id_always_refers_to_an_earlier_event() {
    let fx = Fixture::new();
    let mission_id = fx.create_mission("m");
    let sortie_id = fx.create_sortie(mission_id, "a", vec![], vec![]);
    fx.tick(mission_id);
    fx.advance(10);

    let checkpoint_id = match fx
        .core
        .call(ft_api::Request::CreateCheckpoint {
            mission_id,
            trigger: ft_core::CheckpointTrigger::Manual,
            created_by: "operator".into(),
        })
        .data
    {
        Some(Response::Checkpoint { checkpoint }) => checkpoint.id.to_string(),
        other => panic!("expected Checkpoint, got {other:?}"),
    };

    let events = match fx
        .core
        .query(Query::GetEventsByStream { stream_type: "checkpoint".into(), stream_id: checkpoint_id })
        .data
    {
        Some(Response::Events { events }) => events,
        other => panic!("expected Events, got {other:?}"),
    };
    let checkpointed = events.iter().find(|e| e.event_type() == "fleet_checkpointed").unwrap();
    let created = events.iter().find(|e| e.event_type() == "checkpoint_created").unwrap();
    assert_eq!(created.causation_id, Some(checkpointed.event_id), "checkpoint_created is caused by fleet_checkpointed");
    assert!(
        created.sequence_number > checkpointed.sequence_number,
        "the causing event must appear earlier in the log"
    );

    let _ = sortie_id;
}
