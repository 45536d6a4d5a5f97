// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;
use crate::lifecycle::Lifecycle;
use ft_core::event::{Event, MissionStatusChanged};
use ft_core::{FakeClock, MissionStatus, Priority};
use tempfile::tempdir;

fn fixture(dir: &tempfile::TempDir) -> (Arc<EventStore<FakeClock>>, FakeClock, Config) {
    let clock = FakeClock::new();
    let store = Arc::new(EventStore::open(dir.path().join("wal.jsonl"), None, clock.clone()).unwrap());
    let config = Config { state_dir: Some(dir.path().to_path_buf()), ..Config::default() };
    (store, clock, config)
}

fn bump_status(store: &EventStore<FakeClock>, mission_id: ft_core::MissionId, status: MissionStatus) {
    store
        .append(NewEvent::root("mission", mission_id.to_string(), Event::MissionStatusChanged(MissionStatusChanged { mission_id, status })))
        .unwrap();
}

#[test]
fn candidates_picks_streams_over_event_threshold() {
    let dir = tempdir().unwrap();
    let (store, clock, config) = fixture(&dir);
    let lifecycle = Lifecycle::new(store.clone());

    let mission = lifecycle.create_mission("m", None, Priority::Normal, None).unwrap();
    for _ in 0..5 {
        bump_status(&store, mission.id, MissionStatus::InProgress);
    }

    let compactor = Compactor::new(store.clone(), clock, &config);
    let candidates = compactor.candidates(3, 365);
    assert!(candidates.iter().any(|s| s.stream_id == mission.id.to_string()));
}

#[test]
fn candidates_excludes_streams_under_every_threshold() {
    let dir = tempdir().unwrap();
    let (store, clock, config) = fixture(&dir);
    let lifecycle = Lifecycle::new(store.clone());

    let mission = lifecycle.create_mission("m", None, Priority::Normal, None).unwrap();

    let compactor = Compactor::new(store, clock, &config);
    let candidates = compactor.candidates(1_000, 365);
    assert!(!candidates.iter().any(|s| s.stream_id == mission.id.to_string()));
}

#[test]
fn compact_stream_archives_events_and_writes_snapshot_without_touching_the_log() {
    let dir = tempdir().unwrap();
    let (store, clock, config) = fixture(&dir);
    let lifecycle = Lifecycle::new(store.clone());

    let mission = lifecycle.create_mission("m", None, Priority::Normal, None).unwrap();
    bump_status(&store, mission.id, MissionStatus::InProgress);
    bump_status(&store, mission.id, MissionStatus::Review);

    let before = store.get_by_stream("mission", mission.id.as_str(), None, None);
    assert_eq!(before.len(), 3);

    let compactor = Compactor::new(store.clone(), clock, &config);
    let summary = compactor.candidates(0, 365).into_iter().find(|s| s.stream_id == mission.id.to_string()).unwrap();
    let outcome = compactor.compact_stream(&summary).unwrap();

    assert_eq!(outcome.events_archived, 3);
    assert_eq!(outcome.from_sequence, before[0].sequence_number);
    assert_eq!(outcome.to_sequence, before[2].sequence_number);

    let archived = ft_storage::archive::read_archive(&config.archive_dir(), outcome.to_sequence).unwrap();
    assert_eq!(archived.len(), 3);

    let after = store.get_by_stream("mission", mission.id.as_str(), None, None);
    assert_eq!(after.len(), 4, "the original 3 events plus the context_compacted marker stay in the live log");

    let snapshot = compactor.latest_snapshot("mission", mission.id.as_str()).unwrap().expect("snapshot written");
    assert_eq!(snapshot.to_sequence, outcome.to_sequence);
    assert!(snapshot.state.is_object());
}

#[test]
fn compact_stream_on_empty_stream_is_rejected() {
    let dir = tempdir().unwrap();
    let (store, clock, config) = fixture(&dir);
    let compactor = Compactor::new(store, clock, &config);

    let bogus = StreamSummary {
        stream_type: "mission".into(),
        stream_id: "msn-does-not-exist".into(),
        event_count: 0,
        min_sequence: 0,
        max_sequence: 0,
        oldest_at: chrono::Utc::now(),
    };
    let err = compactor.compact_stream(&bogus).unwrap_err();
    assert!(matches!(err, CompactionError::EmptyStream { .. }));
}

#[test]
fn run_compacts_every_candidate_and_emits_one_marker_event_each() {
    let dir = tempdir().unwrap();
    let (store, clock, config) = fixture(&dir);
    let lifecycle = Lifecycle::new(store.clone());

    let m1 = lifecycle.create_mission("m1", None, Priority::Normal, None).unwrap();
    let m2 = lifecycle.create_mission("m2", None, Priority::Normal, None).unwrap();
    bump_status(&store, m1.id, MissionStatus::InProgress);
    bump_status(&store, m2.id, MissionStatus::InProgress);

    let compactor = Compactor::new(store.clone(), clock, &config);
    let outcomes = compactor.run(0, 365).unwrap();
    assert_eq!(outcomes.len(), 2);

    let compacted_markers = store
        .get_by_stream("mission", m1.id.as_str(), None, None)
        .into_iter()
        .filter(|e| matches!(e.data, Event::ContextCompacted(_)))
        .count();
    assert_eq!(compacted_markers, 1);
}
