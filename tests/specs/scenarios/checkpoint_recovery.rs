// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! S4 (spec.md §8): a progress checkpoint survives a simulated coordinator
//! restart (a fresh `Core` reopening the same write-ahead log), and recovery
//! reports counts consistent with the checkpoint's own snapshot.

use ft_api::{Core, Request, Response};
use ft_core::{CheckpointTrigger, FakeClock, LockPurpose, Priority};
use ft_engine::Config;
use ft_storage::EventStore;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn checkpoint_round_trips_through_a_simulated_restart() {
    let dir = TempDir::new().unwrap();
    let wal_path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    let mission_id;
    let checkpoint_id;
    {
        let store = Arc::new(EventStore::open(&wal_path, None, clock.clone()).unwrap());
        let config = Config { state_dir: Some(dir.path().to_path_buf()), ..Config::default() };
        let core = Core::new(store, clock.clone(), config);

        mission_id = match core
            .call(Request::CreateMission { title: "four sorties".into(), description: None, priority: Priority::Normal, strategy: None })
            .data
        {
            Some(Response::Mission { mission }) => mission.id,
            other => panic!("expected Mission, got {other:?}"),
        };

        let mut sorties = Vec::new();
        for i in 0..4 {
            let sortie_id = match core
                .call(Request::CreateSortie {
                    mission_id: Some(mission_id),
                    title: format!("sortie-{i}"),
                    priority: Priority::Normal,
                    dependencies: vec![],
                    files: vec![],
                })
                .data
            {
                Some(Response::Sortie { sortie }) => sortie.id,
                other => panic!("expected Sortie, got {other:?}"),
            };
            sorties.push(sortie_id);
        }

        let spawned = match core.call(Request::Tick { mission_id }).data {
            Some(Response::Spawned { spawned }) => spawned,
            other => panic!("expected Spawned, got {other:?}"),
        };
        assert_eq!(spawned.len(), 4);

        let specialist_for = |sortie_id: ft_core::SortieId| {
            spawned.iter().find(|s| s.sortie_id == sortie_id.to_string()).unwrap().specialist_id
        };

        // Acquire one lock each so the checkpoint captures live reservations.
        let mut lock_ids = Vec::new();
        for (i, &sortie_id) in sorties.iter().enumerate() {
            let specialist_id = specialist_for(sortie_id);
            let envelope = core.call(Request::AcquireLock {
                file: format!("/src/f{i}.ts"),
                specialist_id,
                timeout_ms: 600_000,
                purpose: LockPurpose::Edit,
                checksum: None,
            });
            match envelope.data {
                Some(Response::LockAcquire { result: ft_api::LockAcquireResult::Acquired { lock } }) => {
                    lock_ids.push(lock.id)
                }
                other => panic!("expected Acquired, got {other:?}"),
            }
        }

        // Complete the first two sorties (50% progress crosses the default
        // [25, 50, 75] thresholds at 50).
        for &sortie_id in &sorties[..2] {
            let specialist_id = specialist_for(sortie_id);
            let result = ft_core::SortieResult { summary: "done".into(), files: vec![], tests_passed: true };
            let envelope = core.call(Request::CompleteSortie { sortie_id, specialist_id, result });
            assert!(envelope.error.is_none(), "complete failed: {:?}", envelope.error);
        }

        let checkpoints = match core.query(ft_api::Query::ListCheckpoints { mission_id }).data {
            Some(Response::Checkpoints { checkpoints }) => checkpoints,
            other => panic!("expected Checkpoints, got {other:?}"),
        };
        let progress_checkpoint = checkpoints
            .iter()
            .find(|c| c.trigger == CheckpointTrigger::Progress && c.progress_percent == 50)
            .expect("a progress=50 checkpoint was auto-created on the second completion");
        checkpoint_id = progress_checkpoint.id.to_string();
        assert_eq!(progress_checkpoint.sorties.len(), 2, "snapshot captures the two still-open sorties");
    }

    // Simulated restart: a fresh Core reopens the same log from scratch.
    let store = Arc::new(EventStore::open(&wal_path, None, clock.clone()).unwrap());
    let config = Config { state_dir: Some(dir.path().to_path_buf()), ..Config::default() };
    let core = Core::new(store, clock.clone(), config);

    let outcome = match core.call(Request::RecoverCheckpoint { checkpoint_id: checkpoint_id.clone(), dry_run: false }).data {
        Some(Response::Recovery { outcome }) => outcome,
        other => panic!("expected Recovery, got {other:?}"),
    };
    assert_eq!(outcome.sorties_restored, 2);
    assert_eq!(outcome.locks_reacquired, 2, "both still-active locks belonging to open sorties are reacquired");
    assert_eq!(outcome.locks_expired, 0);
    assert!(!outcome.already_recovered);

    // Recovering the same checkpoint again is idempotent (§8 invariant 10).
    let second = match core.call(Request::RecoverCheckpoint { checkpoint_id, dry_run: false }).data {
        Some(Response::Recovery { outcome }) => outcome,
        other => panic!("expected Recovery, got {other:?}"),
    };
    assert!(second.already_recovered);
}
