// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Shared fixtures for the end-to-end scenario suite (spec.md §8). Each
//! scenario gets its own [`Fixture`]: an isolated temp-dir-backed event
//! store, a [`FakeClock`] the test drives explicitly, and a [`Core`] wired
//! the same way a real process would wire it in [`ft_api::Core::new`].

use ft_api::{Core, Query, Request, Response};
use ft_core::{FakeClock, MissionId, Priority, SortieId, SpecialistId};
use ft_engine::Config;
use ft_storage::EventStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub struct Fixture {
    pub core: Core<FakeClock>,
    pub clock: FakeClock,
    _dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(mut config: Config) -> Self {
        let dir = TempDir::new().expect("tempdir");
        config.state_dir = Some(dir.path().to_path_buf());
        let clock = FakeClock::new();
        let store = Arc::new(EventStore::open(dir.path().join("wal.jsonl"), None, clock.clone()).expect("open store"));
        let core = Core::new(store, clock.clone(), config);
        Self { core, clock, _dir: dir }
    }

    pub fn advance(&self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
    }

    pub fn create_mission(&self, title: &str) -> MissionId {
        match self.core.call(Request::CreateMission {
            title: title.to_string(),
            description: None,
            priority: Priority::Normal,
            strategy: None,
        }) {
            e if e.error.is_some() => panic!("create_mission failed: {:?}", e.error),
            e => match e.data {
                Some(Response::Mission { mission }) => mission.id,
                other => panic!("expected Response::Mission, got {other:?}"),
            },
        }
    }

    pub fn create_sortie(&self, mission_id: MissionId, title: &str, dependencies: Vec<SortieId>, files: Vec<String>) -> SortieId {
        match self.core.call(Request::CreateSortie {
            mission_id: Some(mission_id),
            title: title.to_string(),
            priority: Priority::Normal,
            dependencies,
            files,
        }) {
            e if e.error.is_some() => panic!("create_sortie failed: {:?}", e.error),
            e => match e.data {
                Some(Response::Sortie { sortie }) => sortie.id,
                other => panic!("expected Response::Sortie, got {other:?}"),
            },
        }
    }

    pub fn tick(&self, mission_id: MissionId) -> Vec<(SortieId, SpecialistId)> {
        match self.core.call(Request::Tick { mission_id }) {
            e if e.error.is_some() => panic!("tick failed: {:?}", e.error),
            e => match e.data {
                Some(Response::Spawned { spawned }) => spawned
                    .into_iter()
                    .map(|s| (SortieId::from_string(s.sortie_id), s.specialist_id))
                    .collect(),
                other => panic!("expected Response::Spawned, got {other:?}"),
            },
        }
    }

    pub fn complete(&self, sortie_id: SortieId, specialist_id: SpecialistId, files: Vec<String>) {
        let result = ft_core::SortieResult { summary: "done".into(), files, tests_passed: true };
        let envelope = self.core.call(Request::CompleteSortie { sortie_id, specialist_id, result });
        assert!(envelope.error.is_none(), "complete failed: {:?}", envelope.error);
    }

    pub fn mission_status(&self, mission_id: MissionId) -> ft_core::MissionStatus {
        match self.core.query(Query::GetMission { mission_id }).data {
            Some(Response::Mission { mission }) => mission.status,
            other => panic!("expected Response::Mission, got {other:?}"),
        }
    }

    pub fn sortie(&self, sortie_id: SortieId) -> ft_core::Sortie {
        match self.core.query(Query::GetSortie { sortie_id }).data {
            Some(Response::Sortie { sortie }) => sortie,
            other => panic!("expected Response::Sortie, got {other:?}"),
        }
    }
}
