// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! S1 (spec.md §8): three independent sorties in one mission all spawn in a
//! single tick, and the mission reaches `completed` once the last of the
//! three reports in.

use crate::prelude::Fixture;
use ft_api::{Query, Response};
use ft_core::MissionStatus;

#[test]
fn three_independent_sorties_spawn_in_one_tick_and_complete_the_mission() {
    let fx = Fixture::new();
    let mission_id = fx.create_mission("parallel rollout");

    let a = fx.create_sortie(mission_id, "touch a", vec![], vec!["/src/a.ts".into()]);
    let b = fx.create_sortie(mission_id, "touch b", vec![], vec!["/src/b.ts".into()]);
    let c = fx.create_sortie(mission_id, "touch c", vec![], vec!["/src/c.ts".into()]);

    let spawned = fx.tick(mission_id);
    assert_eq!(spawned.len(), 3, "all three ready sorties spawn in the same tick");

    assert_eq!(fx.mission_status(mission_id), MissionStatus::InProgress);

    let specialist_for = |sortie_id| spawned.iter().find(|(s, _)| *s == sortie_id).unwrap().1;
    for (sortie_id, file) in [(a, "/src/a.ts"), (b, "/src/b.ts"), (c, "/src/c.ts")] {
        let specialist_id = specialist_for(sortie_id);
        let envelope = fx.core.call(ft_api::Request::AcquireLock {
            file: file.to_string(),
            specialist_id,
            timeout_ms: 60_000,
            purpose: ft_core::LockPurpose::Edit,
            checksum: None,
        });
        assert!(envelope.error.is_none(), "lock acquire failed: {:?}", envelope.error);
        fx.complete(sortie_id, specialist_id, vec![file.to_string()]);
    }

    assert_eq!(fx.mission_status(mission_id), MissionStatus::Completed);

    let stats = match fx.core.query(Query::GetMissionStats { mission_id }).data {
        Some(Response::MissionStats { stats }) => stats,
        other => panic!("expected MissionStats, got {other:?}"),
    };
    assert_eq!(stats.total_sorties, 3);
    assert_eq!(stats.completed_sorties, 3);
    assert_eq!(stats.progress_percent, 100);
}
