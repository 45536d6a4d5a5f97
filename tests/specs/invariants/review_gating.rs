// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! §4.6 "Review gating": automatic validators reject a report that touches
//! undeclared files or claims failing tests, returning the sortie to
//! `in_progress` with its progress reset rather than completing it.

use crate::prelude::Fixture;
use ft_core::SortieStatus;

#[test]
fn completion_touching_an_undeclared_file_is_rejected_back_to_in_progress() {
    let fx = Fixture::new();
    let mission_id = fx.create_mission("gated");
    let sortie_id = fx.create_sortie(mission_id, "only touches a", vec![], vec!["/src/a.ts".into()]);

    let spawned = fx.tick(mission_id);
    let (_, specialist_id) = spawned[0];

    let result = ft_core::SortieResult {
        summary: "done".into(),
        files: vec!["/src/unrelated.ts".into()],
        tests_passed: true,
    };
    let envelope =
        fx.core.call(ft_api::Request::CompleteSortie { sortie_id, specialist_id, result });
    assert!(envelope.error.is_none(), "complete call itself succeeds; rejection is a status, not an error");

    let sortie = fx.sortie(sortie_id);
    assert_eq!(sortie.status, SortieStatus::InProgress, "review rejection returns the sortie to in_progress");
    assert_eq!(sortie.progress, 0, "rejection resets progress for the next attempt");
}

#[test]
fn completion_with_failing_tests_is_rejected_outright() {
    let fx = Fixture::new();
    let mission_id = fx.create_mission("gated");
    let sortie_id = fx.create_sortie(mission_id, "a", vec![], vec![]);

    let spawned = fx.tick(mission_id);
    let (_, specialist_id) = spawned[0];

    let result = ft_core::SortieResult { summary: "broken".into(), files: vec![], tests_passed: false };
    let envelope = fx.core.call(ft_api::Request::CompleteSortie { sortie_id, specialist_id, result });
    assert!(envelope.error.is_some(), "report_complete rejects tests_passed=false before review ever opens");
    assert_eq!(fx.sortie(sortie_id).status, SortieStatus::InProgress);
}
