// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! S2 (spec.md §8): a strict A -> B -> C dependency chain only ever has one
//! sortie ready at a time, and each downstream sortie starts strictly after
//! its dependency completes.

use crate::prelude::Fixture;

#[test]
fn downstream_sorties_stay_pending_until_their_dependency_completes() {
    let fx = Fixture::new();
    let mission_id = fx.create_mission("chain");

    let a = fx.create_sortie(mission_id, "a", vec![], vec![]);
    let b = fx.create_sortie(mission_id, "b", vec![a], vec![]);
    let c = fx.create_sortie(mission_id, "c", vec![b], vec![]);

    let spawned = fx.tick(mission_id);
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].0, a);

    assert_eq!(fx.sortie(b).status, ft_core::SortieStatus::Pending);
    assert_eq!(fx.sortie(c).status, ft_core::SortieStatus::Pending);

    let (_, specialist_a) = spawned[0];
    fx.advance(10);
    fx.complete(a, specialist_a, vec![]);
    let a_completed_at = fx.sortie(a).completed_at.expect("completed sortie has completed_at");

    fx.advance(10);
    let spawned = fx.tick(mission_id);
    assert_eq!(spawned.len(), 1, "only B becomes ready once A completes");
    assert_eq!(spawned[0].0, b);
    assert_eq!(fx.sortie(c).status, ft_core::SortieStatus::Pending, "C stays pending until B completes");

    let b_started_at = fx.sortie(b).started_at.expect("in-progress sortie has started_at");
    assert!(b_started_at > a_completed_at, "B.started_at must be strictly after A.completed_at");

    let (_, specialist_b) = spawned[0];
    fx.complete(b, specialist_b, vec![]);

    let spawned = fx.tick(mission_id);
    assert_eq!(spawned.len(), 1, "C only becomes ready once B completes");
    assert_eq!(spawned[0].0, c);
}
