// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! S5 (spec.md §8): a sortie blocked past `blocker_timeout_ms` is escalated
//! to `failed`, its still-pending dependents cascade to `cancelled`, and the
//! original owner can no longer move the sortie forward.

use crate::prelude::Fixture;
use ft_api::Request;
use ft_core::{BlockerCategory, SortieStatus};
use ft_engine::Config;

#[test]
fn stale_blocker_fails_the_sortie_and_cascades_cancellation_to_dependents() {
    let config = Config { blocker_timeout_ms: 10_000, ..Config::default() };
    let fx = Fixture::with_config(config);
    let mission_id = fx.create_mission("blocked chain");

    let d = fx.create_sortie(mission_id, "d", vec![], vec![]);
    let dependent = fx.create_sortie(mission_id, "depends on d", vec![d], vec![]);

    let spawned = fx.tick(mission_id);
    assert_eq!(spawned.len(), 1);
    let (_, specialist_id) = spawned[0];

    let envelope = fx.core.call(Request::BlockSortie { sortie_id: d, category: BlockerCategory::Error, reason: "tool failure".into() });
    assert!(envelope.error.is_none(), "block failed: {:?}", envelope.error);
    assert_eq!(fx.sortie(d).status, SortieStatus::Blocked);

    fx.advance(10_001);
    fx.core.run_maintenance();

    let d_after = fx.sortie(d);
    assert_eq!(d_after.status, SortieStatus::Failed, "blocker past timeout escalates to failed");
    assert_eq!(fx.sortie(dependent).status, SortieStatus::Cancelled, "dependent cascades to cancelled");

    let envelope =
        fx.core.call(Request::UpdateSortieProgress { sortie_id: d, specialist_id, progress: 50, note: None });
    assert!(envelope.error.is_some(), "the original owner can no longer advance a failed sortie");
}
