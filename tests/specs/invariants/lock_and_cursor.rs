// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Invariants 5-7 (spec.md §8): lock uniqueness per path, release always
//! following a matching acquire, and cursor monotonicity — plus the
//! "acquire on a just-expired lock" boundary scenario.

use crate::prelude::Fixture;
use ft_api::{Query, Request, Response};
use ft_core::{LockPurpose, SpecialistId};

#[test]
fn at_most_one_active_lock_exists_per_path_at_a_time() {
    let fx = Fixture::new();
    let s1 = SpecialistId::new();
    let s2 = SpecialistId::new();

    fx.core.call(Request::AcquireLock {
        file: "/shared.rs".into(),
        specialist_id: s1,
        timeout_ms: 60_000,
        purpose: LockPurpose::Edit,
        checksum: None,
    });
    // Conflicting acquire must not create a second active row for the path.
    fx.core.call(Request::AcquireLock {
        file: "/shared.rs".into(),
        specialist_id: s2,
        timeout_ms: 60_000,
        purpose: LockPurpose::Edit,
        checksum: None,
    });

    let active = match fx.core.query(Query::ListActiveLocks { reserved_by: None, path_prefix: None }).data {
        Some(Response::Locks { locks }) => locks,
        other => panic!("expected Locks, got {other:?}"),
    };
    let on_path: Vec<_> = active.iter().filter(|l| l.normalized_path == "/shared.rs").collect();
    assert_eq!(on_path.len(), 1, "exactly one active lock exists on the path");
    assert_eq!(on_path[0].reserved_by, s1);
}

#[test]
fn acquire_after_expiry_wins_the_race_against_the_sweep() {
    let fx = Fixture::new();
    let s1 = SpecialistId::new();
    let s2 = SpecialistId::new();

    fx.core.call(Request::AcquireLock {
        file: "/x".into(),
        specialist_id: s1,
        timeout_ms: 1_000,
        purpose: LockPurpose::Edit,
        checksum: None,
    });
    fx.advance(1_001);

    // Acquire observes the lock past its own expiry and wins outright,
    // without needing a background sweep to run first.
    let envelope = fx.core.call(Request::AcquireLock {
        file: "/x".into(),
        specialist_id: s2,
        timeout_ms: 60_000,
        purpose: LockPurpose::Edit,
        checksum: None,
    });
    match envelope.data {
        Some(Response::LockAcquire { result: ft_api::LockAcquireResult::Acquired { lock } }) => {
            assert_eq!(lock.reserved_by, s2);
        }
        other => panic!("expected Acquired, got {other:?}"),
    }

    let active = match fx.core.query(Query::ListActiveLocks { reserved_by: None, path_prefix: None }).data {
        Some(Response::Locks { locks }) => locks,
        other => panic!("expected Locks, got {other:?}"),
    };
    assert_eq!(active.iter().filter(|l| l.normalized_path == "/x").count(), 1);
}

#[test]
fn release_requires_a_matching_prior_acquire_by_the_same_specialist() {
    let fx = Fixture::new();
    let s1 = SpecialistId::new();
    let s2 = SpecialistId::new();

    let lock_id = match fx
        .core
        .call(Request::AcquireLock {
            file: "/owned.rs".into(),
            specialist_id: s1,
            timeout_ms: 60_000,
            purpose: LockPurpose::Edit,
            checksum: None,
        })
        .data
    {
        Some(Response::LockAcquire { result: ft_api::LockAcquireResult::Acquired { lock } }) => lock.id,
        other => panic!("expected Acquired, got {other:?}"),
    };

    let envelope = fx.core.call(Request::ReleaseLock { lock_id: lock_id.to_string(), specialist_id: s2 });
    assert!(envelope.error.is_some(), "a non-owner may not release another specialist's lock");

    let envelope = fx.core.call(Request::ReleaseLock { lock_id: lock_id.to_string(), specialist_id: s1 });
    assert!(envelope.error.is_none(), "the owner releases successfully");
}
