// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! S3 (spec.md §8): a conflicting acquire surfaces the existing owner, and a
//! retry after release succeeds with a brand-new lock id.

use crate::prelude::Fixture;
use ft_api::{Request, Response};
use ft_core::{LockPurpose, SpecialistId};

#[test]
fn conflicting_acquire_reports_owner_then_succeeds_after_release() {
    let fx = Fixture::new();
    let s1 = SpecialistId::new();
    let s2 = SpecialistId::new();

    let envelope = fx.core.call(Request::AcquireLock {
        file: "/x".into(),
        specialist_id: s1,
        timeout_ms: 60_000,
        purpose: LockPurpose::Edit,
        checksum: None,
    });
    let lock_id = match envelope.data {
        Some(Response::LockAcquire { result: ft_api::LockAcquireResult::Acquired { lock } }) => lock.id,
        other => panic!("expected Acquired, got {other:?}"),
    };

    fx.advance(5_000);

    let envelope = fx.core.call(Request::AcquireLock {
        file: "/x".into(),
        specialist_id: s2,
        timeout_ms: 60_000,
        purpose: LockPurpose::Edit,
        checksum: None,
    });
    match envelope.data {
        Some(Response::LockAcquire { result: ft_api::LockAcquireResult::Conflict { existing_reserved_by, .. } }) => {
            assert_eq!(existing_reserved_by, s1);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }

    fx.advance(25_000);
    let envelope = fx.core.call(Request::ReleaseLock { lock_id: lock_id.to_string(), specialist_id: s1 });
    assert!(envelope.error.is_none(), "release failed: {:?}", envelope.error);

    let envelope = fx.core.call(Request::AcquireLock {
        file: "/x".into(),
        specialist_id: s2,
        timeout_ms: 60_000,
        purpose: LockPurpose::Edit,
        checksum: None,
    });
    match envelope.data {
        Some(Response::LockAcquire { result: ft_api::LockAcquireResult::Acquired { lock } }) => {
            assert_ne!(lock.id, lock_id, "retry receives a fresh lock id");
            assert_eq!(lock.reserved_by, s2);
        }
        other => panic!("expected Acquired, got {other:?}"),
    }
}
