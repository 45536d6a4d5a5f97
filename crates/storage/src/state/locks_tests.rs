// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;
use ft_core::event::{Event, CtkExpired, CtkExtended, CtkForceReleased, CtkReleased};
use ft_core::test_support::ctk_reserved_event;
use ft_core::test_support::stored_event;
use ft_core::{LockId, LockStatus, SpecialistId};
use chrono::Utc;

#[test]
fn reserved_inserts_row_and_path_index() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &ctk_reserved_event("lock-1", "src/main.rs", specialist_id));

    let lock_id = LockId::from_string("lock-1");
    assert_eq!(state.locks[&lock_id].status, LockStatus::Active);
    assert_eq!(state.locks_by_path["src/main.rs"], lock_id);
}

#[test]
fn reserved_is_idempotent() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    let event = ctk_reserved_event("lock-1", "src/main.rs", specialist_id);
    apply(&mut state, &event);
    apply(&mut state, &event);
    assert_eq!(state.locks.len(), 1);
}

#[test]
fn released_clears_path_index() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &ctk_reserved_event("lock-1", "src/main.rs", specialist_id));
    apply(
        &mut state,
        &stored_event(
            "lock",
            "lock-1",
            Event::CtkReleased(CtkReleased { lock_id: "lock-1".to_string(), released_by: specialist_id }),
        ),
    );

    let lock_id = LockId::from_string("lock-1");
    assert_eq!(state.locks[&lock_id].status, LockStatus::Released);
    assert!(state.locks[&lock_id].released_at.is_some());
    assert!(!state.locks_by_path.contains_key("src/main.rs"));
}

#[test]
fn force_released_clears_path_index() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &ctk_reserved_event("lock-1", "src/main.rs", specialist_id));
    apply(
        &mut state,
        &stored_event(
            "lock",
            "lock-1",
            Event::CtkForceReleased(CtkForceReleased { lock_id: "lock-1".to_string(), reason: "stuck".into() }),
        ),
    );

    let lock_id = LockId::from_string("lock-1");
    assert_eq!(state.locks[&lock_id].status, LockStatus::ForceReleased);
    assert!(!state.locks_by_path.contains_key("src/main.rs"));
}

#[test]
fn expired_clears_path_index_without_released_at() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &ctk_reserved_event("lock-1", "src/main.rs", specialist_id));
    apply(
        &mut state,
        &stored_event(
            "lock",
            "lock-1",
            Event::CtkExpired(CtkExpired { lock_id: "lock-1".to_string(), normalized_path: "src/main.rs".to_string() }),
        ),
    );

    let lock_id = LockId::from_string("lock-1");
    assert_eq!(state.locks[&lock_id].status, LockStatus::Expired);
    assert!(!state.locks_by_path.contains_key("src/main.rs"));
}

#[test]
fn extended_bumps_expiry_on_active_lock_only() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &ctk_reserved_event("lock-1", "src/main.rs", specialist_id));
    let new_expiry = Utc::now() + chrono::Duration::hours(1);
    apply(
        &mut state,
        &stored_event(
            "lock",
            "lock-1",
            Event::CtkExtended(CtkExtended { lock_id: "lock-1".to_string(), new_expires_at: new_expiry }),
        ),
    );

    let lock_id = LockId::from_string("lock-1");
    assert_eq!(state.locks[&lock_id].expires_at, new_expiry);
}

#[test]
fn extended_on_released_lock_is_noop() {
    let mut state = MaterializedState::default();
    let specialist_id = SpecialistId::new();
    apply(&mut state, &ctk_reserved_event("lock-1", "src/main.rs", specialist_id));
    apply(
        &mut state,
        &stored_event(
            "lock",
            "lock-1",
            Event::CtkReleased(CtkReleased { lock_id: "lock-1".to_string(), released_by: specialist_id }),
        ),
    );
    let original = state.locks[&LockId::from_string("lock-1")].expires_at;
    apply(
        &mut state,
        &stored_event(
            "lock",
            "lock-1",
            Event::CtkExtended(CtkExtended {
                lock_id: "lock-1".to_string(),
                new_expires_at: Utc::now() + chrono::Duration::hours(1),
            }),
        ),
    );
    assert_eq!(state.locks[&LockId::from_string("lock-1")].expires_at, original);
}

#[test]
fn second_reserve_on_same_path_overwrites_path_index() {
    let mut state = MaterializedState::default();
    let a = SpecialistId::new();
    let b = SpecialistId::new();
    apply(&mut state, &ctk_reserved_event("lock-1", "src/main.rs", a));
    apply(&mut state, &ctk_reserved_event("lock-2", "src/main.rs", b));

    assert_eq!(state.locks_by_path["src/main.rs"], LockId::from_string("lock-2"));
    assert_eq!(state.locks.len(), 2);
}
