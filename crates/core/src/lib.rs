// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ft-core: domain types for the FleetTools coordination engine.
//!
//! Opaque ids, the event envelope and tagged union, the entity structs every
//! projection row is shaped from, the stable error taxonomy, and small
//! cross-cutting abstractions (`Clock`) that let higher layers stay
//! deterministic in tests. This crate has no I/O; `ft-storage`, `ft-engine`
//! and `ft-api` all depend on it, and it depends on nothing in this
//! workspace.

pub mod macros;

pub mod checkpoint;
pub mod clock;
pub mod cursor;
pub mod error;
pub mod event;
pub mod id;
pub mod lock;
pub mod message;
pub mod mission;
pub mod priority;
pub mod snapshot;
pub mod sortie;
pub mod specialist;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(any(test, feature = "test-support"))]
pub use checkpoint::CheckpointBuilder;
pub use checkpoint::{
    Checkpoint, CheckpointId, CheckpointTrigger, LockSnapshot, MessageSnapshot, RecoveryContext,
    SortieSnapshot, CHECKPOINT_SCHEMA_VERSION,
};
pub use clock::{Clock, FakeClock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use cursor::CursorBuilder;
pub use cursor::Cursor;
pub use error::{ConflictDetail, ErrorKind, FleetError};
pub use event::{Event, EventId, StoredEvent, EVENT_SCHEMA_VERSION};
pub use id::{short, IdBuf, ID_MAX_LEN};
#[cfg(any(test, feature = "test-support"))]
pub use lock::LockBuilder;
pub use lock::{normalize_path, Lock, LockId, LockPurpose, LockStatus};
#[cfg(any(test, feature = "test-support"))]
pub use message::MessageBuilder;
pub use message::{Message, MessageId, MessageStatus};
#[cfg(any(test, feature = "test-support"))]
pub use mission::MissionBuilder;
pub use mission::{Mission, MissionId, MissionStatus};
pub use priority::Priority;
pub use snapshot::{Snapshot, MAX_BAK_FILES, SNAPSHOT_SCHEMA_VERSION};
#[cfg(any(test, feature = "test-support"))]
pub use sortie::SortieBuilder;
pub use sortie::{BlockerCategory, Sortie, SortieId, SortieResult, SortieStatus};
#[cfg(any(test, feature = "test-support"))]
pub use specialist::SpecialistBuilder;
pub use specialist::{Specialist, SpecialistId, SpecialistStatus};
