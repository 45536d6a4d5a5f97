// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ft-engine: the coordination logic built on top of `ft-storage`'s event
//! log and projections.
//!
//! Each module owns one component boundary from the external interfaces
//! table: [`lifecycle`] is Mission/Sortie/Specialist state transitions (C5),
//! [`dispatch`] is the dependency-DAG scheduler (C6), [`locks`] is file
//! reservation (C3), [`mailbox`] is the mailbox/cursor service (C4),
//! [`checkpoint`] is checkpoint/recovery (C7), [`compaction`] is archival
//! and retention (C9), and [`presence`] is the specialist presence surface.
//! All of them share one [`ft_storage::EventStore`] and read time through
//! [`ft_core::Clock`] so the whole stack can be driven deterministically in
//! tests.

pub mod checkpoint;
pub mod compaction;
pub mod config;
pub mod dag;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod locks;
pub mod mailbox;
pub mod presence;

pub use checkpoint::{CheckpointManager, RecoveryOutcome};
pub use compaction::{CompactionOutcome, Compactor};
pub use config::Config;
pub use dag::topological_order;
pub use dispatch::{BlockerAction, Dispatch, ReviewVerdict, Spawned};
pub use error::{
    CheckpointError, CompactionError, LifecycleError, LockError, MailboxError, PresenceError,
    SchedulerError,
};
pub use lifecycle::Lifecycle;
pub use locks::{AcquireOutcome, LockFilter, LockManager, ReacquireResult};
pub use mailbox::{Mailbox, NewMessage};
pub use presence::{Presence, PresenceFilter};
