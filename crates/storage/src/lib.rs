// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ft-storage: the durable event log and its derived projections.
//!
//! [`EventStore`] is C1 (Event Store) and C2 (Projection Engine) combined
//! behind one write lock, per §4.1/§4.2: append is the sole mutation, and it
//! commits the WAL write and the [`state::MaterializedState`] projection
//! update as one unit. [`snapshot`] and compaction-facing archival support
//! C9 (Compaction & Retention) by letting `rebuild_all` start from a rollup
//! instead of the full log.

pub mod archive;
mod event_store;
pub mod snapshot;
pub mod state;
mod wal;

pub use event_store::{EventStoreError, NewEvent, StoreHealth, StreamSummary};
pub use event_store::EventStore;
pub use snapshot::{SnapshotError, StoredSnapshot};
pub use state::MaterializedState;
pub use wal::{Wal, WalEntry, WalError};
