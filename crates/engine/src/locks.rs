// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Lock Manager (C3, §4.3): exclusive file reservations with TTL, conflict
//! detection, owner-scoped release, and periodic expiry sweep.
//!
//! Every mutation funnels through [`ft_storage::EventStore::append`], so
//! acquisition is serialised per the store's single-writer discipline (§4.3
//! "Concurrency") — two concurrent `acquire` calls on the same path can never
//! both observe the path as free.

use crate::error::LockError;
use chrono::Duration;
use ft_core::event::{CtkConflict, CtkExpired, CtkExtended, CtkForceReleased, CtkReacquired, CtkReleased, CtkReserved, Event};
use ft_core::{normalize_path, Clock, Lock, LockId, LockPurpose, LockSnapshot, LockStatus, SpecialistId};
use ft_storage::{EventStore, NewEvent};
use std::sync::Arc;
use tracing::{error, info};

const MAX_TIMEOUT_MS: u64 = 3_600_000;

/// Outcome of [`LockManager::acquire`].
#[derive(Debug, Clone)]
pub enum AcquireOutcome {
    Acquired(Lock),
    Conflict { existing_lock_id: LockId, existing_reserved_by: SpecialistId },
}

/// Per-snapshot result of [`LockManager::reacquire`] (used only during
/// recovery, §4.7 step 2).
#[derive(Debug, Clone)]
pub enum ReacquireResult {
    Acquired { new_lock_id: LockId, original_lock_id: String },
    Conflict { original_lock_id: String },
    Expired { original_lock_id: String },
}

#[derive(Debug, Clone, Default)]
pub struct LockFilter {
    pub reserved_by: Option<SpecialistId>,
    pub path_prefix: Option<String>,
}

pub struct LockManager<C: Clock> {
    store: Arc<EventStore<C>>,
    clock: C,
}

impl<C: Clock> LockManager<C> {
    pub fn new(store: Arc<EventStore<C>>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Expire-then-check-then-reserve, all within the store's single append
    /// path (§4.3 "Algorithm").
    pub fn acquire(
        &self,
        file: &str,
        specialist_id: SpecialistId,
        timeout_ms: u64,
        purpose: LockPurpose,
        checksum: Option<String>,
    ) -> Result<AcquireOutcome, LockError> {
        if timeout_ms == 0 || timeout_ms > MAX_TIMEOUT_MS {
            return Err(LockError::InvalidTimeout { max_ms: MAX_TIMEOUT_MS });
        }
        let normalized_path = normalize_path(file);
        let now = self.clock.now_utc();

        if let Some(existing) = self.store.with_state(|s| s.active_lock_on(&normalized_path).cloned()) {
            if existing.is_expired(now) {
                self.expire_lock(&existing.id, &normalized_path)?;
            } else {
                self.store.append(NewEvent::root(
                    "lock",
                    normalized_path.clone(),
                    Event::CtkConflict(CtkConflict {
                        normalized_path: normalized_path.clone(),
                        requested_by: specialist_id,
                        existing_lock_id: existing.id.to_string(),
                        existing_reserved_by: existing.reserved_by,
                    }),
                ))?;
                info!(path = %normalized_path, requested_by = %specialist_id, "lock conflict");
                return Ok(AcquireOutcome::Conflict {
                    existing_lock_id: existing.id,
                    existing_reserved_by: existing.reserved_by,
                });
            }
        }

        let lock_id = LockId::new();
        let expires_at = now + Duration::milliseconds(timeout_ms as i64);
        self.store.append(NewEvent::root(
            "lock",
            normalized_path.clone(),
            Event::CtkReserved(CtkReserved {
                lock_id: lock_id.to_string(),
                normalized_path: normalized_path.clone(),
                reserved_by: specialist_id,
                purpose,
                expires_at,
                checksum,
            }),
        ))?;
        info!(path = %normalized_path, reserved_by = %specialist_id, lock_id = %lock_id, "lock acquired");

        let lock = self
            .store
            .with_state(|s| s.get_lock(lock_id.as_str()).cloned())
            .ok_or_else(|| LockError::NotFound(lock_id.to_string()))?;
        Ok(AcquireOutcome::Acquired(lock))
    }

    pub fn release(&self, lock_id: &str, specialist_id: SpecialistId) -> Result<Lock, LockError> {
        let lock = self.get(lock_id)?;
        if !lock.status.is_active() {
            return Err(LockError::NotOwner { lock_id: lock.id.to_string() });
        }
        if !lock.is_owned_by(&specialist_id) {
            return Err(LockError::NotOwner { lock_id: lock.id.to_string() });
        }
        self.store.append(NewEvent::root(
            "lock",
            lock.normalized_path.clone(),
            Event::CtkReleased(CtkReleased { lock_id: lock.id.to_string(), released_by: specialist_id }),
        ))?;
        info!(lock_id = %lock.id, "lock released");
        self.get(lock_id)
    }

    pub fn force_release(&self, lock_id: &str, reason: &str) -> Result<Lock, LockError> {
        let lock = self.get(lock_id)?;
        if !lock.status.is_active() {
            return Err(LockError::NotFound(lock.id.to_string()));
        }
        self.store.append(NewEvent::root(
            "lock",
            lock.normalized_path.clone(),
            Event::CtkForceReleased(CtkForceReleased { lock_id: lock.id.to_string(), reason: reason.to_string() }),
        ))?;
        error!(lock_id = %lock.id, reason, "lock force-released");
        self.get(lock_id)
    }

    pub fn extend(&self, lock_id: &str, specialist_id: SpecialistId, additional_ms: u64) -> Result<Lock, LockError> {
        let lock = self.get(lock_id)?;
        if !lock.status.is_active() || !lock.is_owned_by(&specialist_id) {
            return Err(LockError::NotOwner { lock_id: lock.id.to_string() });
        }
        let new_expires_at = lock.expires_at + Duration::milliseconds(additional_ms as i64);
        self.store.append(NewEvent::root(
            "lock",
            lock.normalized_path.clone(),
            Event::CtkExtended(CtkExtended { lock_id: lock.id.to_string(), new_expires_at }),
        ))?;
        self.get(lock_id)
    }

    /// Re-acquire a set of checkpointed locks during recovery (§4.7 step 2,
    /// §9 Open Question 4: mints fresh ids, preserving the original in the
    /// event payload).
    pub fn reacquire(&self, snapshots: &[LockSnapshot]) -> Result<Vec<ReacquireResult>, LockError> {
        let now = self.clock.now_utc();
        let mut results = Vec::with_capacity(snapshots.len());
        for snap in snapshots {
            if snap.expires_at <= now {
                self.store.append(NewEvent::root(
                    "lock",
                    snap.normalized_path.clone(),
                    Event::CtkReacquired(CtkReacquired {
                        lock_id: snap.lock_id.clone(),
                        original_lock_id: snap.lock_id.clone(),
                        normalized_path: snap.normalized_path.clone(),
                        status: LockStatus::Expired,
                    }),
                ))?;
                results.push(ReacquireResult::Expired { original_lock_id: snap.lock_id.clone() });
                continue;
            }
            if let Some(active) = self.store.with_state(|s| s.active_lock_on(&snap.normalized_path).cloned()) {
                if active.id.to_string() != snap.lock_id {
                    results.push(ReacquireResult::Conflict { original_lock_id: snap.lock_id.clone() });
                    continue;
                }
            }
            let new_lock_id = LockId::new();
            self.store.append(NewEvent::root(
                "lock",
                snap.normalized_path.clone(),
                Event::CtkReacquired(CtkReacquired {
                    lock_id: new_lock_id.to_string(),
                    original_lock_id: snap.lock_id.clone(),
                    normalized_path: snap.normalized_path.clone(),
                    status: LockStatus::Active,
                }),
            ))?;
            self.store.append(NewEvent::root(
                "lock",
                snap.normalized_path.clone(),
                Event::CtkReserved(CtkReserved {
                    lock_id: new_lock_id.to_string(),
                    normalized_path: snap.normalized_path.clone(),
                    reserved_by: SpecialistId::from_string(&snap.reserved_by),
                    purpose: snap.purpose,
                    expires_at: snap.expires_at,
                    checksum: None,
                }),
            ))?;
            results.push(ReacquireResult::Acquired {
                new_lock_id,
                original_lock_id: snap.lock_id.clone(),
            });
        }
        Ok(results)
    }

    /// Expire every active-but-overdue lock. Run at most every
    /// `lock_sweep_ms` by the background runtime (§4.3 "Cancellation &
    /// timeouts").
    pub fn sweep(&self) -> Result<u64, LockError> {
        let now = self.clock.now_utc();
        let expired: Vec<Lock> = self
            .store
            .with_state(|s| s.locks.values().filter(|l| l.is_expired(now)).cloned().collect());
        let count = expired.len() as u64;
        for lock in expired {
            self.expire_lock(&lock.id, &lock.normalized_path)?;
        }
        Ok(count)
    }

    pub fn list_active(&self, filter: &LockFilter) -> Vec<Lock> {
        self.store.with_state(|s| {
            s.locks
                .values()
                .filter(|l| l.status.is_active())
                .filter(|l| filter.reserved_by.map_or(true, |id| l.reserved_by == id))
                .filter(|l| {
                    filter.path_prefix.as_deref().map_or(true, |prefix| l.normalized_path.starts_with(prefix))
                })
                .cloned()
                .collect()
        })
    }

    pub fn get(&self, lock_id: &str) -> Result<Lock, LockError> {
        self.store
            .with_state(|s| s.get_lock(lock_id).cloned())
            .ok_or_else(|| LockError::NotFound(lock_id.to_string()))
    }

    fn expire_lock(&self, lock_id: &LockId, normalized_path: &str) -> Result<(), LockError> {
        self.store.append(NewEvent::root(
            "lock",
            normalized_path.to_string(),
            Event::CtkExpired(CtkExpired { lock_id: lock_id.to_string(), normalized_path: normalized_path.to_string() }),
        ))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
