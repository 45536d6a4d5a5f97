// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Runtime configuration (§6 "Configuration"), resolved from TOML with
//! documented defaults the way the teacher's `daemon::lifecycle::Config` does.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_stale_threshold_ms() -> u64 {
    300_000
}
fn default_heartbeat_check_ms() -> u64 {
    30_000
}
fn default_lock_sweep_ms() -> u64 {
    30_000
}
fn default_blocker_timeout_ms() -> u64 {
    900_000
}
fn default_checkpoint_thresholds() -> Vec<u8> {
    vec![25, 50, 75]
}
fn default_min_keep_checkpoints() -> u32 {
    3
}
fn default_retention_days() -> u32 {
    7
}
fn default_completed_retention_days() -> u32 {
    30
}
fn default_compact_threshold_events() -> u64 {
    10_000
}
fn default_compact_age_days() -> u32 {
    7
}
fn default_max_checkpoint_bytes() -> u64 {
    10_485_760
}
fn default_append_busy_timeout_ms() -> u64 {
    5_000
}
fn default_activity_threshold_ms() -> u64 {
    300_000
}
fn default_checkpoint_warn_bytes() -> u64 {
    1_048_576
}

/// Resolved engine configuration (§6 configuration table).
///
/// `state_dir` is the only key without a baked-in default: it is resolved by
/// [`Config::resolve`] from the OS-specific user data directory when the
/// deserialized value is absent, mirroring the teacher's config layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    #[serde(default = "default_stale_threshold_ms")]
    pub stale_threshold_ms: u64,
    #[serde(default = "default_heartbeat_check_ms")]
    pub heartbeat_check_ms: u64,
    #[serde(default = "default_lock_sweep_ms")]
    pub lock_sweep_ms: u64,
    #[serde(default = "default_blocker_timeout_ms")]
    pub blocker_timeout_ms: u64,
    #[serde(default = "default_checkpoint_thresholds")]
    pub checkpoint_thresholds: Vec<u8>,
    #[serde(default = "default_min_keep_checkpoints")]
    pub min_keep_checkpoints: u32,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_completed_retention_days")]
    pub completed_retention_days: u32,
    #[serde(default = "default_compact_threshold_events")]
    pub compact_threshold_events: u64,
    #[serde(default = "default_compact_age_days")]
    pub compact_age_days: u32,
    #[serde(default = "default_max_checkpoint_bytes")]
    pub max_checkpoint_bytes: u64,
    #[serde(default = "default_append_busy_timeout_ms")]
    pub append_busy_timeout_ms: u64,
    #[serde(default = "default_activity_threshold_ms")]
    pub activity_threshold_ms: u64,
    #[serde(default = "default_checkpoint_warn_bytes")]
    pub checkpoint_warn_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: None,
            stale_threshold_ms: default_stale_threshold_ms(),
            heartbeat_check_ms: default_heartbeat_check_ms(),
            lock_sweep_ms: default_lock_sweep_ms(),
            blocker_timeout_ms: default_blocker_timeout_ms(),
            checkpoint_thresholds: default_checkpoint_thresholds(),
            min_keep_checkpoints: default_min_keep_checkpoints(),
            retention_days: default_retention_days(),
            completed_retention_days: default_completed_retention_days(),
            compact_threshold_events: default_compact_threshold_events(),
            compact_age_days: default_compact_age_days(),
            max_checkpoint_bytes: default_max_checkpoint_bytes(),
            append_busy_timeout_ms: default_append_busy_timeout_ms(),
            activity_threshold_ms: default_activity_threshold_ms(),
            checkpoint_warn_bytes: default_checkpoint_warn_bytes(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Fill in `state_dir` from the OS-specific user data directory when the
    /// caller did not set one explicitly (SPEC_FULL.md §D).
    pub fn resolve(mut self) -> Self {
        if self.state_dir.is_none() {
            self.state_dir = Some(
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("fleettools"),
            );
        }
        self
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn checkpoints_dir(&self) -> PathBuf {
        self.state_dir().join("checkpoints")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.state_dir().join("archive")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
