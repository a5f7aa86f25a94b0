#![forbid(unsafe_code)]

use crate::domain::SessionMetrics;
use crate::sampler::{Controller, MonitoringRun};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bumped whenever a snapshot layout changes; part of every storage key.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

pub const HISTORY_KEY: &str = "playmon.history.v1";
pub const RUN_STATE_KEY: &str = "playmon.monitoring.v1";

/// A timestamped record stored under a fixed key.
pub trait Snapshot {
    const KEY: &'static str;

    /// Milliseconds since the Unix epoch at which the snapshot was written.
    fn saved_at(&self) -> u64;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub sessions: Vec<SessionMetrics>,
    pub saved_at: u64,
}

impl Snapshot for HistorySnapshot {
    const KEY: &'static str = HISTORY_KEY;

    fn saved_at(&self) -> u64 {
        self.saved_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStateSnapshot {
    pub is_monitoring: bool,
    pub is_user_controlled: bool,
    pub saved_at: u64,
}

impl RunStateSnapshot {
    pub fn new(run: MonitoringRun, saved_at: u64) -> Self {
        Self {
            is_monitoring: run.is_running(),
            is_user_controlled: run.is_user_controlled(),
            saved_at,
        }
    }

    pub fn run(&self) -> MonitoringRun {
        match (self.is_monitoring, self.is_user_controlled) {
            (false, _) => MonitoringRun::Stopped,
            (true, false) => MonitoringRun::Running {
                controlled_by: Controller::Auto,
            },
            (true, true) => MonitoringRun::Running {
                controlled_by: Controller::User,
            },
        }
    }

    /// A reload should re-arm monitoring only for a run the user started.
    pub fn should_resume(&self) -> bool {
        self.is_monitoring && self.is_user_controlled
    }
}

impl Snapshot for RunStateSnapshot {
    const KEY: &'static str = RUN_STATE_KEY;

    fn saved_at(&self) -> u64 {
        self.saved_at
    }
}

/// A snapshot is usable while its age does not exceed `ttl`. Timestamps
/// from the future count as age zero.
pub fn is_fresh(saved_at: u64, now: u64, ttl: Duration) -> bool {
    now.saturating_sub(saved_at) <= ttl.as_millis() as u64
}
