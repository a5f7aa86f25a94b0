#![forbid(unsafe_code)]

use crate::clock::Clock;
use crate::domain::SessionMetrics;
use crate::error::Error;
use crate::persistence::{HistorySnapshot, RunStateSnapshot, Snapshot, StateStore, is_fresh};
use crate::sampler::MonitoringRun;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Typed, TTL-aware access to the snapshots in a [`StateStore`].
///
/// Persistence is best effort. Failures are logged and swallowed so the
/// in-memory state stays authoritative; loads treat stale, undecodable or
/// unreadable snapshots as absent.
pub struct StateRepository {
    store: Box<dyn StateStore>,
    clock: Arc<dyn Clock>,
    history_ttl: Duration,
    run_state_ttl: Duration,
}

impl StateRepository {
    pub fn new(
        store: Box<dyn StateStore>,
        clock: Arc<dyn Clock>,
        config: &config::Persistence,
    ) -> Self {
        Self {
            store,
            clock,
            history_ttl: config.history_ttl,
            run_state_ttl: config.run_state_ttl,
        }
    }

    pub fn save_history(&self, sessions: &[SessionMetrics]) {
        let snapshot = HistorySnapshot {
            sessions: sessions.to_vec(),
            saved_at: self.clock.now_millis(),
        };
        if self.write(&snapshot) {
            debug!(sessions = sessions.len(), "history persisted");
        }
    }

    /// Sessions from a fresh history snapshot, if any.
    pub fn load_history(&self) -> Option<Vec<SessionMetrics>> {
        self.read::<HistorySnapshot>(self.history_ttl)
            .map(|snapshot| snapshot.sessions)
    }

    pub fn clear_history(&self) {
        self.remove(HistorySnapshot::KEY);
    }

    pub fn save_run_state(&self, run: MonitoringRun) {
        let snapshot = RunStateSnapshot::new(run, self.clock.now_millis());
        if self.write(&snapshot) {
            debug!(?run, "run state persisted");
        }
    }

    /// The run state from a fresh snapshot, if any.
    pub fn load_run_state(&self) -> Option<RunStateSnapshot> {
        self.read::<RunStateSnapshot>(self.run_state_ttl)
    }

    pub fn clear_run_state(&self) {
        self.remove(RunStateSnapshot::KEY);
    }

    fn write<S: Snapshot + Serialize>(&self, snapshot: &S) -> bool {
        let result = serde_json::to_string(snapshot)
            .map_err(Error::from)
            .and_then(|json| self.store.save(S::KEY, &json));
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(key = S::KEY, %err, "failed to persist snapshot");
                false
            }
        }
    }

    fn read<S: Snapshot + DeserializeOwned>(&self, ttl: Duration) -> Option<S> {
        let json = match self.store.load(S::KEY) {
            Ok(json) => json?,
            Err(err) => {
                warn!(key = S::KEY, %err, "failed to read snapshot");
                return None;
            }
        };

        let snapshot: S = match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(key = S::KEY, %err, "ignoring undecodable snapshot");
                return None;
            }
        };

        let now = self.clock.now_millis();
        if !is_fresh(snapshot.saved_at(), now, ttl) {
            debug!(
                key = S::KEY,
                age_ms = now.saturating_sub(snapshot.saved_at()),
                "ignoring stale snapshot"
            );
            return None;
        }
        Some(snapshot)
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            warn!(key, %err, "failed to remove snapshot");
        }
    }
}
