#![forbid(unsafe_code)]

mod setters;
mod timer;

use crate::clock::{Clock, SystemClock};
use crate::domain::{LiveSample, SessionMetrics};
use crate::error::Error;
use crate::health::{self, HealthScore};
use crate::persistence::{JsonFileStore, NoopStore, StateRepository, StateStore};
use crate::recorder::{SessionAverages, SessionRecorder};
use crate::sampler::{
    Controller, LiveSampler, MonitoringRun, NetworkQualityStats, PerformanceTrends, StopOutcome,
};
use crate::stores::{SubscriberError, SubscriptionId, notify_all};
use config::Config;
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Weak};
use timer::TimerHandle;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

pub struct Services {
    pub store: Box<dyn StateStore>,
    pub clock: Arc<dyn Clock>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            store: Box::new(NoopStore),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Services {
    /// Snapshot files under `state_dir` when configured, otherwise nothing is
    /// persisted.
    pub fn from_config(config: &config::Persistence) -> Self {
        let store: Box<dyn StateStore> = match &config.state_dir {
            Some(dir) => Box::new(JsonFileStore::new(dir)),
            None => Box::new(NoopStore),
        };
        Self {
            store,
            ..Default::default()
        }
    }
}

/// Everything the HTTP layer or a dashboard needs in one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOverview {
    pub run: MonitoringRun,
    pub snapshot: LiveSample,
    pub health: HealthScore,
    pub network: NetworkQualityStats,
    pub trends: PerformanceTrends,
    pub averages: SessionAverages,
    pub sessions: usize,
    pub live_samples: usize,
}

pub(crate) struct Shared {
    config: Config,
    clock: Arc<dyn Clock>,
    repo: StateRepository,
    inner: Mutex<Inner>,
    /// Held across a whole tick so subscribers see samples in tick order.
    delivery: Mutex<()>,
}

struct Inner {
    recorder: SessionRecorder,
    sampler: LiveSampler,
    timer: Option<TimerHandle>,
}

impl Shared {
    /// Record one sample and deliver it. `timer` is the token of the timer
    /// driving this tick, if any; a cancelled timer produces nothing.
    pub(crate) fn tick(&self, timer: Option<&CancellationToken>) -> Option<LiveSample> {
        let _delivery = self.delivery.lock();
        let output = {
            let mut inner = self.inner.lock();
            if timer.is_some_and(CancellationToken::is_cancelled) {
                return None;
            }
            inner.sampler.tick(self.clock.now_millis())?
        };

        // Subscribers run without the state lock so they may read the monitor.
        let failures = notify_all(&output.subscribers, &output.sample);
        trace!(
            timestamp = output.sample.timestamp,
            subscribers = output.subscribers.len(),
            failures,
            "live sample delivered"
        );
        Some(output.sample)
    }
}

/// The monitoring engine: a session recorder, a live sampler and the
/// persistence behind both.
///
/// Cloning is cheap and every clone drives the same engine. The sample timer
/// runs on the tokio runtime that was current when monitoring started, and
/// stops when the run stops or the last handle is dropped.
#[derive(Clone)]
pub struct PerformanceMonitor {
    shared: Arc<Shared>,
}

impl fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("PerformanceMonitor")
            .field("run", &inner.sampler.run())
            .field("sessions", &inner.recorder.len())
            .field("live_samples", &inner.sampler.sample_count())
            .finish_non_exhaustive()
    }
}

impl PerformanceMonitor {
    /// Create a monitor with empty state. No persistence is read.
    pub fn new(config: Config, services: Services) -> Self {
        let repo = StateRepository::new(services.store, services.clock.clone(), &config.persistence);
        let inner = Inner {
            recorder: SessionRecorder::new(&config.history),
            sampler: LiveSampler::new(&config.sampler),
            timer: None,
        };
        Self {
            shared: Arc::new(Shared {
                config,
                clock: services.clock,
                repo,
                inner: Mutex::new(inner),
                delivery: Mutex::new(()),
            }),
        }
    }

    /// Create a monitor and restore session history from a fresh snapshot.
    pub fn load(config: Config, services: Services) -> Self {
        let monitor = Self::new(config, services);
        if let Some(sessions) = monitor.shared.repo.load_history() {
            let mut inner = monitor.inner();
            inner.recorder.restore(sessions);
            info!(sessions = inner.recorder.len(), "session history restored");
        }
        monitor
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock()
    }

    fn now(&self) -> u64 {
        self.shared.clock.now_millis()
    }

    /// Start a monitoring run. Returns `Ok(false)` if one is already active;
    /// the existing run, its controller and its timer are left untouched.
    pub fn start(&self, controlled_by: Controller) -> Result<bool, Error> {
        let runtime = Handle::try_current()?;
        let mut inner = self.inner();
        if !inner.sampler.start(controlled_by) {
            debug!(run = ?inner.sampler.run(), "monitoring already running");
            return Ok(false);
        }

        inner.timer = Some(TimerHandle::spawn(
            &runtime,
            self.shared.config.sampler.period,
            Arc::downgrade(&self.shared),
        ));
        self.shared.repo.save_run_state(inner.sampler.run());
        info!(?controlled_by, "monitoring started");
        Ok(true)
    }

    /// Request a stop. Without `force`, a user-controlled run refuses.
    pub fn stop(&self, force: bool) -> StopOutcome {
        let mut inner = self.inner();
        let outcome = inner.sampler.stop(force);
        match outcome {
            StopOutcome::Stopped => {
                inner.timer = None;
                self.shared.repo.clear_run_state();
                info!(force, "monitoring stopped");
            }
            StopOutcome::Refused => {
                info!("stop refused, monitoring is user controlled");
            }
            StopOutcome::NotRunning => {
                debug!("stop requested while not monitoring");
            }
        }
        outcome
    }

    /// The stop path for user-facing controls. Always ends the run.
    pub fn stop_by_user(&self) -> StopOutcome {
        self.stop(true)
    }

    pub fn is_monitoring(&self) -> bool {
        self.inner().sampler.run().is_running()
    }

    pub fn run_state(&self) -> MonitoringRun {
        self.inner().sampler.run()
    }

    /// True when a fresh run-state snapshot records a user-started run.
    pub fn should_resume(&self) -> bool {
        self.shared
            .repo
            .load_run_state()
            .is_some_and(|snapshot| snapshot.should_resume())
    }

    /// Re-arm a user-started run after a restart. Returns whether a run was
    /// started.
    pub fn resume_if_needed(&self) -> Result<bool, Error> {
        if !self.should_resume() {
            return Ok(false);
        }
        let started = self.start(Controller::User)?;
        if started {
            info!("resumed user-controlled monitoring");
        }
        Ok(started)
    }

    /// Produce one sample now, outside the timer. `None` while stopped.
    ///
    /// Must not be called from inside a subscriber.
    pub fn tick(&self) -> Option<LiveSample> {
        self.shared.tick(None)
    }

    /// Register a callback for every future sample. Registering the same
    /// function twice yields two independent subscriptions.
    ///
    /// Callbacks run on the timer task with the monitor unlocked. An `Err` or
    /// a panic is logged and does not affect other subscribers.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LiveSample) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        let id = self.inner().sampler.subscribe(Arc::new(callback));
        debug!(subscriber = %id, "subscriber added");
        Subscription {
            id,
            monitor: Arc::downgrade(&self.shared),
        }
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner().sampler.unsubscribe(id);
        debug!(subscriber = %id, removed, "subscriber removal requested");
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner().sampler.subscriber_count()
    }

    /// The live state as of now, without waiting for a tick.
    pub fn snapshot(&self) -> LiveSample {
        let now = self.now();
        self.inner().sampler.snapshot(now)
    }

    /// Copy of the live-sample ring, oldest first.
    pub fn live_history(&self) -> Vec<LiveSample> {
        self.inner().sampler.samples()
    }

    pub fn network_quality_stats(&self) -> NetworkQualityStats {
        self.inner().sampler.network_quality_stats()
    }

    pub fn performance_trends(&self) -> PerformanceTrends {
        self.inner().sampler.performance_trends()
    }

    /// Health of the current live state.
    pub fn health(&self) -> HealthScore {
        health::score(&self.snapshot(), &self.shared.config.score)
    }

    /// Copy of every committed session, oldest first.
    pub fn history(&self) -> Vec<SessionMetrics> {
        self.inner().recorder.history()
    }

    /// The session being recorded.
    pub fn current_session(&self) -> SessionMetrics {
        self.inner().recorder.current().clone()
    }

    pub fn averages(&self) -> SessionAverages {
        self.inner().recorder.averages()
    }

    pub fn text_report(&self) -> String {
        self.inner().recorder.text_report()
    }

    /// Drop all sessions, the in-progress session and the live samples, and
    /// erase the history snapshot.
    pub fn clear(&self) {
        let mut inner = self.inner();
        inner.recorder.clear();
        inner.sampler.clear_samples();
        self.shared.repo.clear_history();
        info!("monitoring history cleared");
    }

    /// Replace the history with demo sessions and persist it.
    pub fn generate_synthetic_history(&self) {
        self.generate_synthetic_history_with(&mut rand::thread_rng());
    }

    pub fn generate_synthetic_history_with<R: Rng + ?Sized>(&self, rng: &mut R) {
        let now = self.now();
        let mut inner = self.inner();
        inner
            .recorder
            .generate_synthetic(rng, self.shared.config.history.synthetic_sessions, now);
        self.shared.repo.save_history(&inner.recorder.history());
    }

    pub fn overview(&self) -> MonitorOverview {
        let now = self.now();
        let inner = self.inner();
        let snapshot = inner.sampler.snapshot(now);
        MonitorOverview {
            run: inner.sampler.run(),
            health: health::score(&snapshot, &self.shared.config.score),
            snapshot,
            network: inner.sampler.network_quality_stats(),
            trends: inner.sampler.performance_trends(),
            averages: inner.recorder.averages(),
            sessions: inner.recorder.len(),
            live_samples: inner.sampler.sample_count(),
        }
    }
}

/// Handle to one registration made by [`PerformanceMonitor::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    monitor: Weak<Shared>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove exactly this registration. Returns `false` if it was already
    /// removed or the monitor is gone.
    pub fn unsubscribe(self) -> bool {
        match self.monitor.upgrade() {
            Some(shared) => PerformanceMonitor { shared }.unsubscribe(self.id),
            None => false,
        }
    }
}
