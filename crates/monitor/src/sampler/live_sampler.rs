#![forbid(unsafe_code)]

use super::{Controller, LiveState, MonitoringRun, NetworkQualityStats, PerformanceTrends, StopOutcome};
use crate::domain::LiveSample;
use crate::stores::{BoundedQueue, Callback, SubscriberList, SubscriptionId};
use tracing::{debug, trace};

/// A sample produced by a tick, with the subscribers it must be delivered to.
pub struct TickOutput {
    pub sample: LiveSample,
    pub subscribers: Vec<(SubscriptionId, Callback<LiveSample>)>,
}

/// Run state, live state, the sample ring and its subscribers.
///
/// Timing is the caller's concern: something has to call [`LiveSampler::tick`]
/// once per period while the run is active.
#[derive(Debug)]
pub struct LiveSampler {
    run: MonitoringRun,
    live: LiveState,
    samples: BoundedQueue<LiveSample>,
    subscribers: SubscriberList<LiveSample>,
    stats_window: usize,
}

impl LiveSampler {
    pub fn new(config: &config::Sampler) -> Self {
        Self {
            run: MonitoringRun::Stopped,
            live: LiveState::default(),
            samples: BoundedQueue::new(config.ring_capacity),
            subscribers: SubscriberList::default(),
            stats_window: config.stats_window,
        }
    }

    pub fn run(&self) -> MonitoringRun {
        self.run
    }

    /// Begin a run and reset the live state. Returns `false` if a run is
    /// already active, in which case nothing changes.
    pub fn start(&mut self, controlled_by: Controller) -> bool {
        if self.run.is_running() {
            return false;
        }
        self.run = MonitoringRun::Running { controlled_by };
        self.live = LiveState::default();
        debug!(?controlled_by, "live sampling started");
        true
    }

    pub fn stop(&mut self, force: bool) -> StopOutcome {
        let (run, outcome) = self.run.stop(force);
        self.run = run;
        debug!(force, ?outcome, "live sampling stop requested");
        outcome
    }

    pub fn live_mut(&mut self) -> &mut LiveState {
        &mut self.live
    }

    /// Materialize a sample at `now` and append it to the ring. Returns
    /// `None` while stopped.
    pub fn tick(&mut self, now: u64) -> Option<TickOutput> {
        if !self.run.is_running() {
            return None;
        }
        let sample = self.live.materialize(now);
        self.samples.push(sample.clone());
        trace!(timestamp = now, ring = self.samples.len(), "live sample recorded");
        Some(TickOutput {
            sample,
            subscribers: self.subscribers.snapshot(),
        })
    }

    /// The live state as a sample, without waiting for the next tick.
    pub fn snapshot(&self, now: u64) -> LiveSample {
        self.live.materialize(now)
    }

    /// Copy of the ring, oldest first.
    pub fn samples(&self) -> Vec<LiveSample> {
        self.samples.to_vec()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn clear_samples(&mut self) {
        self.samples.clear();
    }

    pub fn network_quality_stats(&self) -> NetworkQualityStats {
        NetworkQualityStats::compute(self.samples.recent(self.stats_window))
    }

    pub fn performance_trends(&self) -> PerformanceTrends {
        PerformanceTrends::compute(self.samples.recent(self.stats_window))
    }

    pub fn subscribe(&mut self, callback: Callback<LiveSample>) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
