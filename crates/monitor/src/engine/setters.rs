#![forbid(unsafe_code)]

//! Fire-and-forget inputs from the player and the source search. None of
//! these produce a sample; the timer does.

use super::PerformanceMonitor;
use crate::domain::{PlayerStatus, QualityLevel, RequestContext, SessionMetrics, SourceSample};

/// Session recorder inputs.
impl PerformanceMonitor {
    /// Start a fresh in-progress session, discarding any unfinished one.
    pub fn open_session(&self) {
        let now = self.now();
        self.inner().recorder.open_session(now);
    }

    pub fn record_search_time(&self, ms: u64) {
        self.inner().recorder.record_search_time(ms);
    }

    pub fn record_test_time(&self, ms: u64) {
        self.inner().recorder.record_test_time(ms);
    }

    pub fn record_total_time(&self, ms: u64) {
        self.inner().recorder.record_total_time(ms);
    }

    pub fn record_source_count(&self, count: usize) {
        self.inner().recorder.record_source_count(count);
    }

    pub fn record_selected_source(&self, source: impl Into<String>) {
        self.inner().recorder.record_selected_source(source);
    }

    pub fn record_cache_hit(&self, hit: bool) {
        self.inner().recorder.record_cache_hit(hit);
    }

    pub fn record_sources_info(&self, sources: Vec<SourceSample>) {
        self.inner().recorder.record_sources_info(sources);
    }

    pub fn record_request(&self, request: RequestContext) {
        self.inner().recorder.record_request(request);
    }

    pub fn record_error(&self, message: impl Into<String>) {
        self.inner().recorder.record_error(message);
    }

    pub fn record_retry_count(&self, count: u32) {
        self.inner().recorder.record_retry_count(count);
    }

    /// Commit the in-progress session and persist the history. `None` when
    /// no total time was recorded.
    pub fn close_session(&self) -> Option<SessionMetrics> {
        let now = self.now();
        let mut inner = self.inner();
        let metrics = inner.recorder.close_session(now)?;
        self.shared.repo.save_history(&inner.recorder.history());
        Some(metrics)
    }
}

/// Live state inputs.
impl PerformanceMonitor {
    pub fn record_status(&self, status: PlayerStatus) {
        self.inner().sampler.live_mut().set_status(status);
    }

    pub fn record_network_quality(&self, quality: QualityLevel, latency: u64, bandwidth: u64) {
        self.inner()
            .sampler
            .live_mut()
            .set_network_quality(quality, latency, bandwidth);
    }

    pub fn record_current_source(
        &self,
        url: impl Into<String>,
        cdn_optimized: bool,
        cache_hit: bool,
    ) {
        self.inner()
            .sampler
            .live_mut()
            .set_current_source(url, cdn_optimized, cache_hit);
    }

    /// Clamped to `0.0..=1.0`.
    pub fn record_buffer_health(&self, health: f64) {
        self.inner().sampler.live_mut().set_buffer_health(health);
    }

    pub fn record_playback_rate(&self, rate: f64) {
        self.inner().sampler.live_mut().set_playback_rate(rate);
    }

    pub fn increment_error_count(&self) {
        self.inner().sampler.live_mut().increment_error_count();
    }

    pub fn increment_retry_count(&self) {
        self.inner().sampler.live_mut().increment_retry_count();
    }

    pub fn record_live_sources(&self, sources: Vec<SourceSample>) {
        self.inner().sampler.live_mut().set_sources_info(sources);
    }

    pub fn record_live_request(&self, request: RequestContext) {
        self.inner().sampler.live_mut().merge_request(request);
    }
}
