#![forbid(unsafe_code)]

use crate::domain::{
    LiveSample, PlayerStatus, QualityLevel, RequestContext, SourceSample, clamp_unit,
};

/// The mutable live state that setters write and each tick reads.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveState {
    status: PlayerStatus,
    network_quality: QualityLevel,
    latency: Option<u64>,
    bandwidth: Option<u64>,
    current_source: Option<String>,
    cdn_optimized: Option<bool>,
    cache_hit: Option<bool>,
    buffer_health: f64,
    playback_rate: f64,
    error_count: u32,
    retry_count: u32,
    sources_info: Option<Vec<SourceSample>>,
    request: RequestContext,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            status: PlayerStatus::Loading,
            network_quality: QualityLevel::Good,
            latency: None,
            bandwidth: None,
            current_source: None,
            cdn_optimized: None,
            cache_hit: None,
            buffer_health: 0.0,
            playback_rate: 1.0,
            error_count: 0,
            retry_count: 0,
            sources_info: None,
            request: RequestContext::default(),
        }
    }
}

impl LiveState {
    pub fn set_status(&mut self, status: PlayerStatus) {
        self.status = status;
    }

    /// Quality, latency (ms) and bandwidth (kbps) are measured together.
    pub fn set_network_quality(&mut self, quality: QualityLevel, latency: u64, bandwidth: u64) {
        self.network_quality = quality;
        self.latency = Some(latency);
        self.bandwidth = Some(bandwidth);
    }

    pub fn set_current_source(
        &mut self,
        url: impl Into<String>,
        cdn_optimized: bool,
        cache_hit: bool,
    ) {
        self.current_source = Some(url.into());
        self.cdn_optimized = Some(cdn_optimized);
        self.cache_hit = Some(cache_hit);
    }

    /// Values outside `0.0..=1.0` are clamped; NaN becomes zero.
    pub fn set_buffer_health(&mut self, health: f64) {
        self.buffer_health = clamp_unit(health);
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }

    pub fn increment_error_count(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
    }

    pub fn increment_retry_count(&mut self) {
        self.retry_count = self.retry_count.saturating_add(1);
    }

    pub fn set_sources_info(&mut self, sources: Vec<SourceSample>) {
        self.sources_info = Some(sources);
    }

    pub fn merge_request(&mut self, request: RequestContext) {
        self.request.merge(request);
    }

    /// Build a complete sample, filling unset fields with empty defaults.
    pub fn materialize(&self, timestamp: u64) -> LiveSample {
        let request = &self.request;
        LiveSample {
            timestamp,
            status: self.status,
            network_quality: self.network_quality,
            current_source: self.current_source.clone().unwrap_or_default(),
            buffer_health: self.buffer_health,
            playback_rate: self.playback_rate,
            cdn_optimized: self.cdn_optimized.unwrap_or_default(),
            cache_hit: self.cache_hit.unwrap_or_default(),
            latency: self.latency.unwrap_or_default(),
            bandwidth: self.bandwidth.unwrap_or_default(),
            error_count: self.error_count,
            retry_count: self.retry_count,
            sources_info: self.sources_info.clone().unwrap_or_default(),
            request_id: request.request_id.clone().unwrap_or_default(),
            video_id: request.video_id.clone().unwrap_or_default(),
            video_title: request.video_title.clone().unwrap_or_default(),
            network_type: request.network_type.clone().unwrap_or_default(),
            final_quality: request.final_quality.clone().unwrap_or_default(),
            bandwidth_estimate: request.bandwidth_estimate.unwrap_or_default(),
            errors: request.errors.clone(),
        }
    }
}
