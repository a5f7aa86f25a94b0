//! A random stand-in for the video player and the source search, used by
//! `watch --simulate`.

use monitor::PerformanceMonitor;
use monitor::domain::{PlayerStatus, QualityLevel, RequestContext, SourceSample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::debug;

const SOURCES: [&str; 4] = [
    "https://edge-1.example.com/stream.m3u8",
    "https://edge-2.example.com/stream.m3u8",
    "https://origin.example.com/stream.m3u8",
    "https://mirror.example.net/stream.m3u8",
];

/// Steps between simulated video changes.
const STEPS_PER_VIDEO: u64 = 30;

#[derive(Debug)]
pub struct SimulatedPlayer {
    rng: StdRng,
    buffer: f64,
    steps: u64,
    videos: u64,
}

impl SimulatedPlayer {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            buffer: 0.0,
            steps: 0,
            videos: 0,
        }
    }

    /// Report one round of player readings, starting a new video every
    /// [`STEPS_PER_VIDEO`] steps.
    pub fn step(&mut self, monitor: &PerformanceMonitor) {
        if self.steps % STEPS_PER_VIDEO == 0 {
            self.load_video(monitor);
        }
        self.steps += 1;

        let latency = self.rng.gen_range(20..=1_500);
        let bandwidth = self.rng.gen_range(500..=25_000);
        monitor.record_network_quality(quality_for(latency), latency, bandwidth);

        self.buffer = (self.buffer + self.rng.gen_range(-0.25..=0.35)).clamp(0.0, 1.0);
        monitor.record_buffer_health(self.buffer);

        let status = if self.rng.gen_bool(0.02) {
            monitor.increment_error_count();
            PlayerStatus::Error
        } else if self.buffer < 0.1 {
            monitor.increment_retry_count();
            PlayerStatus::Buffering
        } else {
            PlayerStatus::Playing
        };
        monitor.record_status(status);
    }

    /// Search the sources for a new video and commit its load session.
    fn load_video(&mut self, monitor: &PerformanceMonitor) {
        self.videos += 1;
        let request = RequestContext {
            request_id: Some(format!("sim-{}", self.videos)),
            video_id: Some(format!("video-{}", self.rng.gen_range(1..=500))),
            network_type: Some("wifi".to_string()),
            ..Default::default()
        };

        monitor.open_session();
        monitor.record_request(request.clone());
        monitor.record_live_request(request);

        let sources: Vec<SourceSample> = SOURCES
            .iter()
            .map(|url| {
                SourceSample::new(
                    *url,
                    self.rng.gen_bool(0.75),
                    self.rng.gen_range(15..=600),
                    0,
                )
                .with_cdn_optimized(url.contains("edge"))
            })
            .collect();
        let selected = sources
            .iter()
            .filter(|s| s.available)
            .min_by_key(|s| s.ping_ms)
            .unwrap_or(&sources[0]);
        let cache_hit = self.rng.gen_bool(0.4);
        monitor.record_current_source(
            selected.url.clone(),
            selected.cdn_optimized.unwrap_or_default(),
            cache_hit,
        );
        monitor.record_selected_source(selected.url.clone());
        monitor.record_cache_hit(cache_hit);
        monitor.record_source_count(sources.len());
        monitor.record_live_sources(sources.clone());
        monitor.record_sources_info(sources);

        let search_time = self.rng.gen_range(100..=1_500);
        let test_time = self.rng.gen_range(200..=2_500);
        monitor.record_search_time(search_time);
        monitor.record_test_time(test_time);
        monitor.record_total_time(search_time + test_time + self.rng.gen_range(50..=800));
        if let Some(session) = monitor.close_session() {
            debug!(total_time = session.total_time, source = %session.selected_source, "simulated video loaded");
        }

        self.buffer = 0.0;
    }
}

fn quality_for(latency: u64) -> QualityLevel {
    match latency {
        0..=100 => QualityLevel::Excellent,
        101..=300 => QualityLevel::Good,
        301..=800 => QualityLevel::Fair,
        _ => QualityLevel::Poor,
    }
}

/// Step `player` every `period` until the task is dropped.
pub async fn drive(monitor: PerformanceMonitor, mut player: SimulatedPlayer, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        player.step(&monitor);
    }
}
