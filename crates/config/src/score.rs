#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Deductions applied to a perfect score of 100 when grading live playback.
///
/// These are empirically chosen and meant to be tuned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreThresholds {
    pub error_status_penalty: u32,
    pub buffering_status_penalty: u32,

    /// Latency (ms) above which the fair penalty applies.
    pub latency_fair_ms: u64,
    /// Latency (ms) above which the poor penalty applies instead.
    pub latency_poor_ms: u64,
    pub latency_fair_penalty: u32,
    pub latency_poor_penalty: u32,

    /// Buffer health (clamped to 0..=1) below which the fair penalty applies.
    pub buffer_fair: f64,
    /// Buffer health (clamped to 0..=1) below which the low penalty applies instead.
    pub buffer_low: f64,
    pub buffer_fair_penalty: u32,
    pub buffer_low_penalty: u32,

    pub error_penalty: u32,
    pub error_penalty_cap: u32,
    pub retry_penalty: u32,
    pub retry_penalty_cap: u32,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            error_status_penalty: 50,
            buffering_status_penalty: 20,
            latency_fair_ms: 300,
            latency_poor_ms: 1000,
            latency_fair_penalty: 10,
            latency_poor_penalty: 25,
            buffer_fair: 0.6,
            buffer_low: 0.3,
            buffer_fair_penalty: 15,
            buffer_low_penalty: 30,
            error_penalty: 5,
            error_penalty_cap: 30,
            retry_penalty: 2,
            retry_penalty_cap: 10,
        }
    }
}

impl ScoreThresholds {
    pub fn clamp(self) -> Self {
        let clamp_unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            buffer_fair: clamp_unit(self.buffer_fair),
            buffer_low: clamp_unit(self.buffer_low),
            ..self
        }
    }
}
