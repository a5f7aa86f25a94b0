#![forbid(unsafe_code)]

use super::SourceSample;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Loading,
    Playing,
    Paused,
    Buffering,
    Error,
}

impl PlayerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerStatus::Loading => "loading",
            PlayerStatus::Playing => "playing",
            PlayerStatus::Paused => "paused",
            PlayerStatus::Buffering => "buffering",
            PlayerStatus::Error => "error",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-step grade used for network quality and for the health score.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl QualityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityLevel::Excellent => "excellent",
            QualityLevel::Good => "good",
            QualityLevel::Fair => "fair",
            QualityLevel::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully populated snapshot of live playback state, taken once per tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSample {
    pub timestamp: u64,
    pub status: PlayerStatus,
    pub network_quality: QualityLevel,
    pub current_source: String,
    /// Fraction of the target buffer that is filled, always within `0.0..=1.0`.
    pub buffer_health: f64,
    pub playback_rate: f64,
    pub cdn_optimized: bool,
    pub cache_hit: bool,
    /// Latency in milliseconds.
    pub latency: u64,
    /// Bandwidth in kbps.
    pub bandwidth: u64,
    pub error_count: u32,
    pub retry_count: u32,
    pub sources_info: Vec<SourceSample>,
    pub request_id: String,
    pub video_id: String,
    pub video_title: String,
    pub network_type: String,
    pub final_quality: String,
    pub bandwidth_estimate: u64,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlayerStatus::Buffering).unwrap(),
            "\"buffering\""
        );
        assert_eq!(
            serde_json::from_str::<QualityLevel>("\"excellent\"").unwrap(),
            QualityLevel::Excellent
        );
        assert_eq!(QualityLevel::Fair.to_string(), "fair");
    }
}
