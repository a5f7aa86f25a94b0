#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// One candidate playback source observed during a source search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSample {
    pub url: String,
    pub available: bool,
    /// Round-trip ping time in milliseconds.
    pub ping_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Observation time in milliseconds since the Unix epoch.
    pub observed_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_optimized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_hit: Option<bool>,
}

impl SourceSample {
    pub fn new(url: impl Into<String>, available: bool, ping_ms: u64, observed_at: u64) -> Self {
        Self {
            url: url.into(),
            available,
            ping_ms,
            quality: None,
            observed_at,
            cdn_optimized: None,
            cache_hit: None,
        }
    }

    pub fn with_quality(self, quality: impl Into<String>) -> Self {
        Self {
            quality: Some(quality.into()),
            ..self
        }
    }

    pub fn with_cdn_optimized(self, cdn_optimized: bool) -> Self {
        Self {
            cdn_optimized: Some(cdn_optimized),
            ..self
        }
    }

    pub fn with_cache_hit(self, cache_hit: bool) -> Self {
        Self {
            cache_hit: Some(cache_hit),
            ..self
        }
    }
}
