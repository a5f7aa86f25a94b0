#![forbid(unsafe_code)]

use super::{RequestContext, SourceSample};
use serde::{Deserialize, Serialize};

/// One playback attempt, from source search to first playable frame.
///
/// Durations are in milliseconds, timestamps in milliseconds since the Unix
/// epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionMetrics {
    pub search_time: u64,
    pub test_time: u64,
    pub total_time: u64,
    pub source_count: usize,
    pub selected_source: String,
    pub cache_hit: bool,
    pub sources_info: Vec<SourceSample>,
    pub available_sources_count: usize,
    pub source_success_rate: f64,
    #[serde(flatten)]
    pub request: RequestContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    pub retry_count: u32,
}

impl SessionMetrics {
    /// Replace the considered sources and recompute the derived counts.
    pub fn set_sources_info(&mut self, sources: Vec<SourceSample>) {
        self.available_sources_count = sources.iter().filter(|s| s.available).count();
        self.source_success_rate = if sources.is_empty() {
            0.0
        } else {
            self.available_sources_count as f64 / sources.len() as f64
        };
        self.sources_info = sources;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_counts_follow_sources() {
        let mut metrics = SessionMetrics::default();
        metrics.set_sources_info(vec![
            SourceSample::new("https://a", true, 10, 0),
            SourceSample::new("https://b", false, 10, 0),
        ]);
        assert_eq!(metrics.available_sources_count, 1);
        assert_eq!(metrics.source_success_rate, 0.5);

        metrics.set_sources_info(Vec::new());
        assert_eq!(metrics.available_sources_count, 0);
        assert_eq!(metrics.source_success_rate, 0.0);
    }

    #[test]
    fn serializes_camel_case_with_flattened_request() {
        let metrics = SessionMetrics {
            total_time: 3_000,
            request: RequestContext {
                request_id: Some("req-9".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["totalTime"], 3_000);
        assert_eq!(value["requestId"], "req-9");
        assert!(value.get("endTime").is_none());

        let back: SessionMetrics = serde_json::from_value(value).unwrap();
        assert_eq!(back, metrics);
    }
}
