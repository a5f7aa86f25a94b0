#![forbid(unsafe_code)]

use crate::domain::{LiveSample, QualityLevel};
use crate::trend::{Trend, classify};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkQualityStats {
    /// Rounded mean latency in milliseconds.
    pub avg_latency: u64,
    /// Rounded mean bandwidth in kbps.
    pub avg_bandwidth: u64,
    pub sample_count: usize,
    pub distribution: BTreeMap<QualityLevel, usize>,
}

impl NetworkQualityStats {
    /// Aggregate exactly the given samples; no padding for short windows.
    pub fn compute<'a>(samples: impl ExactSizeIterator<Item = &'a LiveSample>) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self::default();
        }

        let mut latency = 0u128;
        let mut bandwidth = 0u128;
        let mut distribution = BTreeMap::new();
        for sample in samples {
            latency += u128::from(sample.latency);
            bandwidth += u128::from(sample.bandwidth);
            *distribution.entry(sample.network_quality).or_insert(0) += 1;
        }

        Self {
            avg_latency: (latency as f64 / count as f64).round() as u64,
            avg_bandwidth: (bandwidth as f64 / count as f64).round() as u64,
            sample_count: count,
            distribution,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTrends {
    pub latency: Trend,
    pub bandwidth: Trend,
    pub buffer_health: Trend,
}

impl PerformanceTrends {
    pub fn compute<'a>(samples: impl Iterator<Item = &'a LiveSample>) -> Self {
        let mut latency = Vec::new();
        let mut bandwidth = Vec::new();
        let mut buffer_health = Vec::new();
        for sample in samples {
            latency.push(sample.latency as f64);
            bandwidth.push(sample.bandwidth as f64);
            buffer_health.push(sample.buffer_health);
        }

        Self {
            latency: classify(&latency),
            bandwidth: classify(&bandwidth),
            buffer_health: classify(&buffer_health),
        }
    }
}
