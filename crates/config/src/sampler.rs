#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sampler {
    /// Live-sample timer period in milliseconds.
    #[serde_as(as = "serde_with::DurationMilliSeconds")]
    pub period: Duration,

    /// Maximum number of live samples kept in memory.
    pub ring_capacity: usize,

    /// Number of most recent samples used for network stats and trends.
    pub stats_window: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            ring_capacity: 100,
            stats_window: 20,
        }
    }
}
