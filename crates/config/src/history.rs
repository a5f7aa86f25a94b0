#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct History {
    /// Maximum number of committed sessions kept.
    pub capacity: usize,

    /// Number of recent sessions listed in the text report.
    pub report_limit: usize,

    /// Number of sessions produced by the synthetic generator.
    pub synthetic_sessions: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            capacity: 50,
            report_limit: 10,
            synthetic_sessions: 20,
        }
    }
}
