#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{path::PathBuf, time::Duration};

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Persistence {
    /// Directory holding the snapshot files. `None` keeps state in memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    /// Age after which a session-history snapshot is ignored.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub history_ttl: Duration,

    /// Age after which a monitoring-run snapshot is ignored.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub run_state_ttl: Duration,
}

impl Default for Persistence {
    fn default() -> Self {
        Self {
            state_dir: None,
            history_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            run_state_ttl: Duration::from_secs(60 * 60),
        }
    }
}
