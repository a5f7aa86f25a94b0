#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Who started the current monitoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    /// Started by background code; any stop request ends it.
    Auto,
    /// Started from a user-facing control; only a forced stop ends it.
    User,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MonitoringRun {
    #[default]
    Stopped,
    Running {
        #[serde(rename = "controlledBy")]
        controlled_by: Controller,
    },
}

impl MonitoringRun {
    pub fn is_running(self) -> bool {
        matches!(self, MonitoringRun::Running { .. })
    }

    pub fn is_user_controlled(self) -> bool {
        matches!(
            self,
            MonitoringRun::Running {
                controlled_by: Controller::User
            }
        )
    }

    /// Transition for a stop request. A user-controlled run only yields to
    /// `force`.
    pub fn stop(self, force: bool) -> (MonitoringRun, StopOutcome) {
        match self {
            MonitoringRun::Stopped => (self, StopOutcome::NotRunning),
            MonitoringRun::Running {
                controlled_by: Controller::User,
            } if !force => (self, StopOutcome::Refused),
            MonitoringRun::Running { .. } => (MonitoringRun::Stopped, StopOutcome::Stopped),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    NotRunning,
    /// A non-forced stop hit a user-controlled run; nothing changed.
    Refused,
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: MonitoringRun = MonitoringRun::Running {
        controlled_by: Controller::User,
    };
    const AUTO: MonitoringRun = MonitoringRun::Running {
        controlled_by: Controller::Auto,
    };

    #[test]
    fn stop_transitions() {
        assert_eq!(
            MonitoringRun::Stopped.stop(true),
            (MonitoringRun::Stopped, StopOutcome::NotRunning)
        );
        assert_eq!(USER.stop(false), (USER, StopOutcome::Refused));
        assert_eq!(
            USER.stop(true),
            (MonitoringRun::Stopped, StopOutcome::Stopped)
        );
        assert_eq!(
            AUTO.stop(false),
            (MonitoringRun::Stopped, StopOutcome::Stopped)
        );
    }

    #[test]
    fn serializes_as_tagged_state() {
        assert_eq!(
            serde_json::to_value(USER).unwrap(),
            serde_json::json!({ "state": "running", "controlledBy": "user" })
        );
        assert_eq!(
            serde_json::to_value(MonitoringRun::Stopped).unwrap(),
            serde_json::json!({ "state": "stopped" })
        );
    }
}
