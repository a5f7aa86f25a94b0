#![forbid(unsafe_code)]

mod live_sampler;
mod live_state;
mod run;
mod stats;

pub use live_sampler::{LiveSampler, TickOutput};
pub use live_state::LiveState;
pub use run::{Controller, MonitoringRun, StopOutcome};
pub use stats::{NetworkQualityStats, PerformanceTrends};
