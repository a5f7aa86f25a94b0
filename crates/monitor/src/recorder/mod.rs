#![forbid(unsafe_code)]

mod averages;
mod report;
mod session_recorder;
mod synthetic;

pub use averages::SessionAverages;
pub use report::{NO_DATA_REPORT, text_report};
pub use session_recorder::SessionRecorder;
pub use synthetic::synthetic_sessions;
