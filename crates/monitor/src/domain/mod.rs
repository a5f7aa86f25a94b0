#![forbid(unsafe_code)]

mod live;
mod request;
mod session;
mod source;

pub use live::{LiveSample, PlayerStatus, QualityLevel};
pub use request::RequestContext;
pub use session::SessionMetrics;
pub use source::SourceSample;

/// Clamp a fraction into `0.0..=1.0`. NaN maps to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
