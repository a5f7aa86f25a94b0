#![forbid(unsafe_code)]

pub mod clock;
pub mod domain;
mod engine;
mod error;
pub mod health;
pub mod persistence;
pub mod recorder;
pub mod sampler;
pub mod stores;
pub mod trend;

pub use engine::{MonitorOverview, PerformanceMonitor, Services, Subscription};
pub use error::Error;
