pub mod cli;
mod error;
pub mod feed;
pub mod signals;
pub mod watch;

pub use error::Error;
