#![forbid(unsafe_code)]

mod error;
mod history;
mod persistence;
mod sampler;
mod score;

pub use error::Error;
pub use history::History;
pub use persistence::Persistence;
pub use sampler::Sampler;
pub use score::ScoreThresholds;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sampler: Sampler,
    pub history: History,
    pub persistence: Persistence,
    pub score: ScoreThresholds,
}

impl Config {
    /// Configuration with every value at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML file layered over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse a TOML document layered over the defaults.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(contents))
            .extract()?;
        config.validate()
    }

    /// Render the configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml_edit::ser::to_string_pretty(self)?)
    }

    fn validate(mut self) -> Result<Self, Error> {
        if self.sampler.period.is_zero() {
            return Err(Error::Invalid("sampler.period must be non-zero".into()));
        }
        if self.sampler.ring_capacity == 0 {
            return Err(Error::Invalid("sampler.ring_capacity must be non-zero".into()));
        }
        if self.history.capacity == 0 {
            return Err(Error::Invalid("history.capacity must be non-zero".into()));
        }
        self.score = self.score.clamp();
        Ok(self)
    }
}
