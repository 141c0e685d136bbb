//! Engine and log configuration types.
//!
//! The library performs no file I/O. Front ends read TOML themselves and
//! hand the text to [`EngineConfig::from_toml_str`]:
//!
//! ```toml
//! collision_probability = 0.05
//! min_values_per_thread = 4000
//! max_threads = 8
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default tolerance for two workers hitting the same shard at once.
pub const DEFAULT_COLLISION_PROBABILITY: f64 = 0.1;

/// Default minimum number of matrix cells per worker thread.
pub const DEFAULT_MIN_VALUES_PER_THREAD: usize = 1000;

/// Settings fixed for the lifetime of a [`crate::engine::PrimeFrequencyEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Acceptable probability that two workers contend for the same shard.
    /// Must be in `[0, 1]`.
    pub collision_probability: f64,

    /// Workers are only added once each one gets at least this many cells.
    pub min_values_per_thread: usize,

    /// Upper bound on workers. `None` means the hardware concurrency.
    pub max_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collision_probability: DEFAULT_COLLISION_PROBABILITY,
            min_values_per_thread: DEFAULT_MIN_VALUES_PER_THREAD,
            max_threads: None,
        }
    }
}

impl EngineConfig {
    /// Default settings with the given collision bound.
    #[must_use]
    pub fn with_collision_probability(collision_probability: f64) -> Self {
        Self {
            collision_probability,
            ..Default::default()
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let p = self.collision_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(Error::InvalidCollisionProbability(p));
        }
        if self.min_values_per_thread == 0 {
            return Err(Error::InvalidConfig(
                "min_values_per_thread must be at least 1".to_string(),
            ));
        }
        if self.max_threads == Some(0) {
            return Err(Error::InvalidConfig(
                "max_threads must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-friendly output
    #[default]
    Pretty,
    /// JSON lines
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "unknown log format: {s}. Expected one of: pretty, json"
            )),
        }
    }
}
