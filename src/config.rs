//! Queue and harness configuration.
//!
//! Every field has a default, so a config file only needs to name what it changes:
//! ```
//! use irqueue::HarnessConfig;
//!
//! let config = HarnessConfig::from_json(r#"{ "queue": { "capacity": 8 }, "attempts": 100 }"#).unwrap();
//! assert_eq!(config.queue.capacity, 8);
//! assert_eq!(config.values, (1..=9).collect::<Vec<u32>>());
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pace::{pace, Pace};

const DEFAULT_CAPACITY: usize = 3;
const DEFAULT_ATTEMPTS: usize = 10_000;
const DEFAULT_SPIN: u32 = 5_000;

/// Construction parameters of a [`BoundedQueue`](crate::BoundedQueue)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Number of slots
    pub capacity: usize,
}

impl QueueConfig {
    /// Returns `Error::ZeroCapacity` if the queue would have no slots
    pub fn validate(&self) -> Result<()> {
        match self.capacity {
            0 => Err(Error::ZeroCapacity),
            _ => Ok(()),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Everything the producer / consumer harness needs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// The shared queue
    pub queue: QueueConfig,
    /// How many times each driver touches the queue
    pub attempts: usize,
    /// Values the producer cycles through, one per attempt
    pub values: Vec<u32>,
    /// Delay between two producer attempts
    pub producer_pace: Pace,
    /// Delay between two consumer attempts
    pub consumer_pace: Pace,
}

impl HarnessConfig {
    /// Parse and validate a json config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a json config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the config can actually be run
    pub fn validate(&self) -> Result<()> {
        self.queue.validate()?;
        if self.values.is_empty() {
            return Err(Error::EmptyValueSequence);
        }
        Ok(())
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let busy_wait = pace().spin(DEFAULT_SPIN).forever();
        Self {
            queue: QueueConfig::default(),
            attempts: DEFAULT_ATTEMPTS,
            values: (1..=9).collect(),
            producer_pace: busy_wait,
            consumer_pace: busy_wait,
        }
    }
}
