use std::ops::Range;
use std::time::Duration;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The delay a driver applies between two attempts on the queue.
///
/// A pace is a small state machine: every call to [`wait`](Pace::wait) uses
/// up one retry and may grow the delay for the next call.
/// ```
/// use std::time::Duration;
///
/// let mut pace = irqueue::pace()
///     .duration(Duration::from_micros(10))
///     .retries(2);
///
/// assert!(pace.wait().is_ok());
/// assert!(pace.wait().is_ok());
/// assert!(pace.wait().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pace {
    retries: RetryCount,
    delay: Delay,
    jitter: Option<(u64, u64)>,
}

impl Pace {
    /// Waits for the current delay.
    ///
    /// This function is designed to be called repeatedly until it returns `Error::NoRetry`
    pub fn wait(&mut self) -> Result<()> {
        match &mut self.retries {
            RetryCount::Count(0) | RetryCount::Never => return Err(Error::NoRetry),
            RetryCount::Count(count) => {
                *count -= 1;
            }
            RetryCount::Forever => {}
        }

        let jitter = self
            .jitter
            .filter(|(low, high)| low < high)
            .map(|(low, high)| thread_rng().gen_range(low..high));

        match &mut self.delay {
            Delay::None => {}
            Delay::Spin(iterations) => {
                // Jitter is counted in extra iterations for a busy wait
                let total = *iterations as u64 + jitter.unwrap_or(0);
                for _ in 0..total {
                    std::hint::spin_loop();
                }
            }
            Delay::Duration(duration) => sleep(*duration, jitter),
            Delay::Linear(duration, add) => {
                let d = *duration;
                *duration += *add;
                sleep(d, jitter)
            }
            Delay::Exponential(duration) => {
                let d = *duration;
                *duration *= 2;
                sleep(d, jitter)
            }
        }

        Ok(())
    }

    /// The delay the next call to `wait` will apply, without jitter
    pub fn delay(&self) -> Delay {
        self.delay
    }

    /// Set the jitter.
    ///
    /// Microseconds for sleeping delays, extra iterations for a spin.
    pub fn jitter(mut self, range: Range<u64>) -> Self {
        if range.start < range.end {
            self.jitter = Some((range.start, range.end));
        }
        self
    }

    /// Busy wait for a number of iterations, the way a task without a scheduler would
    pub fn spin(mut self, iterations: u32) -> Self {
        self.delay = Delay::Spin(iterations);
        self
    }

    /// The sleep duration
    pub fn duration(mut self, duration: Duration) -> Self {
        self.delay = Delay::Duration(duration);
        self
    }

    /// The sleep duration in microseconds
    pub fn duration_us(self, micros: u64) -> Self {
        self.duration(Duration::from_micros(micros))
    }

    /// Linearly increment the duration by adding `add` after each wait.
    pub fn linear(mut self, duration: Duration, add: Duration) -> Self {
        self.delay = Delay::Linear(duration, add);
        self
    }

    /// Exponentially increase the sleep time per wait
    pub fn exponential(mut self, duration: Duration) -> Self {
        self.delay = Delay::Exponential(duration);
        self
    }

    /// This will prevent `wait` from ever returning `Error::NoRetry`
    pub fn forever(mut self) -> Self {
        self.retries = RetryCount::Forever;
        self
    }

    /// Set the number of times `wait` can be called before returning `Error::NoRetry`
    pub fn retries(mut self, count: usize) -> Self {
        self.retries = RetryCount::Count(count);
        self
    }
}

impl Default for Pace {
    fn default() -> Self {
        pace()
    }
}

fn sleep(duration: Duration, jitter_us: Option<u64>) {
    let duration = duration + Duration::from_micros(jitter_us.unwrap_or(0));
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

/// How many times a [`Pace`] can be waited on
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryCount {
    /// Never wait
    Never,
    /// Wait this many more times
    Count(usize),
    /// No limit
    Forever,
}

/// The delay between two attempts
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delay {
    /// Go again straight away
    None,
    /// Busy wait
    Spin(u32),
    /// Sleep for a fixed duration
    Duration(Duration),
    /// Sleep, adding the second duration after every wait
    Linear(Duration, Duration),
    /// Sleep, doubling the duration after every wait
    Exponential(Duration),
}

/// Create a pacing strategy.
///
/// The default waits once, without any delay.
pub fn pace() -> Pace {
    Pace {
        retries: RetryCount::Count(1),
        delay: Delay::None,
        jitter: None,
    }
}
