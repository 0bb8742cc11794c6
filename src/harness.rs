//! Producer / consumer drivers.
//!
//! The producer plays the part of an interrupt handler: it never waits on the
//! queue, it cycles through a fixed value sequence and moves on to the next
//! value whether the put succeeded or not. The consumer plays a regular task
//! that is allowed to block on the lock.
//!
//! ```
//! use irqueue::{pace, Harness, HarnessConfig};
//!
//! let config = HarnessConfig {
//!     attempts: 500,
//!     producer_pace: pace().forever(),
//!     consumer_pace: pace().forever(),
//!     ..HarnessConfig::default()
//! };
//! let report = Harness::new(config).unwrap().run().unwrap();
//! report.verify().unwrap();
//! ```
use std::thread;

use log::{debug, info};

use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::pace::Pace;
use crate::queue::BoundedQueue;

/// What a single driver did during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    /// Calls made on the queue
    pub attempts: usize,
    /// Calls that moved a value
    pub successes: usize,
    /// Calls that found the queue full / empty / locked
    pub failures: usize,
    /// Longest run of consecutive failures
    pub longest_failure_streak: usize,
    /// Every value that was moved, in commit order
    pub values: Vec<u32>,
}

impl DriverReport {
    fn with_capacity(attempts: usize) -> Self {
        Self {
            values: Vec::with_capacity(attempts),
            ..Self::default()
        }
    }

    fn record(&mut self, value: Option<u32>, streak: &mut usize) {
        self.attempts += 1;
        match value {
            Some(value) => {
                self.successes += 1;
                self.values.push(value);
                *streak = 0;
            }
            None => {
                self.failures += 1;
                *streak += 1;
                self.longest_failure_streak = self.longest_failure_streak.max(*streak);
            }
        }
    }
}

/// Put values from `values` (cycling) into the queue, once per attempt.
///
/// Stops early if `pace` runs out of retries.
pub fn produce(queue: &BoundedQueue<u32>, values: &[u32], attempts: usize, mut pace: Pace) -> DriverReport {
    let mut report = DriverReport::with_capacity(attempts);
    let mut streak = 0;

    // Only the queue and the pace may be touched in here: no logging.
    for value in values.iter().copied().cycle().take(attempts) {
        let put = queue.try_put(value).then_some(value);
        report.record(put, &mut streak);
        if pace.wait().is_err() {
            break;
        }
    }

    debug!(
        "producer finished: {}/{} puts, longest failure streak {}",
        report.successes, report.attempts, report.longest_failure_streak
    );
    report
}

/// Get values from the queue, once per attempt.
///
/// Stops early if `pace` runs out of retries.
pub fn consume(queue: &BoundedQueue<u32>, attempts: usize, mut pace: Pace) -> DriverReport {
    let mut report = DriverReport::with_capacity(attempts);
    let mut streak = 0;

    for _ in 0..attempts {
        report.record(queue.get(), &mut streak);
        if pace.wait().is_err() {
            break;
        }
    }

    debug!(
        "consumer finished: {}/{} gets, longest failure streak {}",
        report.successes, report.attempts, report.longest_failure_streak
    );
    report
}

/// The outcome of a [`Harness`] run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessReport {
    /// The producer side
    pub producer: DriverReport,
    /// The consumer side
    pub consumer: DriverReport,
    /// Values still in the queue once both drivers were done
    pub drained: Vec<u32>,
}

impl HarnessReport {
    /// Check that nothing was lost, duplicated or reordered.
    ///
    /// With one producer and one consumer, what the consumer got followed by
    /// what was left in the queue has to be exactly what the producer put.
    pub fn verify(&self) -> Result<()> {
        let produced = &self.producer.values;
        let consumed = &self.consumer.values;

        if produced.len() != consumed.len() + self.drained.len() {
            return Err(Error::CountMismatch {
                produced: produced.len(),
                consumed: consumed.len(),
                drained: self.drained.len(),
            });
        }

        let received = consumed.iter().chain(&self.drained);
        for (index, (&expected, &found)) in produced.iter().zip(received).enumerate() {
            if expected != found {
                return Err(Error::FifoViolation { index, expected, found });
            }
        }

        Ok(())
    }
}

/// Runs one producer and one consumer thread against a shared queue
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    /// Create a new harness, validating the config
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The config used by [`run`](Harness::run)
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run both drivers to completion, then drain the queue.
    pub fn run(&self) -> Result<HarnessReport> {
        let config = &self.config;
        let queue = BoundedQueue::from_config(&config.queue)?;
        info!(
            "running {} attempts per driver against a queue of {} slots",
            config.attempts,
            queue.capacity()
        );

        let (producer, consumer) = thread::scope(|s| -> Result<_> {
            let producer = thread::Builder::new()
                .name("producer".into())
                .spawn_scoped(s, || produce(&queue, &config.values, config.attempts, config.producer_pace))?;
            let consumer = thread::Builder::new()
                .name("consumer".into())
                .spawn_scoped(s, || consume(&queue, config.attempts, config.consumer_pace))?;

            let producer = producer.join().map_err(|_| Error::DriverPanicked("producer"))?;
            let consumer = consumer.join().map_err(|_| Error::DriverPanicked("consumer"))?;
            Ok((producer, consumer))
        })?;

        let drained = std::iter::from_fn(|| queue.get()).collect::<Vec<_>>();

        info!(
            "done: {} put, {} got, {} left in the queue",
            producer.successes,
            consumer.successes,
            drained.len()
        );

        Ok(HarnessReport {
            producer,
            consumer,
            drained,
        })
    }
}
