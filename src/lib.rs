#![deny(missing_docs)]
//! Irqueue is a small fixed capacity queue for handing values from a context
//! that must never block (an interrupt handler) to one that may (a task).

pub mod config;
pub mod error;
mod harness;
mod pace;
mod queue;

pub use config::{HarnessConfig, QueueConfig};
pub use harness::{consume, produce, DriverReport, Harness, HarnessReport};
pub use pace::{pace, Delay, Pace, RetryCount};
pub use queue::BoundedQueue;
