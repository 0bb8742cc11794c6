//! Errors

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Irqueue errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A queue needs at least one slot
    #[error("queue capacity must be greater than zero")]
    ZeroCapacity,

    /// The harness was configured without any values to produce
    #[error("the producer value sequence is empty")]
    EmptyValueSequence,

    /// Serde json error
    #[error("failed to deserialize config: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Io error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Exhausted all retries
    #[error("no more retries")]
    NoRetry,

    /// A driver thread panicked before finishing its run
    #[error("the {0} driver panicked")]
    DriverPanicked(&'static str),

    /// Successful puts do not add up to successful gets plus whatever was left in the queue
    #[error("produced {produced} values but consumed {consumed} and drained {drained}")]
    CountMismatch {
        /// Successful puts
        produced: usize,
        /// Successful gets during the run
        consumed: usize,
        /// Values left in the queue after the run
        drained: usize,
    },

    /// A value came out of the queue in a different order than it went in
    #[error("value #{index} out of order: expected {expected}, found {found}")]
    FifoViolation {
        /// Position in the produced sequence
        index: usize,
        /// The value that was put
        expected: u32,
        /// The value that was received
        found: u32,
    },
}
