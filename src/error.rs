//! Error types for the network engine.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    /// A layer would end up with zero neurons, or the hidden stack would be empty.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// A vector handed to the network has the wrong length.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Index {index} out of range for {what} (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Outputs were requested before any forward pass, or after a topology
    /// change discarded the cached activations.
    #[error("No forward pass has been run on the current topology")]
    NotFedForward,

    /// Internal wiring disagreement. Never recoverable.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Corrupt model data: {0}")]
    CorruptData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetError {
    /// True for errors that indicate a bug in the engine rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NetError::InvariantViolation(_))
    }
}
