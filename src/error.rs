//! Construction-time errors.

use thiserror::Error;

/// Rejected construction parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capacity must be at least one bucket")]
    ZeroCapacity,
    #[error("load factor must be a positive finite number, got {0}")]
    InvalidLoadFactor(f32),
    #[error("skip list level bound must be between 1 and {max}, got {got}")]
    InvalidMaxLevel { got: usize, max: usize },
    #[error("promotion probability must lie strictly between 0 and 1, got {0}")]
    InvalidProbability(f64),
}
