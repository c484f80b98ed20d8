//! Error types for persistence diagram kernels

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Kernel estimator not fitted")]
    NotFitted,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
