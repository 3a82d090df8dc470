//! Error types for periodavg-core.

use thiserror::Error;

/// The main error type for periodavg operations.
#[derive(Debug, Error)]
pub enum PeriodAvgError {
    /// Invalid timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Error parsing timestamp or value input.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Aggregation range where start is not earlier than end.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Average requested for a bucket that never received an observation.
    #[error("Bucket has no observations")]
    EmptyBucket,
}

/// Result type alias for periodavg operations.
pub type Result<T> = std::result::Result<T, PeriodAvgError>;
