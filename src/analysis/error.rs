//! Statistics error types

use thiserror::Error;

/// Errors raised when a statistic's preconditions are not met
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// The measurement set is empty
    #[error("No measurements to analyze")]
    EmptySet,

    /// Deviation statistics need at least two measurements
    #[error("Need at least 2 measurements, got {len}")]
    SetTooSmall { len: usize },
}

/// Result type for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
