//! Query error types
//!
//! Errors raised while turning user-supplied date and time bounds into filters.

use thiserror::Error;

/// Errors that can occur while building a filter
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// A date bound could not be parsed
    #[error("Invalid date: {0} (expected YYYY-MM-DD [HH:MM[:SS]] or now-<n>[hdwm])")]
    InvalidDateSpec(String),

    /// A time-of-day bound could not be parsed
    #[error("Invalid time of day: {0} (expected HH:MM)")]
    InvalidTimeSpec(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
