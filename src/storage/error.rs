//! Record store error types
//!
//! Defines all errors that can occur while loading or saving record files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the record store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored collection could not be decoded
    #[error("Malformed record file {path:?}: {message}")]
    MalformedStoredRecord { path: PathBuf, message: String },

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for record store operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::MalformedStoredRecord {
            path: PathBuf::from("data.json"),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed record file \"data.json\": expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }
}
