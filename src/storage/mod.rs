//! bm65 record storage
//!
//! This module provides the measurement data model and everything that
//! combines or persists collections of measurements:
//!
//! - **types**: Core data structures (Measurement, TimeKey, SimpleTime, Vitals)
//! - **merge**: Chronological merge with duplicate removal
//! - **file**: JSON record files
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Device fetch ─┐
//!               ├→ merge (latest first, no duplicates) → filter → stats/output
//! Record files ─┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bm65::storage::{load_file, merge, save_file};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let old = load_file(Path::new("data_u1.json"))?;
//!     let new = load_file(Path::new("latest.json"))?;
//!
//!     let merged = merge(&new, &old);
//!     save_file(Path::new("data_u1.json"), &merged)?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod merge;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use file::{load_file, load_files, save_file, to_json};
pub use merge::{merge, merge_all};
pub use types::{Measurement, SimpleTime, TimeKey, Vitals};
