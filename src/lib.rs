//! # bm65
//!
//! Reader for the Beurer BM65 blood pressure monitor. Pulls stored
//! measurements over the serial cable, keeps them in JSON record files and
//! turns them into tables and statistics.
//!
//! ## Features
//!
//! - **Device access**: The four-step serial exchange, with an optional read deadline
//! - **Record files**: Merge new readings into old ones, latest first, without duplicates
//! - **Filtering**: Date range, time-of-day window (across midnight) and limits
//! - **Statistics**: Average, median, deviations and WHO classification
//!
//! ## Modules
//!
//! - [`device`]: Serial channel and protocol client
//! - [`storage`]: Data model, merge engine and record files
//! - [`query`]: Date/time parsing and filters
//! - [`analysis`]: Statistics and classification
//! - [`output`]: CSV, JSON and text rendering
//! - [`config`]: Configuration file and environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bm65::analysis::average;
//! use bm65::device::{fetch_from_device, SerialSettings};
//! use bm65::query::{parse_date, Filter};
//! use bm65::storage::{load_file, merge, save_file};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fetch from the monitor and merge into the existing record file
//!     let fetched = fetch_from_device(&SerialSettings::new("/dev/ttyUSB0"))?;
//!     let stored = load_file(Path::new("data_u1.json"))?;
//!     let items = merge(&fetched, &stored);
//!     save_file(Path::new("data_u1.json"), &items)?;
//!
//!     // Average of the last week
//!     let recent = Filter::new().from_date(parse_date("now-7d")?).apply(items);
//!     println!("Average: {}", average(&recent)?);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod device;
pub mod output;
pub mod query;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    load_file, load_files, merge, merge_all, save_file, Measurement, SimpleTime, StorageError,
    StorageResult, Vitals,
};

pub use device::{fetch_from_device, DeviceClient, DeviceError, DeviceResult, SerialSettings};

pub use query::{parse_date, parse_time, Filter, QueryError};

pub use analysis::{
    class_distribution, classify, BpClass, ClassDistribution, StatsError, Summary,
};

pub use output::{render, OutputError, OutputFormat, Report};

pub use config::{Config, ConfigError, DeviceConfig, LoggingConfig, OutputConfig};
