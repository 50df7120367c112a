//! Measurement analysis
//!
//! - **stats**: average, median, standard deviation, mean absolute deviation
//! - **classify**: WHO classification and category distribution
//!
//! All functions are pure and take the measurement set by reference. Each one
//! returns [`StatsError`] instead of a placeholder value when the set is too
//! small.

pub mod classify;
pub mod error;
pub mod stats;

pub use classify::{
    class_distribution, classify, BpClass, ClassCount, ClassDistribution, Classification,
    WHO_THRESHOLDS,
};
pub use error::{StatsError, StatsResult};
pub use stats::{average, mean_absolute_deviation, median, standard_deviation, Summary};
