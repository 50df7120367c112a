//! Descriptive statistics
//!
//! Every statistic is computed independently for systolic pressure,
//! diastolic pressure and pulse.
//!
//! Deviations are measured against the rounded [`average`] of the same set
//! and use the population formula (divide by N, not N - 1).

use crate::analysis::error::{StatsError, StatsResult};
use crate::storage::{Measurement, Vitals};
use serde::Serialize;

/// Mean of each field, rounded half up
pub fn average(items: &[Measurement]) -> StatsResult<Vitals<i32>> {
    if items.is_empty() {
        return Err(StatsError::EmptySet);
    }

    let n = items.len() as f64;
    let sums = items.iter().fold(Vitals::new(0i64, 0, 0), |acc, m| {
        Vitals::new(
            acc.systolic + i64::from(m.systolic),
            acc.diastolic + i64::from(m.diastolic),
            acc.pulse + i64::from(m.pulse),
        )
    });

    Ok(sums.map(|sum| round_half_up(sum as f64 / n)))
}

/// Median of each field
///
/// For an even count, the truncated mean of the two middle values.
pub fn median(items: &[Measurement]) -> StatsResult<Vitals<i32>> {
    if items.is_empty() {
        return Err(StatsError::EmptySet);
    }

    Ok(Vitals::new(
        median_of(items.iter().map(|m| m.systolic).collect()),
        median_of(items.iter().map(|m| m.diastolic).collect()),
        median_of(items.iter().map(|m| m.pulse).collect()),
    ))
}

/// Population standard deviation of each field
pub fn standard_deviation(items: &[Measurement]) -> StatsResult<Vitals<f64>> {
    let avg = deviation_reference(items)?;
    let n = items.len() as f64;

    let squares = sum_of(items, |m| {
        let d = deviation(m, &avg);
        d.map(|x| x * x)
    });

    Ok(squares.map(|sum| (sum / n).sqrt()))
}

/// Mean absolute deviation of each field
pub fn mean_absolute_deviation(items: &[Measurement]) -> StatsResult<Vitals<f64>> {
    let avg = deviation_reference(items)?;
    let n = items.len() as f64;

    let absolutes = sum_of(items, |m| deviation(m, &avg).map(f64::abs));

    Ok(absolutes.map(|sum| sum / n))
}

/// All statistics for one measurement set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub average: Vitals<i32>,
    pub median: Vitals<i32>,
    /// Absent with fewer than two measurements
    pub standard_deviation: Option<Vitals<f64>>,
    /// Absent with fewer than two measurements
    pub mean_absolute_deviation: Option<Vitals<f64>>,
}

impl Summary {
    /// Compute every statistic the set is large enough for
    pub fn compute(items: &[Measurement]) -> StatsResult<Self> {
        Ok(Self {
            count: items.len(),
            average: average(items)?,
            median: median(items)?,
            standard_deviation: standard_deviation(items).ok(),
            mean_absolute_deviation: mean_absolute_deviation(items).ok(),
        })
    }
}

fn deviation_reference(items: &[Measurement]) -> StatsResult<Vitals<i32>> {
    if items.len() <= 1 {
        return Err(StatsError::SetTooSmall { len: items.len() });
    }
    average(items)
}

fn deviation(m: &Measurement, avg: &Vitals<i32>) -> Vitals<f64> {
    Vitals::new(
        f64::from(m.systolic - avg.systolic),
        f64::from(m.diastolic - avg.diastolic),
        f64::from(m.pulse - avg.pulse),
    )
}

fn sum_of(items: &[Measurement], f: impl Fn(&Measurement) -> Vitals<f64>) -> Vitals<f64> {
    items.iter().map(f).fold(Vitals::default(), |acc, v| {
        Vitals::new(
            acc.systolic + v.systolic,
            acc.diastolic + v.diastolic,
            acc.pulse + v.pulse,
        )
    })
}

fn median_of(mut values: Vec<i32>) -> i32 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2
    } else {
        values[mid]
    }
}

fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
