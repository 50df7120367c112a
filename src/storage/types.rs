//! Core data types for bm65
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Measurement`: A single blood pressure reading as stored by the monitor
//! - `TimeKey`: The chronological sort key of a measurement
//! - `SimpleTime`: A time of day, used for filter bounds
//! - `Vitals`: A systolic/diastolic/pulse triple for per-field statistics

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single blood pressure measurement
///
/// Field names serialize in PascalCase so record files written by older
/// readers load unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    /// Raw status byte from the device, passed through untouched
    pub header: i32,
    /// Systolic pressure in mmHg
    pub systolic: i32,
    /// Diastolic pressure in mmHg
    pub diastolic: i32,
    /// Pulse in beats per minute
    pub pulse: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    /// Four-digit year
    pub year: i32,
}

impl Measurement {
    /// Create a measurement with the given pressure and pulse values
    ///
    /// Date fields start at 2000-01-01 00:00; use [`Measurement::at`] to set them.
    pub fn new(systolic: i32, diastolic: i32, pulse: i32) -> Self {
        Self {
            header: 0,
            systolic,
            diastolic,
            pulse,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            year: 2000,
        }
    }

    /// Builder method: set the date and time fields
    pub fn at(mut self, year: i32, month: i32, day: i32, hour: i32, minute: i32) -> Self {
        self.year = year;
        self.month = month;
        self.day = day;
        self.hour = hour;
        self.minute = minute;
        self
    }

    /// Builder method: set the raw header byte
    pub fn header(mut self, header: i32) -> Self {
        self.header = header;
        self
    }

    /// Chronological key of this measurement
    pub fn time_key(&self) -> TimeKey {
        TimeKey {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
        }
    }

    /// True if `self` was taken at the same minute as `other` or later
    pub fn is_later_or_equal(&self, other: &Measurement) -> bool {
        self.time_key() >= other.time_key()
    }

    /// Minutes since midnight
    pub fn minute_of_day(&self) -> i32 {
        self.hour * 60 + self.minute
    }

    /// Calendar timestamp, if the device fields form a valid one
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            self.year,
            u32::try_from(self.month).ok()?,
            u32::try_from(self.day).ok()?,
        )?;
        date.and_hms_opt(
            u32::try_from(self.hour).ok()?,
            u32::try_from(self.minute).ok()?,
            0,
        )
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM`
    ///
    /// Rendered from the raw fields, so out-of-range device values still print.
    pub fn timestamp_label(&self) -> String {
        format!(
            "{}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// Sort key of a measurement: `(year, month, day, hour, minute)`
///
/// Compared lexicographically from the most significant field down. Never
/// requires the fields to form a valid calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeKey {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
}

impl From<NaiveDateTime> for TimeKey {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month() as i32,
            day: dt.day() as i32,
            hour: dt.hour() as i32,
            minute: dt.minute() as i32,
        }
    }
}

/// A time of day, compared as minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTime {
    pub hour: i32,
    pub minute: i32,
}

impl SimpleTime {
    pub fn new(hour: i32, minute: i32) -> Self {
        Self { hour, minute }
    }

    /// Minutes since midnight
    pub fn minutes(&self) -> i32 {
        self.hour * 60 + self.minute
    }
}

impl PartialOrd for SimpleTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimpleTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.minutes().cmp(&other.minutes())
    }
}

impl fmt::Display for SimpleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Per-field values for systolic pressure, diastolic pressure and pulse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vitals<T> {
    pub systolic: T,
    pub diastolic: T,
    pub pulse: T,
}

impl<T> Vitals<T> {
    pub fn new(systolic: T, diastolic: T, pulse: T) -> Self {
        Self {
            systolic,
            diastolic,
            pulse,
        }
    }

    /// Apply `f` to each field
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vitals<U> {
        Vitals {
            systolic: f(self.systolic),
            diastolic: f(self.diastolic),
            pulse: f(self.pulse),
        }
    }
}

impl From<&Measurement> for Vitals<i32> {
    fn from(m: &Measurement) -> Self {
        Self::new(m.systolic, m.diastolic, m.pulse)
    }
}

impl fmt::Display for Vitals<i32> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.systolic, self.diastolic, self.pulse)
    }
}

impl fmt::Display for Vitals<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1};{:.1};{:.1}",
            self.systolic, self.diastolic, self.pulse
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_equality_uses_all_fields() {
        let a = Measurement::new(120, 80, 60).at(2016, 6, 1, 8, 30);
        let b = a.header(0x80);

        assert_ne!(a, b);
        assert_eq!(a, Measurement::new(120, 80, 60).at(2016, 6, 1, 8, 30));
    }

    #[test]
    fn test_is_later_or_equal() {
        let earlier = Measurement::new(120, 80, 60).at(2016, 6, 1, 8, 30);
        let later = Measurement::new(130, 85, 70).at(2016, 6, 1, 8, 31);
        let next_year = Measurement::new(130, 85, 70).at(2017, 1, 1, 0, 0);

        assert!(later.is_later_or_equal(&earlier));
        assert!(!earlier.is_later_or_equal(&later));
        assert!(next_year.is_later_or_equal(&later));
        // Same minute compares as tied
        assert!(earlier.is_later_or_equal(&earlier.header(3)));
    }

    #[test]
    fn test_timestamp_tolerates_device_garbage() {
        let valid = Measurement::new(120, 80, 60).at(2016, 2, 29, 23, 59);
        assert!(valid.timestamp().is_some());

        let invalid = Measurement::new(120, 80, 60).at(2016, 13, 40, 25, 0);
        assert!(invalid.timestamp().is_none());
        assert_eq!(invalid.timestamp_label(), "2016-13-40 25:00");
    }

    #[test]
    fn test_time_key_from_datetime() {
        let dt = NaiveDate::from_ymd_opt(2016, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 45)
            .unwrap();
        let m = Measurement::new(120, 80, 60).at(2016, 6, 1, 8, 30);

        assert_eq!(TimeKey::from(dt), m.time_key());
    }

    #[test]
    fn test_simple_time_ordering() {
        assert!(SimpleTime::new(21, 0) > SimpleTime::new(9, 0));
        assert_eq!(SimpleTime::new(6, 5).minutes(), 365);
        assert_eq!(SimpleTime::new(6, 5).to_string(), "06:05");
    }

    #[test]
    fn test_measurement_serialization() {
        let m = Measurement::new(133, 87, 71)
            .at(2016, 6, 1, 8, 30)
            .header(0x80);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"Systolic\":133"));
        assert!(json.contains("\"Header\":128"));

        let restored: Measurement = serde_json::from_str(&json).unwrap();
        assert_eq!(m, restored);
    }
}
