//! Date and time bound parsing
//!
//! # Supported Syntax
//!
//! ```text
//! Dates:  2016-06-01
//!         2016-06-01 21:30
//!         2016-06-01 21:30:15
//!         2016-06-01T21:30:15
//!         now-7d            (h = hours, d = days, w = weeks, m = 30 days)
//!
//! Times:  21:30
//!         6:05
//! ```
//!
//! Dates are local wall-clock times, like the timestamps the monitor records.

use crate::query::error::{QueryError, QueryResult};
use crate::storage::SimpleTime;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a date bound relative to the current local time
pub fn parse_date(s: &str) -> QueryResult<NaiveDateTime> {
    parse_date_at(s, Local::now().naive_local())
}

/// Parse a date bound, resolving relative forms against `now`
pub fn parse_date_at(s: &str, now: NaiveDateTime) -> QueryResult<NaiveDateTime> {
    let s = s.trim();
    let invalid = || QueryError::InvalidDateSpec(s.to_string());

    if s.starts_with("now") {
        if s == "now" {
            return Ok(now);
        }

        let re = regex::Regex::new(r"^now-(\d+)([hdwm])$").map_err(|_| invalid())?;
        let caps = re.captures(s).ok_or_else(invalid)?;
        let amount: i64 = caps[1].parse().map_err(|_| invalid())?;

        let offset = match &caps[2] {
            "h" => Duration::try_hours(amount),
            "d" => Duration::try_days(amount),
            "w" => Duration::try_weeks(amount),
            "m" => Duration::try_days(amount.saturating_mul(30)),
            _ => None,
        }
        .ok_or_else(invalid)?;

        return now.checked_sub_signed(offset).ok_or_else(invalid);
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)
}

/// Parse a time-of-day bound
pub fn parse_time(s: &str) -> QueryResult<SimpleTime> {
    let s = s.trim();
    let invalid = || QueryError::InvalidTimeSpec(s.to_string());

    let re = regex::Regex::new(r"^(\d{1,2}):(\d{2})$").map_err(|_| invalid())?;
    let caps = re.captures(s).ok_or_else(invalid)?;

    let hour: i32 = caps[1].parse().map_err(|_| invalid())?;
    let minute: i32 = caps[2].parse().map_err(|_| invalid())?;

    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return Err(invalid());
    }

    Ok(SimpleTime::new(hour, minute))
}
