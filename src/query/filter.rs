//! Measurement filters
//!
//! Narrows a collection that is already ordered latest first:
//!
//! 1. date range: keep the contiguous run with `from <= time < to`
//! 2. time of day: keep readings inside a clock window, which may wrap past
//!    midnight (e.g. 21:00 to 09:00)
//! 3. limit: keep the N most recent readings

use crate::storage::{Measurement, SimpleTime, TimeKey};
use chrono::{Duration, NaiveDateTime, Timelike};

/// Last minute of the day
const LAST_MINUTE_OF_DAY: i32 = 24 * 60 - 1;

/// Filter over a latest-first measurement collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Keep readings taken at or after this time
    pub from_date: Option<NaiveDateTime>,
    /// Keep readings taken strictly before this time
    pub to_date: Option<NaiveDateTime>,
    /// Start of the time-of-day window (inclusive)
    pub from_time: Option<SimpleTime>,
    /// End of the time-of-day window (inclusive)
    pub to_time: Option<SimpleTime>,
    /// Keep at most this many readings; 0 means no limit
    pub limit: usize,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_date(mut self, date: NaiveDateTime) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDateTime) -> Self {
        self.to_date = Some(date);
        self
    }

    pub fn from_time(mut self, time: SimpleTime) -> Self {
        self.from_time = Some(time);
        self
    }

    pub fn to_time(mut self, time: SimpleTime) -> Self {
        self.to_time = Some(time);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True if no bound or limit is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply date range, time of day and limit, in that order
    pub fn apply(&self, items: Vec<Measurement>) -> Vec<Measurement> {
        let before = items.len();

        let mut items = filter_date_range(items, self.from_date, self.to_date);
        items = filter_time_of_day(items, self.from_time, self.to_time);
        items = limit(items, self.limit);

        if items.len() != before {
            tracing::info!(before, after = items.len(), "Filtered measurements");
        }
        items
    }
}

/// Keep the run of readings with `from <= time < to`
///
/// Relies on `items` being sorted latest first: the run starts at the first
/// reading earlier than `to` and ends before the first reading earlier than
/// `from`. Readings have minute resolution; bounds with seconds are compared
/// as the next whole minute, which keeps both comparisons exact.
pub fn filter_date_range(
    mut items: Vec<Measurement>,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> Vec<Measurement> {
    if let Some(to) = to {
        let to = ceil_to_minute(to);
        let start = items
            .iter()
            .position(|m| m.time_key() < to)
            .unwrap_or(items.len());
        items.drain(..start);
    }

    if let Some(from) = from {
        let from = ceil_to_minute(from);
        if let Some(end) = items.iter().position(|m| m.time_key() < from) {
            items.truncate(end);
        }
    }

    items
}

/// Earliest whole minute not before `bound`
fn ceil_to_minute(bound: NaiveDateTime) -> TimeKey {
    let floor = bound
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(bound);
    if floor == bound {
        return TimeKey::from(bound);
    }

    let next = Duration::try_minutes(1)
        .and_then(|minute| floor.checked_add_signed(minute))
        .unwrap_or(floor);
    TimeKey::from(next)
}

/// Keep readings whose clock time falls inside `[from, to]`
///
/// With both bounds set and `from > to`, the window wraps past midnight.
pub fn filter_time_of_day(
    items: Vec<Measurement>,
    from: Option<SimpleTime>,
    to: Option<SimpleTime>,
) -> Vec<Measurement> {
    if from.is_none() && to.is_none() {
        return items;
    }

    items
        .into_iter()
        .filter(|m| in_time_window(m.minute_of_day(), from, to))
        .collect()
}

fn in_time_window(minute: i32, from: Option<SimpleTime>, to: Option<SimpleTime>) -> bool {
    match (from.map(|t| t.minutes()), to.map(|t| t.minutes())) {
        (Some(from), Some(to)) if from > to => {
            (from..=LAST_MINUTE_OF_DAY).contains(&minute) || (0..=to).contains(&minute)
        }
        (Some(from), Some(to)) => (from..=to).contains(&minute),
        (Some(from), None) => minute >= from,
        (None, Some(to)) => minute <= to,
        (None, None) => true,
    }
}

/// Keep the first `limit` readings; 0 keeps everything
pub fn limit(mut items: Vec<Measurement>, limit: usize) -> Vec<Measurement> {
    if limit > 0 && items.len() > limit {
        items.truncate(limit);
    }
    items
}
