//! Inclusive calendar-day ranges for reporting.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`ReportRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The start date falls after the end date.
    #[error("range start {start} is after end {end}")]
    Inverted {
        /// Requested first day.
        start: NaiveDate,
        /// Requested last day.
        end: NaiveDate,
    },
}

/// An inclusive `[start, end]` range of calendar days in the reporting zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportRange {
    /// Create a range covering `start` through `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// The last `days` days ending with (and including) `today`.
    ///
    /// `days = 0` is treated as a single day.
    #[must_use]
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.max(1) - 1);
        let start = today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// A range covering exactly one day.
    #[must_use]
    pub const fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `at`, viewed in `zone`, falls on a day inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>, zone: &FixedOffset) -> bool {
        let day = at.with_timezone(zone).date_naive();
        self.start <= day && day <= self.end
    }

    /// UTC instants bounding the range: local midnight of `start` (inclusive)
    /// and local midnight after `end` (exclusive).
    ///
    /// Repositories query with `created_at >= lower AND created_at < upper`.
    #[must_use]
    pub fn bounds(&self, zone: &FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
        let lower = local_to_utc(self.start.and_time(NaiveTime::MIN), zone);
        let upper = local_to_utc(self.end.and_time(NaiveTime::MIN), zone) + TimeDelta::days(1);
        (lower, upper)
    }
}

/// Convert a wall-clock time in `zone` to UTC.
pub(crate) fn local_to_utc(local: NaiveDateTime, zone: &FixedOffset) -> DateTime<Utc> {
    (local - TimeDelta::seconds(i64::from(zone.local_minus_utc()))).and_utc()
}
