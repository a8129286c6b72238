//! Date ranges and day arithmetic
//!
//! Policy effective windows are inclusive calendar-date ranges; regulatory
//! deadlines are instants, and lateness is measured in whole elapsed days.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },
}

/// An inclusive calendar-date range, such as a policy term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns true if `date` falls on or between the start and end dates
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Whole days elapsed from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

/// Whole days by which `at` is past `deadline`; zero when on time
pub fn days_late(deadline: DateTime<Utc>, at: DateTime<Utc>) -> i64 {
    days_between(deadline, at).max(0)
}

/// Adds a number of calendar days to an instant
pub fn add_days(at: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    at + Duration::days(i64::from(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 12, 31)));
        assert!(!range.contains(date(2025, 1, 1)));
        assert_eq!(range.days(), 365);
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_days_late() {
        let deadline = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 21, 0, 0, 0).unwrap();

        assert_eq!(days_late(deadline, early), 0);
        assert_eq!(days_late(deadline, late), 20);
        assert_eq!(days_between(early, deadline), 10);
    }

    #[test]
    fn test_add_days() {
        let start = Utc.with_ymd_and_hms(2024, 1, 30, 12, 0, 0).unwrap();
        let due = add_days(start, 15);
        assert_eq!(due, Utc.with_ymd_and_hms(2024, 2, 14, 12, 0, 0).unwrap());
    }
}
