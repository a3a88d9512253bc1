// file: src/models/date.rs
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Year assigned to dates that carry no year of their own.
pub const NO_YEAR_SENTINEL: i32 = 1700;

/// Years below this are never treated as a real birth or wedding year.
/// Some address books store 1604 for "no year".
pub const REAL_YEAR_THRESHOLD: i32 = 1800;

/// A calendar day recovered from a contact's date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDate {
    pub month: u32,
    pub day: u32,
    /// Always set; `NO_YEAR_SENTINEL` when `has_year` is false.
    pub year: i32,
    pub has_year: bool,
}

impl ParsedDate {
    pub fn with_year(year: i32, month: u32, day: u32) -> Self {
        Self {
            month,
            day,
            year,
            has_year: true,
        }
    }

    pub fn without_year(month: u32, day: u32) -> Self {
        Self {
            month,
            day,
            year: NO_YEAR_SENTINEL,
            has_year: false,
        }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self::with_year(date.year(), date.month(), date.day())
    }

    /// True when the year is plausible enough to compute an age from.
    pub fn has_real_year(&self) -> bool {
        self.year >= REAL_YEAR_THRESHOLD
    }

    /// The day this date falls on in `year`. Feb 29 rolls over to March 1
    /// in non-leap years.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            if self.month == 2 && self.day == 29 {
                NaiveDate::from_ymd_opt(year, 3, 1)
            } else {
                None
            }
        })
    }

    /// UTC midnight of the day in `year`. All-day entries must be stored at
    /// UTC midnight or calendar hosts shift them by the local offset.
    pub fn start_in_year(&self, year: i32) -> Option<DateTime<Utc>> {
        self.in_year(year)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Start and end (start + 24h) of the all-day entry in `year`.
    pub fn all_day_span(&self, year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.start_in_year(year)
            .map(|start| (start, start + Duration::days(1)))
    }
}
