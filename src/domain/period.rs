use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use super::Entry;

/// Years are kept to four digits so stored `YYYY-MM-DD` text sorts like the dates.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("Year must be between 1 and 9999, got {0}")]
    InvalidYear(i32),
}

/// A calendar month of a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month containing today's date (UTC).
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// First day of the month (inclusive bound).
    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month (exclusive bound).
    pub fn end(&self) -> NaiveDate {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1).unwrap_or(NaiveDate::MAX)
    }

    /// Last calendar day of the month, honouring 28/29/30/31-day months.
    pub fn last_day(&self) -> NaiveDate {
        self.end().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month.
    pub fn days(&self) -> u32 {
        self.last_day().day()
    }

    /// True when `date` lies in [start, end).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date < self.end()
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Select the entries dated within the given month, keeping their order.
/// An empty result is not an error.
pub fn filter_period<'a, I>(entries: I, period: Period) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let (start, end) = (period.start(), period.end());
    entries
        .into_iter()
        .filter(|e| e.date >= start && e.date < end)
        .collect()
}
