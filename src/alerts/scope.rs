use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The (year, month) window alerts are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    pub year: i32,
    pub month: u32,
}

impl Scope {
    pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!("month {month} is not in 1..=12")));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(AppError::Validation(format!("year {year} is out of range")));
        }
        Ok(Self { year, month })
    }

    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self { year: today.year(), month: today.month() }
    }

    pub fn first_day(&self) -> NaiveDate {
        // `new` guarantees the date exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Half-open `[start, end)` date range as `YYYY-MM-DD` strings, the
    /// format expenses are stored in.
    pub fn date_range(&self) -> (String, String) {
        let start = self.first_day();
        let end = self.next().first_day();
        (iso(&start), iso(&end))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub fn iso(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
