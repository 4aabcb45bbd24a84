//! Date formats used by entries and goals.
//!
//! - entry dates: `dd/mm/yyyy`
//! - goal months: `mm/yyyy`
//! - times of day: `HH:MM`

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

pub const ENTRY_DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses an entry date in `dd/mm/yyyy`.
pub fn parse_entry_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ENTRY_DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("expected dd/mm/yyyy, got '{value}'")))
}

#[must_use]
pub fn format_entry_date(date: NaiveDate) -> String {
    date.format(ENTRY_DATE_FORMAT).to_string()
}

/// Parses a time of day in `HH:MM`.
pub fn parse_time(value: &str) -> ResultEngine<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("expected HH:MM, got '{value}'")))
}

/// UTC midnight of `date`.
#[must_use]
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Every calendar day from `start` to `end`, both included.
#[must_use]
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// A calendar month, the granularity of budget goals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BudgetMonth {
    year: i32,
    month: u32,
}

impl BudgetMonth {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidDate(format!("invalid month: {month}")));
        }
        Ok(Self { year, month })
    }

    /// Parses `mm/yyyy`.
    pub fn parse(value: &str) -> ResultEngine<Self> {
        let invalid = || EngineError::InvalidDate(format!("expected mm/yyyy, got '{value}'"));
        let (month, year) = value.trim().split_once('/').ok_or_else(invalid)?;
        if month.is_empty() || month.len() > 2 || year.len() != 4 {
            return Err(invalid());
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}
