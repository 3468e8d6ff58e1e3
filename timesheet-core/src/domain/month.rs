use std::fmt;

use thiserror::Error;
use time::{error::ComponentRange, Date, Month, OffsetDateTime};

#[derive(Error, Debug)]
pub enum MonthError {
    #[error("invalid month number: {0}")]
    InvalidMonth(u8),
    #[error("month out of range: {0}")]
    OutOfRange(#[from] ComponentRange),
}

/// A calendar month that activity is reported for.
///
/// Both ends are inclusive: every instant whose calendar date (in its own UTC
/// offset) falls between the first and the last day of the month is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetMonth {
    first_day: Date,
    last_day: Date,
}

impl TargetMonth {
    /// `month` is 1-based, January is `1`.
    pub fn new(year: i32, month: u8) -> Result<Self, MonthError> {
        let month = Month::try_from(month).map_err(|_| MonthError::InvalidMonth(month))?;
        let first_day = Date::from_calendar_date(year, month, 1)?;

        // Day zero of the following month.
        let (next_year, next_month) = match month {
            Month::December => (year + 1, Month::January),
            m => (year, m.next()),
        };
        let last_day = Date::from_calendar_date(next_year, next_month, 1)?
            .previous_day()
            .ok_or_else(|| MonthError::InvalidMonth(month as u8))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    pub fn containing(date: Date) -> Result<Self, MonthError> {
        Self::new(date.year(), date.month() as u8)
    }

    /// The month before this one, rolling over into the previous year.
    pub fn previous(&self) -> Result<Self, MonthError> {
        let day_before = self
            .first_day
            .previous_day()
            .ok_or_else(|| MonthError::InvalidMonth(self.month() as u8))?;
        Self::containing(day_before)
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    pub fn first_day(&self) -> Date {
        self.first_day
    }

    pub fn last_day(&self) -> Date {
        self.last_day
    }

    pub fn contains(&self, timestamp: OffsetDateTime) -> bool {
        let date = timestamp.date();
        date >= self.first_day && date <= self.last_day
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month() as u8)
    }
}
