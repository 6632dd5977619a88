//! Half-open date windows and the monthly cycle they are usually built from.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cadence::shift_months;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Dates `start <= d < end`.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Builds a window; `start == end` is accepted and yields an empty window.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end < start {
            return Err(DateWindowError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the accounting cycle that contains `today`.
    ///
    /// A cycle starts on `first_day` of a month (clamped to the month length)
    /// and spans `horizon_months` calendar months.
    pub fn cycle_containing(
        today: NaiveDate,
        first_day: u32,
        horizon_months: u32,
    ) -> Result<Self, DateWindowError> {
        if !(1..=31).contains(&first_day) {
            return Err(DateWindowError::InvalidFirstDay(first_day));
        }
        if horizon_months == 0 {
            return Err(DateWindowError::InvalidHorizon);
        }
        let this_month = anchor_in_month(today.year(), today.month(), first_day)
            .ok_or(DateWindowError::OutOfCalendar)?;
        let start = if today >= this_month {
            this_month
        } else {
            let previous = shift_months(this_month.with_day(1).unwrap_or(this_month), -1)
                .ok_or(DateWindowError::OutOfCalendar)?;
            anchor_in_month(previous.year(), previous.month(), first_day)
                .ok_or(DateWindowError::OutOfCalendar)?
        };
        let months = i32::try_from(horizon_months).map_err(|_| DateWindowError::InvalidHorizon)?;
        let end = shift_months(start, months).ok_or(DateWindowError::OutOfCalendar)?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Iterates every day of the window in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.length_days()).map(move |offset| start + Duration::days(offset))
    }

    /// Moves both bounds by whole calendar months.
    pub fn shift_months(&self, months: i32) -> Result<Self, DateWindowError> {
        let start = shift_months(self.start, months).ok_or(DateWindowError::OutOfCalendar)?;
        let end = shift_months(self.end, months).ok_or(DateWindowError::OutOfCalendar)?;
        Self::new(start, end)
    }

    /// The year starting on the same day as this window.
    pub fn year_from_start(&self) -> Result<Self, DateWindowError> {
        let end = shift_months(self.start, 12).ok_or(DateWindowError::OutOfCalendar)?;
        Self::new(self.start, end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} → {})", self.start, self.end)
    }
}

fn anchor_in_month(year: i32, month: u32, first_day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = shift_months(first, 1)?;
    let last_day = (next - Duration::days(1)).day();
    NaiveDate::from_ymd_opt(year, month, first_day.min(last_day))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange { start: NaiveDate, end: NaiveDate },
    InvalidFirstDay(u32),
    InvalidHorizon,
    OutOfCalendar,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange { start, end } => {
                write!(f, "date window end {end} is before its start {start}")
            }
            DateWindowError::InvalidFirstDay(day) => {
                write!(f, "first day of month must be within 1..=31 (got {day})")
            }
            DateWindowError::InvalidHorizon => f.write_str("horizon must be at least one month"),
            DateWindowError::OutOfCalendar => f.write_str("date falls outside the calendar range"),
        }
    }
}

impl std::error::Error for DateWindowError {}
