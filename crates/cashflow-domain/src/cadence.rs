//! Calendar stepping used to expand recurring series.

use std::fmt;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Step between two occurrences of a series: whole calendar months first, then days.
///
/// Month steps follow the calendar and clamp to the end of shorter months, so
/// stepping one month from Jan 31 lands on the last day of February.
pub struct Cadence {
    pub days: u32,
    pub months: u32,
}

impl Cadence {
    pub const fn new(days: u32, months: u32) -> Self {
        Self { days, months }
    }

    /// Validates signed inputs coming from an editor or an import.
    pub fn try_from_signed(days: i64, months: i64) -> Result<Self, CadenceError> {
        let days = u32::try_from(days).map_err(|_| CadenceError::Negative {
            field: "days",
            value: days,
        })?;
        let months = u32::try_from(months).map_err(|_| CadenceError::Negative {
            field: "months",
            value: months,
        })?;
        Ok(Self { days, months })
    }

    /// A zero step never produces occurrences.
    pub fn is_dormant(&self) -> bool {
        self.days == 0 && self.months == 0
    }

    /// Returns the date one step after `from`, or `None` past the calendar range.
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        from.checked_add_months(Months::new(self.months))?
            .checked_add_signed(Duration::days(i64::from(self.days)))
    }

    pub fn label(&self) -> String {
        match (self.days, self.months) {
            (0, 0) => "Dormant".into(),
            (1, 0) => "Daily".into(),
            (7, 0) => "Weekly".into(),
            (0, 1) => "Monthly".into(),
            (0, 12) => "Yearly".into(),
            (d, 0) => format!("Every {d} days"),
            (0, m) => format!("Every {m} months"),
            (d, m) => format!("Every {m} month{} and {d} day{}", plural(m), plural(d)),
        }
    }
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Moves `date` by a signed number of calendar months, clamping the day.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rejected cadence definitions.
pub enum CadenceError {
    Negative { field: &'static str, value: i64 },
}

impl fmt::Display for CadenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CadenceError::Negative { field, value } => {
                write!(f, "series {field} must be zero or positive (got {value})")
            }
        }
    }
}

impl std::error::Error for CadenceError {}
