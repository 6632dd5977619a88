//! Recurring series and one-off movements as authored by the user.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    cadence::Cadence,
    common::{new_record_id, Categorized, Displayable, Identifiable},
    money::Money,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A recurring movement expanded into dated occurrences.
///
/// `amount` follows the ledger convention (negative = outflow). `last` is an
/// inclusive bound; `days` and `months` together form the [`Cadence`].
pub struct RecurringSeries {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub first: Option<NaiveDate>,
    #[serde(default)]
    pub last: Option<NaiveDate>,
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub months: u32,
}

impl RecurringSeries {
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Money,
        cadence: Cadence,
    ) -> Self {
        Self {
            id: new_record_id(),
            category: category.into(),
            tags: Vec::new(),
            description: description.into(),
            amount,
            first: None,
            last: None,
            days: cadence.days,
            months: cadence.months,
        }
    }

    pub fn starting(mut self, first: NaiveDate) -> Self {
        self.first = Some(first);
        self
    }

    pub fn ending(mut self, last: NaiveDate) -> Self {
        self.last = Some(last);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn cadence(&self) -> Cadence {
        Cadence::new(self.days, self.months)
    }

    /// Exclusive upper bound derived from the inclusive `last` date.
    pub fn end_exclusive(&self) -> Option<NaiveDate> {
        self.last
            .and_then(|last| last.checked_add_signed(Duration::days(1)))
    }
}

impl Identifiable for RecurringSeries {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Categorized for RecurringSeries {
    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn set_category(&mut self, category: String) {
        self.category = category;
    }
}

impl Displayable for RecurringSeries {
    fn display_label(&self) -> String {
        format!(
            "{} [{}] {} ({})",
            self.description,
            self.category,
            self.amount,
            self.cadence().label()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A single dated movement.
///
/// Stored as an outflow magnitude: a positive `amount` leaves the account and
/// enters the ledger negated.
pub struct OneOff {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
}

impl OneOff {
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: new_record_id(),
            category: category.into(),
            tags: Vec::new(),
            description: description.into(),
            amount,
            date,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Amount as it appears in the ledger.
    pub fn ledger_amount(&self) -> Money {
        -self.amount
    }
}

impl Identifiable for OneOff {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Categorized for OneOff {
    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn set_category(&mut self, category: String) {
        self.category = category;
    }
}

impl Displayable for OneOff {
    fn display_label(&self) -> String {
        format!(
            "{} {} [{}] {}",
            self.date, self.description, self.category, self.amount
        )
    }
}
