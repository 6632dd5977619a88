//! Derived ledger rows and daily balance points.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{common::Categorized, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// One dated, signed movement of the flat ledger.
///
/// Entries are rebuilt from series, one-offs and overrides on every query and
/// are never persisted. `series_id` links back to the series an occurrence was
/// expanded from; one-offs and synthetic adjustments carry `None`.
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub is_ignored: bool,
}

impl LedgerEntry {
    /// Amount counted by the running balance.
    pub fn effective_amount(&self) -> Money {
        if self.is_ignored {
            Money::ZERO
        } else {
            self.amount
        }
    }
}

impl Categorized for LedgerEntry {
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

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyBalancePoint {
    pub date: NaiveDate,
    pub balance: Money,
}
