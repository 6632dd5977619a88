//! Per-occurrence corrections keyed by series id and date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What happens to a single occurrence of a series.
pub enum OccurrenceOverride {
    /// The occurrence stays in the ledger but is ignored by the running balance.
    Cancel,
    /// The occurrence amount is replaced.
    Amount(Money),
}

impl OccurrenceOverride {
    fn from_stored(value: Option<Money>) -> Self {
        match value {
            None => OccurrenceOverride::Cancel,
            Some(amount) => OccurrenceOverride::Amount(amount),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
/// Nested `series id -> date -> amount | null` map.
///
/// A `null` value cancels the occurrence, a number replaces its amount and an
/// absent key leaves it untouched.
pub struct OverrideStore {
    entries: BTreeMap<String, BTreeMap<NaiveDate, Option<Money>>>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, series_id: &str, date: NaiveDate) -> Option<OccurrenceOverride> {
        self.entries
            .get(series_id)
            .and_then(|dates| dates.get(&date))
            .map(|value| OccurrenceOverride::from_stored(*value))
    }

    pub fn set_amount(&mut self, series_id: &str, date: NaiveDate, amount: Money) {
        self.insert(series_id, date, Some(amount));
    }

    pub fn cancel(&mut self, series_id: &str, date: NaiveDate) {
        self.insert(series_id, date, None);
    }

    /// Lifts a cancellation; amount replacements are left in place.
    ///
    /// Returns `true` when an entry was removed.
    pub fn restore(&mut self, series_id: &str, date: NaiveDate) -> bool {
        match self.get(series_id, date) {
            Some(OccurrenceOverride::Cancel) => self.clear(series_id, date),
            _ => false,
        }
    }

    /// Removes any override for the occurrence. Returns `true` when one existed.
    pub fn clear(&mut self, series_id: &str, date: NaiveDate) -> bool {
        let Some(dates) = self.entries.get_mut(series_id) else {
            return false;
        };
        let removed = dates.remove(&date).is_some();
        if dates.is_empty() {
            self.entries.remove(series_id);
        }
        removed
    }

    /// Drops every override of a series, e.g. when the series is deleted.
    pub fn remove_series(&mut self, series_id: &str) -> usize {
        self.entries
            .remove(series_id)
            .map(|dates| dates.len())
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate, OccurrenceOverride)> {
        self.entries.iter().flat_map(|(series_id, dates)| {
            dates.iter().map(move |(date, value)| {
                (
                    series_id.as_str(),
                    *date,
                    OccurrenceOverride::from_stored(*value),
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, series_id: &str, date: NaiveDate, value: Option<Money>) {
        self.entries
            .entry(series_id.to_string())
            .or_default()
            .insert(date, value);
    }
}
