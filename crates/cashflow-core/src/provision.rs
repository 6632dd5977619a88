//! Amortized set-aside amounts for irregular recurring costs.

use std::collections::BTreeMap;

use serde::Serialize;

use cashflow_domain::{DateWindow, LedgerEntry, Money, OverrideStore, RecurringSeries};

use crate::{aggregation::series_entries, overrides::apply_overrides, CoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provision {
    pub series_id: String,
    pub description: String,
    pub period_total: Money,
    pub year_total: Money,
    pub smoothed: Money,
    pub provision: Money,
}

/// Compares what each series costs in `window` with its yearly total spread
/// over the window's month count.
///
/// Rows whose provision is zero are dropped; the rest are ordered by series
/// id then description.
pub fn provisions(
    window: &DateWindow,
    series: &[RecurringSeries],
    overrides: &OverrideStore,
) -> Result<Vec<Provision>, CoreError> {
    let months = period_months(window.length_days());
    let year = window.year_from_start()?;
    let period_totals = totals_by_series(window, series, overrides);
    let year_totals = totals_by_series(&year, series, overrides);

    let mut keys: Vec<&(String, String)> = period_totals.keys().chain(year_totals.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut rows = Vec::new();
    for key in keys {
        let period_total = period_totals.get(key).copied().unwrap_or_default();
        let year_total = year_totals.get(key).copied().unwrap_or_default();
        let smoothed = year_total.scale_half_even(months, 12)?;
        let provision = smoothed - period_total;
        if provision.is_zero() {
            continue;
        }
        rows.push(Provision {
            series_id: key.0.clone(),
            description: key.1.clone(),
            period_total,
            year_total,
            smoothed,
            provision,
        });
    }
    Ok(rows)
}

/// Whole months in a window of `days`, rounding halves to even.
pub fn period_months(days: i64) -> i64 {
    let whole = days.div_euclid(30);
    let twice_rest = 2 * days.rem_euclid(30);
    if twice_rest > 30 || (twice_rest == 30 && whole % 2 == 1) {
        whole + 1
    } else {
        whole
    }
}

fn totals_by_series(
    window: &DateWindow,
    series: &[RecurringSeries],
    overrides: &OverrideStore,
) -> BTreeMap<(String, String), Money> {
    let mut entries: Vec<LedgerEntry> = series_entries(window, series);
    apply_overrides(&mut entries, overrides);
    let mut totals = BTreeMap::new();
    for entry in entries {
        let Some(series_id) = entry.series_id else {
            continue;
        };
        *totals
            .entry((series_id, entry.description))
            .or_insert(Money::ZERO) += entry.amount;
    }
    totals
}
