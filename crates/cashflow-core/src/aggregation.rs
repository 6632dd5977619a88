//! Builds the flat real and budget ledgers from series and one-offs.

use cashflow_domain::{DateWindow, LedgerEntry, OneOff, OverrideStore, RecurringSeries};

use crate::{occurrence::expand_occurrences, overrides::apply_overrides};

/// One-offs dated inside `window`, entered with their sign inverted.
pub fn one_off_entries(window: &DateWindow, one_offs: &[OneOff]) -> Vec<LedgerEntry> {
    one_offs
        .iter()
        .filter(|one_off| window.contains(one_off.date))
        .map(|one_off| LedgerEntry {
            date: one_off.date,
            category: one_off.category.clone(),
            tags: one_off.tags.clone(),
            description: one_off.description.clone(),
            amount: one_off.ledger_amount(),
            series_id: None,
            is_ignored: false,
        })
        .collect()
}

/// Every occurrence of every series inside `window`, carrying the series amount.
pub fn series_entries<'a, I>(window: &DateWindow, series: I) -> Vec<LedgerEntry>
where
    I: IntoIterator<Item = &'a RecurringSeries>,
{
    let mut entries = Vec::new();
    for definition in series {
        for date in expand_occurrences(definition, window) {
            entries.push(LedgerEntry {
                date,
                category: definition.category.clone(),
                tags: definition.tags.clone(),
                description: definition.description.clone(),
                amount: definition.amount,
                series_id: Some(definition.id.clone()),
                is_ignored: false,
            });
        }
    }
    entries
}

/// The ledger of recorded movements over `window` with overrides applied.
///
/// One-off entries come first, followed by series occurrences in series order.
pub fn build_real_ledger(
    window: &DateWindow,
    series: &[RecurringSeries],
    one_offs: &[OneOff],
    overrides: &OverrideStore,
) -> Vec<LedgerEntry> {
    let mut entries = one_off_entries(window, one_offs);
    entries.extend(series_entries(window, series));
    apply_overrides(&mut entries, overrides);
    entries
}

/// A hypothetical ledger combining the real series with a budget plan.
///
/// Budget series are authored as outflow magnitudes and are negated before
/// merging. The override store is never consulted.
pub fn build_budget_ledger(
    window: &DateWindow,
    real_series: &[RecurringSeries],
    budget_series: &[RecurringSeries],
    budget_one_offs: &[OneOff],
) -> Vec<LedgerEntry> {
    let negated: Vec<RecurringSeries> = budget_series
        .iter()
        .map(|definition| RecurringSeries {
            amount: -definition.amount,
            ..definition.clone()
        })
        .collect();
    let mut entries = one_off_entries(window, budget_one_offs);
    entries.extend(series_entries(window, real_series.iter().chain(negated.iter())));
    entries
}
