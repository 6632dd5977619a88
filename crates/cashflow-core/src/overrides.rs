use cashflow_domain::{LedgerEntry, OccurrenceOverride, OverrideStore};

/// Applies per-occurrence overrides to series entries in place.
///
/// A cancellation marks the entry ignored and keeps its amount, a replacement
/// sets the amount and clears the ignored flag. Entries without a series id
/// pass through untouched.
pub fn apply_overrides(entries: &mut [LedgerEntry], overrides: &OverrideStore) {
    if overrides.is_empty() {
        return;
    }
    for entry in entries.iter_mut() {
        let Some(series_id) = entry.series_id.as_deref() else {
            continue;
        };
        match overrides.get(series_id, entry.date) {
            Some(OccurrenceOverride::Cancel) => entry.is_ignored = true,
            Some(OccurrenceOverride::Amount(amount)) => {
                entry.amount = amount;
                entry.is_ignored = false;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_domain::Money;
    use chrono::NaiveDate;

    fn entry(series_id: Option<&str>, day: u32, cents: i64) -> LedgerEntry {
        LedgerEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            category: "Misc".into(),
            tags: Vec::new(),
            description: "entry".into(),
            amount: Money::from_cents(cents),
            series_id: series_id.map(str::to_string),
            is_ignored: false,
        }
    }

    #[test]
    fn cancel_and_replace_only_touch_series_entries() {
        let mut store = OverrideStore::new();
        store.cancel("rent", NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        store.set_amount("gym", NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(), Money::from_cents(-2000));

        let mut entries = vec![
            entry(Some("rent"), 5, -90000),
            entry(Some("gym"), 6, -3000),
            entry(None, 5, -450),
            entry(Some("rent"), 6, -90000),
        ];
        apply_overrides(&mut entries, &store);

        assert!(entries[0].is_ignored);
        assert_eq!(entries[0].amount, Money::from_cents(-90000));
        assert_eq!(entries[1].amount, Money::from_cents(-2000));
        assert!(!entries[1].is_ignored);
        assert!(!entries[2].is_ignored);
        assert!(!entries[3].is_ignored);
    }
}
