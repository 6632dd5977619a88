//! Explains gaps between consecutive checkpoints as synthetic one-offs.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cashflow_domain::{
    new_record_id, Checkpoint, DateWindow, Money, OneOff, OverrideStore, RecurringSeries,
};

use crate::{aggregation::build_real_ledger, CoreError};

pub const DEFAULT_ADJUSTMENT_CATEGORY: &str = "Everyday";
pub const DEFAULT_ADJUSTMENT_STEP_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// How synthetic adjustments are labelled and spread over time.
pub struct AdjustmentPolicy {
    pub category: String,
    pub tags: Vec<String>,
    /// Spacing of spread adjustments; `None` or `0` books one entry per gap.
    pub step_days: Option<u32>,
}

impl Default for AdjustmentPolicy {
    fn default() -> Self {
        Self {
            category: DEFAULT_ADJUSTMENT_CATEGORY.into(),
            tags: Vec::new(),
            step_days: Some(DEFAULT_ADJUSTMENT_STEP_DAYS),
        }
    }
}

impl AdjustmentPolicy {
    fn step(&self) -> Option<i64> {
        self.step_days.filter(|days| *days > 0).map(i64::from)
    }
}

/// Builds the adjustments that reconcile recorded movements with checkpoints.
///
/// For each consecutive pair the recorded ledger over `(c0.date, c1.date]`
/// (overrides applied, ignored entries included) is compared with the
/// observed change. The difference is returned as one-offs in the one-off
/// sign convention, either as a single entry on `c1.date` or, when the gap is
/// longer than the policy step, split cent-exactly into entries every
/// `step_days` after `c0.date`.
pub fn build_adjustments(
    checkpoints: &[Checkpoint],
    series: &[RecurringSeries],
    one_offs: &[OneOff],
    overrides: &OverrideStore,
    policy: &AdjustmentPolicy,
) -> Result<Vec<OneOff>, CoreError> {
    let ordered = sorted_checkpoints(checkpoints);
    let mut adjustments = Vec::new();

    for pair in ordered.windows(2) {
        let (c0, c1) = (&pair[0], &pair[1]);
        let real_delta = c1.net_position - c0.net_position;
        let theoretical_delta = recorded_delta(c0.date, c1.date, series, one_offs, overrides)?;
        let adjustment = -(real_delta - theoretical_delta);
        if adjustment.is_zero() {
            continue;
        }

        let description = format!("checkpoint auto-adjustment {} → {}", c0.date, c1.date);
        let gap = (c1.date - c0.date).num_days();
        match policy.step() {
            Some(step) if gap > step => {
                let parts = usize::try_from(gap / step)
                    .map_err(|_| CoreError::Validation(format!("gap of {gap} days is too large")))?;
                for (index, share) in adjustment.split(parts)?.into_iter().enumerate() {
                    let offset = step * (index as i64 + 1);
                    let date = c0.date + Duration::days(offset);
                    adjustments.push(adjustment_entry(policy, &description, share, date));
                }
            }
            _ => adjustments.push(adjustment_entry(policy, &description, adjustment, c1.date)),
        }
        debug!(from = %c0.date, to = %c1.date, %adjustment, "checkpoint gap reconciled");
    }

    Ok(adjustments)
}

/// Sum of every recorded entry in `(from, to]`, ignored ones included.
fn recorded_delta(
    from: NaiveDate,
    to: NaiveDate,
    series: &[RecurringSeries],
    one_offs: &[OneOff],
    overrides: &OverrideStore,
) -> Result<Money, CoreError> {
    let window = DateWindow::new(from + Duration::days(1), to + Duration::days(1))?;
    Ok(build_real_ledger(&window, series, one_offs, overrides)
        .iter()
        .map(|entry| entry.amount)
        .sum())
}

fn sorted_checkpoints(checkpoints: &[Checkpoint]) -> Vec<Checkpoint> {
    let mut ordered = checkpoints.to_vec();
    if ordered.windows(2).any(|pair| pair[0].date > pair[1].date) {
        warn!("checkpoints supplied out of order; sorting by date");
        ordered.sort_by_key(|checkpoint| checkpoint.date);
    }
    if ordered.windows(2).any(|pair| pair[0].date == pair[1].date) {
        warn!("several checkpoints share a date; the later entry wins for that day");
    }
    ordered
}

fn adjustment_entry(
    policy: &AdjustmentPolicy,
    description: &str,
    amount: Money,
    date: NaiveDate,
) -> OneOff {
    OneOff {
        id: new_record_id(),
        category: policy.category.clone(),
        tags: policy.tags.clone(),
        description: description.to_string(),
        amount,
        date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_domain::Cadence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn checkpoint(y: i32, m: u32, d: u32, cents: i64) -> Checkpoint {
        Checkpoint::new(date(y, m, d), Money::from_cents(cents))
    }

    #[test]
    fn no_adjustment_when_ledger_explains_gap() {
        let spend = OneOff::new("Everyday", "shop", Money::from_cents(15000), date(2024, 1, 4));
        let adjustments = build_adjustments(
            &[checkpoint(2024, 1, 1, 100000), checkpoint(2024, 1, 8, 85000)],
            &[],
            &[spend],
            &OverrideStore::new(),
            &AdjustmentPolicy::default(),
        )
        .unwrap();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn long_gap_is_spread_every_step() {
        let adjustments = build_adjustments(
            &[checkpoint(2024, 1, 1, 0), checkpoint(2024, 1, 22, -1000)],
            &[],
            &[],
            &OverrideStore::new(),
            &AdjustmentPolicy::default(),
        )
        .unwrap();
        let dates: Vec<NaiveDate> = adjustments.iter().map(|a| a.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 8), date(2024, 1, 15), date(2024, 1, 22)]);
        let amounts: Vec<i64> = adjustments.iter().map(|a| a.amount.cents()).collect();
        assert_eq!(amounts, vec![334, 333, 333]);
    }

    #[test]
    fn disabled_step_books_single_entry() {
        let policy = AdjustmentPolicy {
            step_days: Some(0),
            ..AdjustmentPolicy::default()
        };
        let adjustments = build_adjustments(
            &[checkpoint(2024, 1, 1, 0), checkpoint(2024, 3, 1, 5000)],
            &[],
            &[],
            &OverrideStore::new(),
            &policy,
        )
        .unwrap();
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].date, date(2024, 3, 1));
        assert_eq!(adjustments[0].amount, Money::from_cents(-5000));
    }

    #[test]
    fn ignored_occurrences_still_count_as_recorded() {
        let rent = RecurringSeries::new("Housing", "rent", Money::from_cents(-20000), Cadence::new(0, 1))
            .starting(date(2024, 1, 5));
        let mut overrides = OverrideStore::new();
        overrides.cancel(&rent.id, date(2024, 1, 5));
        let adjustments = build_adjustments(
            &[checkpoint(2024, 1, 1, 100000), checkpoint(2024, 1, 8, 80000)],
            &[rent],
            &[],
            &overrides,
            &AdjustmentPolicy::default(),
        )
        .unwrap();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn unsorted_input_is_sorted_before_pairing() {
        let adjustments = build_adjustments(
            &[checkpoint(2024, 1, 8, 85000), checkpoint(2024, 1, 1, 100000)],
            &[],
            &[],
            &OverrideStore::new(),
            &AdjustmentPolicy::default(),
        )
        .unwrap();
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].amount, Money::from_cents(15000));
        assert!(adjustments[0].description.contains("2024-01-01 → 2024-01-08"));
        assert_eq!(adjustments[0].category, DEFAULT_ADJUSTMENT_CATEGORY);
    }
}
