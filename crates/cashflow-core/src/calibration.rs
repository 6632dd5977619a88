//! Solves the starting offset that anchors the ledger on a known balance.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use cashflow_domain::{DailyBalancePoint, DateWindow, Money, OneOff, OverrideStore, RecurringSeries};

use crate::{
    aggregation::build_real_ledger,
    balance::{balance_on, daily_balance},
    CoreError,
};

/// Returns the constant to add to ledger sums so the balance equals
/// `ref_balance` at the end of `ref_day`, expressed as the balance on the day
/// before `target_day`.
///
/// When the reference lies before the target the ledger is integrated over
/// `[ref_day, target_day)`; otherwise over `[target_day, ref_day]`.
pub fn calibrate_offset(
    ref_day: NaiveDate,
    ref_balance: Money,
    target_day: NaiveDate,
    series: &[RecurringSeries],
    one_offs: &[OneOff],
    overrides: &OverrideStore,
) -> Result<Money, CoreError> {
    let offset = if ref_day < target_day {
        let window = DateWindow::new(ref_day, target_day)?;
        let points = integrate(&window, series, one_offs, overrides);
        let before_target = lookup(&points, target_day - Duration::days(1));
        let at_reference = lookup(&points, ref_day);
        before_target + ref_balance - at_reference
    } else {
        let day_after = ref_day
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| CoreError::Validation(format!("reference day {ref_day} is out of range")))?;
        let window = DateWindow::new(target_day, day_after)?;
        let points = integrate(&window, series, one_offs, overrides);
        ref_balance - lookup(&points, ref_day)
    };
    debug!(%ref_day, %target_day, %offset, "calibrated offset");
    Ok(offset)
}

fn integrate(
    window: &DateWindow,
    series: &[RecurringSeries],
    one_offs: &[OneOff],
    overrides: &OverrideStore,
) -> Vec<DailyBalancePoint> {
    let ledger = build_real_ledger(window, series, one_offs, overrides);
    daily_balance(window, &ledger, Money::ZERO)
}

fn lookup(points: &[DailyBalancePoint], date: NaiveDate) -> Money {
    match balance_on(points, date) {
        Some(balance) => balance,
        None => panic!("daily balance has no point for {date}; calibration window is malformed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_domain::Cadence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_spend() -> RecurringSeries {
        RecurringSeries::new("Everyday", "spend", Money::from_cents(-1000), Cadence::new(1, 0))
            .starting(date(2024, 1, 1))
    }

    #[test]
    fn reference_before_target_projects_forward() {
        let offset = calibrate_offset(
            date(2024, 1, 10),
            Money::from_cents(100000),
            date(2024, 1, 15),
            &[daily_spend()],
            &[],
            &OverrideStore::new(),
        )
        .unwrap();
        // 1000.00 after Jan 10, then Jan 11..=14 spend 10.00 each.
        assert_eq!(offset, Money::from_cents(96000));
    }

    #[test]
    fn reference_after_target_reproduces_reference_balance() {
        let series = [daily_spend()];
        let overrides = OverrideStore::new();
        let offset = calibrate_offset(
            date(2024, 1, 20),
            Money::from_cents(50000),
            date(2024, 1, 15),
            &series,
            &[],
            &overrides,
        )
        .unwrap();
        assert_eq!(offset, Money::from_cents(56000));

        let window = DateWindow::new(date(2024, 1, 15), date(2024, 2, 1)).unwrap();
        let ledger = build_real_ledger(&window, &series, &[], &overrides);
        let points = daily_balance(&window, &ledger, offset);
        assert_eq!(balance_on(&points, date(2024, 1, 20)), Some(Money::from_cents(50000)));
    }

    #[test]
    fn reference_on_target_counts_that_day() {
        let offset = calibrate_offset(
            date(2024, 1, 15),
            Money::from_cents(50000),
            date(2024, 1, 15),
            &[daily_spend()],
            &[],
            &OverrideStore::new(),
        )
        .unwrap();
        assert_eq!(offset, Money::from_cents(51000));
    }
}
