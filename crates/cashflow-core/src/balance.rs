//! Running balance per calendar day.

use chrono::{Duration, NaiveDate};

use cashflow_domain::{DailyBalancePoint, DateWindow, LedgerEntry, Money};

/// Emits one point per day from the day before `window.start` through the
/// last day of the window.
///
/// Each point holds `offset` plus every non-ignored entry dated on or before
/// that day. Entries are sorted once and accumulated with a moving cursor.
pub fn daily_balance(
    window: &DateWindow,
    ledger: &[LedgerEntry],
    offset: Money,
) -> Vec<DailyBalancePoint> {
    let mut movements: Vec<(NaiveDate, Money)> = ledger
        .iter()
        .map(|entry| (entry.date, entry.effective_amount()))
        .collect();
    movements.sort_by_key(|(date, _)| *date);

    let first_day = window.start - Duration::days(1);
    let mut points = Vec::with_capacity(window.length_days() as usize + 1);
    let mut running = offset;
    let mut cursor = movements.iter().peekable();

    for step in 0..=window.length_days() {
        let day = first_day + Duration::days(step);
        while let Some((date, amount)) = cursor.peek() {
            if *date > day {
                break;
            }
            running += *amount;
            cursor.next();
        }
        points.push(DailyBalancePoint {
            date: day,
            balance: running,
        });
    }
    points
}

/// Looks up the balance on `date`.
pub fn balance_on(points: &[DailyBalancePoint], date: NaiveDate) -> Option<Money> {
    points
        .binary_search_by_key(&date, |point| point.date)
        .ok()
        .map(|index| points[index].balance)
}
