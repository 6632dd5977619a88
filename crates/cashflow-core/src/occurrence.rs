//! Expansion of recurring series into dated occurrences.

use chrono::NaiveDate;
use tracing::debug;

use cashflow_domain::{DateWindow, RecurringSeries};

/// Returns every occurrence date of `series` inside `window`, ascending.
///
/// Stepping starts at `series.first` (or the window start when absent) and
/// stops before the earlier of the window end and the day after `series.last`.
/// Occurrences before the window start are stepped over, not emitted.
pub fn expand_occurrences(series: &RecurringSeries, window: &DateWindow) -> Vec<NaiveDate> {
    let cadence = series.cadence();
    if cadence.is_dormant() {
        return Vec::new();
    }

    let start = series.first.unwrap_or(window.start);
    let end = match series.end_exclusive() {
        Some(last) => last.min(window.end),
        None => window.end,
    };

    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current {
        if date >= end {
            break;
        }
        if date >= window.start {
            dates.push(date);
        }
        current = cadence.advance(date);
    }

    debug!(
        series = %series.id,
        occurrences = dates.len(),
        "expanded series in {window}"
    );
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_domain::{Cadence, Money};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
        DateWindow::new(start, end).unwrap()
    }

    fn series(days: u32, months: u32) -> RecurringSeries {
        RecurringSeries::new("Misc", "test", Money::from_cents(-100), Cadence::new(days, months))
    }

    #[test]
    fn monthly_series_yields_single_occurrence_in_month() {
        let rent = series(0, 1).starting(date(2024, 1, 5));
        let dates = expand_occurrences(&rent, &window(date(2024, 1, 1), date(2024, 2, 1)));
        assert_eq!(dates, vec![date(2024, 1, 5)]);
    }

    #[test]
    fn dormant_series_yields_nothing() {
        let dormant = series(0, 0).starting(date(2024, 1, 5));
        assert!(expand_occurrences(&dormant, &window(date(2024, 1, 1), date(2024, 2, 1))).is_empty());
    }

    #[test]
    fn occurrences_before_window_are_skipped() {
        let weekly = series(7, 0).starting(date(2023, 12, 1));
        let dates = expand_occurrences(&weekly, &window(date(2024, 1, 1), date(2024, 1, 15)));
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 12)]);
    }

    #[test]
    fn last_date_is_inclusive() {
        let daily = series(1, 0)
            .starting(date(2024, 1, 1))
            .ending(date(2024, 1, 3));
        let dates = expand_occurrences(&daily, &window(date(2024, 1, 1), date(2024, 2, 1)));
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[test]
    fn missing_first_starts_at_window_start() {
        let fortnightly = series(14, 0);
        let dates = expand_occurrences(&fortnightly, &window(date(2024, 3, 1), date(2024, 4, 1)));
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 15), date(2024, 3, 29)]);
    }

    #[test]
    fn month_end_series_drifts_after_february() {
        let payday = series(0, 1).starting(date(2024, 1, 31));
        let dates = expand_occurrences(&payday, &window(date(2024, 1, 1), date(2024, 4, 1)));
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 29)]);
    }

    #[test]
    fn series_starting_after_window_is_empty() {
        let late = series(0, 1).starting(date(2024, 5, 1));
        assert!(expand_occurrences(&late, &window(date(2024, 1, 1), date(2024, 2, 1))).is_empty());
    }
}
