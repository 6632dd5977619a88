use cashflow_core::{
    balance_on, build_adjustments, build_budget_ledger, build_real_ledger, calibrate_offset,
    daily_balance, expand_occurrences, AdjustmentPolicy, CashflowView, ProfileService,
    SessionContext,
};
use cashflow_domain::{
    Cadence, Checkpoint, DateWindow, Money, OneOff, OverrideStore, RecurringSeries,
};
use chrono::{Duration, NaiveDate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
    DateWindow::new(start, end).expect("valid window")
}

fn money(raw: &str) -> Money {
    Money::parse(raw).expect("valid amount")
}

fn sample_series() -> Vec<RecurringSeries> {
    vec![
        RecurringSeries::new("Income", "salary", money("2400"), Cadence::new(0, 1))
            .starting(date(2023, 11, 28)),
        RecurringSeries::new("Housing", "rent", money("-950"), Cadence::new(0, 1))
            .starting(date(2023, 6, 5)),
        RecurringSeries::new("Everyday", "groceries", money("-62.35"), Cadence::new(7, 0))
            .starting(date(2023, 12, 30)),
    ]
}

#[test]
fn monthly_series_occurs_once_in_january() {
    let series = RecurringSeries::new("Housing", "rent", money("-950"), Cadence::new(0, 1))
        .starting(date(2024, 1, 5));
    assert_eq!(
        expand_occurrences(&series, &window(date(2024, 1, 1), date(2024, 2, 1))),
        vec![date(2024, 1, 5)]
    );
}

#[test]
fn one_off_outflow_is_negated_in_ledger() {
    let coffee = OneOff::new("Everyday", "coffee", money("4.50"), date(2024, 1, 10));
    let ledger = build_real_ledger(
        &window(date(2024, 1, 1), date(2024, 2, 1)),
        &[],
        &[coffee],
        &OverrideStore::new(),
    );
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount, money("-4.50"));
    assert_eq!(ledger[0].date, date(2024, 1, 10));
}

#[test]
fn cancelled_occurrence_leaves_balance_and_is_idempotent() {
    let rent = RecurringSeries::new("Housing", "rent", money("-950"), Cadence::new(0, 1))
        .starting(date(2024, 1, 5));
    let january = window(date(2024, 1, 1), date(2024, 2, 1));

    let untouched = daily_balance(
        &january,
        &build_real_ledger(&january, &[rent.clone()], &[], &OverrideStore::new()),
        Money::ZERO,
    );

    let mut overrides = OverrideStore::new();
    overrides.cancel(&rent.id, date(2024, 1, 5));
    let once = build_real_ledger(&january, &[rent.clone()], &[], &overrides);
    overrides.cancel(&rent.id, date(2024, 1, 5));
    let twice = build_real_ledger(&january, &[rent.clone()], &[], &overrides);
    assert_eq!(once, twice);
    assert!(once[0].is_ignored);

    let cancelled = daily_balance(&january, &once, Money::ZERO);
    for (before, after) in untouched.iter().zip(cancelled.iter()) {
        if before.date >= date(2024, 1, 5) {
            assert_eq!(after.balance, before.balance + money("950"));
        } else {
            assert_eq!(after.balance, before.balance);
        }
    }
}

#[test]
fn daily_steps_equal_entries_of_that_day() {
    let span = window(date(2024, 1, 1), date(2024, 3, 1));
    let mut overrides = OverrideStore::new();
    let series = sample_series();
    overrides.cancel(&series[2].id, date(2024, 1, 13));
    let ledger = build_real_ledger(
        &span,
        &series,
        &[OneOff::new("Fun", "concert", money("80"), date(2024, 2, 3))],
        &overrides,
    );
    let points = daily_balance(&span, &ledger, money("120.00"));

    assert_eq!(points.first().map(|p| p.date), Some(date(2023, 12, 31)));
    assert_eq!(points.first().map(|p| p.balance), Some(money("120.00")));
    for pair in points.windows(2) {
        let day = pair[1].date;
        let expected: Money = ledger
            .iter()
            .filter(|entry| entry.date == day && !entry.is_ignored)
            .map(|entry| entry.amount)
            .sum();
        assert_eq!(pair[1].balance - pair[0].balance, expected, "step on {day}");
    }
}

#[test]
fn offset_reproduces_reference_balance_in_both_directions() {
    let series = sample_series();
    let one_offs = vec![OneOff::new("Fun", "concert", money("80"), date(2024, 2, 3))];
    let overrides = OverrideStore::new();
    let reference = money("1532.17");

    // Reference after the target: the displayed balance hits it on the day.
    let target = date(2024, 1, 1);
    let ref_day = date(2024, 2, 10);
    let offset = calibrate_offset(ref_day, reference, target, &series, &one_offs, &overrides).unwrap();
    let shown = window(target, date(2024, 3, 1));
    let points = daily_balance(&shown, &build_real_ledger(&shown, &series, &one_offs, &overrides), offset);
    assert_eq!(balance_on(&points, ref_day), Some(reference));

    // Reference before the target: integrating forward from the reference
    // reaches the offset on the day before the target.
    let ref_day = date(2023, 12, 12);
    let offset = calibrate_offset(ref_day, reference, target, &series, &one_offs, &overrides).unwrap();
    let span = window(ref_day, target);
    let ledger = build_real_ledger(&span, &series, &one_offs, &overrides);
    let raw = daily_balance(&span, &ledger, Money::ZERO);
    let start = reference - balance_on(&raw, ref_day).unwrap();
    let anchored = daily_balance(&span, &ledger, start);
    assert_eq!(balance_on(&anchored, ref_day), Some(reference));
    assert_eq!(balance_on(&anchored, target - Duration::days(1)), Some(offset));
}

#[test]
fn split_amount_is_cent_exact() {
    let parts = money("10.00").split(3).unwrap();
    assert_eq!(parts, vec![money("3.34"), money("3.33"), money("3.33")]);
    assert_eq!(parts.iter().sum::<Money>(), money("10.00"));
    let max = parts.iter().max().unwrap();
    let min = parts.iter().min().unwrap();
    assert!(*max - *min <= money("0.01"));
}

#[test]
fn checkpoint_gap_becomes_single_adjustment() {
    let c0 = Checkpoint::new(date(2024, 1, 1), money("1000.00"));
    let c1 = Checkpoint::new(date(2024, 1, 8), money("850.00"));
    let recorded = vec![OneOff::new("Everyday", "shopping", money("200.00"), date(2024, 1, 5))];
    let overrides = OverrideStore::new();

    let adjustments = build_adjustments(
        &[c0, c1],
        &[],
        &recorded,
        &overrides,
        &AdjustmentPolicy::default(),
    )
    .unwrap();
    assert_eq!(adjustments.len(), 1);
    assert_eq!(adjustments[0].date, date(2024, 1, 8));
    assert_eq!(adjustments[0].amount, money("-50.00"));

    let mut one_offs = recorded.clone();
    one_offs.extend(adjustments);
    let between = window(date(2024, 1, 2), date(2024, 1, 9));
    let ledger = build_real_ledger(&between, &[], &one_offs, &overrides);
    let points = daily_balance(&between, &ledger, c0.net_position);
    assert_eq!(balance_on(&points, c1.date), Some(c1.net_position));
}

#[test]
fn spread_adjustments_stay_exact_at_checkpoints() {
    let c0 = Checkpoint::new(date(2024, 1, 1), money("1000.00"));
    let c1 = Checkpoint::new(date(2024, 2, 1), money("333.33"));
    let series = sample_series();
    let overrides = OverrideStore::new();
    let adjustments = build_adjustments(
        &[c0, c1],
        &series,
        &[],
        &overrides,
        &AdjustmentPolicy::default(),
    )
    .unwrap();
    // 31 days every 7 days: four shares.
    assert_eq!(adjustments.len(), 4);
    assert_eq!(adjustments[3].date, date(2024, 1, 29));

    let between = window(date(2024, 1, 2), date(2024, 2, 2));
    let ledger = build_real_ledger(&between, &series, &adjustments, &overrides);
    let points = daily_balance(&between, &ledger, c0.net_position);
    assert_eq!(balance_on(&points, c1.date), Some(c1.net_position));
}

#[test]
fn budget_series_outflow_enters_negated() {
    let budget = RecurringSeries::new("Food", "groceries", money("100"), Cadence::new(0, 1))
        .starting(date(2024, 1, 2));
    let ledger = build_budget_ledger(
        &window(date(2024, 1, 1), date(2024, 2, 1)),
        &[],
        &[budget],
        &[],
    );
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount, money("-100"));
}

#[test]
fn session_view_hits_every_checkpoint_in_window() {
    let mut profile = ProfileService::create("Reconciled").unwrap();
    for series in sample_series() {
        ProfileService::add_series(&mut profile, series).unwrap();
    }
    ProfileService::record_checkpoint(&mut profile, date(2023, 12, 20), money("2210.40"));
    ProfileService::record_checkpoint(&mut profile, date(2024, 1, 8), money("850.00"));
    ProfileService::record_checkpoint(&mut profile, date(2024, 1, 26), money("3012.99"));

    let ctx = SessionContext::new(window(date(2024, 1, 1), date(2024, 2, 1)), date(2024, 1, 15));
    let view = CashflowView::compute(&profile, &ctx).unwrap();

    assert_eq!(balance_on(&view.balance, date(2024, 1, 8)), Some(money("850.00")));
    assert_eq!(balance_on(&view.balance, date(2024, 1, 26)), Some(money("3012.99")));
    assert_eq!(view.period_net, view.closing_balance() - view.offset);
    assert!(view
        .adjustments
        .iter()
        .all(|adjustment| adjustment.description.starts_with("checkpoint auto-adjustment")));
}
