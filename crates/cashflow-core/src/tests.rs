use chrono::NaiveDate;

use crate::{
    profile_service::ProfileService,
    reconciliation::AdjustmentPolicy,
    storage::profile_warnings,
    time::{Clock, FixedClock},
    view::{CashflowView, SessionContext},
    CoreError,
};
use cashflow_domain::{
    Cadence, DateWindow, Money, OccurrenceOverride, OneOff, RecurringSeries,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn january_context() -> SessionContext {
    let window = DateWindow::new(date(2024, 1, 1), date(2024, 2, 1)).unwrap();
    SessionContext::new(window, date(2024, 1, 15))
}

#[test]
fn profile_service_rejects_blank_names() {
    assert!(matches!(
        ProfileService::create("   "),
        Err(CoreError::Validation(_))
    ));
    let profile = ProfileService::create(" Household ").expect("create profile");
    assert_eq!(profile.name, "Household");
}

#[test]
fn removing_series_drops_its_overrides() {
    let mut profile = ProfileService::create("Overrides").unwrap();
    let rent = RecurringSeries::new("Housing", "rent", Money::from_cents(-90000), Cadence::new(0, 1))
        .starting(date(2024, 1, 5));
    let id = ProfileService::add_series(&mut profile, rent).expect("add series");
    ProfileService::cancel_occurrence(&mut profile, &id, date(2024, 1, 5)).expect("cancel");
    assert_eq!(
        profile.overrides.get(&id, date(2024, 1, 5)),
        Some(OccurrenceOverride::Cancel)
    );

    ProfileService::remove_series(&mut profile, &id).expect("remove series");
    assert!(profile.overrides.is_empty());
    assert!(matches!(
        ProfileService::remove_series(&mut profile, &id),
        Err(CoreError::SeriesNotFound(_))
    ));
}

#[test]
fn overrides_require_known_series() {
    let mut profile = ProfileService::create("Unknown").unwrap();
    let err = ProfileService::set_override_amount(&mut profile, "missing", date(2024, 1, 1), Money::ZERO)
        .unwrap_err();
    assert!(matches!(err, CoreError::SeriesNotFound(_)));
}

#[test]
fn series_with_reversed_bounds_is_rejected() {
    let mut profile = ProfileService::create("Bounds").unwrap();
    let series = RecurringSeries::new("Misc", "broken", Money::from_cents(-100), Cadence::new(0, 1))
        .starting(date(2024, 3, 1))
        .ending(date(2024, 2, 1));
    assert!(ProfileService::add_series(&mut profile, series).is_err());
}

#[test]
fn rename_category_reaches_budgets() {
    let mut profile = ProfileService::create("Rename").unwrap();
    ProfileService::add_one_off(
        &mut profile,
        OneOff::new("Food", "market", Money::from_cents(1200), date(2024, 1, 3)),
    )
    .unwrap();
    ProfileService::create_budget(&mut profile, "lean").unwrap();
    ProfileService::add_budget_series(
        &mut profile,
        "lean",
        RecurringSeries::new("Food", "groceries", Money::from_cents(5000), Cadence::new(7, 0)),
    )
    .unwrap();
    ProfileService::add_series(
        &mut profile,
        RecurringSeries::new("Housing", "rent", Money::from_cents(-90000), Cadence::new(0, 1)),
    )
    .unwrap();

    let changed = ProfileService::rename_category(&mut profile, "Food", "Groceries").unwrap();
    assert_eq!(changed, 2);
    assert_eq!(profile.one_offs[0].category, "Groceries");
    assert_eq!(profile.budgets["lean"].series[0].category, "Groceries");
    assert_eq!(profile.series[0].category, "Housing");
}

#[test]
fn duplicate_budget_names_are_rejected() {
    let mut profile = ProfileService::create("Budgets").unwrap();
    ProfileService::create_budget(&mut profile, "lean").unwrap();
    assert!(matches!(
        ProfileService::create_budget(&mut profile, "lean"),
        Err(CoreError::InvalidOperation(_))
    ));
    assert!(ProfileService::remove_budget(&mut profile, "lean").is_ok());
    assert!(ProfileService::remove_budget(&mut profile, "lean").is_err());
}

#[test]
fn view_without_checkpoints_starts_from_zero() {
    let mut profile = ProfileService::create("Empty").unwrap();
    ProfileService::add_one_off(
        &mut profile,
        OneOff::new("Everyday", "coffee", Money::from_cents(450), date(2024, 1, 10)),
    )
    .unwrap();
    let view = CashflowView::compute(&profile, &january_context()).unwrap();
    assert_eq!(view.offset, Money::ZERO);
    assert!(view.adjustments.is_empty());
    assert_eq!(view.period_net, Money::from_cents(-450));
    assert_eq!(view.balance.len(), 32);
    assert_eq!(view.today_balance, Some(Money::from_cents(-450)));
    assert!(view.budget.is_none());
}

#[test]
fn view_calibrates_on_latest_checkpoint() {
    let mut profile = ProfileService::create("Calibrated").unwrap();
    ProfileService::add_series(
        &mut profile,
        RecurringSeries::new("Income", "salary", Money::from_cents(200000), Cadence::new(0, 1))
            .starting(date(2023, 12, 25)),
    )
    .unwrap();
    ProfileService::record_checkpoint(&mut profile, date(2024, 1, 10), Money::from_cents(50000));

    let view = CashflowView::compute(&profile, &january_context()).unwrap();
    assert_eq!(view.offset, Money::from_cents(50000));
    assert_eq!(view.closing_balance(), Money::from_cents(250000));
    assert_eq!(view.period_net, Money::from_cents(200000));
}

#[test]
fn view_reports_unknown_budget() {
    let profile = ProfileService::create("NoBudget").unwrap();
    let ctx = january_context().with_budget(Some("missing".into()));
    assert!(matches!(
        CashflowView::compute(&profile, &ctx),
        Err(CoreError::BudgetNotFound(_))
    ));
}

#[test]
fn view_builds_budget_comparison() {
    let mut profile = ProfileService::create("Budgeted").unwrap();
    ProfileService::add_one_off(
        &mut profile,
        OneOff::new("Food", "market", Money::from_cents(30000), date(2024, 1, 3)),
    )
    .unwrap();
    ProfileService::create_budget(&mut profile, "lean").unwrap();
    ProfileService::add_budget_one_off(
        &mut profile,
        "lean",
        OneOff::new("Food", "groceries", Money::from_cents(20000), date(2024, 1, 3)),
    )
    .unwrap();

    let ctx = january_context()
        .with_budget(Some("lean".into()))
        .with_policy(AdjustmentPolicy::default());
    let view = CashflowView::compute(&profile, &ctx).unwrap();
    let comparison = view.category_comparison().expect("budget active");
    assert_eq!(comparison.len(), 1);
    assert_eq!(comparison[0].overspend(), Money::from_cents(10000));
}

#[test]
fn profile_warnings_flag_orphan_overrides() {
    let mut profile = ProfileService::create("Warnings").unwrap();
    profile.overrides.cancel("ghost", date(2024, 1, 1));
    let warnings = profile_warnings(&profile);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("ghost"));
}

#[test]
fn fixed_clock_reports_its_day() {
    let clock = FixedClock(date(2024, 2, 29));
    assert_eq!(clock.today(), date(2024, 2, 29));
}
