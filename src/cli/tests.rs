use chrono::NaiveDate;
use tempfile::TempDir;

use cashflow_config::{Config, ConfigManager};
use cashflow_core::{storage::ProfileStorage, time::FixedClock};
use cashflow_domain::Money;
use cashflow_storage_json::{JsonProfileStorage, StoragePaths};

use super::context::{CliMode, CommandError, LoopControl, ShellContext};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn storage(base: &std::path::Path) -> JsonProfileStorage {
    JsonProfileStorage::new(StoragePaths {
        profile_root: base.join("profiles"),
        backup_root: base.join("backups"),
    })
    .unwrap()
}

fn shell(temp: &TempDir, today: NaiveDate) -> ShellContext {
    let base = temp.path().to_path_buf();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    ShellContext::with_parts(
        CliMode::Script,
        manager,
        Config::default(),
        Box::new(storage(&base)),
        Box::new(FixedClock(today)),
    )
    .unwrap()
}

fn run(context: &mut ShellContext, lines: &[&str]) {
    for line in lines {
        context
            .process_line(line)
            .unwrap_or_else(|err| panic!("`{line}` failed: {err}"));
    }
}

#[test]
fn window_follows_configured_cycle() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 3, 3));
    assert_eq!(context.window.start, date(2024, 3, 1));
    assert_eq!(context.window.end, date(2024, 4, 1));

    run(&mut context, &["config first-day 6", "config horizon 2"]);
    assert_eq!(context.window.start, date(2024, 2, 6));
    assert_eq!(context.window.end, date(2024, 4, 6));

    run(&mut context, &["window next"]);
    assert_eq!(context.window.start, date(2024, 3, 6));
    run(&mut context, &["window today"]);
    assert_eq!(context.window.start, date(2024, 2, 6));
}

#[test]
fn commands_require_a_profile() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 1, 15));
    let err = context.process_line("series list").unwrap_err();
    assert!(matches!(err, CommandError::ProfileNotLoaded));
}

#[test]
fn checkpoint_flow_calibrates_the_view() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 1, 15));
    run(
        &mut context,
        &[
            "profile new Demo",
            "window set 2024-01-01 1",
            "checkpoint add 2024-01-01 1000",
            "oneoff add Everyday shopping 200 2024-01-05",
            "checkpoint add 2024-01-08 850",
        ],
    );
    assert!(context.is_dirty());

    let view = context.compute_view().unwrap();
    assert_eq!(view.adjustments.len(), 1);
    assert_eq!(view.adjustments[0].ledger_amount(), Money::from_cents(5000));
    assert_eq!(view.offset, Money::from_cents(100_000));
    let on_checkpoint = view
        .balance
        .iter()
        .find(|point| point.date == date(2024, 1, 8))
        .unwrap();
    assert_eq!(on_checkpoint.balance, Money::from_cents(85_000));
}

#[test]
fn removing_a_series_drops_its_overrides() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 1, 15));
    run(
        &mut context,
        &[
            "profile new Demo",
            "series add Housing rent -900 0 1 2024-01-01",
            "override set 1 2024-02-01 -950",
            "override ignore 1 2024-03-01",
        ],
    );
    assert_eq!(context.profile().unwrap().overrides.len(), 2);

    run(&mut context, &["series remove 1"]);
    let profile = context.profile().unwrap();
    assert!(profile.series.is_empty());
    assert!(profile.overrides.is_empty());
}

#[test]
fn pending_edits_are_saved_on_exit() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 1, 15));
    run(
        &mut context,
        &["profile new Demo", "oneoff add Everyday coffee 4.50 2024-01-10"],
    );
    assert_eq!(
        context.process_line("exit").unwrap(),
        LoopControl::Exit
    );
    context.shutdown().unwrap();
    assert!(!context.is_dirty());

    let stored = storage(temp.path()).load_profile("Demo").unwrap();
    assert_eq!(stored.one_offs.len(), 1);
    assert_eq!(stored.one_offs[0].amount, Money::from_cents(450));
}

#[test]
fn active_budget_must_exist() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 1, 15));
    run(&mut context, &["profile new Demo"]);
    assert!(matches!(
        context.process_line("budget use Lean"),
        Err(CommandError::InvalidArguments(_))
    ));

    run(
        &mut context,
        &[
            "budget new Lean",
            "budget add-series Lean Everyday groceries 100 7 0 2024-01-01",
            "budget use Lean",
        ],
    );
    assert_eq!(context.active_budget().as_deref(), Some("Lean"));
    let view = context.compute_view().unwrap();
    assert!(view.budget.is_some());

    run(&mut context, &["budget remove Lean"]);
    assert_eq!(context.active_budget(), None);
}

#[test]
fn unknown_commands_continue_the_loop() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 1, 15));
    assert_eq!(
        context.process_line("balanse").unwrap(),
        LoopControl::Continue
    );
}

#[test]
fn edits_that_change_nothing_keep_the_profile_clean() {
    let temp = TempDir::new().unwrap();
    let mut context = shell(&temp, date(2024, 1, 15));
    run(
        &mut context,
        &[
            "profile new Demo",
            "series add Housing rent -900 0 1 2024-01-01",
            "profile save",
        ],
    );
    assert!(!context.is_dirty());

    run(
        &mut context,
        &[
            "override restore 1 2024-02-01",
            "override clear 1 2024-02-01",
            "rename-category Travel Holidays",
        ],
    );
    assert!(!context.is_dirty());
    assert!(!context.prompt().contains('*'));

    run(&mut context, &["override ignore 1 2024-02-01"]);
    assert!(context.is_dirty());
}
