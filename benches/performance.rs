use cashflow_core::{build_real_ledger, daily_balance, CashflowView, SessionContext};
use cashflow_domain::{
    Cadence, Checkpoint, DateWindow, Money, OneOff, OverrideStore, Profile, RecurringSeries,
};
use cashflow_storage_json::{load_profile_from_path, save_profile_to_path};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

fn build_sample_profile(series_count: usize, one_off_count: usize) -> Profile {
    let mut profile = Profile::new("Benchmark");
    for idx in 0..series_count {
        let cadence = match idx % 3 {
            0 => Cadence::new(7, 0),
            1 => Cadence::new(0, 1),
            _ => Cadence::new(14, 0),
        };
        let amount = Money::from_cents(-((idx as i64 % 50) + 1) * 100);
        profile.add_series(
            RecurringSeries::new("Bills", format!("series {idx}"), amount, cadence)
                .starting(start() + Duration::days((idx % 28) as i64)),
        );
    }
    for idx in 0..one_off_count {
        profile.add_one_off(OneOff::new(
            "Everyday",
            format!("purchase {idx}"),
            Money::from_cents(((idx as i64 % 90) + 10) * 10),
            start() + Duration::days((idx % 365) as i64),
        ));
    }
    for month in 0..12 {
        let date = start() + Duration::days(month * 30);
        let balance = Money::from_cents(500_000 - month * 1_000);
        profile.record_checkpoint(Checkpoint::new(date, balance));
    }
    profile
}

fn bench_year_projection(c: &mut Criterion) {
    let profile = build_sample_profile(200, 5_000);
    let year = DateWindow::new(start(), start() + Duration::days(365)).expect("window");
    let overrides = OverrideStore::new();

    c.bench_function("ledger_and_balance_year", |b| {
        b.iter(|| {
            let ledger = build_real_ledger(&year, &profile.series, &profile.one_offs, &overrides);
            let balance = daily_balance(&year, &ledger, Money::ZERO);
            black_box(balance);
        })
    });

    let ctx = SessionContext::new(year, start());
    c.bench_function("session_view_year", |b| {
        b.iter(|| {
            let view = CashflowView::compute(black_box(&profile), &ctx).expect("view");
            black_box(view);
        })
    });
}

fn bench_profile_io(c: &mut Criterion) {
    let profile = build_sample_profile(200, 5_000);
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("benchmark.json");

    c.bench_function("profile_save_5k", |b| {
        b.iter(|| save_profile_to_path(&profile, &path).expect("save profile"))
    });

    save_profile_to_path(&profile, &path).expect("seed");
    c.bench_function("profile_load_5k", |b| {
        b.iter(|| black_box(load_profile_from_path(&path).expect("load profile")))
    });
}

criterion_group!(benches, bench_year_projection, bench_profile_io);
criterion_main!(benches);
