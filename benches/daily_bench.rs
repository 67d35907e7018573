//! Benchmarks for the daily content selector and booking calendar
//!
//! Run with: cargo bench

use argps::booking::CalendarPicker;
use argps::content::{select_daily, Catalog, DailySelector};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector");
    let catalog = Catalog::builtin();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(6, 30, 0))
        .unwrap();

    group.bench_function("select_daily", |b| {
        b.iter(|| select_daily(black_box(&catalog), black_box(start)))
    });

    let days = 366;
    group.throughput(Throughput::Elements(days as u64));
    group.bench_function("select_year", |b| {
        let selector = DailySelector::default();
        b.iter(|| {
            for i in 0..days {
                black_box(selector.select(&catalog, start + Duration::days(i)));
            }
        })
    });

    group.finish();
}

fn bench_calendar(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar");

    group.bench_function("days_grid", |b| {
        let picker = CalendarPicker::for_month(2024, 2).unwrap();
        b.iter(|| black_box(&picker).days_grid().count())
    });

    group.bench_function("navigate_year", |b| {
        b.iter(|| {
            let mut picker = CalendarPicker::for_month(2024, 1).unwrap();
            for _ in 0..12 {
                picker.next_month();
                black_box(picker.days_in_month());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_selector, bench_calendar);
criterion_main!(benches);
