use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fintrack::domain::{CategoryOrder, LedgerEntry, DATE_FORMAT};
use fintrack::reporting::{AggregateService, InsightService, ReportService};

const LABELS: [&str; 6] = ["Food", "Rent", "Travel", "Salary", "Books", "Health"];

fn build_entries(count: usize, offset: usize) -> Vec<LedgerEntry> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let date = start + Duration::days(((idx + offset) % 365) as i64);
            LedgerEntry::new(
                10.0 + (idx % 90) as f64,
                LABELS[idx % LABELS.len()],
                date.format(DATE_FORMAT).to_string(),
            )
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let income = build_entries(black_box(2_000), 0);
    let expenses = build_entries(black_box(8_000), 17);

    c.bench_function("aggregate_10k", |b| {
        b.iter(|| {
            let aggregate =
                AggregateService::aggregate(&income, &expenses, CategoryOrder::FirstSeen);
            black_box(InsightService::summarize(&aggregate));
        })
    });

    c.bench_function("report_10k_alphabetical", |b| {
        b.iter(|| black_box(ReportService::build(&income, &expenses, CategoryOrder::Alphabetical)))
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
