//! Benchmarks for the time-summary aggregator
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use payroll_console::models::{RecordId, TimeEntry};
use payroll_console::summary::{normalize_entries, summarize, Punch, PunchKind};

/// Four punches per employee per weekday: in, break, back, out
fn create_test_punches(employees: i64, weeks: i64) -> Vec<Punch> {
    let monday = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().fixed_offset();
    let mut punches = Vec::new();

    for employee in 0..employees {
        for day in 0..weeks * 7 {
            if day % 7 >= 5 {
                continue;
            }
            let start = monday + Duration::days(day) + Duration::hours(8);
            for (kind, offset) in [
                (PunchKind::CheckIn, 0),
                (PunchKind::BreakStart, 240),
                (PunchKind::BreakEnd, 270),
                (PunchKind::CheckOut, 540 + employee % 60),
            ] {
                punches.push(Punch::new(
                    RecordId::from(employee),
                    kind,
                    start + Duration::minutes(offset),
                ));
            }
        }
    }

    punches
}

fn create_test_entries(count: usize) -> Vec<TimeEntry> {
    (0..count)
        .map(|i| TimeEntry {
            id: Some(RecordId::from(i as i64)),
            employee_id: Some(RecordId::from((i % 25) as i64)),
            punch_type: Some(if i % 2 == 0 { "check_in" } else { "check_out" }.to_string()),
            timestamp: Some(format!("2024-01-{:02}T{:02}:15:00Z", 1 + (i / 50) % 28, 8 + i % 10)),
            ..Default::default()
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for employees in [10, 100, 500] {
        let punches = create_test_punches(employees, 4);

        group.throughput(Throughput::Elements(punches.len() as u64));

        group.bench_function(format!("employees_{}", employees), |b| {
            b.iter(|| summarize(black_box(&punches)))
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for size in [1000, 10000] {
        let entries = create_test_entries(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("entries_{}", size), |b| {
            b.iter(|| normalize_entries(black_box(&entries)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize, bench_normalize);
criterion_main!(benches);
