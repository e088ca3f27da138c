//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite covers:
//! - Single salary calculation (pure calculator)
//! - Attendance aggregation for one staff member over one month
//! - Preview through the HTTP router
//! - Full payroll runs over 100 and 1000 staff, store seeding included
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use axum::{body::Body, http::Request};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use tower::ServiceExt;
use uuid::Uuid;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::calculation::{aggregate_attendance, calculate_salary, SalaryInputs};
use payroll_engine::config::PayrollConfig;
use payroll_engine::models::{
    AttendanceRecord, AttendanceStatus, MonthYear, SalesRecord, StaffMember, Target,
};
use payroll_engine::payroll::PayrollRunner;
use payroll_engine::store::{InMemoryStore, SeedData};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn january() -> MonthYear {
    MonthYear::new(2025, 1).unwrap()
}

/// Attendance for every non-Sunday of January, every seventh day a half day.
fn january_attendance(staff_id: &str) -> Vec<AttendanceRecord> {
    january()
        .period()
        .days()
        .filter(|d| d.weekday() != Weekday::Sun)
        .map(|date| AttendanceRecord {
            staff_id: staff_id.to_string(),
            date,
            status: if date.day() % 7 == 0 {
                AttendanceStatus::HalfDay
            } else {
                AttendanceStatus::Present
            },
            check_in: None,
            check_out: None,
        })
        .collect()
}

/// Builds reference data for `staff_count` staff with attendance, sales and a target each.
fn create_seed(staff_count: usize) -> SeedData {
    let mut seed = SeedData::default();
    for i in 0..staff_count {
        let staff_id = format!("stf_{:04}", i);
        seed.staff.push(StaffMember {
            id: staff_id.clone(),
            name: format!("Bench Staff {}", i),
            basic_salary: Some(Decimal::from(18000 + (i % 10) as i64 * 1000)),
            incentive_percentage: dec("1.5"),
            active: true,
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        });
        seed.attendance.extend(january_attendance(&staff_id));
        for (day, amount) in [(8, 21000 + i as i64 * 10), (22, 33000)] {
            seed.sales.push(SalesRecord {
                staff_id: staff_id.clone(),
                brand_id: "brand_bench".to_string(),
                sale_amount: Decimal::from(amount),
                units_sold: 3,
                sale_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            });
        }
        seed.targets.push(Target {
            id: Uuid::new_v4(),
            staff_id: staff_id.clone(),
            period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            total_target_amount: dec("50000"),
            incentive_percentage: dec("5"),
            active: true,
            created_at: Utc::now(),
        });
    }
    seed
}

/// Benchmark: Single salary calculation.
fn bench_single_calculation(c: &mut Criterion) {
    let inputs = SalaryInputs {
        basic_salary: dec("27000"),
        incentive_percentage: dec("1.5"),
        working_days: 27,
        present_days: dec("24.5"),
        sunday_count: 4,
        achieved_sales: dec("65432.10"),
        target_amount: Some(dec("50000")),
        advance_due: dec("1000"),
    };
    let rate = dec("0.10");

    c.bench_function("single_calculation", |b| {
        b.iter(|| black_box(calculate_salary(black_box(&inputs), rate)))
    });
}

/// Benchmark: One month of attendance for one staff member.
fn bench_attendance_aggregation(c: &mut Criterion) {
    let period = january().period();
    let records = january_attendance("stf_0001");

    c.bench_function("attendance_aggregation", |b| {
        b.iter(|| {
            black_box(aggregate_attendance(
                "stf_0001",
                &period,
                &[Weekday::Sun],
                black_box(&records),
            ))
        })
    });
}

/// Benchmark: Salary preview through the router.
fn bench_preview_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let seed = create_seed(10);
    let store = Arc::new(rt.block_on(InMemoryStore::from_seed(&seed)));
    let router = create_router(AppState::in_memory(PayrollConfig::default(), store));

    c.bench_function("preview_request", |b| {
        b.to_async(&rt).iter(|| async {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/payroll/preview/stf_0003/2025-01")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Full payroll runs.
///
/// Every iteration seeds a fresh store, since a second run over the same
/// store only skips.
fn bench_payroll_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("payroll_run");
    group.sample_size(10);

    for staff_count in [100usize, 1000] {
        let seed = create_seed(staff_count);
        group.throughput(Throughput::Elements(staff_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(staff_count),
            &seed,
            |b, seed| {
                b.to_async(&rt).iter(|| async {
                    let store = Arc::new(InMemoryStore::from_seed(seed).await);
                    let runner = PayrollRunner::in_memory(PayrollConfig::default(), store);
                    let report = runner.run_payroll(january()).await.unwrap();
                    assert_eq!(report.created, seed.staff.len());
                    black_box(report)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_calculation,
    bench_attendance_aggregation,
    bench_preview_request,
    bench_payroll_run,
);
criterion_main!(benches);
