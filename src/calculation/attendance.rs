//! Attendance aggregation.
//!
//! Reduces per-day attendance rows into the period-level working-day and
//! present-day counts a salary is computed from.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus, PayPeriod};

/// Attendance totals for one staff member over one pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days in the period that are neither non-working weekdays nor holidays.
    pub working_days: u32,
    /// Present credit: 1 per present day, 0.5 per half day.
    pub present_days: Decimal,
    /// Sundays in the period.
    pub sunday_count: u32,
    /// Distinct dated rows that were counted.
    pub recorded_days: u32,
}

/// Aggregates attendance rows for a staff member over a pay period.
///
/// Rows for other staff or outside the period are ignored. When a date has
/// more than one row the last one wins. No rows at all is a valid result:
/// zero present days against the full working-day count.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_attendance;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus, MonthYear};
/// use chrono::{NaiveDate, Weekday};
/// use rust_decimal::Decimal;
///
/// let period = MonthYear::new(2025, 1).unwrap().period();
/// let rows = vec![AttendanceRecord {
///     staff_id: "stf_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
///     status: AttendanceStatus::HalfDay,
///     check_in: None,
///     check_out: None,
/// }];
///
/// let summary = aggregate_attendance("stf_001", &period, &[Weekday::Sun], &rows);
/// assert_eq!(summary.working_days, 27);
/// assert_eq!(summary.present_days, Decimal::new(5, 1));
/// ```
pub fn aggregate_attendance(
    staff_id: &str,
    period: &PayPeriod,
    non_working_weekdays: &[Weekday],
    records: &[AttendanceRecord],
) -> AttendanceSummary {
    let counts = period.day_counts(non_working_weekdays);

    let by_date: BTreeMap<NaiveDate, AttendanceStatus> = records
        .iter()
        .filter(|r| r.staff_id == staff_id && period.contains_date(r.date))
        .map(|r| (r.date, r.status))
        .collect();

    let present_days = by_date.values().map(|s| s.present_credit()).sum();

    AttendanceSummary {
        working_days: counts.working_days,
        present_days,
        sunday_count: counts.sunday_count,
        recorded_days: by_date.len() as u32,
    }
}
