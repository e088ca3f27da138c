//! Calculation logic for the payroll engine.
//!
//! This module contains the pure functions a payroll run is built from:
//! attendance aggregation, sales aggregation and target selection, advance
//! amortization per deduction plan, and the salary calculation itself.

mod amortization;
mod attendance;
mod salary;
mod sales;

pub use amortization::{
    MAX_SCHEDULE_PERIODS, allocate_deduction, amount_due_for, plan_amount, project_schedule,
};
pub use attendance::{AttendanceSummary, aggregate_attendance};
pub use salary::{
    SalaryCalculationResult, SalaryInputs, WARNING_DEFERRED_DEDUCTION, WARNING_NEGATIVE_SALES,
    WARNING_PRESENT_EXCEEDS_WORKING, WARNING_ZERO_WORKING_DAYS, calculate_salary,
};
pub use sales::{SalesSummary, aggregate_sales, select_target};
