//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod advance;
mod attendance;
mod calculation_result;
mod pay_period;
mod run_report;
mod salary_record;
mod sales;
mod staff;

pub use advance::{
    Advance, AdvanceDeductionEntry, AdvanceStatus, DeductionPlan, NewAdvance, ScheduledDeduction,
};
pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, SalaryBreakdown, SalaryCalculation,
};
pub use pay_period::{Holiday, MonthYear, PayPeriod, PeriodDayCounts};
pub use run_report::{
    BulkTransitionReport, PayrollRunReport, SkipReason, StaffOutcome, StaffRunResult,
    TransitionFailure,
};
pub use salary_record::{PaymentStatus, SalaryRecord, SalaryStatistics};
pub use sales::{SalesRecord, Target};
pub use staff::StaffMember;
