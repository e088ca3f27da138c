//! Calculation result models for the payroll engine.
//!
//! This module contains the [`SalaryCalculation`] type and its associated
//! structures that capture all outputs of a salary computation: the monetary
//! breakdown and an audit trace of every rule applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MonthYear;

/// The monetary breakdown of one staff member's salary for one period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::SalaryBreakdown;
/// use rust_decimal::Decimal;
///
/// let breakdown = SalaryBreakdown {
///     basic_salary: Decimal::new(30000, 0),
///     working_days: 30,
///     present_days: Decimal::new(25, 0),
///     sunday_count: 4,
///     achieved_sales: Decimal::ZERO,
///     salary_for_days: Decimal::new(25000, 0),
///     target_incentive: Decimal::ZERO,
///     basic_incentive: Decimal::ZERO,
///     gross_salary: Decimal::new(25000, 0),
///     advance_due: Decimal::ZERO,
///     advance_deduction: Decimal::ZERO,
///     deferred_deduction: Decimal::ZERO,
///     net_salary: Decimal::new(25000, 0),
/// };
/// assert_eq!(
///     breakdown.gross_salary,
///     breakdown.salary_for_days + breakdown.target_incentive + breakdown.basic_incentive
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Monthly basic salary used.
    pub basic_salary: Decimal,
    /// Working days in the period.
    pub working_days: u32,
    /// Days present, half days counting 0.5.
    pub present_days: Decimal,
    /// Sundays in the period.
    pub sunday_count: u32,
    /// Sales achieved in the period.
    pub achieved_sales: Decimal,
    /// Attendance-based pay.
    pub salary_for_days: Decimal,
    /// Bonus for exceeding the sales target.
    pub target_incentive: Decimal,
    /// Staff-percentage commission on sales.
    pub basic_incentive: Decimal,
    /// Sum of the three pay components.
    pub gross_salary: Decimal,
    /// Advance recovery due this period.
    pub advance_due: Decimal,
    /// Advance recovery actually applied (never more than gross).
    pub advance_deduction: Decimal,
    /// `advance_due - advance_deduction`, carried to later periods.
    pub deferred_deduction: Decimal,
    /// Pay after deductions.
    pub net_salary: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of computing one staff member's salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The staff member.
    pub staff_id: String,
    /// The pay period.
    pub month_year: MonthYear,
    /// The sales target applied, if any.
    pub target_id: Option<Uuid>,
    /// The monetary result.
    pub breakdown: SalaryBreakdown,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_breakdown() -> SalaryBreakdown {
        SalaryBreakdown {
            basic_salary: dec("30000"),
            working_days: 26,
            present_days: dec("24.5"),
            sunday_count: 5,
            achieved_sales: dec("65000"),
            salary_for_days: dec("28269.23"),
            target_incentive: dec("1500.00"),
            basic_incentive: dec("650.00"),
            gross_salary: dec("30419.23"),
            advance_due: dec("1000"),
            advance_deduction: dec("1000"),
            deferred_deduction: Decimal::ZERO,
            net_salary: dec("29419.23"),
        }
    }

    #[test]
    fn test_breakdown_serializes_decimals_as_strings() {
        let json = serde_json::to_string(&create_sample_breakdown()).unwrap();
        assert!(json.contains("\"present_days\":\"24.5\""));
        assert!(json.contains("\"gross_salary\":\"30419.23\""));
        assert!(json.contains("\"working_days\":26"));
    }

    #[test]
    fn test_calculation_serializes_month_year() {
        let calculation = SalaryCalculation {
            calculation_id: Uuid::nil(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            staff_id: "stf_001".to_string(),
            month_year: MonthYear::new(2025, 1).unwrap(),
            target_id: None,
            breakdown: create_sample_breakdown(),
            audit_trace: AuditTrace::default(),
        };
        let json = serde_json::to_value(&calculation).unwrap();
        assert_eq!(json["month_year"], "2025-01");
        assert_eq!(json["target_id"], serde_json::Value::Null);
    }

    #[test]
    fn test_audit_warning_round_trip() {
        let warning = AuditWarning {
            code: "DEFERRED_DEDUCTION".to_string(),
            message: "advance recovery of 500 deferred".to_string(),
            severity: "medium".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        let back: AuditWarning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, warning);
    }
}
