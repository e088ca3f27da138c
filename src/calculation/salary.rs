//! Salary calculation.
//!
//! This module turns a staff member's period aggregates into a
//! [`SalaryBreakdown`] with an audit step for every rule applied. It performs
//! no I/O.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;

use crate::models::{AuditStep, AuditTrace, AuditWarning, SalaryBreakdown};

/// Warning code: the period has no working days.
pub const WARNING_ZERO_WORKING_DAYS: &str = "ZERO_WORKING_DAYS";
/// Warning code: more present days than working days.
pub const WARNING_PRESENT_EXCEEDS_WORKING: &str = "PRESENT_EXCEEDS_WORKING";
/// Warning code: negative achieved sales were treated as zero.
pub const WARNING_NEGATIVE_SALES: &str = "NEGATIVE_SALES";
/// Warning code: part of the advance due could not be recovered.
pub const WARNING_DEFERRED_DEDUCTION: &str = "DEFERRED_DEDUCTION";

/// Everything the calculator needs for one staff member and one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryInputs {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Staff commission percentage on achieved sales.
    pub incentive_percentage: Decimal,
    /// Working days in the period.
    pub working_days: u32,
    /// Present credit for the period.
    pub present_days: Decimal,
    /// Sundays in the period.
    pub sunday_count: u32,
    /// Sales achieved in the period.
    pub achieved_sales: Decimal,
    /// Total target amount of the applicable target, if any.
    pub target_amount: Option<Decimal>,
    /// Advance recovery due this period.
    pub advance_due: Decimal,
}

/// The result of a salary calculation, including the breakdown and audit trace.
#[derive(Debug, Clone)]
pub struct SalaryCalculationResult {
    /// The monetary breakdown.
    pub breakdown: SalaryBreakdown,
    /// One step per rule, plus any warnings.
    pub audit_trace: AuditTrace,
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculates the salary breakdown for one staff member.
///
/// # Rules
///
/// 1. `salary_for_days = basic_salary / working_days * present_days`, zero
///    when there are no working days.
/// 2. `target_incentive = (achieved_sales - target) * over_achievement_rate`
///    when a target exists and was reached, otherwise zero.
/// 3. `basic_incentive = achieved_sales * incentive_percentage / 100`.
/// 4. `gross_salary` is the sum of the three, rounded half-up to cents once.
///    The components are stored rounded; the rounding residual is absorbed
///    by the largest component so they still sum to gross exactly.
/// 5. `advance_deduction = min(advance_due, gross_salary)`; the remainder is
///    reported as `deferred_deduction`.
/// 6. `net_salary = gross_salary - advance_deduction`, never negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{calculate_salary, SalaryInputs};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let inputs = SalaryInputs {
///     basic_salary: Decimal::from_str("30000").unwrap(),
///     incentive_percentage: Decimal::from_str("1").unwrap(),
///     working_days: 30,
///     present_days: Decimal::from_str("25").unwrap(),
///     sunday_count: 4,
///     achieved_sales: Decimal::from_str("65000").unwrap(),
///     target_amount: Some(Decimal::from_str("50000").unwrap()),
///     advance_due: Decimal::from_str("1000").unwrap(),
/// };
///
/// let result = calculate_salary(&inputs, Decimal::from_str("0.10").unwrap());
/// let b = result.breakdown;
/// assert_eq!(b.salary_for_days, Decimal::from_str("25000").unwrap());
/// assert_eq!(b.target_incentive, Decimal::from_str("1500").unwrap());
/// assert_eq!(b.basic_incentive, Decimal::from_str("650").unwrap());
/// assert_eq!(b.gross_salary, Decimal::from_str("27150").unwrap());
/// assert_eq!(b.net_salary, Decimal::from_str("26150").unwrap());
/// ```
pub fn calculate_salary(
    inputs: &SalaryInputs,
    over_achievement_rate: Decimal,
) -> SalaryCalculationResult {
    let mut trace = AuditTrace::default();
    let mut step_number = 1;

    // Step 1: attendance pay
    let salary_for_days_raw = if inputs.working_days == 0 {
        trace.warnings.push(AuditWarning {
            code: WARNING_ZERO_WORKING_DAYS.to_string(),
            message: "Period has no working days; attendance pay is zero".to_string(),
            severity: "high".to_string(),
        });
        Decimal::ZERO
    } else {
        inputs.basic_salary / Decimal::from(inputs.working_days) * inputs.present_days
    };
    if inputs.present_days > Decimal::from(inputs.working_days) {
        trace.warnings.push(AuditWarning {
            code: WARNING_PRESENT_EXCEEDS_WORKING.to_string(),
            message: format!(
                "Present days {} exceed working days {}",
                inputs.present_days.normalize(),
                inputs.working_days
            ),
            severity: "medium".to_string(),
        });
    }
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "salary_for_days".to_string(),
        rule_name: "Attendance Pay".to_string(),
        input: json!({
            "basic_salary": inputs.basic_salary.normalize().to_string(),
            "working_days": inputs.working_days,
            "present_days": inputs.present_days.normalize().to_string(),
        }),
        output: json!({
            "salary_for_days": salary_for_days_raw.normalize().to_string(),
        }),
        reasoning: if inputs.working_days == 0 {
            "No working days in period: attendance pay is 0".to_string()
        } else {
            format!(
                "{} / {} working days × {} present days = {}",
                inputs.basic_salary.normalize(),
                inputs.working_days,
                inputs.present_days.normalize(),
                salary_for_days_raw.normalize()
            )
        },
    });
    step_number += 1;

    // Step 2: target incentive
    let achieved_sales = if inputs.achieved_sales < Decimal::ZERO {
        trace.warnings.push(AuditWarning {
            code: WARNING_NEGATIVE_SALES.to_string(),
            message: format!(
                "Achieved sales {} are negative; treated as 0",
                inputs.achieved_sales.normalize()
            ),
            severity: "medium".to_string(),
        });
        Decimal::ZERO
    } else {
        inputs.achieved_sales
    };
    let excess = match inputs.target_amount {
        Some(target) if achieved_sales >= target => achieved_sales - target,
        _ => Decimal::ZERO,
    };
    let target_incentive_raw = excess * over_achievement_rate;
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "target_incentive".to_string(),
        rule_name: "Target Over-Achievement Incentive".to_string(),
        input: json!({
            "achieved_sales": achieved_sales.normalize().to_string(),
            "target_amount": inputs.target_amount.map(|t| t.normalize().to_string()),
            "over_achievement_rate": over_achievement_rate.normalize().to_string(),
        }),
        output: json!({
            "target_incentive": target_incentive_raw.normalize().to_string(),
        }),
        reasoning: match inputs.target_amount {
            None => "No active target for period: target incentive is 0".to_string(),
            Some(target) if achieved_sales < target => format!(
                "Achieved {} below target {}: target incentive is 0",
                achieved_sales.normalize(),
                target.normalize()
            ),
            Some(target) => format!(
                "({} - {}) × {} = {}",
                achieved_sales.normalize(),
                target.normalize(),
                over_achievement_rate.normalize(),
                target_incentive_raw.normalize()
            ),
        },
    });
    step_number += 1;

    // Step 3: basic incentive
    let basic_incentive_raw = achieved_sales * inputs.incentive_percentage / Decimal::ONE_HUNDRED;
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "basic_incentive".to_string(),
        rule_name: "Basic Sales Incentive".to_string(),
        input: json!({
            "achieved_sales": achieved_sales.normalize().to_string(),
            "incentive_percentage": inputs.incentive_percentage.normalize().to_string(),
        }),
        output: json!({
            "basic_incentive": basic_incentive_raw.normalize().to_string(),
        }),
        reasoning: format!(
            "{} × {}% = {}",
            achieved_sales.normalize(),
            inputs.incentive_percentage.normalize(),
            basic_incentive_raw.normalize()
        ),
    });
    step_number += 1;

    // Step 4: gross, rounded once
    let gross_salary = round_money(salary_for_days_raw + target_incentive_raw + basic_incentive_raw);
    let mut components = [
        round_money(salary_for_days_raw),
        round_money(target_incentive_raw),
        round_money(basic_incentive_raw),
    ];
    let residual = gross_salary - components.iter().copied().sum::<Decimal>();
    if !residual.is_zero() {
        let mut largest = 0;
        for (i, value) in components.iter().enumerate() {
            if *value > components[largest] {
                largest = i;
            }
        }
        components[largest] += residual;
    }
    let [salary_for_days, target_incentive, basic_incentive] = components;
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "gross_salary".to_string(),
        rule_name: "Gross Salary".to_string(),
        input: json!({
            "salary_for_days": salary_for_days.to_string(),
            "target_incentive": target_incentive.to_string(),
            "basic_incentive": basic_incentive.to_string(),
        }),
        output: json!({
            "gross_salary": gross_salary.to_string(),
            "rounding_residual": residual.to_string(),
        }),
        reasoning: format!(
            "{} + {} + {} = {}",
            salary_for_days, target_incentive, basic_incentive, gross_salary
        ),
    });
    step_number += 1;

    // Step 5: advance deduction, clamped to gross
    let advance_due = round_money(inputs.advance_due.max(Decimal::ZERO));
    let advance_deduction = advance_due.min(gross_salary);
    let deferred_deduction = advance_due - advance_deduction;
    if deferred_deduction > Decimal::ZERO {
        trace.warnings.push(AuditWarning {
            code: WARNING_DEFERRED_DEDUCTION.to_string(),
            message: format!(
                "Advance due {} exceeds gross salary {}; {} deferred",
                advance_due, gross_salary, deferred_deduction
            ),
            severity: "medium".to_string(),
        });
    }
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "advance_deduction".to_string(),
        rule_name: "Advance Recovery".to_string(),
        input: json!({
            "advance_due": advance_due.to_string(),
            "gross_salary": gross_salary.to_string(),
        }),
        output: json!({
            "advance_deduction": advance_deduction.to_string(),
            "deferred_deduction": deferred_deduction.to_string(),
        }),
        reasoning: format!(
            "min({}, {}) = {}",
            advance_due, gross_salary, advance_deduction
        ),
    });
    step_number += 1;

    // Step 6: net
    let net_salary = gross_salary - advance_deduction;
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        input: json!({
            "gross_salary": gross_salary.to_string(),
            "advance_deduction": advance_deduction.to_string(),
        }),
        output: json!({
            "net_salary": net_salary.to_string(),
        }),
        reasoning: format!("{} - {} = {}", gross_salary, advance_deduction, net_salary),
    });

    SalaryCalculationResult {
        breakdown: SalaryBreakdown {
            basic_salary: inputs.basic_salary,
            working_days: inputs.working_days,
            present_days: inputs.present_days,
            sunday_count: inputs.sunday_count,
            achieved_sales,
            salary_for_days,
            target_incentive,
            basic_incentive,
            gross_salary,
            advance_due,
            advance_deduction,
            deferred_deduction,
            net_salary,
        },
        audit_trace: trace,
    }
}
