//! Advance amortization.
//!
//! One amortization rule per [`DeductionPlan`] variant, plus the helpers the
//! ledger uses to split an underfunded deduction and to project a schedule.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Advance, DeductionPlan, MonthYear, PayPeriod, ScheduledDeduction};

/// Upper bound on the number of periods a schedule projection walks.
pub const MAX_SCHEDULE_PERIODS: usize = 120;

/// The amount a plan asks for in a period, given the balance still owed.
///
/// The result never exceeds `remaining`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::plan_amount;
/// use payroll_engine::models::{DeductionPlan, MonthYear};
/// use rust_decimal::Decimal;
///
/// let period = MonthYear::new(2025, 1).unwrap().period();
/// let plan = DeductionPlan::Monthly { installment: Decimal::new(1000, 0) };
/// assert_eq!(plan_amount(&plan, Decimal::new(2500, 0), &period), Decimal::new(1000, 0));
/// assert_eq!(plan_amount(&plan, Decimal::new(400, 0), &period), Decimal::new(400, 0));
/// ```
pub fn plan_amount(plan: &DeductionPlan, remaining: Decimal, period: &PayPeriod) -> Decimal {
    if remaining <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let wanted = match plan {
        DeductionPlan::Monthly { installment } => *installment,
        DeductionPlan::Weekly { installment } => {
            *installment * Decimal::from(period.weeks_overlapping())
        }
        DeductionPlan::LumpSum => remaining,
    };
    wanted.max(Decimal::ZERO).min(remaining)
}

/// The amount due from one advance in a period.
///
/// Zero for advances that are not active or were issued after the period.
pub fn amount_due_for(advance: &Advance, period: &PayPeriod) -> Decimal {
    if !advance.is_active() || advance.issue_date > period.end_date {
        return Decimal::ZERO;
    }
    plan_amount(&advance.deduction_plan, advance.remaining_balance, period)
}

/// Splits `applied` across `dues` in order, filling each before the next.
///
/// `dues` must already be ordered oldest advance first. The returned shares
/// line up with `dues`; their sum is `min(applied, sum(dues))`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::allocate_deduction;
/// use rust_decimal::Decimal;
///
/// let dues = [Decimal::new(1000, 0), Decimal::new(500, 0)];
/// let shares = allocate_deduction(&dues, Decimal::new(1200, 0));
/// assert_eq!(shares, vec![Decimal::new(1000, 0), Decimal::new(200, 0)]);
/// ```
pub fn allocate_deduction(dues: &[Decimal], applied: Decimal) -> Vec<Decimal> {
    let mut left = applied.max(Decimal::ZERO);
    dues.iter()
        .map(|due| {
            let share = (*due).max(Decimal::ZERO).min(left);
            left -= share;
            share
        })
        .collect()
}

/// Projects the deductions an advance will produce from `from` onwards,
/// assuming each period is fully funded.
///
/// Stops when the balance reaches zero or after [`MAX_SCHEDULE_PERIODS`]
/// periods. Periods before the issue month are skipped.
pub fn project_schedule(advance: &Advance, from: MonthYear) -> EngineResult<Vec<ScheduledDeduction>> {
    let mut schedule = vec![];
    if !advance.is_active() {
        return Ok(schedule);
    }

    let mut month = from;
    let mut remaining = advance.remaining_balance;
    let mut walked = 0;

    while remaining > Decimal::ZERO && walked < MAX_SCHEDULE_PERIODS {
        let period = month.period();
        if advance.issue_date <= period.end_date {
            let amount = plan_amount(&advance.deduction_plan, remaining, &period);
            if amount > Decimal::ZERO {
                remaining -= amount;
                schedule.push(ScheduledDeduction {
                    month_year: month,
                    amount,
                    remaining_after: remaining,
                });
            }
            walked += 1;
        }
        month = month.next()?;
    }

    Ok(schedule)
}
