//! Salary record models.
//!
//! A [`SalaryRecord`] is the committed result of a payroll run for one staff
//! member and one month. Its [`PaymentStatus`] moves through the approval
//! workflow; every legal move is spelled out in [`PaymentStatus::required_source`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MonthYear, SalaryBreakdown};

/// Payment state of a salary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Computed and awaiting approval.
    Pending,
    /// Approved for payment.
    Approved,
    /// Rejected. Terminal.
    Rejected,
    /// Paid. Terminal.
    Paid,
}

impl PaymentStatus {
    /// The only state a record may be in to move to `self`.
    ///
    /// `None` means no transition leads to `self`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PaymentStatus;
    ///
    /// assert_eq!(PaymentStatus::Paid.required_source(), Some(PaymentStatus::Approved));
    /// assert_eq!(PaymentStatus::Pending.required_source(), None);
    /// ```
    pub fn required_source(&self) -> Option<PaymentStatus> {
        match self {
            PaymentStatus::Pending => None,
            PaymentStatus::Approved => Some(PaymentStatus::Pending),
            PaymentStatus::Rejected => Some(PaymentStatus::Pending),
            PaymentStatus::Paid => Some(PaymentStatus::Approved),
        }
    }

    /// Returns true if a record in `self` may move to `next`.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        next.required_source() == Some(*self)
    }

    /// Returns true if no transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        match self {
            PaymentStatus::Pending | PaymentStatus::Approved => false,
            PaymentStatus::Rejected | PaymentStatus::Paid => true,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Approved => write!(f, "approved"),
            PaymentStatus::Rejected => write!(f, "rejected"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

/// A committed salary for one staff member and one month.
///
/// `(staff_id, month_year)` is unique. `gross_salary` equals the sum of its
/// three components and `net_salary = gross_salary - advance_deduction >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The staff member paid.
    pub staff_id: String,
    /// The pay period.
    pub month_year: MonthYear,
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
    /// Advance recovery applied.
    pub advance_deduction: Decimal,
    /// Advance recovery that was due but not covered by gross pay.
    pub deferred_deduction: Decimal,
    /// Pay after deductions.
    pub net_salary: Decimal,
    /// Workflow state.
    pub payment_status: PaymentStatus,
    /// Set only on the transition to `Paid`.
    pub payment_date: Option<NaiveDate>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record last changed state.
    pub updated_at: DateTime<Utc>,
}

impl SalaryRecord {
    /// Creates a pending record from a computed breakdown.
    pub fn pending(staff_id: &str, month_year: MonthYear, breakdown: &SalaryBreakdown) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            staff_id: staff_id.to_string(),
            month_year,
            basic_salary: breakdown.basic_salary,
            working_days: breakdown.working_days,
            present_days: breakdown.present_days,
            sunday_count: breakdown.sunday_count,
            achieved_sales: breakdown.achieved_sales,
            salary_for_days: breakdown.salary_for_days,
            target_incentive: breakdown.target_incentive,
            basic_incentive: breakdown.basic_incentive,
            gross_salary: breakdown.gross_salary,
            advance_deduction: breakdown.advance_deduction,
            deferred_deduction: breakdown.deferred_deduction,
            net_salary: breakdown.net_salary,
            payment_status: PaymentStatus::Pending,
            payment_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Aggregate view over a set of salary records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStatistics {
    /// Number of records.
    pub total_records: usize,
    /// Sum of net salary across records.
    pub total_net_amount: Decimal,
    /// Records awaiting approval.
    pub pending: usize,
    /// Records approved but unpaid.
    pub approved: usize,
    /// Rejected records.
    pub rejected: usize,
    /// Paid records.
    pub paid: usize,
}

impl SalaryStatistics {
    /// Tallies the given records.
    pub fn from_records(records: &[SalaryRecord]) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total_records += 1;
            stats.total_net_amount += record.net_salary;
            match record.payment_status {
                PaymentStatus::Pending => stats.pending += 1,
                PaymentStatus::Approved => stats.approved += 1,
                PaymentStatus::Rejected => stats.rejected += 1,
                PaymentStatus::Paid => stats.paid += 1,
            }
        }
        stats
    }
}
