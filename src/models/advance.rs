//! Cash advance models.
//!
//! An [`Advance`] is principal paid out to a staff member ahead of payroll and
//! recovered from later salaries according to its [`DeductionPlan`]. Every
//! recovery is recorded as an [`AdvanceDeductionEntry`], at most one per advance
//! per pay period.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MonthYear;
use crate::error::{EngineError, EngineResult};

/// How an advance is recovered from salary.
///
/// Serialized with a `plan` tag, e.g. `{"plan": "monthly", "installment": "1000"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum DeductionPlan {
    /// A fixed installment each month.
    Monthly {
        /// Amount recovered per month.
        #[serde(alias = "monthly_deduction_amount")]
        installment: Decimal,
    },
    /// A fixed installment for every week that overlaps the pay period.
    Weekly {
        /// Amount recovered per overlapping week.
        #[serde(alias = "monthly_deduction_amount")]
        installment: Decimal,
    },
    /// The whole outstanding balance in the next pay period.
    LumpSum,
}

impl DeductionPlan {
    /// The per-installment amount, if the plan has one.
    pub fn installment(&self) -> Option<Decimal> {
        match self {
            DeductionPlan::Monthly { installment } | DeductionPlan::Weekly { installment } => {
                Some(*installment)
            }
            DeductionPlan::LumpSum => None,
        }
    }
}

/// Lifecycle state of an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceStatus {
    /// Balance outstanding; deducted by payroll runs.
    Active,
    /// Balance fully recovered.
    Completed,
    /// Withdrawn by an administrator; never deducted again.
    Cancelled,
}

impl std::fmt::Display for AdvanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvanceStatus::Active => write!(f, "active"),
            AdvanceStatus::Completed => write!(f, "completed"),
            AdvanceStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A cash advance and its outstanding balance.
///
/// Invariants: `0 <= remaining_balance <= advance_amount`, and the status is
/// `Completed` exactly when the balance is zero (unless cancelled first).
/// `version` increases on every mutation and guards optimistic updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    /// Unique identifier for the advance.
    pub id: Uuid,
    /// The staff member who received the advance.
    pub staff_id: String,
    /// Original principal.
    pub advance_amount: Decimal,
    /// The date the advance was paid out.
    pub issue_date: NaiveDate,
    /// How the advance is recovered.
    pub deduction_plan: DeductionPlan,
    /// Principal not yet recovered.
    pub remaining_balance: Decimal,
    /// Lifecycle state.
    pub status: AdvanceStatus,
    /// Optimistic concurrency version.
    pub version: u64,
    /// Free-text reason recorded at issue.
    #[serde(default)]
    pub reason: Option<String>,
    /// When the advance was recorded.
    pub created_at: DateTime<Utc>,
}

impl Advance {
    /// Returns true if payroll may still deduct from this advance.
    pub fn is_active(&self) -> bool {
        self.status == AdvanceStatus::Active
    }

    /// Principal recovered so far.
    pub fn total_deducted(&self) -> Decimal {
        self.advance_amount - self.remaining_balance
    }

    /// Applies a recovered amount to the balance, completing the advance when
    /// the balance reaches zero.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Advance, AdvanceStatus, DeductionPlan};
    /// use chrono::{NaiveDate, Utc};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let mut advance = Advance {
    ///     id: Uuid::new_v4(),
    ///     staff_id: "stf_001".to_string(),
    ///     advance_amount: Decimal::new(1000, 0),
    ///     issue_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
    ///     deduction_plan: DeductionPlan::LumpSum,
    ///     remaining_balance: Decimal::new(1000, 0),
    ///     status: AdvanceStatus::Active,
    ///     version: 0,
    ///     reason: None,
    ///     created_at: Utc::now(),
    /// };
    /// advance.apply_deduction(Decimal::new(1000, 0)).unwrap();
    /// assert_eq!(advance.status, AdvanceStatus::Completed);
    /// assert_eq!(advance.version, 1);
    /// ```
    pub fn apply_deduction(&mut self, amount: Decimal) -> EngineResult<()> {
        if !self.is_active() {
            return Err(EngineError::InvalidAdvance {
                advance_id: self.id,
                message: format!("cannot deduct from a {} advance", self.status),
            });
        }
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAdvance {
                advance_id: self.id,
                message: format!("deduction must be positive, got {}", amount),
            });
        }
        if amount > self.remaining_balance {
            return Err(EngineError::InvalidAdvance {
                advance_id: self.id,
                message: format!(
                    "deduction {} exceeds remaining balance {}",
                    amount, self.remaining_balance
                ),
            });
        }

        self.remaining_balance -= amount;
        if self.remaining_balance.is_zero() {
            self.status = AdvanceStatus::Completed;
        }
        self.version += 1;
        Ok(())
    }

    /// Cancels an active advance. The outstanding balance is left as recorded.
    pub fn cancel(&mut self) -> EngineResult<()> {
        match self.status {
            AdvanceStatus::Active => {
                self.status = AdvanceStatus::Cancelled;
                self.version += 1;
                Ok(())
            }
            AdvanceStatus::Completed | AdvanceStatus::Cancelled => {
                Err(EngineError::InvalidAdvance {
                    advance_id: self.id,
                    message: format!("cannot cancel a {} advance", self.status),
                })
            }
        }
    }
}

/// Request to issue a new advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdvance {
    /// The staff member receiving the advance.
    pub staff_id: String,
    /// Principal to pay out.
    pub advance_amount: Decimal,
    /// The payout date.
    pub issue_date: NaiveDate,
    /// How the advance is recovered.
    pub deduction_plan: DeductionPlan,
    /// Optional reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// One recovery of an advance against one salary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceDeductionEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The advance recovered from.
    pub advance_id: Uuid,
    /// The salary record the recovery was deducted on.
    pub salary_record_id: Uuid,
    /// The pay period. `(advance_id, month_year)` is unique.
    pub month_year: MonthYear,
    /// Amount recovered.
    pub amount_applied: Decimal,
    /// When the recovery was committed.
    pub applied_at: DateTime<Utc>,
}

/// A projected future recovery of an advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDeduction {
    /// The pay period.
    pub month_year: MonthYear,
    /// Amount due in that period.
    pub amount: Decimal,
    /// Balance left after the deduction.
    pub remaining_after: Decimal,
}
