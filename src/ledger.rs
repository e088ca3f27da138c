//! The advance ledger.
//!
//! Owns the lifecycle of cash advances: issuing and cancelling them,
//! computing what is due from a staff member in a period, and committing the
//! applied deduction together with the salary record it was taken from.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{allocate_deduction, amount_due_for, project_schedule};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Advance, AdvanceDeductionEntry, AdvanceStatus, DeductionPlan, MonthYear, NewAdvance,
    SalaryRecord, ScheduledDeduction,
};
use crate::store::{AdvanceDebit, CommittedPayroll, PayrollCommit, PayrollStore};

/// What one advance asks for in a period, and the version it was read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueLine {
    /// The advance.
    pub advance_id: Uuid,
    /// Its issue date; lines are ordered by it.
    pub issue_date: NaiveDate,
    /// The advance version the amount was computed from.
    pub version: u64,
    /// Amount due.
    pub amount: Decimal,
}

/// Everything a staff member owes on advances in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceDue {
    /// The pay period.
    pub month_year: MonthYear,
    /// Sum of the line amounts.
    pub total: Decimal,
    /// One line per advance with something due, oldest first.
    pub lines: Vec<DueLine>,
}

impl AdvanceDue {
    /// Nothing due.
    pub fn none(month_year: MonthYear) -> Self {
        Self {
            month_year,
            total: Decimal::ZERO,
            lines: vec![],
        }
    }

    /// Splits an applied deduction into per-advance debits, oldest advance
    /// first. Advances that receive nothing get no debit.
    pub fn debits(&self, applied: Decimal) -> Vec<AdvanceDebit> {
        let dues: Vec<Decimal> = self.lines.iter().map(|l| l.amount).collect();
        allocate_deduction(&dues, applied)
            .into_iter()
            .zip(&self.lines)
            .filter(|(share, _)| *share > Decimal::ZERO)
            .map(|(amount, line)| AdvanceDebit {
                advance_id: line.advance_id,
                expected_version: line.version,
                amount,
            })
            .collect()
    }
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Issues, amortizes and cancels cash advances.
#[derive(Clone)]
pub struct AdvanceLedger {
    store: Arc<dyn PayrollStore>,
}

impl AdvanceLedger {
    /// Creates a ledger over the given store.
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Computes the amount due from a staff member's active advances for a
    /// period. Reads only.
    ///
    /// Advances that already have a deduction entry for the period are
    /// skipped, so asking again after a commit yields nothing for them.
    pub async fn amount_due(&self, staff_id: &str, month_year: MonthYear) -> EngineResult<AdvanceDue> {
        let period = month_year.period();
        let mut due = AdvanceDue::none(month_year);

        for advance in self.store.list_advances(staff_id).await? {
            if !advance.is_active() {
                continue;
            }
            if self.store.has_deduction_entry(advance.id, month_year).await? {
                debug!(
                    advance_id = %advance.id,
                    month_year = %month_year,
                    "Advance already deducted for period"
                );
                continue;
            }

            let amount = amount_due_for(&advance, &period);
            debug!(
                advance_id = %advance.id,
                staff_id = %staff_id,
                month_year = %month_year,
                remaining_balance = %advance.remaining_balance,
                amount = %amount,
                "Planned advance deduction"
            );
            if amount > Decimal::ZERO {
                due.total += amount;
                due.lines.push(DueLine {
                    advance_id: advance.id,
                    issue_date: advance.issue_date,
                    version: advance.version,
                    amount,
                });
            }
        }

        Ok(due)
    }

    /// Commits a salary record together with the advance deductions it
    /// applied, in one store transaction.
    pub async fn commit(&self, record: SalaryRecord, due: &AdvanceDue) -> EngineResult<CommittedPayroll> {
        let debits = due.debits(record.advance_deduction);
        let committed = self.store.commit_payroll(PayrollCommit { record, debits }).await?;

        for entry in &committed.entries {
            info!(
                advance_id = %entry.advance_id,
                record_id = %entry.salary_record_id,
                month_year = %entry.month_year,
                amount = %entry.amount_applied,
                "Advance deduction committed"
            );
        }
        for advance in committed.advances.iter().filter(|a| a.status == AdvanceStatus::Completed) {
            info!(advance_id = %advance.id, staff_id = %advance.staff_id, "Advance fully recovered");
        }

        Ok(committed)
    }

    /// Issues a new advance.
    ///
    /// Amounts are rounded to cents. Fails with `InvalidAdvance` when the
    /// principal or the plan's installment is not positive.
    pub async fn issue(&self, request: NewAdvance) -> EngineResult<Advance> {
        let id = Uuid::new_v4();
        let invalid = |message: String| EngineError::InvalidAdvance {
            advance_id: id,
            message,
        };

        let advance_amount = round_money(request.advance_amount);
        if advance_amount <= Decimal::ZERO {
            return Err(invalid(format!(
                "advance amount must be positive, got {}",
                request.advance_amount
            )));
        }
        let deduction_plan = match request.deduction_plan {
            DeductionPlan::Monthly { installment } => DeductionPlan::Monthly {
                installment: round_money(installment),
            },
            DeductionPlan::Weekly { installment } => DeductionPlan::Weekly {
                installment: round_money(installment),
            },
            DeductionPlan::LumpSum => DeductionPlan::LumpSum,
        };
        if let Some(installment) = deduction_plan.installment() {
            if installment <= Decimal::ZERO {
                return Err(invalid(format!(
                    "installment must be positive, got {}",
                    installment
                )));
            }
        }

        let advance = Advance {
            id,
            staff_id: request.staff_id,
            advance_amount,
            issue_date: request.issue_date,
            deduction_plan,
            remaining_balance: advance_amount,
            status: AdvanceStatus::Active,
            version: 0,
            reason: request.reason,
            created_at: Utc::now(),
        };
        self.store.insert_advance(advance.clone()).await?;

        info!(
            advance_id = %advance.id,
            staff_id = %advance.staff_id,
            amount = %advance.advance_amount,
            "Advance issued"
        );
        Ok(advance)
    }

    /// Cancels an active advance.
    ///
    /// The write is guarded by the version read here, so a cancellation
    /// racing a payroll commit fails with `ConcurrencyConflict` instead of
    /// overwriting the commit's balance.
    pub async fn cancel(&self, advance_id: Uuid) -> EngineResult<Advance> {
        let mut advance = self.get(advance_id).await?;
        let expected_version = advance.version;
        advance.cancel()?;
        self.store.update_advance(advance.clone(), expected_version).await?;

        info!(
            advance_id = %advance.id,
            staff_id = %advance.staff_id,
            remaining_balance = %advance.remaining_balance,
            "Advance cancelled"
        );
        Ok(advance)
    }

    /// Gets an advance.
    pub async fn get(&self, advance_id: Uuid) -> EngineResult<Advance> {
        self.store
            .get_advance(advance_id)
            .await?
            .ok_or(EngineError::AdvanceNotFound { advance_id })
    }

    /// Lists a staff member's advances, oldest first.
    pub async fn list_advances(&self, staff_id: &str) -> EngineResult<Vec<Advance>> {
        self.store.list_advances(staff_id).await
    }

    /// Lists the deductions recorded against an advance, by period.
    pub async fn deduction_entries(&self, advance_id: Uuid) -> EngineResult<Vec<AdvanceDeductionEntry>> {
        self.get(advance_id).await?;
        self.store.deduction_entries(advance_id).await
    }

    /// Projects the future deductions of an advance starting at `from`.
    ///
    /// Periods already deducted are not projected again.
    pub async fn deduction_schedule(
        &self,
        advance_id: Uuid,
        from: MonthYear,
    ) -> EngineResult<Vec<ScheduledDeduction>> {
        let advance = self.get(advance_id).await?;
        let entries = self.store.deduction_entries(advance_id).await?;

        let mut start = from;
        if let Some(last) = entries.iter().map(|e| e.month_year).max() {
            if last >= start {
                start = last.next()?;
            }
        }
        project_schedule(&advance, start)
    }
}
