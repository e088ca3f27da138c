//! Reports returned by payroll runs and bulk workflow operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditWarning, MonthYear, PaymentStatus};

/// Why a staff member produced no new salary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A record for this staff member and period already exists.
    AlreadyExists,
    /// The staff member joined after the period ended.
    NotYetJoined,
}

/// What happened to one staff member during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StaffOutcome {
    /// A pending salary record was committed.
    Created {
        /// The new record.
        record_id: Uuid,
        /// Net pay on the record.
        net_salary: Decimal,
        /// Advance recovery applied.
        advance_deduction: Decimal,
        /// Advance recovery left for later periods.
        deferred_deduction: Decimal,
    },
    /// Nothing to do for this staff member.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
    /// The staff member could not be processed; others were unaffected.
    Failed {
        /// The error, rendered for operators.
        reason: String,
    },
    /// The run was cancelled before this staff member was started.
    Cancelled,
}

/// One line of a payroll run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRunResult {
    /// The staff member.
    pub staff_id: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: StaffOutcome,
    /// Calculation warnings raised for this staff member.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AuditWarning>,
}

/// Summary of a payroll run over the active roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunReport {
    /// Identifier of the run, present on every log event of the run.
    pub run_id: Uuid,
    /// The pay period.
    pub month_year: MonthYear,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Number of records created.
    pub created: usize,
    /// Number of staff skipped.
    pub skipped: usize,
    /// Number of staff that failed.
    pub failed: usize,
    /// Number of staff not started because the run was cancelled.
    pub cancelled: usize,
    /// Per-staff results, ordered by staff id.
    pub results: Vec<StaffRunResult>,
}

impl PayrollRunReport {
    /// Builds a report, tallying outcomes and ordering results by staff id.
    pub fn new(
        run_id: Uuid,
        month_year: MonthYear,
        started_at: DateTime<Utc>,
        mut results: Vec<StaffRunResult>,
    ) -> Self {
        results.sort_by(|a, b| a.staff_id.cmp(&b.staff_id));

        let mut report = Self {
            run_id,
            month_year,
            started_at,
            finished_at: Utc::now(),
            created: 0,
            skipped: 0,
            failed: 0,
            cancelled: 0,
            results: vec![],
        };
        for result in &results {
            match result.outcome {
                StaffOutcome::Created { .. } => report.created += 1,
                StaffOutcome::Skipped { .. } => report.skipped += 1,
                StaffOutcome::Failed { .. } => report.failed += 1,
                StaffOutcome::Cancelled => report.cancelled += 1,
            }
        }
        report.results = results;
        report
    }

    /// Looks up the result for one staff member.
    pub fn result_for(&self, staff_id: &str) -> Option<&StaffRunResult> {
        self.results.iter().find(|r| r.staff_id == staff_id)
    }

    /// Total advance recovery deferred to later periods across the run.
    pub fn total_deferred(&self) -> Decimal {
        self.results
            .iter()
            .map(|r| match r.outcome {
                StaffOutcome::Created {
                    deferred_deduction, ..
                } => deferred_deduction,
                _ => Decimal::ZERO,
            })
            .sum()
    }
}

/// A record a bulk operation could not move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionFailure {
    /// The record.
    pub record_id: Uuid,
    /// The error, rendered for operators.
    pub reason: String,
}

/// Result of a bulk workflow transition over one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTransitionReport {
    /// The pay period.
    pub month_year: MonthYear,
    /// The state records were moved to.
    pub target_status: PaymentStatus,
    /// Number of records moved.
    pub transitioned_count: usize,
    /// Records moved.
    pub transitioned: Vec<Uuid>,
    /// Records that could not be moved, with reasons.
    pub failed: Vec<TransitionFailure>,
}
