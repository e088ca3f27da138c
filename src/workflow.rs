//! The salary approval workflow.
//!
//! Every transition is a single compare-and-set against the record's current
//! state, with the expected state taken from
//! [`PaymentStatus::required_source`]. Bulk operations are a sequence of
//! independent compare-and-sets whose failures are collected, never raised.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{BulkTransitionReport, MonthYear, PaymentStatus, SalaryRecord, TransitionFailure};
use crate::store::{PayrollStore, StatusUpdate};

/// Moves salary records through `pending -> approved -> paid` and
/// `pending -> rejected`.
#[derive(Clone)]
pub struct ApprovalWorkflow {
    store: Arc<dyn PayrollStore>,
}

impl ApprovalWorkflow {
    /// Creates a workflow over the given store.
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Approves a pending record.
    pub async fn approve(&self, record_id: Uuid) -> EngineResult<SalaryRecord> {
        self.transition(record_id, PaymentStatus::Approved, None).await
    }

    /// Rejects a pending record.
    pub async fn reject(&self, record_id: Uuid) -> EngineResult<SalaryRecord> {
        self.transition(record_id, PaymentStatus::Rejected, None).await
    }

    /// Marks an approved record as paid on `payment_date`.
    pub async fn mark_paid(
        &self,
        record_id: Uuid,
        payment_date: NaiveDate,
    ) -> EngineResult<SalaryRecord> {
        self.transition(record_id, PaymentStatus::Paid, Some(payment_date))
            .await
    }

    /// Approves every pending record of the period.
    pub async fn bulk_approve(&self, month_year: MonthYear) -> EngineResult<BulkTransitionReport> {
        self.bulk_transition(month_year, PaymentStatus::Approved, None)
            .await
    }

    /// Marks every approved record of the period as paid.
    pub async fn bulk_mark_paid(
        &self,
        month_year: MonthYear,
        payment_date: NaiveDate,
    ) -> EngineResult<BulkTransitionReport> {
        self.bulk_transition(month_year, PaymentStatus::Paid, Some(payment_date))
            .await
    }

    async fn transition(
        &self,
        record_id: Uuid,
        requested: PaymentStatus,
        payment_date: Option<NaiveDate>,
    ) -> EngineResult<SalaryRecord> {
        let Some(expected) = requested.required_source() else {
            let current = self
                .store
                .get_salary_record(record_id)
                .await?
                .ok_or(EngineError::SalaryRecordNotFound { record_id })?
                .payment_status;
            return Err(EngineError::InvalidTransition {
                record_id,
                current,
                requested,
            });
        };

        let update = StatusUpdate {
            status: requested,
            payment_date: payment_date.filter(|_| requested == PaymentStatus::Paid),
            at: Utc::now(),
        };
        let record = self
            .store
            .compare_and_set_status(record_id, expected, update)
            .await?;

        info!(
            record_id = %record_id,
            staff_id = %record.staff_id,
            month_year = %record.month_year,
            from = %expected,
            to = %requested,
            "Salary record transitioned"
        );
        Ok(record)
    }

    async fn bulk_transition(
        &self,
        month_year: MonthYear,
        requested: PaymentStatus,
        payment_date: Option<NaiveDate>,
    ) -> EngineResult<BulkTransitionReport> {
        let mut report = BulkTransitionReport {
            month_year,
            target_status: requested,
            transitioned_count: 0,
            transitioned: vec![],
            failed: vec![],
        };

        let candidates = self
            .store
            .list_salary_records(Some(month_year), requested.required_source())
            .await?;

        for record in candidates {
            match self.transition(record.id, requested, payment_date).await {
                Ok(_) => report.transitioned.push(record.id),
                Err(err) => {
                    warn!(
                        record_id = %record.id,
                        month_year = %month_year,
                        error = %err,
                        "Bulk transition skipped record"
                    );
                    report.failed.push(TransitionFailure {
                        record_id: record.id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        report.transitioned_count = report.transitioned.len();

        info!(
            month_year = %month_year,
            to = %requested,
            transitioned = report.transitioned_count,
            failed = report.failed.len(),
            "Bulk transition finished"
        );
        Ok(report)
    }
}
