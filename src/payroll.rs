//! The payroll run orchestrator.
//!
//! [`PayrollRunner`] drives a run for one period: it pulls the active roster,
//! processes staff members concurrently up to a configured bound, and commits
//! each staff member's salary record and advance deductions as one unit.
//! A failure for one staff member never affects the others.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::calculation::{SalaryInputs, aggregate_attendance, aggregate_sales, calculate_salary};
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{AdvanceDue, AdvanceLedger};
use crate::models::{
    MonthYear, PayPeriod, PayrollRunReport, SalaryCalculation, SalaryRecord, SalaryStatistics,
    SkipReason, StaffMember, StaffOutcome, StaffRunResult,
};
use crate::store::{AttendanceSource, InMemoryStore, PayrollStore, SalesSource, StaffDirectory};

/// Runs payroll and answers queries over salary records.
#[derive(Clone)]
pub struct PayrollRunner {
    config: Arc<PayrollConfig>,
    staff: Arc<dyn StaffDirectory>,
    attendance: Arc<dyn AttendanceSource>,
    sales: Arc<dyn SalesSource>,
    store: Arc<dyn PayrollStore>,
    ledger: AdvanceLedger,
}

impl PayrollRunner {
    /// Creates a runner over the given collaborators and store.
    pub fn new(
        config: PayrollConfig,
        staff: Arc<dyn StaffDirectory>,
        attendance: Arc<dyn AttendanceSource>,
        sales: Arc<dyn SalesSource>,
        store: Arc<dyn PayrollStore>,
    ) -> Self {
        let ledger = AdvanceLedger::new(store.clone());
        Self {
            config: Arc::new(config),
            staff,
            attendance,
            sales,
            store,
            ledger,
        }
    }

    /// Creates a runner where one in-memory store plays every role.
    pub fn in_memory(config: PayrollConfig, store: Arc<InMemoryStore>) -> Self {
        Self::new(config, store.clone(), store.clone(), store.clone(), store)
    }

    /// The configuration the runner was built with.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// The advance ledger sharing this runner's store.
    pub fn ledger(&self) -> &AdvanceLedger {
        &self.ledger
    }

    /// Runs payroll for every active staff member for `month_year`.
    ///
    /// Staff members that already have a record for the period are skipped,
    /// so running a period twice creates nothing the second time.
    pub async fn run_payroll(&self, month_year: MonthYear) -> EngineResult<PayrollRunReport> {
        self.run_payroll_with_cancellation(month_year, &CancellationToken::new())
            .await
    }

    /// Runs payroll, stopping before any staff member not yet started once
    /// `cancel` fires. Staff already committed keep their records.
    pub async fn run_payroll_with_cancellation(
        &self,
        month_year: MonthYear,
        cancel: &CancellationToken,
    ) -> EngineResult<PayrollRunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let period = self.config.period_for(month_year);

        let roster = self.staff.list_active_staff().await?;
        info!(
            run_id = %run_id,
            month_year = %month_year,
            staff_count = roster.len(),
            "Starting payroll run"
        );

        let results: Vec<StaffRunResult> = stream::iter(roster)
            .map(|staff| {
                let span = info_span!("payroll_staff", run_id = %run_id, staff_id = %staff.id);
                self.process_staff(staff, month_year, &period, run_id, cancel)
                    .instrument(span)
            })
            .buffer_unordered(self.config.max_parallel_staff.max(1))
            .collect()
            .await;

        let report = PayrollRunReport::new(run_id, month_year, started_at, results);
        info!(
            run_id = %run_id,
            month_year = %month_year,
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            total_deferred = %report.total_deferred(),
            "Payroll run finished"
        );
        Ok(report)
    }

    async fn process_staff(
        &self,
        staff: StaffMember,
        month_year: MonthYear,
        period: &PayPeriod,
        run_id: Uuid,
        cancel: &CancellationToken,
    ) -> StaffRunResult {
        let result = |outcome: StaffOutcome| StaffRunResult {
            staff_id: staff.id.clone(),
            outcome,
            warnings: vec![],
        };

        if cancel.is_cancelled() {
            debug!(run_id = %run_id, staff_id = %staff.id, "Run cancelled before staff started");
            return result(StaffOutcome::Cancelled);
        }
        if !staff.joined_by(period.end_date) {
            debug!(
                run_id = %run_id,
                staff_id = %staff.id,
                joining_date = %staff.joining_date,
                "Staff joined after period end"
            );
            return result(StaffOutcome::Skipped {
                reason: SkipReason::NotYetJoined,
            });
        }

        match self.store.find_salary_record(&staff.id, month_year).await {
            Ok(Some(_)) => {
                debug!(run_id = %run_id, staff_id = %staff.id, "Salary record already exists");
                return result(StaffOutcome::Skipped {
                    reason: SkipReason::AlreadyExists,
                });
            }
            Ok(None) => {}
            Err(err) => return self.failed(run_id, &staff, err),
        }

        let attempts = self.config.commit_retry_limit.max(1);
        let mut attempt = 1;
        loop {
            let (calculation, due) = match self.compute(&staff, month_year, period).await {
                Ok(computed) => computed,
                Err(err) => return self.failed(run_id, &staff, err),
            };
            for warning in &calculation.audit_trace.warnings {
                warn!(
                    run_id = %run_id,
                    staff_id = %staff.id,
                    code = %warning.code,
                    severity = %warning.severity,
                    "{}",
                    warning.message
                );
            }

            let record = SalaryRecord::pending(&staff.id, month_year, &calculation.breakdown);
            match self.ledger.commit(record, &due).await {
                Ok(committed) => {
                    let record = committed.record;
                    info!(
                        run_id = %run_id,
                        staff_id = %staff.id,
                        record_id = %record.id,
                        gross_salary = %record.gross_salary,
                        advance_deduction = %record.advance_deduction,
                        net_salary = %record.net_salary,
                        "Salary record created"
                    );
                    return StaffRunResult {
                        staff_id: staff.id.clone(),
                        outcome: StaffOutcome::Created {
                            record_id: record.id,
                            net_salary: record.net_salary,
                            advance_deduction: record.advance_deduction,
                            deferred_deduction: record.deferred_deduction,
                        },
                        warnings: calculation.audit_trace.warnings,
                    };
                }
                Err(EngineError::AlreadyExists { .. }) => {
                    debug!(
                        run_id = %run_id,
                        staff_id = %staff.id,
                        "Salary record created concurrently"
                    );
                    return result(StaffOutcome::Skipped {
                        reason: SkipReason::AlreadyExists,
                    });
                }
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!(
                        run_id = %run_id,
                        staff_id = %staff.id,
                        attempt,
                        error = %err,
                        "Commit conflicted, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return self.failed(run_id, &staff, err),
            }
        }
    }

    fn failed(&self, run_id: Uuid, staff: &StaffMember, err: EngineError) -> StaffRunResult {
        warn!(run_id = %run_id, staff_id = %staff.id, error = %err, "Staff payroll failed");
        StaffRunResult {
            staff_id: staff.id.clone(),
            outcome: StaffOutcome::Failed {
                reason: err.to_string(),
            },
            warnings: vec![],
        }
    }

    /// Reads a staff member's period data and advance dues and runs the
    /// calculator. Writes nothing.
    async fn compute(
        &self,
        staff: &StaffMember,
        month_year: MonthYear,
        period: &PayPeriod,
    ) -> EngineResult<(SalaryCalculation, AdvanceDue)> {
        let basic_salary = validate_staff(staff)?;

        let counts = period.day_counts(&self.config.non_working_weekdays);
        if counts.working_days == 0 {
            return Err(EngineError::Configuration {
                staff_id: staff.id.clone(),
                message: format!("{} has no working days", month_year),
            });
        }

        let (start, end) = (period.start_date, period.end_date);
        let attendance = self.attendance.list_attendance(&staff.id, start, end).await?;
        let sales = self.sales.list_sales(&staff.id, start, end).await?;
        let targets = self.sales.list_targets(&staff.id, start, end).await?;
        let due = self.ledger.amount_due(&staff.id, month_year).await?;

        let attendance_summary = aggregate_attendance(
            &staff.id,
            period,
            &self.config.non_working_weekdays,
            &attendance,
        );
        let sales_summary = aggregate_sales(&staff.id, period, &sales, &targets);

        let inputs = SalaryInputs {
            basic_salary,
            incentive_percentage: staff.incentive_percentage,
            working_days: attendance_summary.working_days,
            present_days: attendance_summary.present_days,
            sunday_count: attendance_summary.sunday_count,
            achieved_sales: sales_summary.achieved_sales,
            target_amount: sales_summary.target.as_ref().map(|t| t.total_target_amount),
            advance_due: due.total,
        };
        let result = calculate_salary(&inputs, self.config.over_achievement_rate);

        let calculation = SalaryCalculation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            staff_id: staff.id.clone(),
            month_year,
            target_id: sales_summary.target.map(|t| t.id),
            breakdown: result.breakdown,
            audit_trace: result.audit_trace,
        };
        Ok((calculation, due))
    }

    /// Computes one staff member's salary for a period without persisting
    /// anything or touching advances.
    pub async fn preview_salary(
        &self,
        staff_id: &str,
        month_year: MonthYear,
    ) -> EngineResult<SalaryCalculation> {
        let staff = self
            .staff
            .get_staff(staff_id)
            .await?
            .ok_or_else(|| EngineError::StaffNotFound {
                staff_id: staff_id.to_string(),
            })?;
        let period = self.config.period_for(month_year);
        let (calculation, _) = self.compute(&staff, month_year, &period).await?;
        Ok(calculation)
    }

    /// Gets the record for a staff member and period.
    pub async fn get_salary_record(
        &self,
        staff_id: &str,
        month_year: MonthYear,
    ) -> EngineResult<SalaryRecord> {
        self.store
            .find_salary_record(staff_id, month_year)
            .await?
            .ok_or_else(|| EngineError::NoSalaryRecord {
                staff_id: staff_id.to_string(),
                month_year,
            })
    }

    /// Lists records, newest first.
    pub async fn list_salary_records(
        &self,
        month_year: Option<MonthYear>,
    ) -> EngineResult<Vec<SalaryRecord>> {
        self.store.list_salary_records(month_year, None).await
    }

    /// Tallies records by status.
    pub async fn salary_statistics(
        &self,
        month_year: Option<MonthYear>,
    ) -> EngineResult<SalaryStatistics> {
        let records = self.store.list_salary_records(month_year, None).await?;
        Ok(SalaryStatistics::from_records(&records))
    }
}

fn validate_staff(staff: &StaffMember) -> EngineResult<Decimal> {
    let config_error = |message: &str| EngineError::Configuration {
        staff_id: staff.id.clone(),
        message: message.to_string(),
    };

    let basic_salary = staff
        .basic_salary
        .ok_or_else(|| config_error("basic salary is not set"))?;
    if basic_salary < Decimal::ZERO {
        return Err(config_error("basic salary is negative"));
    }
    if staff.incentive_percentage < Decimal::ZERO {
        return Err(config_error("incentive percentage is negative"));
    }
    Ok(basic_salary)
}
