//! Persistence and collaborator seams.
//!
//! The engine reads staff, attendance and sales from external collaborators
//! and keeps salary records, advances and deduction entries in a
//! [`PayrollStore`]. Each seam is an async trait used behind `Arc<dyn ...>`,
//! so a database-backed implementation can replace [`InMemoryStore`] without
//! touching the engine.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    Advance, AdvanceDeductionEntry, AttendanceRecord, MonthYear, PaymentStatus, SalaryRecord,
    SalesRecord, StaffMember, Target,
};

pub use memory::{InMemoryStore, SeedData};

/// The staff directory.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Lists staff members flagged active.
    async fn list_active_staff(&self) -> EngineResult<Vec<StaffMember>>;

    /// Looks up one staff member, active or not.
    async fn get_staff(&self, staff_id: &str) -> EngineResult<Option<StaffMember>>;
}

/// The attendance service.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Lists attendance rows for a staff member dated within `[start, end]`.
    async fn list_attendance(
        &self,
        staff_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// The sales service.
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Lists sales for a staff member dated within `[start, end]`.
    async fn list_sales(
        &self,
        staff_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<SalesRecord>>;

    /// Lists targets for a staff member whose range touches `[start, end]`.
    async fn list_targets(
        &self,
        staff_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Target>>;
}

/// A new payment status and the fields that change with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// The state to move to.
    pub status: PaymentStatus,
    /// Payment date, set only when moving to `Paid`.
    pub payment_date: Option<NaiveDate>,
    /// When the change happened.
    pub at: DateTime<Utc>,
}

/// A decrement of one advance's balance, guarded by the version it was
/// planned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceDebit {
    /// The advance to debit.
    pub advance_id: Uuid,
    /// The version the amount was computed from.
    pub expected_version: u64,
    /// Amount to recover.
    pub amount: Decimal,
}

/// One staff member's payroll result, committed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollCommit {
    /// The new salary record, in `Pending`.
    pub record: SalaryRecord,
    /// Advance debits to apply with it.
    pub debits: Vec<AdvanceDebit>,
}

/// What a successful [`PayrollStore::commit_payroll`] wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedPayroll {
    /// The stored salary record.
    pub record: SalaryRecord,
    /// One entry per debit.
    pub entries: Vec<AdvanceDeductionEntry>,
    /// The advances after their debits.
    pub advances: Vec<Advance>,
}

/// Storage for salary records, advances and deduction entries.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Finds the record for a staff member and period.
    async fn find_salary_record(
        &self,
        staff_id: &str,
        month_year: MonthYear,
    ) -> EngineResult<Option<SalaryRecord>>;

    /// Gets a record by id.
    async fn get_salary_record(&self, record_id: Uuid) -> EngineResult<Option<SalaryRecord>>;

    /// Lists records, newest first, optionally filtered by period and status.
    async fn list_salary_records(
        &self,
        month_year: Option<MonthYear>,
        status: Option<PaymentStatus>,
    ) -> EngineResult<Vec<SalaryRecord>>;

    /// Moves a record to `update.status` if it is currently in `expected`.
    ///
    /// Fails with `InvalidTransition` naming the actual state when it is not,
    /// and with `SalaryRecordNotFound` when the record does not exist.
    async fn compare_and_set_status(
        &self,
        record_id: Uuid,
        expected: PaymentStatus,
        update: StatusUpdate,
    ) -> EngineResult<SalaryRecord>;

    /// Stores a newly issued advance.
    async fn insert_advance(&self, advance: Advance) -> EngineResult<()>;

    /// Gets an advance by id.
    async fn get_advance(&self, advance_id: Uuid) -> EngineResult<Option<Advance>>;

    /// Lists a staff member's advances, oldest issue date first.
    async fn list_advances(&self, staff_id: &str) -> EngineResult<Vec<Advance>>;

    /// Replaces an advance if its stored version is still `expected_version`.
    ///
    /// Fails with `ConcurrencyConflict` otherwise.
    async fn update_advance(&self, advance: Advance, expected_version: u64) -> EngineResult<()>;

    /// Lists the deduction entries recorded against an advance.
    async fn deduction_entries(&self, advance_id: Uuid) -> EngineResult<Vec<AdvanceDeductionEntry>>;

    /// Returns true if the advance already has an entry for the period.
    async fn has_deduction_entry(
        &self,
        advance_id: Uuid,
        month_year: MonthYear,
    ) -> EngineResult<bool>;

    /// Inserts the record, its deduction entries and the debited advances
    /// atomically: everything is written or nothing is.
    ///
    /// Fails with:
    /// - `AlreadyExists` when the staff member already has a record for the period
    /// - `AdvanceNotFound` when a debited advance does not exist
    /// - `ConcurrencyConflict` when a debit's version is stale, its advance is
    ///   no longer active, or the advance already has an entry for the period
    async fn commit_payroll(&self, commit: PayrollCommit) -> EngineResult<CommittedPayroll>;
}
