//! In-memory implementation of every store and collaborator trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Advance, AdvanceDeductionEntry, AttendanceRecord, MonthYear, NewAdvance, PaymentStatus,
    SalaryRecord, SalesRecord, StaffMember, Target,
};

use super::{
    AttendanceSource, CommittedPayroll, PayrollCommit, PayrollStore, SalesSource, StaffDirectory,
    StatusUpdate,
};

/// Reference data for an [`InMemoryStore`], typically loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    /// Staff directory.
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    /// Attendance rows.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Sales rows.
    #[serde(default)]
    pub sales: Vec<SalesRecord>,
    /// Sales targets.
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Advances to issue at startup.
    #[serde(default)]
    pub advances: Vec<NewAdvance>,
}

#[derive(Default)]
struct Inner {
    staff: HashMap<String, StaffMember>,
    attendance: Vec<AttendanceRecord>,
    sales: Vec<SalesRecord>,
    targets: Vec<Target>,
    records: HashMap<Uuid, SalaryRecord>,
    record_keys: HashMap<(String, MonthYear), Uuid>,
    advances: HashMap<Uuid, Advance>,
    entries: Vec<AdvanceDeductionEntry>,
}

impl Inner {
    fn has_entry(&self, advance_id: Uuid, month_year: MonthYear) -> bool {
        self.entries
            .iter()
            .any(|e| e.advance_id == advance_id && e.month_year == month_year)
    }
}

/// A store that keeps everything in process memory behind one lock.
///
/// Every write takes the lock once, so a commit is atomic with respect to
/// every other operation on the same store.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the reference data in `seed`.
    ///
    /// Advances in the seed are not inserted; issue them through the ledger
    /// so they are validated.
    pub async fn from_seed(seed: &SeedData) -> Self {
        let store = Self::new();
        for staff in &seed.staff {
            store.add_staff(staff.clone()).await;
        }
        let mut inner = store.inner.write().await;
        inner.attendance.extend(seed.attendance.iter().cloned());
        inner.sales.extend(seed.sales.iter().cloned());
        inner.targets.extend(seed.targets.iter().cloned());
        drop(inner);
        store
    }

    /// Adds or replaces a staff member.
    pub async fn add_staff(&self, staff: StaffMember) {
        self.inner.write().await.staff.insert(staff.id.clone(), staff);
    }

    /// Appends an attendance row.
    pub async fn add_attendance(&self, record: AttendanceRecord) {
        self.inner.write().await.attendance.push(record);
    }

    /// Appends a sale.
    pub async fn add_sale(&self, sale: SalesRecord) {
        self.inner.write().await.sales.push(sale);
    }

    /// Appends a target.
    pub async fn add_target(&self, target: Target) {
        self.inner.write().await.targets.push(target);
    }

    /// Every deduction entry in the store.
    pub async fn all_deduction_entries(&self) -> Vec<AdvanceDeductionEntry> {
        self.inner.read().await.entries.clone()
    }
}

#[async_trait]
impl StaffDirectory for InMemoryStore {
    async fn list_active_staff(&self) -> EngineResult<Vec<StaffMember>> {
        let inner = self.inner.read().await;
        let mut staff: Vec<StaffMember> = inner.staff.values().filter(|s| s.active).cloned().collect();
        staff.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(staff)
    }

    async fn get_staff(&self, staff_id: &str) -> EngineResult<Option<StaffMember>> {
        Ok(self.inner.read().await.staff.get(staff_id).cloned())
    }
}

#[async_trait]
impl AttendanceSource for InMemoryStore {
    async fn list_attendance(
        &self,
        staff_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .attendance
            .iter()
            .filter(|r| r.staff_id == staff_id && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SalesSource for InMemoryStore {
    async fn list_sales(
        &self,
        staff_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<SalesRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sales
            .iter()
            .filter(|s| s.staff_id == staff_id && s.sale_date >= start && s.sale_date <= end)
            .cloned()
            .collect())
    }

    async fn list_targets(
        &self,
        staff_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Target>> {
        let inner = self.inner.read().await;
        Ok(inner
            .targets
            .iter()
            .filter(|t| t.staff_id == staff_id && t.period_start <= end && t.period_end >= start)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn find_salary_record(
        &self,
        staff_id: &str,
        month_year: MonthYear,
    ) -> EngineResult<Option<SalaryRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .record_keys
            .get(&(staff_id.to_string(), month_year))
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    async fn get_salary_record(&self, record_id: Uuid) -> EngineResult<Option<SalaryRecord>> {
        Ok(self.inner.read().await.records.get(&record_id).cloned())
    }

    async fn list_salary_records(
        &self,
        month_year: Option<MonthYear>,
        status: Option<PaymentStatus>,
    ) -> EngineResult<Vec<SalaryRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<SalaryRecord> = inner
            .records
            .values()
            .filter(|r| month_year.is_none_or(|m| r.month_year == m))
            .filter(|r| status.is_none_or(|s| r.payment_status == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.staff_id.cmp(&b.staff_id))
        });
        Ok(records)
    }

    async fn compare_and_set_status(
        &self,
        record_id: Uuid,
        expected: PaymentStatus,
        update: StatusUpdate,
    ) -> EngineResult<SalaryRecord> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(&record_id)
            .ok_or(EngineError::SalaryRecordNotFound { record_id })?;

        if record.payment_status != expected {
            return Err(EngineError::InvalidTransition {
                record_id,
                current: record.payment_status,
                requested: update.status,
            });
        }

        record.payment_status = update.status;
        if update.payment_date.is_some() {
            record.payment_date = update.payment_date;
        }
        record.updated_at = update.at;
        Ok(record.clone())
    }

    async fn insert_advance(&self, advance: Advance) -> EngineResult<()> {
        self.inner.write().await.advances.insert(advance.id, advance);
        Ok(())
    }

    async fn get_advance(&self, advance_id: Uuid) -> EngineResult<Option<Advance>> {
        Ok(self.inner.read().await.advances.get(&advance_id).cloned())
    }

    async fn list_advances(&self, staff_id: &str) -> EngineResult<Vec<Advance>> {
        let inner = self.inner.read().await;
        let mut advances: Vec<Advance> = inner
            .advances
            .values()
            .filter(|a| a.staff_id == staff_id)
            .cloned()
            .collect();
        advances.sort_by(|a, b| {
            a.issue_date
                .cmp(&b.issue_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(advances)
    }

    async fn update_advance(&self, advance: Advance, expected_version: u64) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .advances
            .get_mut(&advance.id)
            .ok_or(EngineError::AdvanceNotFound {
                advance_id: advance.id,
            })?;

        if stored.version != expected_version {
            return Err(EngineError::ConcurrencyConflict {
                advance_id: advance.id,
                message: format!(
                    "expected version {}, found {}",
                    expected_version, stored.version
                ),
            });
        }

        *stored = advance;
        Ok(())
    }

    async fn deduction_entries(&self, advance_id: Uuid) -> EngineResult<Vec<AdvanceDeductionEntry>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<AdvanceDeductionEntry> = inner
            .entries
            .iter()
            .filter(|e| e.advance_id == advance_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.month_year);
        Ok(entries)
    }

    async fn has_deduction_entry(
        &self,
        advance_id: Uuid,
        month_year: MonthYear,
    ) -> EngineResult<bool> {
        Ok(self.inner.read().await.has_entry(advance_id, month_year))
    }

    async fn commit_payroll(&self, commit: PayrollCommit) -> EngineResult<CommittedPayroll> {
        let mut inner = self.inner.write().await;
        let PayrollCommit { record, debits } = commit;
        let key = (record.staff_id.clone(), record.month_year);

        if inner.record_keys.contains_key(&key) {
            return Err(EngineError::AlreadyExists {
                staff_id: record.staff_id,
                month_year: record.month_year,
            });
        }

        // Stage every debit on copies so a failure leaves the store untouched.
        let mut staged: Vec<Advance> = Vec::with_capacity(debits.len());
        let mut entries = Vec::with_capacity(debits.len());
        let applied_at = Utc::now();

        for debit in &debits {
            let advance_id = debit.advance_id;
            let conflict = |message: String| EngineError::ConcurrencyConflict {
                advance_id,
                message,
            };

            if staged.iter().any(|a| a.id == advance_id) {
                return Err(conflict("advance debited twice in one commit".to_string()));
            }
            let mut advance = inner
                .advances
                .get(&advance_id)
                .cloned()
                .ok_or(EngineError::AdvanceNotFound { advance_id })?;

            if advance.version != debit.expected_version {
                return Err(conflict(format!(
                    "expected version {}, found {}",
                    debit.expected_version, advance.version
                )));
            }
            if !advance.is_active() {
                return Err(conflict(format!("advance is {}", advance.status)));
            }
            if inner.has_entry(advance_id, record.month_year) {
                return Err(conflict(format!(
                    "advance already deducted for {}",
                    record.month_year
                )));
            }

            advance.apply_deduction(debit.amount)?;
            entries.push(AdvanceDeductionEntry {
                id: Uuid::new_v4(),
                advance_id,
                salary_record_id: record.id,
                month_year: record.month_year,
                amount_applied: debit.amount,
                applied_at,
            });
            staged.push(advance);
        }

        for advance in &staged {
            inner.advances.insert(advance.id, advance.clone());
        }
        inner.entries.extend(entries.iter().cloned());
        inner.record_keys.insert(key, record.id);
        inner.records.insert(record.id, record.clone());

        Ok(CommittedPayroll {
            record,
            entries,
            advances: staged,
        })
    }
}
