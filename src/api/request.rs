//! Request types for the payroll engine API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DeductionPlan, NewAdvance};

/// Body of the pay endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// The date the salary was paid.
    pub payment_date: NaiveDate,
}

/// Optional `?month_year=YYYY-MM` filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthQuery {
    /// The period to filter by.
    #[serde(default)]
    pub month_year: Option<String>,
}

/// Query of the schedule endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleQuery {
    /// First period to project, `YYYY-MM`.
    #[serde(default)]
    pub from: Option<String>,
}

/// Body of the issue-advance endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueAdvanceRequest {
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

impl From<IssueAdvanceRequest> for NewAdvance {
    fn from(req: IssueAdvanceRequest) -> Self {
        NewAdvance {
            staff_id: req.staff_id,
            advance_amount: req.advance_amount,
            issue_date: req.issue_date,
            deduction_plan: req.deduction_plan,
            reason: req.reason,
        }
    }
}
