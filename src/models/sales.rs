//! Sales and sales target models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single sale attributed to a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// The staff member credited with the sale.
    pub staff_id: String,
    /// The brand sold.
    pub brand_id: String,
    /// The sale value.
    pub sale_amount: Decimal,
    /// Units sold.
    #[serde(default = "default_units")]
    pub units_sold: u32,
    /// The date of the sale.
    pub sale_date: NaiveDate,
}

fn default_units() -> u32 {
    1
}

/// A sales target assigned to a staff member for a date range.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Target;
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let target = Target {
///     id: Uuid::new_v4(),
///     staff_id: "stf_001".to_string(),
///     period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     period_end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     total_target_amount: Decimal::new(50000, 0),
///     incentive_percentage: Decimal::new(5, 0),
///     active: true,
///     created_at: Utc::now(),
/// };
/// assert!(target.active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Unique identifier for the target.
    pub id: Uuid,
    /// The staff member the target is assigned to.
    pub staff_id: String,
    /// First day of the target window (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the target window (inclusive).
    pub period_end: NaiveDate,
    /// Sales amount to reach.
    pub total_target_amount: Decimal,
    /// The target's own incentive percentage. Not used by the over-achievement bonus.
    #[serde(default)]
    pub incentive_percentage: Decimal,
    /// Whether the target is in force.
    #[serde(default = "default_active")]
    pub active: bool,
    /// When the target was created; newer targets win overlap ties.
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}
