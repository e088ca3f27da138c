//! Sales aggregation and target selection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PayPeriod, SalesRecord, Target};

/// Sales totals for one staff member over one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Sum of sale amounts dated inside the period.
    pub achieved_sales: Decimal,
    /// Sum of units sold.
    pub units_sold: u64,
    /// Number of sales counted.
    pub sale_count: u32,
    /// The target that applies to the period, if any.
    pub target: Option<Target>,
}

/// Sums a staff member's sales dated inside the period and picks the
/// applicable target from `targets`.
pub fn aggregate_sales(
    staff_id: &str,
    period: &PayPeriod,
    sales: &[SalesRecord],
    targets: &[Target],
) -> SalesSummary {
    let mut achieved_sales = Decimal::ZERO;
    let mut units_sold = 0u64;
    let mut sale_count = 0u32;

    for sale in sales
        .iter()
        .filter(|s| s.staff_id == staff_id && period.contains_date(s.sale_date))
    {
        achieved_sales += sale.sale_amount;
        units_sold += u64::from(sale.units_sold);
        sale_count += 1;
    }

    SalesSummary {
        achieved_sales,
        units_sold,
        sale_count,
        target: select_target(staff_id, period, targets).cloned(),
    }
}

/// Picks the active target with the greatest overlap with the period.
///
/// Ties go to the most recently created target. Targets that do not overlap
/// the period at all are never selected.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::select_target;
/// use payroll_engine::models::{MonthYear, Target};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let period = MonthYear::new(2025, 1).unwrap().period();
/// let target = Target {
///     id: Uuid::new_v4(),
///     staff_id: "stf_001".to_string(),
///     period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     period_end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     total_target_amount: Decimal::new(50000, 0),
///     incentive_percentage: Decimal::ZERO,
///     active: true,
///     created_at: Utc::now(),
/// };
/// let targets = [target];
/// assert!(select_target("stf_001", &period, &targets).is_some());
/// ```
pub fn select_target<'a>(
    staff_id: &str,
    period: &PayPeriod,
    targets: &'a [Target],
) -> Option<&'a Target> {
    targets
        .iter()
        .filter(|t| t.active && t.staff_id == staff_id)
        .map(|t| (period.overlap_days(t.period_start, t.period_end), t))
        .filter(|(overlap, _)| *overlap > 0)
        .max_by(|(a_overlap, a), (b_overlap, b)| {
            a_overlap
                .cmp(b_overlap)
                .then_with(|| a.created_at.cmp(&b.created_at))
        })
        .map(|(_, t)| t)
}
