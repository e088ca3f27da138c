//! Staff member model.
//!
//! Staff records are owned by staff management; the payroll engine only reads them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a staff member subject to payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name, carried through for salary slips.
    #[serde(default)]
    pub name: String,
    /// Monthly basic salary. `None` when staff management never set one.
    pub basic_salary: Option<Decimal>,
    /// Percentage of achieved sales paid as basic incentive.
    #[serde(default)]
    pub incentive_percentage: Decimal,
    /// Whether the staff member is currently employed.
    #[serde(default = "default_active")]
    pub active: bool,
    /// The date the staff member joined.
    pub joining_date: NaiveDate,
}

fn default_active() -> bool {
    true
}

impl StaffMember {
    /// Returns true if the staff member had joined by `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::StaffMember;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let staff = StaffMember {
    ///     id: "stf_001".to_string(),
    ///     name: "Asha".to_string(),
    ///     basic_salary: Some(Decimal::new(30000, 0)),
    ///     incentive_percentage: Decimal::new(2, 0),
    ///     active: true,
    ///     joining_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    /// };
    /// assert!(staff.joined_by(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
    /// assert!(!staff.joined_by(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()));
    /// ```
    pub fn joined_by(&self, date: NaiveDate) -> bool {
        self.joining_date <= date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_staff_member() {
        let json = r#"{
            "id": "stf_001",
            "name": "Asha",
            "basic_salary": "30000.00",
            "incentive_percentage": "2.5",
            "active": true,
            "joining_date": "2023-06-01"
        }"#;

        let staff: StaffMember = serde_json::from_str(json).unwrap();
        assert_eq!(staff.id, "stf_001");
        assert_eq!(staff.basic_salary, Some(Decimal::new(3000000, 2)));
        assert_eq!(staff.incentive_percentage, Decimal::new(25, 1));
        assert!(staff.active);
    }

    #[test]
    fn test_missing_basic_salary_is_none() {
        let json = r#"{
            "id": "stf_002",
            "basic_salary": null,
            "joining_date": "2023-06-01"
        }"#;

        let staff: StaffMember = serde_json::from_str(json).unwrap();
        assert_eq!(staff.basic_salary, None);
        assert_eq!(staff.incentive_percentage, Decimal::ZERO);
        assert!(staff.active);
        assert!(staff.name.is_empty());
    }

    #[test]
    fn test_joined_by_same_day() {
        let staff = StaffMember {
            id: "stf_003".to_string(),
            name: String::new(),
            basic_salary: None,
            incentive_percentage: Decimal::ZERO,
            active: true,
            joining_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        };
        assert!(staff.joined_by(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
    }
}
