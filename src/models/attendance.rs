//! Attendance models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Attendance status for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Present for the full day.
    Present,
    /// Absent.
    Absent,
    /// Present for half of the day.
    #[serde(alias = "half-day")]
    HalfDay,
}

impl AttendanceStatus {
    /// How much of a present day this status is worth.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::AttendanceStatus;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(AttendanceStatus::HalfDay.present_credit(), Decimal::new(5, 1));
    /// ```
    pub fn present_credit(&self) -> Decimal {
        match self {
            AttendanceStatus::Present => Decimal::ONE,
            AttendanceStatus::HalfDay => Decimal::new(5, 1),
            AttendanceStatus::Absent => Decimal::ZERO,
        }
    }
}

/// One staff member's attendance on one date. `(staff_id, date)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The staff member.
    pub staff_id: String,
    /// The calendar date.
    pub date: NaiveDate,
    /// The attendance status for the date.
    pub status: AttendanceStatus,
    /// Check-in time, if captured.
    #[serde(default)]
    pub check_in: Option<NaiveDateTime>,
    /// Check-out time, if captured.
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_credits() {
        assert_eq!(AttendanceStatus::Present.present_credit(), Decimal::ONE);
        assert_eq!(AttendanceStatus::Absent.present_credit(), Decimal::ZERO);
        assert_eq!(AttendanceStatus::HalfDay.present_credit(), Decimal::new(5, 1));
    }

    #[test]
    fn test_half_day_accepts_both_spellings() {
        let snake: AttendanceStatus = serde_json::from_str("\"half_day\"").unwrap();
        let dashed: AttendanceStatus = serde_json::from_str("\"half-day\"").unwrap();
        assert_eq!(snake, AttendanceStatus::HalfDay);
        assert_eq!(dashed, AttendanceStatus::HalfDay);
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half_day\""
        );
    }

    #[test]
    fn test_deserialize_record_without_times() {
        let json = r#"{ "staff_id": "stf_001", "date": "2025-01-02", "status": "present" }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.check_in.is_none());
        assert!(record.check_out.is_none());
    }
}
