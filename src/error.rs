//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing, committing and
//! approving payroll.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{MonthYear, PaymentStatus};

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot work with.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A staff member's payroll inputs cannot produce a salary.
    ///
    /// Surfaced per staff member; never aborts a payroll run.
    #[error("Configuration error for staff '{staff_id}': {message}")]
    Configuration {
        /// The staff member whose inputs are unusable.
        staff_id: String,
        /// A description of the problem.
        message: String,
    },

    /// A pay period string could not be parsed.
    #[error("Invalid pay period '{value}': {message}")]
    InvalidPeriod {
        /// The rejected input.
        value: String,
        /// A description of what was wrong with it.
        message: String,
    },

    /// The staff directory has no such staff member.
    #[error("Staff member not found: {staff_id}")]
    StaffNotFound {
        /// The identifier that was looked up.
        staff_id: String,
    },

    /// A salary record already exists for the staff member and period.
    #[error("Salary record already exists for staff '{staff_id}' in {month_year}")]
    AlreadyExists {
        /// The staff member.
        staff_id: String,
        /// The pay period.
        month_year: MonthYear,
    },

    /// No salary record has the given identifier.
    #[error("Salary record not found: {record_id}")]
    SalaryRecordNotFound {
        /// The identifier that was looked up.
        record_id: Uuid,
    },

    /// No salary record exists for the staff member and period.
    #[error("No salary record for staff '{staff_id}' in {month_year}")]
    NoSalaryRecord {
        /// The staff member.
        staff_id: String,
        /// The pay period.
        month_year: MonthYear,
    },

    /// No advance has the given identifier.
    #[error("Advance not found: {advance_id}")]
    AdvanceNotFound {
        /// The identifier that was looked up.
        advance_id: Uuid,
    },

    /// A workflow transition was requested from a state that does not allow it.
    #[error("Invalid transition for salary record {record_id}: cannot move from {current} to {requested}")]
    InvalidTransition {
        /// The salary record.
        record_id: Uuid,
        /// The state the record was actually in.
        current: PaymentStatus,
        /// The state that was requested.
        requested: PaymentStatus,
    },

    /// An optimistic concurrency check on an advance failed.
    #[error("Concurrency conflict on advance {advance_id}: {message}")]
    ConcurrencyConflict {
        /// The advance whose version was stale.
        advance_id: Uuid,
        /// A description of the conflict.
        message: String,
    },

    /// An advance operation was rejected.
    #[error("Invalid advance {advance_id}: {message}")]
    InvalidAdvance {
        /// The advance concerned.
        advance_id: Uuid,
        /// Why the operation was rejected.
        message: String,
    },

    /// An external collaborator (attendance, sales, staff directory) failed.
    #[error("Collaborator '{source_name}' failed: {message}")]
    Collaborator {
        /// The collaborator that failed.
        source_name: String,
        /// The failure reported by the collaborator.
        message: String,
    },
}

impl EngineError {
    /// Returns true if the error is an optimistic concurrency failure that
    /// may succeed when the whole unit of work is retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::ConcurrencyConflict { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn month() -> MonthYear {
        MonthYear::new(2025, 3).unwrap()
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_configuration_error_names_staff() {
        let error = EngineError::Configuration {
            staff_id: "stf_007".to_string(),
            message: "basic salary is not set".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration error for staff 'stf_007': basic salary is not set"
        );
    }

    #[test]
    fn test_already_exists_displays_staff_and_month() {
        let error = EngineError::AlreadyExists {
            staff_id: "stf_001".to_string(),
            month_year: month(),
        };
        assert_eq!(
            error.to_string(),
            "Salary record already exists for staff 'stf_001' in 2025-03"
        );
    }

    #[test]
    fn test_invalid_transition_names_both_states() {
        let record_id = Uuid::nil();
        let error = EngineError::InvalidTransition {
            record_id,
            current: PaymentStatus::Approved,
            requested: PaymentStatus::Rejected,
        };
        let text = error.to_string();
        assert!(text.contains("from approved to rejected"));
        assert!(text.contains(&record_id.to_string()));
    }

    #[test]
    fn test_only_concurrency_conflicts_are_retryable() {
        let conflict = EngineError::ConcurrencyConflict {
            advance_id: Uuid::nil(),
            message: "version 2 expected, found 3".to_string(),
        };
        let exists = EngineError::AlreadyExists {
            staff_id: "stf_001".to_string(),
            month_year: month(),
        };
        assert!(conflict.is_retryable());
        assert!(!exists.is_retryable());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::AdvanceNotFound {
                advance_id: Uuid::nil(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
