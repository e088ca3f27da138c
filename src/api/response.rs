//! Response types for the payroll engine API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a path identifier that is not a UUID.
    pub fn invalid_id(value: &str) -> Self {
        Self::with_details(
            "INVALID_ID",
            format!("Invalid identifier: {}", value),
            "Identifiers must be UUIDs",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::Configuration { .. } => (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR"),
            EngineError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, "INVALID_PERIOD"),
            EngineError::InvalidAdvance { .. } => (StatusCode::BAD_REQUEST, "INVALID_ADVANCE"),
            EngineError::StaffNotFound { .. } => (StatusCode::NOT_FOUND, "STAFF_NOT_FOUND"),
            EngineError::SalaryRecordNotFound { .. } | EngineError::NoSalaryRecord { .. } => {
                (StatusCode::NOT_FOUND, "SALARY_RECORD_NOT_FOUND")
            }
            EngineError::AdvanceNotFound { .. } => (StatusCode::NOT_FOUND, "ADVANCE_NOT_FOUND"),
            EngineError::AlreadyExists { .. } => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            EngineError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            EngineError::ConcurrencyConflict { .. } => {
                (StatusCode::CONFLICT, "CONCURRENCY_CONFLICT")
            }
            EngineError::Collaborator { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "COLLABORATOR_ERROR")
            }
        };

        let error = match error {
            EngineError::InvalidTransition {
                current, requested, ..
            } => ApiError::with_details(
                code,
                message,
                format!("current state: {}, requested: {}", current, requested),
            ),
            _ => ApiError::new(code, message),
        };

        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthYear, PaymentStatus};
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_transition_maps_to_conflict() {
        let api_error: ApiErrorResponse = EngineError::InvalidTransition {
            record_id: Uuid::nil(),
            current: PaymentStatus::Approved,
            requested: PaymentStatus::Rejected,
        }
        .into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "INVALID_TRANSITION");
        assert_eq!(
            api_error.error.details.as_deref(),
            Some("current state: approved, requested: rejected")
        );
    }

    #[test]
    fn test_not_found_variants_map_to_404() {
        let missing: ApiErrorResponse = EngineError::NoSalaryRecord {
            staff_id: "stf_001".to_string(),
            month_year: MonthYear::new(2025, 1).unwrap(),
        }
        .into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let advance: ApiErrorResponse = EngineError::AdvanceNotFound {
            advance_id: Uuid::nil(),
        }
        .into();
        assert_eq!(advance.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_period_maps_to_400() {
        let api_error: ApiErrorResponse = "2025-13".parse::<MonthYear>().unwrap_err().into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_PERIOD");
    }
}
