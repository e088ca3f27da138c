//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for running payroll,
//! moving salary records through approval and managing advances.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{IssueAdvanceRequest, MonthQuery, PaymentRequest, ScheduleQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
