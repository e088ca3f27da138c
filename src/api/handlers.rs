//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{MonthYear, NewAdvance};

use super::request::{IssueAdvanceRequest, MonthQuery, PaymentRequest, ScheduleQuery};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/runs/:month_year", post(run_payroll_handler))
        .route(
            "/payroll/preview/:staff_id/:month_year",
            get(preview_salary_handler),
        )
        .route("/salaries", get(list_salaries_handler))
        .route("/salaries/statistics", get(salary_statistics_handler))
        .route(
            "/salaries/staff/:staff_id/:month_year",
            get(get_salary_handler),
        )
        .route("/salaries/:record_id/approve", post(approve_handler))
        .route("/salaries/:record_id/reject", post(reject_handler))
        .route("/salaries/:record_id/pay", post(pay_handler))
        .route(
            "/salaries/bulk-approve/:month_year",
            post(bulk_approve_handler),
        )
        .route("/salaries/bulk-pay/:month_year", post(bulk_pay_handler))
        .route("/advances", post(issue_advance_handler))
        .route("/advances/staff/:staff_id", get(list_advances_handler))
        .route("/advances/:advance_id/cancel", post(cancel_advance_handler))
        .route(
            "/advances/:advance_id/schedule",
            get(deduction_schedule_handler),
        )
        .route(
            "/advances/:advance_id/entries",
            get(deduction_entries_handler),
        )
        .with_state(state)
}

/// Handler for POST /payroll/runs/:month_year.
///
/// Runs payroll for every active staff member. Per-staff failures are part
/// of the report, so the response is 200 whenever the roster could be read.
async fn run_payroll_handler(
    State(state): State<AppState>,
    Path(month_year): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, month_year = %month_year, "Processing payroll run request");

    let month_year = match parse_month(correlation_id, &month_year) {
        Ok(month_year) => month_year,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    match state.runner().run_payroll(month_year).await {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %report.run_id,
                created = report.created,
                skipped = report.skipped,
                failed = report.failed,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll run completed"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /payroll/preview/:staff_id/:month_year.
async fn preview_salary_handler(
    State(state): State<AppState>,
    Path((staff_id, month_year)): Path<(String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, staff_id = %staff_id, "Processing salary preview request");

    let month_year = match parse_month(correlation_id, &month_year) {
        Ok(month_year) => month_year,
        Err(response) => return response,
    };

    match state.runner().preview_salary(&staff_id, month_year).await {
        Ok(calculation) => {
            info!(
                correlation_id = %correlation_id,
                staff_id = %staff_id,
                gross_salary = %calculation.breakdown.gross_salary,
                "Salary preview computed"
            );
            json_response(StatusCode::OK, calculation)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /salaries.
async fn list_salaries_handler(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary list request");

    let month_year = match parse_optional_month(correlation_id, query.month_year.as_deref()) {
        Ok(month_year) => month_year,
        Err(response) => return response,
    };

    match state.runner().list_salary_records(month_year).await {
        Ok(records) => json_response(StatusCode::OK, records),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /salaries/statistics.
async fn salary_statistics_handler(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary statistics request");

    let month_year = match parse_optional_month(correlation_id, query.month_year.as_deref()) {
        Ok(month_year) => month_year,
        Err(response) => return response,
    };

    match state.runner().salary_statistics(month_year).await {
        Ok(statistics) => json_response(StatusCode::OK, statistics),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /salaries/staff/:staff_id/:month_year.
async fn get_salary_handler(
    State(state): State<AppState>,
    Path((staff_id, month_year)): Path<(String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, staff_id = %staff_id, "Processing salary lookup request");

    let month_year = match parse_month(correlation_id, &month_year) {
        Ok(month_year) => month_year,
        Err(response) => return response,
    };

    match state.runner().get_salary_record(&staff_id, month_year).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /salaries/:record_id/approve.
async fn approve_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %record_id, "Processing approve request");

    let record_id = match parse_id(correlation_id, &record_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.workflow().approve(record_id).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /salaries/:record_id/reject.
async fn reject_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %record_id, "Processing reject request");

    let record_id = match parse_id(correlation_id, &record_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.workflow().reject(record_id).await {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /salaries/:record_id/pay.
async fn pay_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %record_id, "Processing pay request");

    let record_id = match parse_id(correlation_id, &record_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(json_rejection_error(correlation_id, rejection)),
    };

    match state
        .workflow()
        .mark_paid(record_id, request.payment_date)
        .await
    {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /salaries/bulk-approve/:month_year.
async fn bulk_approve_handler(
    State(state): State<AppState>,
    Path(month_year): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, month_year = %month_year, "Processing bulk approve request");

    let month_year = match parse_month(correlation_id, &month_year) {
        Ok(month_year) => month_year,
        Err(response) => return response,
    };

    match state.workflow().bulk_approve(month_year).await {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                transitioned = report.transitioned_count,
                failed = report.failed.len(),
                "Bulk approve completed"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /salaries/bulk-pay/:month_year.
async fn bulk_pay_handler(
    State(state): State<AppState>,
    Path(month_year): Path<String>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, month_year = %month_year, "Processing bulk pay request");

    let month_year = match parse_month(correlation_id, &month_year) {
        Ok(month_year) => month_year,
        Err(response) => return response,
    };
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(json_rejection_error(correlation_id, rejection)),
    };

    match state
        .workflow()
        .bulk_mark_paid(month_year, request.payment_date)
        .await
    {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                transitioned = report.transitioned_count,
                failed = report.failed.len(),
                "Bulk pay completed"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /advances.
async fn issue_advance_handler(
    State(state): State<AppState>,
    payload: Result<Json<IssueAdvanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing issue advance request");

    let request: NewAdvance = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => return bad_request(json_rejection_error(correlation_id, rejection)),
    };

    match state.ledger().issue(request).await {
        Ok(advance) => {
            info!(
                correlation_id = %correlation_id,
                advance_id = %advance.id,
                staff_id = %advance.staff_id,
                amount = %advance.advance_amount,
                "Issue advance request completed"
            );
            json_response(StatusCode::CREATED, advance)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /advances/staff/:staff_id.
async fn list_advances_handler(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, staff_id = %staff_id, "Processing advance list request");

    match state.ledger().list_advances(&staff_id).await {
        Ok(advances) => json_response(StatusCode::OK, advances),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /advances/:advance_id/cancel.
async fn cancel_advance_handler(
    State(state): State<AppState>,
    Path(advance_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, advance_id = %advance_id, "Processing cancel advance request");

    let advance_id = match parse_id(correlation_id, &advance_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.ledger().cancel(advance_id).await {
        Ok(advance) => json_response(StatusCode::OK, advance),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /advances/:advance_id/schedule.
///
/// Projects from `?from=YYYY-MM`, defaulting to the current month.
async fn deduction_schedule_handler(
    State(state): State<AppState>,
    Path(advance_id): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, advance_id = %advance_id, "Processing deduction schedule request");

    let advance_id = match parse_id(correlation_id, &advance_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let from = match parse_optional_month(correlation_id, query.from.as_deref()) {
        Ok(Some(from)) => from,
        Ok(None) => {
            let today = Utc::now().date_naive();
            match MonthYear::new(today.year(), today.month()) {
                Ok(month_year) => month_year,
                Err(err) => return engine_error(correlation_id, err),
            }
        }
        Err(response) => return response,
    };

    match state.ledger().deduction_schedule(advance_id, from).await {
        Ok(schedule) => json_response(StatusCode::OK, schedule),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /advances/:advance_id/entries.
async fn deduction_entries_handler(
    State(state): State<AppState>,
    Path(advance_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, advance_id = %advance_id, "Processing deduction entries request");

    let advance_id = match parse_id(correlation_id, &advance_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.ledger().deduction_entries(advance_id).await {
        Ok(entries) => json_response(StatusCode::OK, entries),
        Err(err) => engine_error(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn bad_request(error: ApiError) -> Response {
    let api_error = ApiErrorResponse::bad_request(error);
    json_response(api_error.status, api_error.error)
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn parse_month(correlation_id: Uuid, value: &str) -> Result<MonthYear, Response> {
    value
        .parse::<MonthYear>()
        .map_err(|err| engine_error(correlation_id, err))
}

fn parse_optional_month(
    correlation_id: Uuid,
    value: Option<&str>,
) -> Result<Option<MonthYear>, Response> {
    value.map(|v| parse_month(correlation_id, v)).transpose()
}

fn parse_id(correlation_id: Uuid, value: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(value).map_err(|_| {
        warn!(correlation_id = %correlation_id, value = %value, "Invalid identifier");
        bad_request(ApiError::invalid_id(value))
    })
}

fn json_rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayrollConfig;
    use crate::models::{AttendanceRecord, AttendanceStatus, StaffMember};
    use crate::store::InMemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{NaiveDate, Weekday};
    use rust_decimal::Decimal;
    use serde_json::Value;
    use std::str::FromStr;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn money(value: &Value) -> Decimal {
        dec(value.as_str().unwrap())
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    /// One staff member on 27,000 present every working day of January 2025.
    async fn create_test_state() -> AppState {
        let store = Arc::new(InMemoryStore::new());
        store
            .add_staff(StaffMember {
                id: "stf_001".to_string(),
                name: "Asha".to_string(),
                basic_salary: Some(dec("27000")),
                incentive_percentage: Decimal::ZERO,
                active: true,
                joining_date: make_date("2024-06-01"),
            })
            .await;

        let mut date = make_date("2025-01-01");
        while date <= make_date("2025-01-31") {
            if date.weekday() != Weekday::Sun {
                store
                    .add_attendance(AttendanceRecord {
                        staff_id: "stf_001".to_string(),
                        date,
                        status: AttendanceStatus::Present,
                        check_in: None,
                        check_out: None,
                    })
                    .await;
            }
            date = date.succ_opt().unwrap();
        }

        AppState::in_memory(PayrollConfig::default(), store)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn run_january(router: &Router) -> String {
        let (status, report) = send(router, "POST", "/payroll/runs/2025-01", None).await;
        assert_eq!(status, StatusCode::OK);
        report["results"][0]["record_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_run_payroll_returns_report() {
        let router = create_router(create_test_state().await);

        let (status, report) = send(&router, "POST", "/payroll/runs/2025-01", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["created"], 1);
        assert_eq!(report["results"][0]["staff_id"], "stf_001");
        assert_eq!(report["results"][0]["outcome"], "created");
        assert_eq!(money(&report["results"][0]["net_salary"]), dec("27000"));
    }

    #[tokio::test]
    async fn test_second_run_skips_existing_record() {
        let router = create_router(create_test_state().await);
        run_january(&router).await;

        let (status, report) = send(&router, "POST", "/payroll/runs/2025-01", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["created"], 0);
        assert_eq!(report["skipped"], 1);
        assert_eq!(report["results"][0]["reason"], "already_exists");
    }

    #[tokio::test]
    async fn test_invalid_month_returns_400() {
        let router = create_router(create_test_state().await);

        let (status, error) = send(&router, "POST", "/payroll/runs/2025-13", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let router = create_router(create_test_state().await);

        let (status, calculation) =
            send(&router, "GET", "/payroll/preview/stf_001/2025-01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(money(&calculation["breakdown"]["gross_salary"]), dec("27000"));

        let (status, _) = send(&router, "GET", "/salaries/staff/stf_001/2025-01", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_unknown_staff_returns_404() {
        let router = create_router(create_test_state().await);

        let (status, error) = send(&router, "GET", "/payroll/preview/stf_999/2025-01", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["code"], "STAFF_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_salary_record_after_run() {
        let router = create_router(create_test_state().await);
        run_january(&router).await;

        let (status, record) = send(&router, "GET", "/salaries/staff/stf_001/2025-01", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["payment_status"], "pending");
        assert_eq!(record["working_days"], 27);
        assert_eq!(record["sunday_count"], 4);
    }

    #[tokio::test]
    async fn test_approve_then_pay() {
        let router = create_router(create_test_state().await);
        let record_id = run_january(&router).await;

        let (status, record) =
            send(&router, "POST", &format!("/salaries/{}/approve", record_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["payment_status"], "approved");

        let (status, record) = send(
            &router,
            "POST",
            &format!("/salaries/{}/pay", record_id),
            Some(r#"{ "payment_date": "2025-02-05" }"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["payment_status"], "paid");
        assert_eq!(record["payment_date"], "2025-02-05");
    }

    #[tokio::test]
    async fn test_reject_after_approve_returns_409() {
        let router = create_router(create_test_state().await);
        let record_id = run_january(&router).await;
        send(&router, "POST", &format!("/salaries/{}/approve", record_id), None).await;

        let (status, error) =
            send(&router, "POST", &format!("/salaries/{}/reject", record_id), None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_pay_with_malformed_json_returns_400() {
        let router = create_router(create_test_state().await);
        let record_id = run_january(&router).await;

        let (status, error) = send(
            &router,
            "POST",
            &format!("/salaries/{}/pay", record_id),
            Some("{invalid json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_pay_without_payment_date_returns_validation_error() {
        let router = create_router(create_test_state().await);
        let record_id = run_january(&router).await;

        let (status, error) = send(
            &router,
            "POST",
            &format!("/salaries/{}/pay", record_id),
            Some("{}"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_invalid_record_id_returns_400() {
        let router = create_router(create_test_state().await);

        let (status, error) = send(&router, "POST", "/salaries/not-a-uuid/approve", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_unknown_record_returns_404() {
        let router = create_router(create_test_state().await);

        let (status, error) = send(
            &router,
            "POST",
            &format!("/salaries/{}/approve", Uuid::new_v4()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["code"], "SALARY_RECORD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bulk_approve_and_statistics() {
        let router = create_router(create_test_state().await);
        run_january(&router).await;

        let (status, report) = send(&router, "POST", "/salaries/bulk-approve/2025-01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["transitioned_count"], 1);

        let (status, report) = send(
            &router,
            "POST",
            "/salaries/bulk-pay/2025-01",
            Some(r#"{ "payment_date": "2025-02-05" }"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["transitioned_count"], 1);

        let (status, stats) =
            send(&router, "GET", "/salaries/statistics?month_year=2025-01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_records"], 1);
        assert_eq!(stats["paid"], 1);
        assert_eq!(money(&stats["total_net_amount"]), dec("27000"));
    }

    #[tokio::test]
    async fn test_list_salaries_filters_by_month() {
        let router = create_router(create_test_state().await);
        run_january(&router).await;

        let (status, january) = send(&router, "GET", "/salaries?month_year=2025-01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(january.as_array().unwrap().len(), 1);

        let (_, february) = send(&router, "GET", "/salaries?month_year=2025-02", None).await;
        assert!(february.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_advance_is_deducted_by_run() {
        let router = create_router(create_test_state().await);

        let (status, advance) = send(
            &router,
            "POST",
            "/advances",
            Some(
                r#"{
                    "staff_id": "stf_001",
                    "advance_amount": "3000",
                    "issue_date": "2025-01-05",
                    "deduction_plan": { "plan": "monthly", "installment": "1000" }
                }"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(money(&advance["remaining_balance"]), dec("3000"));
        let advance_id = advance["id"].as_str().unwrap().to_string();

        let (_, report) = send(&router, "POST", "/payroll/runs/2025-01", None).await;
        assert_eq!(money(&report["results"][0]["advance_deduction"]), dec("1000"));
        assert_eq!(money(&report["results"][0]["net_salary"]), dec("26000"));

        let (status, entries) =
            send(&router, "GET", &format!("/advances/{}/entries", advance_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entries.as_array().unwrap().len(), 1);

        let (status, schedule) = send(
            &router,
            "GET",
            &format!("/advances/{}/schedule?from=2025-01", advance_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let schedule = schedule.as_array().unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0]["month_year"], "2025-02");

        let (_, advances) = send(&router, "GET", "/advances/staff/stf_001", None).await;
        assert_eq!(money(&advances[0]["remaining_balance"]), dec("2000"));
    }

    #[tokio::test]
    async fn test_cancel_advance() {
        let router = create_router(create_test_state().await);
        let (_, advance) = send(
            &router,
            "POST",
            "/advances",
            Some(
                r#"{
                    "staff_id": "stf_001",
                    "advance_amount": "500",
                    "issue_date": "2025-01-05",
                    "deduction_plan": { "plan": "lump_sum" }
                }"#,
            ),
        )
        .await;
        let advance_id = advance["id"].as_str().unwrap().to_string();

        let (status, cancelled) =
            send(&router, "POST", &format!("/advances/{}/cancel", advance_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["status"], "cancelled");

        let (_, report) = send(&router, "POST", "/payroll/runs/2025-01", None).await;
        assert_eq!(money(&report["results"][0]["advance_deduction"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_issue_advance_with_zero_amount_returns_400() {
        let router = create_router(create_test_state().await);

        let (status, error) = send(
            &router,
            "POST",
            "/advances",
            Some(
                r#"{
                    "staff_id": "stf_001",
                    "advance_amount": "0",
                    "issue_date": "2025-01-05",
                    "deduction_plan": { "plan": "lump_sum" }
                }"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_ADVANCE");
    }
}
