//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PayrollError;
use crate::ledger::RecordStatus;
use crate::models::{Timesheet, Worker};

use super::request::{BatchRequest, PeriodQuery};
use super::response::{ApiError, ApiErrorResponse, VoidResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/payroll/ready", get(ready_handler))
        .route("/api/payroll/preview", post(preview_handler))
        .route("/api/payroll/process", post(process_handler))
        .route("/api/payroll/paystub/:payroll_id", get(paystub_handler))
        .route("/api/payroll/:payroll_id/void", post(void_handler))
        .route("/verify/:hallmark", get(verify_handler))
        .route("/api/workers", put(upsert_worker_handler))
        .route("/api/timesheets", post(record_timesheet_handler))
        .route("/api/timesheets/:timesheet_id/approve", post(approve_timesheet_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(err: PayrollError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Turns a body rejection into a 400 with the serde message.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for GET /api/payroll/ready.
async fn ready_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection.body_text(), "Bad period query");
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };
    let period = match query.period() {
        Ok(period) => period,
        Err(err) => return error_response(err),
    };

    let start_time = Instant::now();
    match state.service().ready_for_payroll(period).await {
        Ok(candidates) => {
            info!(
                correlation_id = %correlation_id,
                start = %period.start,
                end = %period.end,
                candidates = candidates.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Eligibility query completed"
            );
            json_response(StatusCode::OK, candidates)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Eligibility query failed");
            error_response(err)
        }
    }
}

/// Handler for POST /api/payroll/preview.
async fn preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return error_response(err),
    };

    match state.service().preview_batch(&request.worker_ids, period).await {
        Ok(preview) => {
            info!(
                correlation_id = %correlation_id,
                previews = preview.previews.len(),
                errors = preview.errors.len(),
                "Payroll preview completed"
            );
            json_response(StatusCode::OK, preview)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll preview rejected");
            error_response(err)
        }
    }
}

/// Handler for POST /api/payroll/process.
///
/// Per-worker failures are part of a 200 response; only a request that
/// cannot start (empty batch, bad period, bad body) is an error.
async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll batch request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return error_response(err),
    };

    let start_time = Instant::now();
    match state.service().process_batch(&request.worker_ids, period).await {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                submitted = request.worker_ids.len(),
                processed = outcome.processed,
                failed = outcome.failed,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll batch completed"
            );
            json_response(StatusCode::OK, outcome)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll batch rejected");
            error_response(err)
        }
    }
}

/// Parses a path id; anything that is not a UUID names no run.
fn parse_payroll_id(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        json_response(
            StatusCode::NOT_FOUND,
            ApiError::new("PAYROLL_NOT_FOUND", format!("Payroll run not found: {raw}")),
        )
    })
}

/// Handler for GET /api/payroll/paystub/{payroll_id}.
async fn paystub_handler(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let payroll_id = match parse_payroll_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service().paystub(payroll_id).await {
        Ok(paystub) => json_response(StatusCode::OK, paystub),
        Err(err) => {
            warn!(payroll_id = %payroll_id, error = %err, "Paystub lookup failed");
            error_response(err)
        }
    }
}

/// Handler for POST /api/payroll/{payroll_id}/void.
async fn void_handler(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let payroll_id = match parse_payroll_id(&raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service().void_payroll(payroll_id).await {
        Ok(_) => json_response(
            StatusCode::OK,
            VoidResponse {
                payroll_id,
                status: RecordStatus::Voided,
            },
        ),
        Err(err) => error_response(err),
    }
}

/// Handler for GET /verify/{hallmark}.
async fn verify_handler(State(state): State<AppState>, Path(hallmark): Path<String>) -> Response {
    match state.service().verify_hallmark(&hallmark).await {
        Ok(verification) => json_response(StatusCode::OK, verification),
        Err(err) => error_response(err),
    }
}

/// Handler for PUT /api/workers.
async fn upsert_worker_handler(
    State(state): State<AppState>,
    payload: Result<Json<Worker>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let worker = match payload {
        Ok(Json(worker)) => worker,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    match state.service().upsert_worker(worker).await {
        Ok(worker) => json_response(StatusCode::OK, worker),
        Err(err) => error_response(err),
    }
}

/// Handler for POST /api/timesheets.
async fn record_timesheet_handler(
    State(state): State<AppState>,
    payload: Result<Json<Timesheet>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let timesheet = match payload {
        Ok(Json(timesheet)) => timesheet,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    match state.service().record_timesheet(timesheet).await {
        Ok(timesheet) => json_response(StatusCode::CREATED, timesheet),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Timesheet rejected");
            error_response(err)
        }
    }
}

/// Handler for POST /api/timesheets/{timesheet_id}/approve.
async fn approve_timesheet_handler(
    State(state): State<AppState>,
    Path(timesheet_id): Path<String>,
) -> Response {
    match state.service().approve_timesheet(&timesheet_id).await {
        Ok(timesheet) => json_response(StatusCode::OK, timesheet),
        Err(err) => error_response(err),
    }
}
