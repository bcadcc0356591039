//! Response types for the payroll API.
//!
//! This module defines the error body, the mapping from [`PayrollError`] to
//! HTTP status codes, and the small response bodies that have no model.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PayrollError;
use crate::ledger::RecordStatus;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
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
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, code: &str, error: &PayrollError) -> Self {
        Self {
            status,
            error: ApiError::new(code, error.to_string()),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        use PayrollError::*;

        match &error {
            ConfigNotFound { .. } | ConfigParseError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", error.to_string()),
            },
            InvalidPayPeriod { .. } => Self::new(StatusCode::BAD_REQUEST, "INVALID_PAY_PERIOD", &error),
            EmptyBatch => Self::new(StatusCode::BAD_REQUEST, "EMPTY_BATCH", &error),
            WorkerNotFound { .. } => Self::new(StatusCode::NOT_FOUND, "WORKER_NOT_FOUND", &error),
            NoApprovedTimesheets { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "NO_APPROVED_TIMESHEETS", &error)
            }
            MissingHourlyWage { .. } => Self::new(StatusCode::BAD_REQUEST, "MISSING_HOURLY_WAGE", &error),
            MissingTaxProfile { .. } => Self::new(StatusCode::BAD_REQUEST, "MISSING_TAX_PROFILE", &error),
            AlreadyProcessed { .. } => Self::new(StatusCode::CONFLICT, "ALREADY_PROCESSED", &error),
            PayrollNotFound { .. } => Self::new(StatusCode::NOT_FOUND, "PAYROLL_NOT_FOUND", &error),
            HallmarkNotFound { .. } => Self::new(StatusCode::NOT_FOUND, "HALLMARK_NOT_FOUND", &error),
            InvalidWorker { .. } => Self::new(StatusCode::BAD_REQUEST, "INVALID_WORKER", &error),
            TimesheetNotFound { .. } => Self::new(StatusCode::NOT_FOUND, "TIMESHEET_NOT_FOUND", &error),
            InvalidTimesheet { .. } => Self::new(StatusCode::BAD_REQUEST, "INVALID_TIMESHEET", &error),
            HallmarkUnavailable { .. } => {
                Self::new(StatusCode::BAD_GATEWAY, "HALLMARK_UNAVAILABLE", &error)
            }
            InvalidStateTransition { .. } => {
                Self::new(StatusCode::CONFLICT, "INVALID_STATE_TRANSITION", &error)
            }
            CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message.clone()),
            },
        }
    }
}

/// Body of a successful void.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidResponse {
    /// The voided run.
    pub payroll_id: Uuid,
    /// Always `voided`.
    pub status: RecordStatus,
}
