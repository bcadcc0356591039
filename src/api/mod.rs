//! HTTP API module for the payroll batch engine.
//!
//! This module exposes the eligibility query, batch processing, paystub
//! and hallmark endpoints, plus the worker and timesheet intake the batch
//! depends on.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRequest, PeriodQuery};
pub use response::{ApiError, ApiErrorResponse, VoidResponse};
pub use state::AppState;
