//! Request types for the payroll API.
//!
//! Period boundaries accept an ISO date or an RFC 3339 timestamp; the UTC
//! date of a timestamp is used.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PayrollResult;
use crate::models::{PayPeriod, boundary};

/// Query string of `GET /api/payroll/ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    /// First day of the period (inclusive).
    #[serde(with = "boundary")]
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    #[serde(with = "boundary")]
    pub end_date: NaiveDate,
}

impl PeriodQuery {
    /// The requested period, rejecting inverted windows.
    pub fn period(&self) -> PayrollResult<PayPeriod> {
        PayPeriod::new(self.start_date, self.end_date)
    }
}

/// Body of `POST /api/payroll/process` and `POST /api/payroll/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// Workers to process.
    pub worker_ids: Vec<String>,
    /// First day of the period (inclusive).
    #[serde(with = "boundary")]
    pub pay_period_start: NaiveDate,
    /// Last day of the period (inclusive).
    #[serde(with = "boundary")]
    pub pay_period_end: NaiveDate,
}

impl BatchRequest {
    /// Builds a request for a period.
    pub fn new(worker_ids: Vec<String>, period: PayPeriod) -> Self {
        Self {
            worker_ids,
            pay_period_start: period.start,
            pay_period_end: period.end,
        }
    }

    /// The requested period, rejecting inverted windows.
    pub fn period(&self) -> PayrollResult<PayPeriod> {
        PayPeriod::new(self.pay_period_start, self.pay_period_end)
    }
}
