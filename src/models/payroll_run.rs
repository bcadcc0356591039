//! Batch processor inputs and outputs.
//!
//! This module contains [`PayrollRunResult`], the per-worker success record,
//! and [`BatchOutcome`], the fan-in of a whole batch submission.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PayrollError;

use super::PaystubRecord;

/// Created for each worker whose payroll was processed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRunResult {
    /// Identifier of the payroll run, used to fetch the paystub.
    pub payroll_id: Uuid,
    /// The worker paid by this run.
    pub worker_id: String,
    /// Worker display name.
    pub worker_name: String,
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Take-home pay.
    pub net_pay: Decimal,
    /// Opaque verification token minted for the run.
    pub hallmark_asset_number: Option<String>,
}

impl PayrollRunResult {
    /// Summarizes a committed paystub.
    pub fn from_paystub(paystub: &PaystubRecord) -> Self {
        Self {
            payroll_id: paystub.id,
            worker_id: paystub.employee_id.clone(),
            worker_name: paystub.worker_name.clone(),
            gross_pay: paystub.gross_pay,
            net_pay: paystub.net_pay,
            hallmark_asset_number: paystub.hallmark_asset_number.clone(),
        }
    }
}

/// A worker that could not be processed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerFailure {
    /// The worker identifier as submitted.
    pub worker_id: String,
    /// Operator-readable reason.
    pub error: String,
}

/// Result of a batch submission.
///
/// `processed + failed` always equals the number of distinct workers
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Number of workers processed successfully.
    pub processed: usize,
    /// Number of workers that failed.
    pub failed: usize,
    /// One entry per failed worker.
    pub errors: Vec<WorkerFailure>,
    /// One entry per successful worker, in submission order.
    pub payrolls: Vec<PayrollRunResult>,
}

impl BatchOutcome {
    /// Records a successful worker.
    pub fn push_success(&mut self, run: PayrollRunResult) {
        self.processed += 1;
        self.payrolls.push(run);
    }

    /// Records a failed worker.
    pub fn push_failure(&mut self, worker_id: impl Into<String>, error: &PayrollError) {
        self.failed += 1;
        self.errors.push(WorkerFailure {
            worker_id: worker_id.into(),
            error: error.to_string(),
        });
    }

    /// Total outcomes recorded.
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// What a run would produce for one worker, without committing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPreview {
    /// Worker identifier.
    pub worker_id: String,
    /// Worker display name.
    pub worker_name: String,
    /// Hours at the regular rate.
    pub regular_hours: Decimal,
    /// Hours at the overtime rate.
    pub overtime_hours: Decimal,
    /// Hourly wage.
    pub hourly_rate: Decimal,
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Federal income tax.
    pub federal_tax: Decimal,
    /// State income tax.
    pub state_tax: Decimal,
    /// Social Security tax.
    pub social_security_tax: Decimal,
    /// Medicare plus additional Medicare tax.
    pub medicare_tax: Decimal,
    /// Local occupational tax.
    pub local_tax: Decimal,
    /// Total garnishments.
    pub garnishments: Decimal,
    /// Take-home pay.
    pub net_pay: Decimal,
    /// Gross paid earlier in the calendar year.
    pub year_to_date_gross: Decimal,
}

/// Result of a preview request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPreview {
    /// One entry per worker that could be computed.
    pub previews: Vec<PayrollPreview>,
    /// One entry per worker that could not.
    pub errors: Vec<WorkerFailure>,
}

/// Answer to a hallmark verification lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HallmarkVerification {
    /// Always `true`; unknown tokens are reported as not found.
    pub verified: bool,
    /// The token that was verified.
    pub hallmark_asset_number: String,
    /// The payroll run carrying the token.
    pub payroll_id: Uuid,
    /// The worker paid by the run.
    pub worker_id: String,
    /// When the run was committed.
    pub processed_at: DateTime<Utc>,
}
