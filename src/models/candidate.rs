//! Eligibility query output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payroll status of a candidate as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    /// Hours are finalized and unpaid.
    Ready,
    /// A run is in flight.
    Processing,
    /// The run for this period is done.
    Complete,
}

/// A worker whose hours for a pay period are ready for payroll, with
/// precomputed estimates.
///
/// Produced read-only by the eligibility query and discarded on the next
/// fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPayrollCandidate {
    /// Worker identifier.
    pub worker_id: String,
    /// Worker display name.
    pub worker_name: String,
    /// Hourly wage; `None` when none is on file.
    pub hourly_wage: Option<Decimal>,
    /// Hours paid at the regular rate.
    pub regular_hours: Decimal,
    /// Hours paid at the overtime rate.
    pub overtime_hours: Decimal,
    /// Estimated gross pay.
    pub gross_pay: Decimal,
    /// Estimated withholdings and garnishments.
    pub estimated_deductions: Decimal,
    /// Estimated take-home pay.
    pub estimated_net_pay: Decimal,
    /// Candidate status.
    pub status: CandidateStatus,
}

impl WorkerPayrollCandidate {
    /// Regular plus overtime hours.
    pub fn total_hours(&self) -> Decimal {
        self.regular_hours + self.overtime_hours
    }
}
