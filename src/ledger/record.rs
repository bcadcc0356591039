//! Stored payroll runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PaystubRecord, Timesheet};

/// Lifecycle of a stored payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// The run stands; its paystub can be read.
    Processed,
    /// The run was reversed; its timesheets are payable again.
    Voided,
}

/// One committed payroll run: the materialized paystub plus the timesheets
/// it paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    /// The paystub, frozen at commit time.
    pub paystub: PaystubRecord,
    /// The timesheets this run paid, as they stood when the paystub was
    /// computed.
    pub timesheets: Vec<Timesheet>,
    /// When the run was committed.
    pub processed_at: DateTime<Utc>,
    /// Current status.
    pub status: RecordStatus,
}

impl PayrollRecord {
    /// Creates a processed record.
    pub fn new(paystub: PaystubRecord, timesheets: Vec<Timesheet>, processed_at: DateTime<Utc>) -> Self {
        Self {
            paystub,
            timesheets,
            processed_at,
            status: RecordStatus::Processed,
        }
    }

    /// The payroll run id.
    pub fn payroll_id(&self) -> Uuid {
        self.paystub.id
    }

    /// The worker this run paid.
    pub fn worker_id(&self) -> &str {
        &self.paystub.employee_id
    }

    /// Ids of the timesheets this run paid.
    pub fn timesheet_ids(&self) -> impl Iterator<Item = &str> {
        self.timesheets.iter().map(|ts| ts.id.as_str())
    }

    /// Whether the run still stands.
    pub fn is_processed(&self) -> bool {
        self.status == RecordStatus::Processed
    }
}
