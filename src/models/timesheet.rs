//! Timesheet model.
//!
//! Timesheets are the unit of logged hours. Only `approved` timesheets are
//! finalized and unpaid; a successful payroll run moves them to `paid`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};

/// Approval lifecycle of a timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    /// Being filled in by the worker.
    #[default]
    Draft,
    /// Submitted for approval.
    Submitted,
    /// Approved and waiting for payroll.
    Approved,
    /// Rejected by a supervisor.
    Rejected,
    /// Included in a payroll run.
    Paid,
}

/// Hours logged by one worker on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    /// Unique identifier for the timesheet.
    pub id: String,
    /// The worker who logged the hours.
    pub worker_id: String,
    /// The day the hours were worked.
    pub work_date: NaiveDate,
    /// Hours worked, net of unpaid breaks.
    pub hours_worked: Decimal,
    /// Approval status.
    #[serde(default)]
    pub status: TimesheetStatus,
    /// The payroll run that paid this timesheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll_id: Option<Uuid>,
}

impl Timesheet {
    /// Whether the timesheet is finalized and not yet paid.
    pub fn is_payable(&self) -> bool {
        self.status == TimesheetStatus::Approved
    }

    /// Rejects negative hours and more than a day's worth of hours.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.hours_worked < Decimal::ZERO {
            return Err(PayrollError::InvalidTimesheet {
                timesheet_id: self.id.clone(),
                message: "hours worked cannot be negative".to_string(),
            });
        }
        if self.hours_worked > Decimal::from(24) {
            return Err(PayrollError::InvalidTimesheet {
                timesheet_id: self.id.clone(),
                message: "hours worked cannot exceed 24 in a day".to_string(),
            });
        }
        Ok(())
    }
}
