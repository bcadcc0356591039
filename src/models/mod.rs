//! Core data models for the payroll batch engine.
//!
//! This module contains all the domain models used throughout the engine.

mod candidate;
mod pay_period;
mod payroll_run;
mod paystub;
mod timesheet;
mod worker;
mod worker_state;

pub use candidate::{CandidateStatus, WorkerPayrollCandidate};
pub use pay_period::{PayPeriod, boundary, parse_boundary};
pub use payroll_run::{
    BatchOutcome, BatchPreview, HallmarkVerification, PayrollPreview, PayrollRunResult,
    WorkerFailure,
};
pub use paystub::{GarnishmentLine, PaystubRecord};
pub use timesheet::{Timesheet, TimesheetStatus};
pub use worker::{
    FilingStatus, GarnishmentKind, GarnishmentOrder, MAX_HOURLY_WAGE, MAX_PERIOD_AMOUNT, OrderStatus,
    TaxProfile, Worker,
};
pub use worker_state::{PayrollEvent, WorkerPayrollState};
