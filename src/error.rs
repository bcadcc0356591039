//! Error types for the payroll batch engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine, ledger and service layers can report.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll batch engine.
///
/// Per-worker failures inside a batch are carried as values of this type and
/// reported through their `Display` text, so every message is written to be
/// read by an operator.
///
/// # Example
///
/// ```
/// use payroll_batch::error::PayrollError;
///
/// let error = PayrollError::WorkerNotFound {
///     worker_id: "W2".to_string(),
/// };
/// assert_eq!(error.to_string(), "Worker not found: W2");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The pay period window is inverted.
    #[error("Invalid pay period: start {start} is after end {end}")]
    InvalidPayPeriod {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// A batch was submitted without any worker identifiers.
    #[error("No workers selected for payroll processing")]
    EmptyBatch,

    /// The worker is unknown to the ledger.
    #[error("Worker not found: {worker_id}")]
    WorkerNotFound {
        /// The worker identifier.
        worker_id: String,
    },

    /// The worker has no approved, unpaid timesheets in the pay period.
    #[error("No approved timesheets for worker {worker_id} between {start} and {end}")]
    NoApprovedTimesheets {
        /// The worker identifier.
        worker_id: String,
        /// Pay period start.
        start: NaiveDate,
        /// Pay period end.
        end: NaiveDate,
    },

    /// The worker has no hourly wage on file.
    #[error("Worker {worker_id} is missing an hourly wage")]
    MissingHourlyWage {
        /// The worker identifier.
        worker_id: String,
    },

    /// The worker has no W-4 tax profile on file.
    #[error("Worker {worker_id} is missing a tax profile")]
    MissingTaxProfile {
        /// The worker identifier.
        worker_id: String,
    },

    /// Timesheets claimed by a run were paid by another run in the meantime.
    #[error("Payroll for worker {worker_id} was already processed for this period")]
    AlreadyProcessed {
        /// The worker identifier.
        worker_id: String,
    },

    /// The payroll run is unknown or has been voided.
    #[error("Payroll run not found: {payroll_id}")]
    PayrollNotFound {
        /// The payroll run identifier.
        payroll_id: Uuid,
    },

    /// No live payroll run carries the hallmark token.
    #[error("Hallmark not found: {hallmark}")]
    HallmarkNotFound {
        /// The token that was looked up.
        hallmark: String,
    },

    /// Worker data failed validation.
    #[error("Invalid worker '{worker_id}': {message}")]
    InvalidWorker {
        /// The offending worker id.
        worker_id: String,
        /// What is wrong with it.
        message: String,
    },

    /// The timesheet is unknown to the ledger.
    #[error("Timesheet not found: {timesheet_id}")]
    TimesheetNotFound {
        /// The timesheet identifier.
        timesheet_id: String,
    },

    /// A timesheet was invalid or contained inconsistent data.
    #[error("Invalid timesheet '{timesheet_id}': {message}")]
    InvalidTimesheet {
        /// The ID of the invalid timesheet.
        timesheet_id: String,
        /// A description of what made the timesheet invalid.
        message: String,
    },

    /// The hallmark anchoring collaborator could not mint a token.
    #[error("Hallmark service unavailable: {message}")]
    HallmarkUnavailable {
        /// A description of the collaborator failure.
        message: String,
    },

    /// A per-worker lifecycle transition that the state machine forbids.
    #[error("Invalid payroll state transition for worker {worker_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// The worker identifier.
        worker_id: String,
        /// The state the worker was in.
        from: String,
        /// The state that was requested.
        to: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
