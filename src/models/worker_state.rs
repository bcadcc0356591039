//! Per-worker payroll lifecycle.
//!
//! ```text
//! ready ──submit──▶ processing ──succeed──▶ complete
//!                       │
//!                       └──fail──▶ failed
//! ```
//!
//! `failed` does not heal on its own: the worker returns to `ready` only by
//! reappearing in the eligibility query or by being resubmitted by id.
//! `abandon` returns an in-flight worker to `ready` when the outcome of the
//! submission never arrived.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Where a worker is in the payroll lifecycle for the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPayrollState {
    /// Eligible and not yet submitted.
    Ready,
    /// Submitted, outcome pending.
    Processing,
    /// Processed successfully.
    Complete,
    /// The payroll service reported an error.
    Failed,
}

/// Something that happened to a worker's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayrollEvent {
    /// Included in a batch submission.
    Submit,
    /// The batch reported success.
    Succeed,
    /// The batch reported a per-worker failure.
    Fail,
    /// The submission itself failed before any outcome was known.
    Abandon,
    /// Seen again as ready, or explicitly resubmitted.
    Reappear,
}

impl WorkerPayrollState {
    /// Applies `event`, returning the next state or an error for illegal moves.
    ///
    /// ```
    /// use payroll_batch::models::{PayrollEvent, WorkerPayrollState};
    ///
    /// let state = WorkerPayrollState::Ready
    ///     .apply("W1", PayrollEvent::Submit)
    ///     .and_then(|s| s.apply("W1", PayrollEvent::Fail))
    ///     .unwrap();
    /// assert_eq!(state, WorkerPayrollState::Failed);
    /// assert!(state.apply("W1", PayrollEvent::Submit).is_err());
    /// ```
    pub fn apply(self, worker_id: &str, event: PayrollEvent) -> PayrollResult<Self> {
        use PayrollEvent::*;
        use WorkerPayrollState::*;

        let next = match (self, event) {
            (Ready, Submit) => Processing,
            (Processing, Succeed) => Complete,
            (Processing, Fail) => Failed,
            (Processing, Abandon) => Ready,
            (Ready | Complete | Failed, Reappear) => Ready,
            (from, _) => {
                return Err(PayrollError::InvalidStateTransition {
                    worker_id: worker_id.to_string(),
                    from: from.to_string(),
                    to: event.target().to_string(),
                });
            }
        };
        Ok(next)
    }

    /// Whether no further transition happens without operator action.
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerPayrollState::Complete | WorkerPayrollState::Failed)
    }
}

impl PayrollEvent {
    fn target(self) -> WorkerPayrollState {
        match self {
            PayrollEvent::Submit => WorkerPayrollState::Processing,
            PayrollEvent::Succeed => WorkerPayrollState::Complete,
            PayrollEvent::Fail => WorkerPayrollState::Failed,
            PayrollEvent::Abandon | PayrollEvent::Reappear => WorkerPayrollState::Ready,
        }
    }
}

impl fmt::Display for WorkerPayrollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerPayrollState::Ready => "ready",
            WorkerPayrollState::Processing => "processing",
            WorkerPayrollState::Complete => "complete",
            WorkerPayrollState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PayrollEvent::*;
    use WorkerPayrollState::*;

    #[test]
    fn test_happy_path() {
        let state = Ready.apply("W1", Submit).unwrap();
        assert_eq!(state, Processing);
        assert_eq!(state.apply("W1", Succeed).unwrap(), Complete);
    }

    #[test]
    fn test_failed_only_reachable_from_processing() {
        assert_eq!(Processing.apply("W1", Fail).unwrap(), Failed);
        assert!(Ready.apply("W1", Fail).is_err());
        assert!(Complete.apply("W1", Fail).is_err());
    }

    #[test]
    fn test_failed_does_not_self_heal() {
        for event in [Submit, Succeed, Fail, Abandon] {
            assert!(Failed.apply("W1", event).is_err(), "{event:?}");
        }
        assert_eq!(Failed.apply("W1", Reappear).unwrap(), Ready);
    }

    #[test]
    fn test_cannot_submit_twice() {
        let err = Processing.apply("W7", Submit).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid payroll state transition for worker W7: processing -> processing"
        );
    }

    #[test]
    fn test_abandon_returns_to_ready() {
        assert_eq!(Processing.apply("W1", Abandon).unwrap(), Ready);
        assert!(Ready.apply("W1", Abandon).is_err());
    }

    #[test]
    fn test_processing_cannot_reappear() {
        assert!(Processing.apply("W1", Reappear).is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(Complete.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Ready.is_terminal());
        assert!(!Processing.is_terminal());
    }
}
