//! The operator's payroll session.
//!
//! A [`PayrollSession`] holds what the operator sees and picks: the pay
//! period, the ready list, a selection set, the per-worker lifecycle state
//! and a queue of notices. Every network operation takes `&mut self`, so a
//! session can never have two submissions in flight.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::BatchRequest;
use crate::calculation::round_currency;
use crate::models::{
    BatchOutcome, BatchPreview, PayPeriod, PayrollEvent, PaystubRecord, WorkerPayrollCandidate,
    WorkerPayrollState,
};

use super::client::PayrollClient;
use super::notice::Notice;
use super::sink::PaystubSink;

/// Totals over the selected workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    /// Number of selected workers.
    pub selected: usize,
    /// Regular plus overtime hours.
    pub total_hours: Decimal,
    /// Estimated gross pay.
    pub gross_pay: Decimal,
    /// Estimated net pay.
    pub estimated_net_pay: Decimal,
}

/// An operator session against one payroll API.
pub struct PayrollSession<C> {
    client: C,
    period: PayPeriod,
    candidates: Vec<WorkerPayrollCandidate>,
    states: HashMap<String, WorkerPayrollState>,
    selection: BTreeSet<String>,
    search: String,
    status_filter: Option<WorkerPayrollState>,
    last_outcome: Option<BatchOutcome>,
    notices: Vec<Notice>,
}

impl<C: PayrollClient> PayrollSession<C> {
    /// Creates a session for a period. Nothing is loaded until
    /// [`refresh`](Self::refresh).
    pub fn new(client: C, period: PayPeriod) -> Self {
        Self {
            client,
            period,
            candidates: Vec::new(),
            states: HashMap::new(),
            selection: BTreeSet::new(),
            search: String::new(),
            status_filter: None,
            last_outcome: None,
            notices: Vec::new(),
        }
    }

    /// The current pay period.
    pub fn period(&self) -> PayPeriod {
        self.period
    }

    /// The last loaded ready list.
    pub fn candidates(&self) -> &[WorkerPayrollCandidate] {
        &self.candidates
    }

    /// Lifecycle state of a worker seen in this session.
    pub fn state_of(&self, worker_id: &str) -> Option<WorkerPayrollState> {
        self.states.get(worker_id).copied()
    }

    /// The selected worker ids, in id order.
    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// Outcome of the last submitted batch.
    pub fn last_outcome(&self) -> Option<&BatchOutcome> {
        self.last_outcome.as_ref()
    }

    /// Pending notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Removes and returns the pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Reloads the ready list for the current period.
    ///
    /// Listed workers return to `ready`, healing a previous failure. Workers
    /// no longer listed keep their state and leave the selection.
    pub async fn refresh(&mut self) -> bool {
        self.load(true).await
    }

    /// Fetches the ready list. With `heal` unset, known workers keep their
    /// state so failures stay visible after a batch.
    async fn load(&mut self, heal: bool) -> bool {
        match self.client.ready(self.period).await {
            Ok(candidates) => {
                for candidate in &candidates {
                    let id = &candidate.worker_id;
                    let state = match self.states.get(id) {
                        Some(state) if heal => state
                            .apply(id, PayrollEvent::Reappear)
                            .unwrap_or(*state),
                        Some(state) => *state,
                        None => WorkerPayrollState::Ready,
                    };
                    self.states.insert(id.clone(), state);
                }
                let listed: BTreeSet<&str> =
                    candidates.iter().map(|c| c.worker_id.as_str()).collect();
                self.selection.retain(|id| listed.contains(id.as_str()));
                self.candidates = candidates;
                true
            }
            Err(err) => {
                warn!(error = %err, "Failed to load the ready list");
                self.notices
                    .push(Notice::error(format!("Failed to load workers: {}", err.reason())));
                false
            }
        }
    }

    /// Switches to another period and reloads.
    pub async fn set_period(&mut self, period: PayPeriod) -> bool {
        self.period = period;
        self.candidates.clear();
        self.states.clear();
        self.selection.clear();
        self.last_outcome = None;
        self.refresh().await
    }

    /// Moves to the following period of the same length.
    pub async fn next_period(&mut self) -> bool {
        self.set_period(self.period.next()).await
    }

    /// Moves to the preceding period of the same length.
    pub async fn previous_period(&mut self) -> bool {
        self.set_period(self.period.previous()).await
    }

    /// Filters the visible list by a case-insensitive name or id fragment.
    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
    }

    /// Filters the visible list by lifecycle state.
    pub fn set_status_filter(&mut self, status: Option<WorkerPayrollState>) {
        self.status_filter = status;
    }

    /// Candidates passing the search and status filters.
    pub fn visible(&self) -> Vec<&WorkerPayrollCandidate> {
        self.candidates
            .iter()
            .filter(|c| {
                self.search.is_empty()
                    || c.worker_name.to_lowercase().contains(&self.search)
                    || c.worker_id.to_lowercase().contains(&self.search)
            })
            .filter(|c| {
                self.status_filter
                    .is_none_or(|status| self.state_of(&c.worker_id) == Some(status))
            })
            .collect()
    }

    fn selectable(&self, worker_id: &str) -> bool {
        self.candidates.iter().any(|c| c.worker_id == worker_id)
            && matches!(
                self.state_of(worker_id),
                Some(WorkerPayrollState::Ready | WorkerPayrollState::Failed)
            )
    }

    /// Adds or removes a worker from the selection. Returns whether the
    /// worker is selected afterwards.
    pub fn toggle(&mut self, worker_id: &str) -> bool {
        if self.selection.remove(worker_id) {
            return false;
        }
        if self.selectable(worker_id) {
            self.selection.insert(worker_id.to_string());
            true
        } else {
            false
        }
    }

    /// Selects every visible worker that can be submitted.
    pub fn select_all_visible(&mut self) {
        let ids: Vec<String> = self
            .visible()
            .into_iter()
            .map(|c| c.worker_id.clone())
            .filter(|id| self.selectable(id))
            .collect();
        self.selection.extend(ids);
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Totals of the selected candidates' estimates.
    pub fn summary(&self) -> SelectionSummary {
        self.candidates
            .iter()
            .filter(|c| self.selection.contains(&c.worker_id))
            .fold(SelectionSummary::default(), |mut summary, c| {
                summary.selected += 1;
                summary.total_hours += c.total_hours();
                summary.gross_pay = round_currency(summary.gross_pay + c.gross_pay);
                summary.estimated_net_pay =
                    round_currency(summary.estimated_net_pay + c.estimated_net_pay);
                summary
            })
    }

    fn selected_request(&mut self) -> Option<BatchRequest> {
        if self.selection.is_empty() {
            self.notices
                .push(Notice::warning("Select at least one worker to process"));
            return None;
        }
        Some(BatchRequest::new(
            self.selection.iter().cloned().collect(),
            self.period,
        ))
    }

    /// Previews the selection without processing it.
    pub async fn preview_selected(&mut self) -> Option<BatchPreview> {
        let request = self.selected_request()?;
        match self.client.preview(&request).await {
            Ok(preview) => Some(preview),
            Err(err) => {
                self.notices
                    .push(Notice::error(format!("Preview failed: {}", err.reason())));
                None
            }
        }
    }

    fn transition(&mut self, worker_id: &str, event: PayrollEvent) {
        let current = self.state_of(worker_id).unwrap_or(WorkerPayrollState::Ready);
        match current.apply(worker_id, event) {
            Ok(next) => {
                self.states.insert(worker_id.to_string(), next);
            }
            Err(err) => warn!(error = %err, "Ignoring payroll state transition"),
        }
    }

    /// Submits the selection as one batch.
    ///
    /// An empty selection produces a warning and sends nothing. Each failed
    /// worker gets its own error notice; the selection is cleared and the
    /// ready list reloaded once the outcome arrives. If no outcome arrives
    /// the workers go back to `ready` and stay selected.
    pub async fn process_selected(&mut self) -> Option<BatchOutcome> {
        let request = self.selected_request()?;

        for id in &request.worker_ids {
            if self.state_of(id) == Some(WorkerPayrollState::Failed) {
                self.transition(id, PayrollEvent::Reappear);
            }
            self.transition(id, PayrollEvent::Submit);
        }

        match self.client.process(&request).await {
            Ok(outcome) => {
                for run in &outcome.payrolls {
                    self.transition(&run.worker_id, PayrollEvent::Succeed);
                }
                for failure in &outcome.errors {
                    self.transition(&failure.worker_id, PayrollEvent::Fail);
                    self.notices.push(Notice::error(format!(
                        "{}: {}",
                        failure.worker_id, failure.error
                    )));
                }
                for id in &request.worker_ids {
                    if self.state_of(id) == Some(WorkerPayrollState::Processing) {
                        self.transition(id, PayrollEvent::Abandon);
                    }
                }
                if outcome.processed > 0 {
                    self.notices.push(Notice::success(format!(
                        "Processed payroll for {} worker{}",
                        outcome.processed,
                        if outcome.processed == 1 { "" } else { "s" }
                    )));
                }

                info!(
                    processed = outcome.processed,
                    failed = outcome.failed,
                    "Batch outcome received"
                );
                self.selection.clear();
                self.last_outcome = Some(outcome.clone());
                self.load(false).await;
                Some(outcome)
            }
            Err(err) => {
                for id in &request.worker_ids {
                    self.transition(id, PayrollEvent::Abandon);
                }
                warn!(error = %err, "Batch submission failed");
                self.notices.push(Notice::error(format!(
                    "Payroll processing failed: {}",
                    err.reason()
                )));
                None
            }
        }
    }

    /// Resubmits every worker whose last submission failed.
    pub async fn retry_failed(&mut self) -> Option<BatchOutcome> {
        let failed: Vec<String> = self
            .states
            .iter()
            .filter(|(_, state)| **state == WorkerPayrollState::Failed)
            .map(|(id, _)| id.clone())
            .collect();
        if failed.is_empty() {
            self.notices.push(Notice::warning("No failed workers to retry"));
            return None;
        }
        self.selection = failed.into_iter().collect();
        self.process_selected().await
    }

    /// Fetches one paystub.
    pub async fn paystub(&mut self, payroll_id: Uuid) -> Option<PaystubRecord> {
        match self.client.paystub(payroll_id).await {
            Ok(paystub) => Some(paystub),
            Err(err) => {
                self.notices.push(Notice::error(format!(
                    "Could not load paystub {payroll_id}: {}",
                    err.reason()
                )));
                None
            }
        }
    }

    /// Fetches the paystubs of the last batch one at a time, in outcome
    /// order, and hands each to the sink. A failure on one paystub is
    /// reported and the rest continue. Returns the number delivered.
    pub async fn download_paystubs<S: PaystubSink>(&mut self, sink: &mut S) -> usize {
        let runs: Vec<(Uuid, String)> = match &self.last_outcome {
            Some(outcome) => outcome
                .payrolls
                .iter()
                .map(|run| (run.payroll_id, run.worker_id.clone()))
                .collect(),
            None => Vec::new(),
        };
        if runs.is_empty() {
            self.notices.push(Notice::warning("No processed payrolls to download"));
            return 0;
        }

        let mut delivered = 0;
        for (payroll_id, worker_id) in runs {
            let Some(paystub) = self.paystub(payroll_id).await else {
                continue;
            };
            match sink.deliver(&paystub).await {
                Ok(()) => delivered += 1,
                Err(err) => self.notices.push(Notice::error(format!(
                    "{worker_id}: could not save paystub: {err}"
                ))),
            }
        }

        if delivered > 0 {
            self.notices
                .push(Notice::success(format!("Downloaded {delivered} paystubs")));
        }
        delivered
    }
}
