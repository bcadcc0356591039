//! The payroll service: eligibility query, batch processor and paystub
//! materializer over a [`PayrollLedger`].

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::ledger::{HallmarkMinter, PayrollLedger, PayrollRecord, minter_from_config};
use crate::models::{
    BatchOutcome, BatchPreview, HallmarkVerification, PayPeriod, PaystubRecord, PayrollRunResult,
    Timesheet, Worker, WorkerFailure, WorkerPayrollCandidate,
};

use super::compute::{build_paystub, build_preview, estimate_candidate};

/// Payroll operations shared by the HTTP handlers.
///
/// Cloning is cheap; every clone works on the same ledger.
#[derive(Clone)]
pub struct PayrollService {
    config: Arc<PayrollConfig>,
    ledger: Arc<PayrollLedger>,
    minter: Arc<dyn HallmarkMinter>,
}

/// Collapses repeated ids, keeping the first occurrence.
fn dedupe(worker_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    worker_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

impl PayrollService {
    /// Creates a service with an explicit minter.
    pub fn new(
        config: Arc<PayrollConfig>,
        ledger: Arc<PayrollLedger>,
        minter: Arc<dyn HallmarkMinter>,
    ) -> Self {
        Self {
            config,
            ledger,
            minter,
        }
    }

    /// Creates a service whose minter follows the hallmark settings.
    pub fn from_config(config: PayrollConfig, ledger: PayrollLedger) -> Self {
        let minter = minter_from_config(&config.settings().hallmark);
        Self::new(Arc::new(config), Arc::new(ledger), minter)
    }

    /// The payroll configuration in use.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &PayrollLedger {
        &self.ledger
    }

    /// Lists the workers ready for payroll in a period.
    ///
    /// A worker qualifies with at least one approved, unpaid timesheet
    /// dated inside the period. Candidates are ordered by name, then id.
    ///
    /// # Errors
    ///
    /// `InvalidPayPeriod` when the period is inverted.
    pub async fn ready_for_payroll(
        &self,
        period: PayPeriod,
    ) -> PayrollResult<Vec<WorkerPayrollCandidate>> {
        period.validate()?;

        let mut candidates: Vec<WorkerPayrollCandidate> = self
            .ledger
            .eligible(&period)
            .await
            .iter()
            .map(|snapshot| estimate_candidate(snapshot, &period, &self.config))
            .collect();
        candidates.sort_by(|a, b| {
            a.worker_name
                .cmp(&b.worker_name)
                .then_with(|| a.worker_id.cmp(&b.worker_id))
        });

        debug!(
            start = %period.start,
            end = %period.end,
            candidates = candidates.len(),
            "Eligibility query"
        );
        Ok(candidates)
    }

    /// Computes what processing would pay each worker, without side effects.
    pub async fn preview_batch(
        &self,
        worker_ids: &[String],
        period: PayPeriod,
    ) -> PayrollResult<BatchPreview> {
        period.validate()?;
        let ids = dedupe(worker_ids);
        if ids.is_empty() {
            return Err(PayrollError::EmptyBatch);
        }

        let mut preview = BatchPreview::default();
        for worker_id in ids {
            let result = async {
                let snapshot = self.ledger.worker_snapshot(&worker_id, &period).await?;
                build_preview(&snapshot, &period, &self.config)
            }
            .await;
            match result {
                Ok(entry) => preview.previews.push(entry),
                Err(err) => preview.errors.push(WorkerFailure {
                    worker_id,
                    error: err.to_string(),
                }),
            }
        }
        Ok(preview)
    }

    /// Processes payroll for a set of workers, best effort.
    ///
    /// Each worker runs in its own task; one worker's failure never affects
    /// another's. Results come back in submission order with
    /// `processed + failed` equal to the number of distinct ids.
    ///
    /// # Errors
    ///
    /// `EmptyBatch` for an empty id list and `InvalidPayPeriod` for an
    /// inverted period. Per-worker failures are reported in the outcome.
    pub async fn process_batch(
        &self,
        worker_ids: &[String],
        period: PayPeriod,
    ) -> PayrollResult<BatchOutcome> {
        period.validate()?;
        let ids = dedupe(worker_ids);
        if ids.is_empty() {
            return Err(PayrollError::EmptyBatch);
        }

        let started = Instant::now();
        let mut tasks = JoinSet::new();
        for (index, worker_id) in ids.iter().cloned().enumerate() {
            let service = self.clone();
            tasks.spawn(async move {
                let result = service.process_worker(&worker_id, period).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<PayrollResult<PaystubRecord>>> =
            ids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(join_error) => warn!(error = %join_error, "Payroll worker task did not finish"),
            }
        }

        let mut outcome = BatchOutcome::default();
        for (worker_id, result) in ids.into_iter().zip(results) {
            match result {
                Some(Ok(paystub)) => outcome.push_success(PayrollRunResult::from_paystub(&paystub)),
                Some(Err(err)) => {
                    warn!(worker_id = %worker_id, error = %err, "Payroll failed for worker");
                    outcome.push_failure(worker_id, &err);
                }
                None => outcome.push_failure(
                    worker_id,
                    &PayrollError::CalculationError {
                        message: "payroll task aborted".to_string(),
                    },
                ),
            }
        }

        info!(
            start = %period.start,
            end = %period.end,
            processed = outcome.processed,
            failed = outcome.failed,
            duration_us = started.elapsed().as_micros(),
            "Payroll batch finished"
        );
        Ok(outcome)
    }

    async fn process_worker(&self, worker_id: &str, period: PayPeriod) -> PayrollResult<PaystubRecord> {
        let snapshot = self.ledger.worker_snapshot(worker_id, &period).await?;
        let mut paystub = build_paystub(&snapshot, &period, &self.config)?;
        paystub.hallmark_asset_number = self.minter.mint(&paystub).await?;

        let record = PayrollRecord::new(paystub, snapshot.timesheets, Utc::now());
        self.ledger.commit_run(record).await
    }

    /// Returns the paystub of a standing run. The record is stored, never
    /// recomputed, so repeated calls return identical data.
    pub async fn paystub(&self, payroll_id: Uuid) -> PayrollResult<PaystubRecord> {
        Ok(self.ledger.record(payroll_id).await?.paystub)
    }

    /// Voids a run; its worker becomes eligible again for the period.
    pub async fn void_payroll(&self, payroll_id: Uuid) -> PayrollResult<PayrollRecord> {
        self.ledger.void_run(payroll_id).await
    }

    /// Confirms that a hallmark token anchors a standing run.
    pub async fn verify_hallmark(&self, hallmark: &str) -> PayrollResult<HallmarkVerification> {
        let record = self.ledger.find_by_hallmark(hallmark).await?;
        Ok(HallmarkVerification {
            verified: true,
            hallmark_asset_number: hallmark.trim().to_string(),
            payroll_id: record.payroll_id(),
            worker_id: record.worker_id().to_string(),
            processed_at: record.processed_at,
        })
    }

    /// Inserts or replaces a worker. Rejects records failing
    /// [`Worker::validate`] with `InvalidWorker`.
    pub async fn upsert_worker(&self, worker: Worker) -> PayrollResult<Worker> {
        self.ledger.upsert_worker(worker).await
    }

    /// Records a timesheet for an existing worker.
    pub async fn record_timesheet(&self, timesheet: Timesheet) -> PayrollResult<Timesheet> {
        self.ledger.record_timesheet(timesheet).await
    }

    /// Approves a timesheet.
    pub async fn approve_timesheet(&self, timesheet_id: &str) -> PayrollResult<Timesheet> {
        self.ledger.approve_timesheet(timesheet_id).await
    }
}
