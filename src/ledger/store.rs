//! In-memory payroll store.
//!
//! Holds workers, timesheets and committed payroll runs behind one
//! `tokio::sync::RwLock`. Reads take snapshots; a run is committed under
//! the write lock after re-checking that every timesheet it claims is still
//! payable and unchanged, so two overlapping submissions cannot pay the same
//! hours and an edit made mid-run cannot be paid at stale hours.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayPeriod, PaystubRecord, Timesheet, TimesheetStatus, Worker};

use super::record::{PayrollRecord, RecordStatus};
use super::roster::Roster;

/// A worker together with the payable timesheets of one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSnapshot {
    /// The worker as stored.
    pub worker: Worker,
    /// Approved, unpaid timesheets dated inside the period, by date.
    pub timesheets: Vec<Timesheet>,
    /// Gross of the worker's standing runs that ended earlier in the same
    /// calendar year as the period start.
    pub year_to_date_gross: Decimal,
}

impl WorkerSnapshot {
    /// Ids of the snapshot's timesheets.
    pub fn timesheet_ids(&self) -> Vec<String> {
        self.timesheets.iter().map(|ts| ts.id.clone()).collect()
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    workers: HashMap<String, Worker>,
    timesheets: BTreeMap<String, Timesheet>,
    records: HashMap<Uuid, PayrollRecord>,
    hallmarks: HashMap<String, Uuid>,
}

impl LedgerState {
    fn snapshot(&self, worker: &Worker, period: &PayPeriod) -> WorkerSnapshot {
        let mut timesheets: Vec<Timesheet> = self
            .timesheets
            .values()
            .filter(|ts| {
                ts.worker_id == worker.id && ts.is_payable() && period.contains_date(ts.work_date)
            })
            .cloned()
            .collect();
        timesheets.sort_by(|a, b| a.work_date.cmp(&b.work_date).then_with(|| a.id.cmp(&b.id)));

        WorkerSnapshot {
            worker: worker.clone(),
            timesheets,
            year_to_date_gross: self.year_to_date_gross(&worker.id, period),
        }
    }

    fn year_to_date_gross(&self, worker_id: &str, period: &PayPeriod) -> Decimal {
        self.records
            .values()
            .filter(|record| record.is_processed() && record.worker_id() == worker_id)
            .map(|record| &record.paystub)
            .filter(|stub| {
                stub.pay_period_end < period.start
                    && stub.pay_period_end.year() == period.start.year()
            })
            .map(|stub| stub.gross_pay)
            .sum()
    }
}

/// The payroll store.
#[derive(Debug, Default)]
pub struct PayrollLedger {
    state: RwLock<LedgerState>,
}

impl PayrollLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger holding a roster's workers and timesheets.
    ///
    /// # Errors
    ///
    /// Fails like [`PayrollLedger::upsert_worker`] on the first bad worker
    /// and like [`PayrollLedger::record_timesheet`] on the first bad
    /// timesheet.
    pub async fn from_roster(roster: Roster) -> PayrollResult<Self> {
        let ledger = Self::new();
        for worker in roster.workers {
            ledger.upsert_worker(worker).await?;
        }
        for timesheet in roster.timesheets {
            ledger.record_timesheet(timesheet).await?;
        }
        Ok(ledger)
    }

    /// Inserts or replaces a worker after [`Worker::validate`].
    pub async fn upsert_worker(&self, worker: Worker) -> PayrollResult<Worker> {
        worker.validate()?;
        let mut state = self.state.write().await;
        debug!(worker_id = %worker.id, "Upserting worker");
        state.workers.insert(worker.id.clone(), worker.clone());
        Ok(worker)
    }

    /// Returns a worker by id.
    pub async fn worker(&self, worker_id: &str) -> Option<Worker> {
        self.state.read().await.workers.get(worker_id).cloned()
    }

    /// Inserts or replaces a timesheet.
    ///
    /// Paid status is reserved for payroll runs: a timesheet cannot be
    /// recorded as paid, and a paid one cannot be overwritten.
    pub async fn record_timesheet(&self, timesheet: Timesheet) -> PayrollResult<Timesheet> {
        timesheet.validate()?;
        if timesheet.status == TimesheetStatus::Paid || timesheet.payroll_id.is_some() {
            return Err(PayrollError::InvalidTimesheet {
                timesheet_id: timesheet.id.clone(),
                message: "timesheets are marked paid only by a payroll run".to_string(),
            });
        }

        let mut state = self.state.write().await;
        if !state.workers.contains_key(&timesheet.worker_id) {
            return Err(PayrollError::WorkerNotFound {
                worker_id: timesheet.worker_id.clone(),
            });
        }
        if let Some(existing) = state.timesheets.get(&timesheet.id) {
            if existing.status == TimesheetStatus::Paid {
                return Err(PayrollError::InvalidTimesheet {
                    timesheet_id: timesheet.id.clone(),
                    message: "timesheet has already been paid".to_string(),
                });
            }
        }

        state.timesheets.insert(timesheet.id.clone(), timesheet.clone());
        Ok(timesheet)
    }

    /// Finalizes a timesheet so it becomes payable.
    pub async fn approve_timesheet(&self, timesheet_id: &str) -> PayrollResult<Timesheet> {
        let mut state = self.state.write().await;
        let timesheet = state.timesheets.get_mut(timesheet_id).ok_or_else(|| {
            PayrollError::TimesheetNotFound {
                timesheet_id: timesheet_id.to_string(),
            }
        })?;

        match timesheet.status {
            TimesheetStatus::Draft | TimesheetStatus::Submitted | TimesheetStatus::Approved => {
                timesheet.status = TimesheetStatus::Approved;
                Ok(timesheet.clone())
            }
            TimesheetStatus::Rejected => Err(PayrollError::InvalidTimesheet {
                timesheet_id: timesheet_id.to_string(),
                message: "rejected timesheets cannot be approved".to_string(),
            }),
            TimesheetStatus::Paid => Err(PayrollError::InvalidTimesheet {
                timesheet_id: timesheet_id.to_string(),
                message: "timesheet has already been paid".to_string(),
            }),
        }
    }

    /// Returns a timesheet by id.
    pub async fn timesheet(&self, timesheet_id: &str) -> Option<Timesheet> {
        self.state.read().await.timesheets.get(timesheet_id).cloned()
    }

    /// Snapshots every worker with at least one payable timesheet in the
    /// period.
    pub async fn eligible(&self, period: &PayPeriod) -> Vec<WorkerSnapshot> {
        let state = self.state.read().await;
        state
            .workers
            .values()
            .map(|worker| state.snapshot(worker, period))
            .filter(|snapshot| !snapshot.timesheets.is_empty())
            .collect()
    }

    /// Snapshots one worker for a period. The timesheet list may be empty.
    pub async fn worker_snapshot(
        &self,
        worker_id: &str,
        period: &PayPeriod,
    ) -> PayrollResult<WorkerSnapshot> {
        let state = self.state.read().await;
        let worker = state
            .workers
            .get(worker_id)
            .ok_or_else(|| PayrollError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })?;
        Ok(state.snapshot(worker, period))
    }

    /// Commits a payroll run.
    ///
    /// Every claimed timesheet must still be approved, unpaid and unchanged
    /// since the paystub was computed; otherwise nothing is written and
    /// `AlreadyProcessed` is returned. A hallmark token already anchoring
    /// another run is refused with `HallmarkUnavailable`. On success the
    /// timesheets are marked paid with the run's id.
    pub async fn commit_run(&self, record: PayrollRecord) -> PayrollResult<PaystubRecord> {
        let mut state = self.state.write().await;
        let payroll_id = record.payroll_id();
        let worker_id = record.worker_id().to_string();

        let unchanged = record.timesheets.iter().all(|claimed| {
            claimed.worker_id == worker_id
                && claimed.is_payable()
                && state.timesheets.get(&claimed.id) == Some(claimed)
        });
        if !unchanged {
            warn!(worker_id = %worker_id, payroll_id = %payroll_id, "Timesheets changed before commit");
            return Err(PayrollError::AlreadyProcessed { worker_id });
        }

        if let Some(token) = &record.paystub.hallmark_asset_number {
            if let Some(holder) = state.hallmarks.get(token) {
                warn!(worker_id = %worker_id, payroll_id = %payroll_id, holder = %holder, "Hallmark token collision");
                return Err(PayrollError::HallmarkUnavailable {
                    message: format!("token {token} already anchors another run"),
                });
            }
            state.hallmarks.insert(token.clone(), payroll_id);
        }

        for claimed in &record.timesheets {
            if let Some(ts) = state.timesheets.get_mut(&claimed.id) {
                ts.status = TimesheetStatus::Paid;
                ts.payroll_id = Some(payroll_id);
            }
        }

        let paystub = record.paystub.clone();
        state.records.insert(payroll_id, record);
        info!(worker_id = %worker_id, payroll_id = %payroll_id, "Payroll run committed");
        Ok(paystub)
    }

    /// Returns a standing run by id.
    pub async fn record(&self, payroll_id: Uuid) -> PayrollResult<PayrollRecord> {
        self.state
            .read()
            .await
            .records
            .get(&payroll_id)
            .filter(|record| record.is_processed())
            .cloned()
            .ok_or(PayrollError::PayrollNotFound { payroll_id })
    }

    /// Voids a standing run and makes its timesheets payable again.
    pub async fn void_run(&self, payroll_id: Uuid) -> PayrollResult<PayrollRecord> {
        let mut state = self.state.write().await;
        let record = match state.records.get_mut(&payroll_id) {
            Some(record) if record.is_processed() => record,
            _ => return Err(PayrollError::PayrollNotFound { payroll_id }),
        };
        record.status = RecordStatus::Voided;
        let record = record.clone();

        for id in record.timesheet_ids() {
            if let Some(ts) = state.timesheets.get_mut(id) {
                if ts.payroll_id == Some(payroll_id) {
                    ts.status = TimesheetStatus::Approved;
                    ts.payroll_id = None;
                }
            }
        }
        info!(payroll_id = %payroll_id, worker_id = %record.worker_id(), "Payroll run voided");
        Ok(record)
    }

    /// Finds the standing run anchored by a hallmark token.
    pub async fn find_by_hallmark(&self, hallmark: &str) -> PayrollResult<PayrollRecord> {
        let state = self.state.read().await;
        state
            .hallmarks
            .get(hallmark.trim())
            .and_then(|id| state.records.get(id))
            .filter(|record| record.is_processed())
            .cloned()
            .ok_or_else(|| PayrollError::HallmarkNotFound {
                hallmark: hallmark.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week() -> PayPeriod {
        PayPeriod::new(date(2025, 1, 6), date(2025, 1, 12)).unwrap()
    }

    fn worker(id: &str) -> Worker {
        Worker {
            id: id.to_string(),
            name: format!("Worker {id}"),
            hourly_wage: Some(dec("20")),
            tax_profile: None,
            garnishment_orders: Vec::new(),
        }
    }

    fn timesheet(id: &str, worker_id: &str, day: u32, status: TimesheetStatus) -> Timesheet {
        Timesheet {
            id: id.to_string(),
            worker_id: worker_id.to_string(),
            work_date: date(2025, 1, day),
            hours_worked: dec("8"),
            status,
            payroll_id: None,
        }
    }

    fn paystub_for(worker_id: &str, period: &PayPeriod, gross: &str) -> PaystubRecord {
        let value = dec(gross);
        let id = Uuid::new_v4();
        PaystubRecord {
            id,
            employee_id: worker_id.to_string(),
            worker_name: format!("Worker {worker_id}"),
            pay_period_start: period.start,
            pay_period_end: period.end,
            pay_date: period.end,
            regular_hours: dec("8"),
            overtime_hours: Decimal::ZERO,
            total_hours: dec("8"),
            hourly_rate: dec("20"),
            regular_pay: value,
            overtime_pay: Decimal::ZERO,
            gross_pay: value,
            federal_income_tax: Decimal::ZERO,
            social_security_tax: Decimal::ZERO,
            medicare_tax: Decimal::ZERO,
            additional_medicare_tax: Decimal::ZERO,
            state_tax: Decimal::ZERO,
            local_tax: Decimal::ZERO,
            total_mandatory_deductions: Decimal::ZERO,
            disposable_earnings: value,
            garnishments: Vec::new(),
            total_garnishments: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_pay: value,
            year_to_date_gross: value,
            ccpa_compliant: true,
            hallmark_asset_number: Some(format!("PAYROLL-1-{id}")),
            work_state: "TN".to_string(),
            work_city: None,
        }
    }

    async fn seeded() -> PayrollLedger {
        let ledger = PayrollLedger::new();
        ledger.upsert_worker(worker("W1")).await.unwrap();
        ledger.upsert_worker(worker("W2")).await.unwrap();
        ledger
            .record_timesheet(timesheet("ts-1", "W1", 6, TimesheetStatus::Approved))
            .await
            .unwrap();
        ledger
            .record_timesheet(timesheet("ts-2", "W1", 7, TimesheetStatus::Approved))
            .await
            .unwrap();
        ledger
            .record_timesheet(timesheet("ts-3", "W2", 6, TimesheetStatus::Submitted))
            .await
            .unwrap();
        ledger
    }

    #[tokio::test]
    async fn test_eligible_requires_approved_timesheet_in_period() {
        let ledger = seeded().await;
        let eligible = ledger.eligible(&week()).await;
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].worker.id, "W1");
        assert_eq!(eligible[0].timesheet_ids(), vec!["ts-1", "ts-2"]);

        let next = ledger.eligible(&week().next()).await;
        assert!(next.is_empty());
    }

    #[tokio::test]
    async fn test_approve_makes_timesheet_payable() {
        let ledger = seeded().await;
        let approved = ledger.approve_timesheet("ts-3").await.unwrap();
        assert_eq!(approved.status, TimesheetStatus::Approved);
        assert_eq!(ledger.eligible(&week()).await.len(), 2);
    }

    #[tokio::test]
    async fn test_approve_unknown_timesheet() {
        let ledger = seeded().await;
        let result = ledger.approve_timesheet("nope").await;
        assert!(matches!(result, Err(PayrollError::TimesheetNotFound { .. })));
    }

    #[tokio::test]
    async fn test_record_timesheet_for_unknown_worker() {
        let ledger = seeded().await;
        let result = ledger
            .record_timesheet(timesheet("ts-9", "W9", 6, TimesheetStatus::Approved))
            .await;
        assert!(matches!(result, Err(PayrollError::WorkerNotFound { .. })));
    }

    #[tokio::test]
    async fn test_cannot_record_paid_timesheet() {
        let ledger = seeded().await;
        let result = ledger
            .record_timesheet(timesheet("ts-9", "W1", 6, TimesheetStatus::Paid))
            .await;
        assert!(matches!(result, Err(PayrollError::InvalidTimesheet { .. })));
    }

    #[tokio::test]
    async fn test_commit_marks_timesheets_paid() {
        let ledger = seeded().await;
        let snapshot = ledger.worker_snapshot("W1", &week()).await.unwrap();
        let stub = paystub_for("W1", &week(), "320");
        let record = PayrollRecord::new(stub.clone(), snapshot.timesheets.clone(), Utc::now());

        let committed = ledger.commit_run(record).await.unwrap();
        assert_eq!(committed, stub);

        let ts = ledger.timesheet("ts-1").await.unwrap();
        assert_eq!(ts.status, TimesheetStatus::Paid);
        assert_eq!(ts.payroll_id, Some(stub.id));
        assert!(ledger.eligible(&week()).await.is_empty());
        assert_eq!(ledger.record(stub.id).await.unwrap().paystub, stub);
    }

    #[tokio::test]
    async fn test_second_commit_of_same_hours_is_rejected() {
        let ledger = seeded().await;
        let snapshot = ledger.worker_snapshot("W1", &week()).await.unwrap();

        let first = PayrollRecord::new(paystub_for("W1", &week(), "320"), snapshot.timesheets.clone(), Utc::now());
        let second = PayrollRecord::new(paystub_for("W1", &week(), "320"), snapshot.timesheets.clone(), Utc::now());
        let second_id = second.payroll_id();

        ledger.commit_run(first).await.unwrap();
        let result = ledger.commit_run(second).await;
        assert!(matches!(result, Err(PayrollError::AlreadyProcessed { .. })));
        assert!(ledger.record(second_id).await.is_err());
    }

    #[tokio::test]
    async fn test_commit_rejects_timesheet_edited_after_snapshot() {
        let ledger = seeded().await;
        let snapshot = ledger.worker_snapshot("W1", &week()).await.unwrap();
        let stub = paystub_for("W1", &week(), "320");

        let mut edited = timesheet("ts-2", "W1", 7, TimesheetStatus::Approved);
        edited.hours_worked = dec("10");
        ledger.record_timesheet(edited.clone()).await.unwrap();

        let result = ledger
            .commit_run(PayrollRecord::new(stub.clone(), snapshot.timesheets.clone(), Utc::now()))
            .await;
        assert!(matches!(result, Err(PayrollError::AlreadyProcessed { .. })));
        assert!(ledger.record(stub.id).await.is_err());
        assert_eq!(ledger.timesheet("ts-1").await.unwrap().status, TimesheetStatus::Approved);
        assert_eq!(ledger.timesheet("ts-2").await.unwrap(), edited);
        assert!(ledger.find_by_hallmark(stub.hallmark_asset_number.as_deref().unwrap()).await.is_err());
    }

    #[tokio::test]
    async fn test_commit_rejects_hallmark_token_in_use() {
        let ledger = seeded().await;
        ledger
            .record_timesheet(timesheet("ts-4", "W2", 8, TimesheetStatus::Approved))
            .await
            .unwrap();
        let first_snapshot = ledger.worker_snapshot("W1", &week()).await.unwrap();
        let second_snapshot = ledger.worker_snapshot("W2", &week()).await.unwrap();

        let first = paystub_for("W1", &week(), "320");
        let mut second = paystub_for("W2", &week(), "160");
        second.hallmark_asset_number = first.hallmark_asset_number.clone();
        let token = first.hallmark_asset_number.clone().unwrap();

        ledger
            .commit_run(PayrollRecord::new(first.clone(), first_snapshot.timesheets, Utc::now()))
            .await
            .unwrap();
        let result = ledger
            .commit_run(PayrollRecord::new(second.clone(), second_snapshot.timesheets, Utc::now()))
            .await;

        assert!(matches!(result, Err(PayrollError::HallmarkUnavailable { .. })));
        assert!(ledger.record(second.id).await.is_err());
        assert_eq!(ledger.timesheet("ts-4").await.unwrap().status, TimesheetStatus::Approved);
        assert_eq!(ledger.find_by_hallmark(&token).await.unwrap().payroll_id(), first.id);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_worker() {
        let ledger = seeded().await;
        let mut bad = worker("W1");
        bad.hourly_wage = Some(dec("-20"));

        let result = ledger.upsert_worker(bad).await;
        assert!(matches!(result, Err(PayrollError::InvalidWorker { .. })));
        assert_eq!(ledger.worker("W1").await.unwrap().hourly_wage, Some(dec("20")));
    }

    #[tokio::test]
    async fn test_void_reopens_timesheets() {
        let ledger = seeded().await;
        let snapshot = ledger.worker_snapshot("W1", &week()).await.unwrap();
        let stub = paystub_for("W1", &week(), "320");
        let token = stub.hallmark_asset_number.clone().unwrap();
        ledger
            .commit_run(PayrollRecord::new(stub.clone(), snapshot.timesheets.clone(), Utc::now()))
            .await
            .unwrap();

        let voided = ledger.void_run(stub.id).await.unwrap();
        assert_eq!(voided.status, RecordStatus::Voided);
        assert_eq!(ledger.eligible(&week()).await.len(), 1);
        assert!(matches!(
            ledger.record(stub.id).await,
            Err(PayrollError::PayrollNotFound { .. })
        ));
        assert!(matches!(
            ledger.find_by_hallmark(&token).await,
            Err(PayrollError::HallmarkNotFound { .. })
        ));
        assert!(ledger.void_run(stub.id).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_hallmark() {
        let ledger = seeded().await;
        let snapshot = ledger.worker_snapshot("W1", &week()).await.unwrap();
        let stub = paystub_for("W1", &week(), "320");
        ledger
            .commit_run(PayrollRecord::new(stub.clone(), snapshot.timesheets.clone(), Utc::now()))
            .await
            .unwrap();

        let token = stub.hallmark_asset_number.clone().unwrap();
        let found = ledger.find_by_hallmark(&token).await.unwrap();
        assert_eq!(found.payroll_id(), stub.id);
        assert!(ledger.find_by_hallmark("PAYROLL-1-W2").await.is_err());
    }

    #[tokio::test]
    async fn test_year_to_date_counts_earlier_runs_in_same_year() {
        let ledger = seeded().await;
        let earlier = PayPeriod::week_containing(date(2024, 12, 30));
        let last_year = PayPeriod::week_containing(date(2024, 12, 23));

        for (period, gross) in [(earlier, "500"), (last_year, "700")] {
            ledger
                .commit_run(PayrollRecord::new(paystub_for("W1", &period, gross), Vec::new(), Utc::now()))
                .await
                .unwrap();
        }

        // the Dec 30 - Jan 5 week ends in 2025
        let snapshot = ledger.worker_snapshot("W1", &week()).await.unwrap();
        assert_eq!(snapshot.year_to_date_gross, dec("500"));
    }

    #[tokio::test]
    async fn test_from_roster() {
        let roster = Roster {
            workers: vec![worker("W1")],
            timesheets: vec![timesheet("ts-1", "W1", 6, TimesheetStatus::Approved)],
        };
        let ledger = PayrollLedger::from_roster(roster).await.unwrap();
        assert!(ledger.worker("W1").await.is_some());
        assert_eq!(ledger.eligible(&week()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_from_roster_rejects_invalid_worker() {
        let mut bad = worker("W1");
        bad.hourly_wage = Some(dec("10000000000000000000000000000"));
        let roster = Roster {
            workers: vec![bad],
            timesheets: Vec::new(),
        };
        let result = PayrollLedger::from_roster(roster).await;
        assert!(matches!(result, Err(PayrollError::InvalidWorker { .. })));
    }
}
