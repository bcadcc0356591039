//! Payroll persistence.
//!
//! [`PayrollLedger`] stores workers, timesheets and committed payroll runs
//! in memory. [`HallmarkMinter`] is the seam to the anchoring service that
//! issues verification tokens for runs.

mod hallmark;
mod record;
mod roster;
mod store;

pub use hallmark::{DisabledHallmarkMinter, HallmarkMinter, LocalHallmarkMinter, minter_from_config};
pub use record::{PayrollRecord, RecordStatus};
pub use roster::Roster;
pub use store::{PayrollLedger, WorkerSnapshot};

#[cfg(test)]
pub(crate) use hallmark::tests::UnavailableMinter;
