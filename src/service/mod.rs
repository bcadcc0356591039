//! Payroll operations over the ledger and the payroll engine.

mod compute;
mod payroll_service;

pub use compute::{build_paystub, build_preview, estimate_candidate};
pub use payroll_service::PayrollService;
