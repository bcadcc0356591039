//! Payroll batch engine for hourly workers.
//!
//! This crate answers which workers are ready to be paid for a pay period,
//! processes a selected batch on a best-effort basis (one worker's failure
//! never blocks another) and materializes an immutable paystub per run,
//! together with the operator workflow that drives those steps over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod service;
pub mod workflow;
