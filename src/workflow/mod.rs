//! Operator workflow over the payroll API.
//!
//! The session talks to the API only through [`PayrollClient`], so the same
//! code drives an in-process router in tests and a remote server in
//! production.

mod client;
mod notice;
mod session;
mod sink;

pub use client::{ClientError, PayrollClient, RouterClient};
pub use notice::{Notice, NoticeLevel};
pub use session::{PayrollSession, SelectionSummary};
pub use sink::{JsonDirectorySink, PaystubSink};
