//! Payroll engine.
//!
//! Pure functions over [`rust_decimal::Decimal`]: the hours split and gross
//! pay, federal income tax withholding, FICA, state and local tax, CCPA
//! limited garnishments, and [`calculate_payroll`] which combines them.
//! Tables come from [`crate::config::PayrollConfig`].

mod federal_tax;
mod fica;
mod garnishments;
mod gross_pay;
mod money;
mod payroll;
mod state_tax;

pub use federal_tax::{FederalWithholding, calculate_federal_withholding, pay_periods_per_year};
pub use fica::{FicaTaxes, calculate_fica};
pub use garnishments::{GarnishmentResult, calculate_garnishments, is_ccpa_compliant};
pub use gross_pay::{GrossPay, HoursSplit, calculate_gross_pay, split_weekly_hours};
pub use money::round_currency;
pub use payroll::{PayrollCalculation, PayrollInput, calculate_payroll};
pub use state_tax::{calculate_local_tax, calculate_state_tax, local_tax_rate, normalize_city};
