//! Full payroll computation for one worker and one pay period.

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::error::PayrollResult;
use crate::models::{GarnishmentOrder, PayPeriod, TaxProfile};

use super::{
    FederalWithholding, FicaTaxes, GarnishmentResult, calculate_federal_withholding, calculate_fica,
    calculate_garnishments, calculate_local_tax, calculate_state_tax, pay_periods_per_year,
    round_currency,
};

/// Everything the engine needs beyond the hours split.
#[derive(Debug, Clone, Copy)]
pub struct PayrollInput<'a> {
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// The worker's W-4 data.
    pub profile: &'a TaxProfile,
    /// The worker's garnishment orders; inactive ones are ignored.
    pub orders: &'a [GarnishmentOrder],
    /// The pay period being paid.
    pub period: PayPeriod,
    /// Gross already paid earlier in the calendar year.
    pub year_to_date_gross: Decimal,
}

/// Result of a payroll computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollCalculation {
    /// Pay periods per year implied by the period length.
    pub periods_per_year: u32,
    /// Federal income tax withholding.
    pub federal: FederalWithholding,
    /// Social Security and Medicare.
    pub fica: FicaTaxes,
    /// State income tax.
    pub state_tax: Decimal,
    /// Local occupational tax.
    pub local_tax: Decimal,
    /// Sum of all taxes.
    pub total_mandatory: Decimal,
    /// Gross less mandatory deductions.
    pub disposable_earnings: Decimal,
    /// Garnishments withheld from disposable earnings.
    pub garnishments: GarnishmentResult,
    /// Mandatory deductions plus garnishments.
    pub total_deductions: Decimal,
    /// Gross less all deductions, never negative.
    pub net_pay: Decimal,
}

/// Runs the full payroll engine: taxes, disposable earnings, garnishments
/// and net pay.
///
/// # Errors
///
/// Returns `CalculationError` when the federal tables do not cover the
/// profile's filing status.
pub fn calculate_payroll(
    input: &PayrollInput<'_>,
    config: &PayrollConfig,
) -> PayrollResult<PayrollCalculation> {
    let gross = input.gross_pay;
    let profile = input.profile;
    let periods_per_year = pay_periods_per_year(input.period.length_days());

    let federal = calculate_federal_withholding(gross, profile, periods_per_year, config.federal())?;
    let fica = calculate_fica(gross, input.year_to_date_gross, profile.filing_status, config.fica());
    let state_tax = calculate_state_tax(gross, &profile.work_state, periods_per_year, config);
    let local_tax = calculate_local_tax(
        gross,
        &profile.work_state,
        profile.work_city.as_deref(),
        config,
    );

    let total_mandatory =
        round_currency(federal.withholding + fica.total() + state_tax + local_tax);
    let disposable_earnings = round_currency((gross - total_mandatory).max(Decimal::ZERO));

    let garnishments = calculate_garnishments(
        disposable_earnings,
        input.orders,
        &input.period,
        config.garnishments(),
    );

    let total_deductions = round_currency(total_mandatory + garnishments.total);
    let net_pay = round_currency((gross - total_deductions).max(Decimal::ZERO));

    Ok(PayrollCalculation {
        periods_per_year,
        federal,
        fica,
        state_tax,
        local_tax,
        total_mandatory,
        disposable_earnings,
        garnishments,
        total_deductions,
        net_pay,
    })
}
