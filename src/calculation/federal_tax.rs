//! Federal income tax withholding.
//!
//! Uses the annualized percentage method: the period's gross is annualized,
//! the filing status standard deduction is subtracted, the progressive
//! brackets are applied and the annual tax is spread back over the pay
//! periods. Extra withholding requested on the W-4 is added on top.

use rust_decimal::Decimal;

use crate::config::FederalTaxConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::TaxProfile;

use super::round_currency;

/// Intermediate values of a federal withholding calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FederalWithholding {
    /// Period gross × periods per year.
    pub annualized_gross: Decimal,
    /// Standard deduction for the filing status.
    pub standard_deduction: Decimal,
    /// Annualized gross less the standard deduction, floored at zero.
    pub taxable_income: Decimal,
    /// Tax on the annual taxable income.
    pub annual_tax: Decimal,
    /// Amount withheld this period, including extra withholding.
    pub withholding: Decimal,
}

/// Number of pay periods per year for a period of `length_days`.
///
/// ```
/// use payroll_batch::calculation::pay_periods_per_year;
///
/// assert_eq!(pay_periods_per_year(7), 52);
/// assert_eq!(pay_periods_per_year(14), 26);
/// assert_eq!(pay_periods_per_year(15), 24);
/// assert_eq!(pay_periods_per_year(31), 12);
/// ```
pub fn pay_periods_per_year(length_days: i64) -> u32 {
    match length_days {
        ..=7 => 52,
        8..=14 => 26,
        15..=16 => 24,
        _ => 12,
    }
}

/// Applies progressive brackets to an annual taxable income.
fn annual_tax(taxable_income: Decimal, brackets: &[crate::config::TaxBracket]) -> Decimal {
    let mut tax = Decimal::ZERO;
    for (index, bracket) in brackets.iter().enumerate() {
        if taxable_income <= bracket.floor {
            break;
        }
        let ceiling = brackets
            .get(index + 1)
            .map(|next| next.floor.min(taxable_income))
            .unwrap_or(taxable_income);
        tax += (ceiling - bracket.floor) * bracket.rate;
    }
    tax
}

/// Calculates federal income tax to withhold for one pay period.
///
/// # Errors
///
/// Returns `CalculationError` if the configuration has no tables for the
/// profile's filing status.
pub fn calculate_federal_withholding(
    gross_pay: Decimal,
    profile: &TaxProfile,
    periods_per_year: u32,
    config: &FederalTaxConfig,
) -> PayrollResult<FederalWithholding> {
    let status = profile.filing_status;
    let brackets = config
        .brackets
        .get(&status)
        .ok_or_else(|| PayrollError::CalculationError {
            message: format!("no federal brackets for filing status {status:?}"),
        })?;
    let standard_deduction = config
        .standard_deductions
        .get(&status)
        .copied()
        .ok_or_else(|| PayrollError::CalculationError {
            message: format!("no standard deduction for filing status {status:?}"),
        })?;

    let periods = Decimal::from(periods_per_year);
    let annualized_gross = gross_pay * periods;
    let taxable_income = (annualized_gross - standard_deduction).max(Decimal::ZERO);
    let annual_tax = annual_tax(taxable_income, brackets);
    let withholding = round_currency(annual_tax / periods + profile.extra_withholding);

    Ok(FederalWithholding {
        annualized_gross,
        standard_deduction,
        taxable_income,
        annual_tax,
        withholding,
    })
}
