//! Social Security and Medicare withholding.

use rust_decimal::Decimal;

use crate::config::FicaConfig;
use crate::models::FilingStatus;

use super::round_currency;

/// FICA withholding for one pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FicaTaxes {
    /// Social Security tax.
    pub social_security: Decimal,
    /// Regular Medicare tax.
    pub medicare: Decimal,
    /// Additional Medicare tax on high earners.
    pub additional_medicare: Decimal,
}

impl FicaTaxes {
    /// Sum of all three lines.
    pub fn total(&self) -> Decimal {
        self.social_security + self.medicare + self.additional_medicare
    }
}

/// Calculates FICA withholding for one pay period.
///
/// Social Security stops at the annual wage base, counting wages already
/// paid this year. Additional Medicare applies only to the part of this
/// period's gross that lies above the filing status threshold.
///
/// # Arguments
///
/// * `gross_pay` - Gross pay for the period
/// * `year_to_date_gross` - Gross paid earlier in the same calendar year
/// * `status` - Filing status, selecting the additional Medicare threshold
/// * `config` - FICA parameters
pub fn calculate_fica(
    gross_pay: Decimal,
    year_to_date_gross: Decimal,
    status: FilingStatus,
    config: &FicaConfig,
) -> FicaTaxes {
    let total_with_this_pay = year_to_date_gross + gross_pay;

    let ss = &config.social_security;
    let ss_taxable = if year_to_date_gross >= ss.wage_base {
        Decimal::ZERO
    } else if total_with_this_pay > ss.wage_base {
        ss.wage_base - year_to_date_gross
    } else {
        gross_pay
    };

    let medicare = &config.medicare;
    let threshold = medicare
        .additional_thresholds
        .get(&status)
        .copied()
        .unwrap_or(Decimal::MAX);
    let additional_taxable = if total_with_this_pay > threshold {
        gross_pay.min(total_with_this_pay - threshold)
    } else {
        Decimal::ZERO
    };

    FicaTaxes {
        social_security: round_currency(ss_taxable * ss.rate),
        medicare: round_currency(gross_pay * medicare.rate),
        additional_medicare: round_currency(additional_taxable * medicare.additional_rate),
    }
}
