//! Paystub model.
//!
//! A [`PaystubRecord`] is the itemized breakdown of one worker's pay for one
//! pay period. It is built once when the payroll run is committed and is
//! never recomputed, so repeated reads are identical.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GarnishmentKind;

/// One garnishment withheld on a paystub, in withholding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarnishmentLine {
    /// The order this line withholds for.
    pub order_id: String,
    /// Category of the order.
    #[serde(rename = "type")]
    pub kind: GarnishmentKind,
    /// Amount withheld this period.
    pub amount: Decimal,
    /// Percentage of disposable earnings, for percentage-based orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// Withholding priority.
    pub priority: u32,
}

/// The full pay-period breakdown for a completed payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaystubRecord {
    /// The payroll run identifier.
    pub id: Uuid,
    /// The worker paid by this run.
    pub employee_id: String,
    /// Worker display name.
    pub worker_name: String,
    /// Pay period start.
    pub pay_period_start: NaiveDate,
    /// Pay period end.
    pub pay_period_end: NaiveDate,
    /// Date the pay is released.
    pub pay_date: NaiveDate,
    /// Hours at the regular rate.
    pub regular_hours: Decimal,
    /// Hours at the overtime rate.
    pub overtime_hours: Decimal,
    /// Regular plus overtime hours.
    pub total_hours: Decimal,
    /// Hourly wage used.
    pub hourly_rate: Decimal,
    /// Pay for regular hours.
    pub regular_pay: Decimal,
    /// Pay for overtime hours.
    pub overtime_pay: Decimal,
    /// Regular plus overtime pay.
    pub gross_pay: Decimal,
    /// Federal income tax withheld.
    pub federal_income_tax: Decimal,
    /// Social Security tax withheld.
    pub social_security_tax: Decimal,
    /// Medicare tax withheld.
    pub medicare_tax: Decimal,
    /// Additional Medicare tax withheld.
    pub additional_medicare_tax: Decimal,
    /// State income tax withheld.
    pub state_tax: Decimal,
    /// Local occupational tax withheld.
    pub local_tax: Decimal,
    /// Sum of all tax lines.
    pub total_mandatory_deductions: Decimal,
    /// Gross minus mandatory deductions.
    pub disposable_earnings: Decimal,
    /// Garnishments withheld, in withholding order.
    pub garnishments: Vec<GarnishmentLine>,
    /// Sum of all garnishment lines.
    pub total_garnishments: Decimal,
    /// Mandatory deductions plus garnishments.
    pub total_deductions: Decimal,
    /// Take-home pay.
    pub net_pay: Decimal,
    /// Gross paid earlier in the calendar year, used for FICA limits.
    pub year_to_date_gross: Decimal,
    /// Whether the garnishments stay within CCPA limits.
    pub ccpa_compliant: bool,
    /// External verification token, when anchoring is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hallmark_asset_number: Option<String>,
    /// State the work was performed in.
    pub work_state: String,
    /// City used for local tax.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_city: Option<String>,
}
