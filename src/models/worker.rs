//! Worker model and the payroll profile attached to it.
//!
//! A [`Worker`] carries what the payroll engine needs beyond hours: an
//! hourly wage, a W-4 style [`TaxProfile`], and any court- or
//! agency-ordered [`GarnishmentOrder`]s.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayPeriod;
use crate::error::{PayrollError, PayrollResult};

/// Highest hourly wage accepted on a worker record.
pub const MAX_HOURLY_WAGE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Highest per-period amount accepted for extra withholding or a fixed
/// garnishment.
pub const MAX_PERIOD_AMOUNT: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Federal filing status declared on the worker's W-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Single or married filing separately.
    Single,
    /// Married filing jointly.
    Married,
    /// Head of household.
    HeadOfHousehold,
}

/// Withholding profile for a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxProfile {
    /// Federal filing status.
    pub filing_status: FilingStatus,
    /// Extra federal withholding requested per paycheck.
    #[serde(default)]
    pub extra_withholding: Decimal,
    /// Two-letter state code where the work is performed (e.g. "KY").
    pub work_state: String,
    /// City used for local occupational tax, if any.
    #[serde(default)]
    pub work_city: Option<String>,
}

/// Category of a garnishment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarnishmentKind {
    /// Child or spousal support order.
    ChildSupport,
    /// Federal or state tax levy.
    TaxLevy,
    /// Defaulted student loan.
    StudentLoan,
    /// Ordinary creditor judgment.
    Creditor,
}

impl GarnishmentKind {
    /// Default withholding priority for the kind; lower is paid first.
    pub fn default_priority(self) -> u32 {
        match self {
            GarnishmentKind::ChildSupport => 1,
            GarnishmentKind::TaxLevy => 2,
            GarnishmentKind::StudentLoan => 3,
            GarnishmentKind::Creditor => 4,
        }
    }
}

/// Lifecycle status of a garnishment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// The order is being withheld.
    #[default]
    Active,
    /// The order is on hold.
    Suspended,
    /// The order has been satisfied.
    Completed,
}

/// A court- or agency-ordered deduction from a worker's pay.
///
/// Either `amount_fixed` (per pay period) or `amount_percentage` (of
/// disposable earnings, 0–100) should be set; when both are set the fixed
/// amount wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarnishmentOrder {
    /// Order identifier.
    pub id: String,
    /// Category of the order.
    #[serde(rename = "type")]
    pub kind: GarnishmentKind,
    /// Fixed amount per pay period.
    #[serde(default)]
    pub amount_fixed: Option<Decimal>,
    /// Percentage of disposable earnings.
    #[serde(default)]
    pub amount_percentage: Option<Decimal>,
    /// Explicit priority; defaults to the kind's priority.
    #[serde(default)]
    pub priority: Option<u32>,
    /// First day the order applies.
    pub effective_date: NaiveDate,
    /// Last day the order applies, if it expires.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Order status.
    #[serde(default)]
    pub status: OrderStatus,
}

impl GarnishmentOrder {
    /// Priority used for ordering withholdings.
    pub fn effective_priority(&self) -> u32 {
        self.priority.unwrap_or_else(|| self.kind.default_priority())
    }

    /// Whether the order should be withheld for any part of `period`.
    pub fn applies_to(&self, period: &PayPeriod) -> bool {
        self.status == OrderStatus::Active
            && self.effective_date <= period.end
            && self.expiry_date.is_none_or(|expiry| expiry >= period.start)
    }
}

/// A worker as known to the payroll ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hourly wage, if one is on file.
    #[serde(default)]
    pub hourly_wage: Option<Decimal>,
    /// W-4 withholding profile, if one is on file.
    #[serde(default)]
    pub tax_profile: Option<TaxProfile>,
    /// Garnishment orders attached to the worker.
    #[serde(default)]
    pub garnishment_orders: Vec<GarnishmentOrder>,
}

impl Worker {
    /// Checks the worker record before it is stored.
    ///
    /// The id must not be blank. A wage on file must lie in
    /// `0..=MAX_HOURLY_WAGE`, extra withholding and fixed garnishments in
    /// `0..=MAX_PERIOD_AMOUNT`, and garnishment percentages in `0..=100`.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.id.trim().is_empty() {
            return Err(self.invalid("worker id cannot be blank"));
        }
        if let Some(wage) = self.hourly_wage {
            if wage < Decimal::ZERO {
                return Err(self.invalid("hourly wage cannot be negative"));
            }
            if wage > MAX_HOURLY_WAGE {
                return Err(self.invalid(format!("hourly wage cannot exceed {MAX_HOURLY_WAGE}")));
            }
        }
        if let Some(profile) = &self.tax_profile {
            if !(Decimal::ZERO..=MAX_PERIOD_AMOUNT).contains(&profile.extra_withholding) {
                return Err(self.invalid(format!(
                    "extra withholding must be between 0 and {MAX_PERIOD_AMOUNT}"
                )));
            }
        }
        for order in &self.garnishment_orders {
            if order
                .amount_fixed
                .is_some_and(|amount| !(Decimal::ZERO..=MAX_PERIOD_AMOUNT).contains(&amount))
            {
                return Err(self.invalid(format!(
                    "garnishment {} fixed amount must be between 0 and {MAX_PERIOD_AMOUNT}",
                    order.id
                )));
            }
            if order
                .amount_percentage
                .is_some_and(|pct| !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&pct))
            {
                return Err(self.invalid(format!(
                    "garnishment {} percentage must be between 0 and 100",
                    order.id
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> PayrollError {
        PayrollError::InvalidWorker {
            worker_id: self.id.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(kind: GarnishmentKind) -> GarnishmentOrder {
        GarnishmentOrder {
            id: "garn-1".to_string(),
            kind,
            amount_fixed: None,
            amount_percentage: Some(Decimal::from(25)),
            priority: None,
            effective_date: date(2025, 1, 1),
            expiry_date: Some(date(2025, 12, 31)),
            status: OrderStatus::Active,
        }
    }

    fn week() -> PayPeriod {
        PayPeriod::new(date(2025, 1, 6), date(2025, 1, 12)).unwrap()
    }

    #[test]
    fn test_default_priorities_follow_kind() {
        assert_eq!(order(GarnishmentKind::ChildSupport).effective_priority(), 1);
        assert_eq!(order(GarnishmentKind::TaxLevy).effective_priority(), 2);
        assert_eq!(order(GarnishmentKind::StudentLoan).effective_priority(), 3);
        assert_eq!(order(GarnishmentKind::Creditor).effective_priority(), 4);
    }

    #[test]
    fn test_explicit_priority_overrides_kind() {
        let mut order = order(GarnishmentKind::Creditor);
        order.priority = Some(0);
        assert_eq!(order.effective_priority(), 0);
    }

    #[test]
    fn test_applies_to_requires_active_status() {
        let mut order = order(GarnishmentKind::Creditor);
        assert!(order.applies_to(&week()));
        order.status = OrderStatus::Suspended;
        assert!(!order.applies_to(&week()));
    }

    #[test]
    fn test_applies_to_respects_effective_and_expiry_dates() {
        let mut order = order(GarnishmentKind::Creditor);
        order.effective_date = date(2025, 1, 13);
        assert!(!order.applies_to(&week()));

        order.effective_date = date(2024, 1, 1);
        order.expiry_date = Some(date(2025, 1, 5));
        assert!(!order.applies_to(&week()));

        order.expiry_date = Some(date(2025, 1, 6));
        assert!(order.applies_to(&week()));

        order.expiry_date = None;
        assert!(order.applies_to(&week()));
    }

    #[test]
    fn test_deserialize_worker_with_profile() {
        let json = r#"{
            "id": "W1",
            "name": "Avery Stone",
            "hourlyWage": "20.00",
            "taxProfile": {
                "filingStatus": "head_of_household",
                "workState": "KY",
                "workCity": "Louisville"
            },
            "garnishmentOrders": [{
                "id": "garn-1",
                "type": "child_support",
                "amountPercentage": "50",
                "effectiveDate": "2025-01-01"
            }]
        }"#;

        let worker: Worker = serde_json::from_str(json).unwrap();
        assert_eq!(worker.hourly_wage, Some(Decimal::from_str("20.00").unwrap()));
        let profile = worker.tax_profile.unwrap();
        assert_eq!(profile.filing_status, FilingStatus::HeadOfHousehold);
        assert_eq!(profile.extra_withholding, Decimal::ZERO);
        assert_eq!(profile.work_city.as_deref(), Some("Louisville"));
        assert_eq!(worker.garnishment_orders[0].kind, GarnishmentKind::ChildSupport);
        assert_eq!(worker.garnishment_orders[0].status, OrderStatus::Active);
    }

    #[test]
    fn test_deserialize_worker_without_wage_or_profile() {
        let worker: Worker = serde_json::from_str(r#"{"id":"W2","name":"Blake"}"#).unwrap();
        assert!(worker.hourly_wage.is_none());
        assert!(worker.tax_profile.is_none());
        assert!(worker.garnishment_orders.is_empty());
    }

    fn valid_worker() -> Worker {
        Worker {
            id: "W1".to_string(),
            name: "Avery Stone".to_string(),
            hourly_wage: Some(Decimal::from(20)),
            tax_profile: Some(TaxProfile {
                filing_status: FilingStatus::Single,
                extra_withholding: Decimal::ZERO,
                work_state: "TN".to_string(),
                work_city: None,
            }),
            garnishment_orders: vec![order(GarnishmentKind::ChildSupport)],
        }
    }

    #[test]
    fn test_validate_accepts_sane_worker() {
        assert!(valid_worker().validate().is_ok());

        let mut no_wage = valid_worker();
        no_wage.hourly_wage = None;
        no_wage.tax_profile = None;
        assert!(no_wage.validate().is_ok());

        let mut top_wage = valid_worker();
        top_wage.hourly_wage = Some(MAX_HOURLY_WAGE);
        assert!(top_wage.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let mut worker = valid_worker();
        worker.id = "  ".to_string();
        assert!(matches!(worker.validate(), Err(PayrollError::InvalidWorker { .. })));
    }

    #[test]
    fn test_validate_rejects_out_of_range_wage() {
        for wage in ["-20", "10000.01", "10000000000000000000000000000"] {
            let mut worker = valid_worker();
            worker.hourly_wage = Some(Decimal::from_str(wage).unwrap());
            assert!(
                matches!(worker.validate(), Err(PayrollError::InvalidWorker { .. })),
                "wage {wage} accepted"
            );
        }
    }

    #[test]
    fn test_validate_rejects_negative_extra_withholding() {
        let mut worker = valid_worker();
        if let Some(profile) = worker.tax_profile.as_mut() {
            profile.extra_withholding = Decimal::from(-5);
        }
        assert!(matches!(worker.validate(), Err(PayrollError::InvalidWorker { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_garnishment_amounts() {
        let mut negative_fixed = valid_worker();
        negative_fixed.garnishment_orders[0].amount_fixed = Some(Decimal::from(-150));
        assert!(negative_fixed.validate().is_err());

        let mut over_percentage = valid_worker();
        over_percentage.garnishment_orders[0].amount_percentage = Some(Decimal::from(150));
        let err = over_percentage.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid worker 'W1': garnishment garn-1 percentage must be between 0 and 100"
        );
    }
}
