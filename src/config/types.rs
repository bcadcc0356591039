//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a tax-year directory.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::FilingStatus;

/// Overtime rules.
#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeConfig {
    /// Multiplier applied to the hourly wage for overtime hours.
    pub multiplier: Decimal,
    /// Hours per Monday-aligned week paid at the regular rate.
    pub weekly_threshold_hours: Decimal,
}

/// Settings for the eligibility estimates.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateConfig {
    /// Share of gross assumed withheld when no tax profile is on file.
    pub fallback_deduction_rate: Decimal,
}

/// Hallmark anchoring settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HallmarkConfig {
    /// Whether payroll runs are anchored at all.
    pub enabled: bool,
    /// Prefix of locally minted tokens.
    pub prefix: String,
}

/// General payroll settings from payroll.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollSettings {
    /// The tax year the tables apply to.
    pub tax_year: i32,
    /// Overtime rules.
    pub overtime: OvertimeConfig,
    /// Eligibility estimate settings.
    pub estimates: EstimateConfig,
    /// Days after the period end that pay is released.
    pub pay_date_offset_days: i64,
    /// Hallmark anchoring settings.
    pub hallmark: HallmarkConfig,
}

/// One federal income tax bracket.
///
/// The bracket covers taxable income from `floor` up to the next bracket's
/// floor; the last bracket is unbounded.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of annual taxable income for this bracket.
    pub floor: Decimal,
    /// Marginal rate.
    pub rate: Decimal,
}

/// Federal income tax tables from federal.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct FederalTaxConfig {
    /// Annual standard deduction per filing status.
    pub standard_deductions: HashMap<FilingStatus, Decimal>,
    /// Brackets per filing status, ascending by floor.
    pub brackets: HashMap<FilingStatus, Vec<TaxBracket>>,
}

/// Social Security parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialSecurityConfig {
    /// Employee rate.
    pub rate: Decimal,
    /// Annual wage base above which no tax is withheld.
    pub wage_base: Decimal,
}

/// Medicare parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MedicareConfig {
    /// Employee rate.
    pub rate: Decimal,
    /// Additional Medicare rate on wages above the threshold.
    pub additional_rate: Decimal,
    /// Year-to-date wage threshold per filing status.
    pub additional_thresholds: HashMap<FilingStatus, Decimal>,
}

/// FICA parameters from fica.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct FicaConfig {
    /// Social Security parameters.
    pub social_security: SocialSecurityConfig,
    /// Medicare parameters.
    pub medicare: MedicareConfig,
}

/// How a state taxes wages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum IncomeTaxKind {
    /// No state income tax on wages.
    #[serde(rename = "none")]
    Exempt,
    /// Flat rate on annualized wages less a standard deduction.
    #[serde(rename = "flat")]
    Flat,
}

/// Local occupational tax table for a state.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalTaxTable {
    /// Rate for cities not listed.
    pub default_rate: Decimal,
    /// Rates keyed by normalized city name (lowercase, underscores).
    #[serde(default)]
    pub cities: HashMap<String, Decimal>,
}

/// Tax rule for one state.
#[derive(Debug, Clone, Deserialize)]
pub struct StateTaxRule {
    /// How the state taxes wages.
    pub income_tax: IncomeTaxKind,
    /// Flat rate, for `flat` states.
    #[serde(default)]
    pub rate: Decimal,
    /// Annual state standard deduction, for `flat` states.
    #[serde(default)]
    pub standard_deduction: Decimal,
    /// Local occupational taxes, if the state has them.
    #[serde(default)]
    pub local: Option<LocalTaxTable>,
}

/// State tax rules from states.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct StateTaxConfig {
    /// Rules keyed by two-letter state code.
    pub states: HashMap<String, StateTaxRule>,
}

/// CCPA garnishment limits from garnishments.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct GarnishmentLimits {
    /// Weekly disposable earnings below which ordinary garnishments stop.
    pub weekly_disposable_floor: Decimal,
    /// Maximum share of disposable earnings for ordinary garnishments.
    pub max_ordinary_percentage: Decimal,
    /// Maximum share of disposable earnings for support orders.
    pub max_support_percentage: Decimal,
}

/// The complete payroll configuration loaded from a tax-year directory.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    settings: PayrollSettings,
    federal: FederalTaxConfig,
    fica: FicaConfig,
    states: StateTaxConfig,
    garnishments: GarnishmentLimits,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    ///
    /// Brackets are sorted ascending so lookups can walk them in order.
    pub fn new(
        settings: PayrollSettings,
        federal: FederalTaxConfig,
        fica: FicaConfig,
        states: StateTaxConfig,
        garnishments: GarnishmentLimits,
    ) -> Self {
        let mut federal = federal;
        for brackets in federal.brackets.values_mut() {
            brackets.sort_by(|a, b| a.floor.cmp(&b.floor));
        }
        let states = StateTaxConfig {
            states: states
                .states
                .into_iter()
                .map(|(code, rule)| (code.to_ascii_uppercase(), rule))
                .collect(),
        };
        Self {
            settings,
            federal,
            fica,
            states,
            garnishments,
        }
    }

    /// Returns the general payroll settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Returns the federal income tax tables.
    pub fn federal(&self) -> &FederalTaxConfig {
        &self.federal
    }

    /// Returns the FICA parameters.
    pub fn fica(&self) -> &FicaConfig {
        &self.fica
    }

    /// Returns the state tax rule for a state code, if configured.
    pub fn state_rule(&self, state: &str) -> Option<&StateTaxRule> {
        self.states.states.get(&state.trim().to_ascii_uppercase())
    }

    /// Returns the CCPA garnishment limits.
    pub fn garnishments(&self) -> &GarnishmentLimits {
        &self.garnishments
    }
}
