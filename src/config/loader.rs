//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll tax
//! tables from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};
use crate::models::FilingStatus;

use super::types::{
    FederalTaxConfig, FicaConfig, GarnishmentLimits, PayrollConfig, PayrollSettings,
    StateTaxConfig, StateTaxRule,
};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a tax-year
/// directory and provides methods to query the tables.
///
/// # Directory Structure
///
/// ```text
/// config/us_2025/
/// ├── payroll.yaml      # Overtime, estimates, pay date, hallmark settings
/// ├── federal.yaml      # Standard deductions and brackets
/// ├── fica.yaml         # Social Security and Medicare
/// ├── states.yaml       # State and local tax rules
/// └── garnishments.yaml # CCPA limits
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_batch::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/us_2025").unwrap();
/// println!("Tax year: {}", loader.config().settings().tax_year);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - A filing status has no brackets or standard deduction (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<PayrollSettings>(&path.join("payroll.yaml"))?;
        let federal_path = path.join("federal.yaml");
        let federal = Self::load_yaml::<FederalTaxConfig>(&federal_path)?;
        let fica = Self::load_yaml::<FicaConfig>(&path.join("fica.yaml"))?;
        let states = Self::load_yaml::<StateTaxConfig>(&path.join("states.yaml"))?;
        let garnishments = Self::load_yaml::<GarnishmentLimits>(&path.join("garnishments.yaml"))?;

        Self::check_filing_statuses(&federal, &federal_path.display().to_string())?;

        let config = PayrollConfig::new(settings, federal, fica, states, garnishments);
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Every filing status needs both a bracket table and a standard deduction.
    fn check_filing_statuses(federal: &FederalTaxConfig, path: &str) -> PayrollResult<()> {
        for status in [
            FilingStatus::Single,
            FilingStatus::Married,
            FilingStatus::HeadOfHousehold,
        ] {
            let has_brackets = federal
                .brackets
                .get(&status)
                .is_some_and(|brackets| !brackets.is_empty());
            if !has_brackets || !federal.standard_deductions.contains_key(&status) {
                return Err(PayrollError::ConfigParseError {
                    path: path.to_string(),
                    message: format!("missing federal tables for filing status {status:?}"),
                });
            }
        }
        Ok(())
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Gets the state tax rule for a state code (case-insensitive).
    ///
    /// Returns `None` for states without a configured rule; the engine treats
    /// those as having no state or local tax.
    pub fn state_rule(&self, state: &str) -> Option<&StateTaxRule> {
        self.config.state_rule(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IncomeTaxKind;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/us_2025"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_shipped_config() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let settings = loader.config().settings();

        assert_eq!(settings.tax_year, 2025);
        assert_eq!(settings.overtime.multiplier, dec("1.5"));
        assert_eq!(settings.overtime.weekly_threshold_hours, dec("40"));
        assert_eq!(settings.estimates.fallback_deduction_rate, dec("0.25"));
        assert!(settings.hallmark.enabled);
    }

    #[test]
    fn test_federal_brackets_sorted_and_complete() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let federal = loader.config().federal();

        let single = &federal.brackets[&FilingStatus::Single];
        assert_eq!(single.len(), 7);
        assert_eq!(single[0].floor, Decimal::ZERO);
        assert_eq!(single[0].rate, dec("0.10"));
        assert!(single.windows(2).all(|w| w[0].floor < w[1].floor));
        assert_eq!(
            federal.standard_deductions[&FilingStatus::Married],
            dec("30000")
        );
    }

    #[test]
    fn test_fica_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let fica = loader.config().fica();

        assert_eq!(fica.social_security.rate, dec("0.062"));
        assert_eq!(fica.social_security.wage_base, dec("176100"));
        assert_eq!(fica.medicare.rate, dec("0.0145"));
        assert_eq!(
            fica.medicare.additional_thresholds[&FilingStatus::Married],
            dec("250000")
        );
    }

    #[test]
    fn test_state_rules_are_case_insensitive() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let tn = loader.state_rule("tn").unwrap();
        assert_eq!(tn.income_tax, IncomeTaxKind::Exempt);

        let ky = loader.state_rule("KY").unwrap();
        assert_eq!(ky.income_tax, IncomeTaxKind::Flat);
        assert_eq!(ky.rate, dec("0.04"));
        assert_eq!(ky.standard_deduction, dec("3270"));
        let local = ky.local.as_ref().unwrap();
        assert_eq!(local.cities["louisville"], dec("0.022"));

        assert!(loader.state_rule("ZZ").is_none());
    }

    #[test]
    fn test_missing_directory_returns_config_not_found() {
        let result = ConfigLoader::load("/nonexistent/path");
        match result {
            Err(PayrollError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        for file in [
            "payroll.yaml",
            "federal.yaml",
            "fica.yaml",
            "states.yaml",
            "garnishments.yaml",
        ] {
            let source = std::path::Path::new(config_path()).join(file);
            std::fs::copy(source, dir.path().join(file)).unwrap();
        }
        std::fs::write(dir.path().join("fica.yaml"), "social_security: [unclosed").unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(PayrollError::ConfigParseError { path, .. }) => {
                assert!(path.contains("fica.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_filing_status_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["payroll.yaml", "fica.yaml", "states.yaml", "garnishments.yaml"] {
            let source = std::path::Path::new(config_path()).join(file);
            std::fs::copy(source, dir.path().join(file)).unwrap();
        }
        std::fs::write(
            dir.path().join("federal.yaml"),
            "standard_deductions:\n  single: \"15000\"\nbrackets:\n  single:\n    - { floor: \"0\", rate: \"0.10\" }\n",
        )
        .unwrap();

        match ConfigLoader::load(dir.path()) {
            Err(PayrollError::ConfigParseError { message, .. }) => {
                assert!(message.contains("Married"));
            }
            other => panic!("Expected ConfigParseError, got {other:?}"),
        }
    }
}
