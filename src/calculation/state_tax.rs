//! State income tax and local occupational tax.

use rust_decimal::Decimal;

use crate::config::{IncomeTaxKind, PayrollConfig};

use super::round_currency;

/// Normalizes a city name for local tax lookup ("Bowling Green" → "bowling_green").
pub fn normalize_city(city: &str) -> String {
    city.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Calculates state income tax for one pay period.
///
/// States without a configured rule, and states that do not tax wages,
/// withhold nothing. Flat-rate states tax annualized gross less the state
/// standard deduction and spread the result over the pay periods.
pub fn calculate_state_tax(
    gross_pay: Decimal,
    work_state: &str,
    periods_per_year: u32,
    config: &PayrollConfig,
) -> Decimal {
    let Some(rule) = config.state_rule(work_state) else {
        return round_currency(Decimal::ZERO);
    };

    match rule.income_tax {
        IncomeTaxKind::Exempt => round_currency(Decimal::ZERO),
        IncomeTaxKind::Flat => {
            let periods = Decimal::from(periods_per_year);
            let taxable = (gross_pay * periods - rule.standard_deduction).max(Decimal::ZERO);
            round_currency(taxable * rule.rate / periods)
        }
    }
}

/// Returns the local occupational tax rate that applies, if any.
pub fn local_tax_rate(work_state: &str, work_city: Option<&str>, config: &PayrollConfig) -> Decimal {
    let Some(table) = config
        .state_rule(work_state)
        .and_then(|rule| rule.local.as_ref())
    else {
        return Decimal::ZERO;
    };

    work_city
        .map(normalize_city)
        .and_then(|city| table.cities.get(&city).copied())
        .unwrap_or(table.default_rate)
}

/// Calculates local occupational tax on gross pay.
pub fn calculate_local_tax(
    gross_pay: Decimal,
    work_state: &str,
    work_city: Option<&str>,
    config: &PayrollConfig,
) -> Decimal {
    round_currency(gross_pay * local_tax_rate(work_state, work_city, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config() -> PayrollConfig {
        ConfigLoader::load("./config/us_2025").unwrap().config().clone()
    }

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("  Bowling Green "), "bowling_green");
        assert_eq!(normalize_city("LOUISVILLE"), "louisville");
        assert_eq!(normalize_city("Winston-Salem"), "winston_salem");
    }

    #[test]
    fn test_tennessee_has_no_state_tax() {
        assert_eq!(calculate_state_tax(dec("2000"), "TN", 52, &config()), dec("0.00"));
    }

    #[test]
    fn test_kentucky_flat_rate() {
        // (104000 - 3270) × 4% / 52 = 77.4846
        assert_eq!(calculate_state_tax(dec("2000"), "KY", 52, &config()), dec("77.48"));
    }

    #[test]
    fn test_kentucky_below_state_deduction() {
        assert_eq!(calculate_state_tax(dec("50"), "ky", 52, &config()), dec("0.00"));
    }

    #[test]
    fn test_unknown_state_withholds_nothing() {
        assert_eq!(calculate_state_tax(dec("2000"), "ZZ", 52, &config()), dec("0.00"));
    }

    #[test]
    fn test_local_tax_by_city() {
        let config = config();
        assert_eq!(
            calculate_local_tax(dec("2000"), "KY", Some("Louisville"), &config),
            dec("44.00")
        );
        assert_eq!(
            calculate_local_tax(dec("2000"), "KY", Some("Lexington"), &config),
            dec("35.00")
        );
    }

    #[test]
    fn test_local_tax_falls_back_to_state_default() {
        let config = config();
        assert_eq!(
            calculate_local_tax(dec("2000"), "KY", Some("Frankfort"), &config),
            dec("30.00")
        );
        assert_eq!(calculate_local_tax(dec("2000"), "KY", None, &config), dec("30.00"));
    }

    #[test]
    fn test_no_local_tax_outside_local_states() {
        let config = config();
        assert_eq!(
            calculate_local_tax(dec("2000"), "TN", Some("Nashville"), &config),
            dec("0.00")
        );
        assert_eq!(local_tax_rate("TN", Some("Nashville"), &config), Decimal::ZERO);
    }
}
