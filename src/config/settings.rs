//! Process-level settings for the payroll server.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{PayrollError, PayrollResult};

/// Default tax-table directory.
pub const DEFAULT_CONFIG_DIR: &str = "./config/us_2025";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings read from the environment when the binary starts.
///
/// | Variable | Meaning | Default |
/// |---|---|---|
/// | `PAYROLL_CONFIG_DIR` | tax-table directory | `./config/us_2025` |
/// | `PAYROLL_BIND_ADDR` | listen address | `0.0.0.0:8080` |
/// | `PAYROLL_SEED_FILE` | YAML roster loaded at start-up | none |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Directory holding the YAML tax tables.
    pub config_dir: PathBuf,
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Optional roster of workers and timesheets to preload.
    pub seed_file: Option<PathBuf>,
}

impl ServerSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> PayrollResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> PayrollResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config_dir = non_empty("PAYROLL_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

        let raw_addr =
            non_empty("PAYROLL_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| PayrollError::ConfigParseError {
                path: "PAYROLL_BIND_ADDR".to_string(),
                message: format!("'{raw_addr}': {e}"),
            })?;

        let seed_file = non_empty("PAYROLL_SEED_FILE").map(PathBuf::from);

        Ok(Self {
            config_dir,
            bind_addr,
            seed_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = ServerSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.config_dir, PathBuf::from(DEFAULT_CONFIG_DIR));
        assert_eq!(settings.bind_addr.port(), 8080);
        assert!(settings.seed_file.is_none());
    }

    #[test]
    fn test_values_from_environment() {
        let settings = ServerSettings::from_lookup(lookup_from(&[
            ("PAYROLL_CONFIG_DIR", "/etc/payroll/us_2025"),
            ("PAYROLL_BIND_ADDR", "127.0.0.1:9090"),
            ("PAYROLL_SEED_FILE", "/srv/roster.yaml"),
        ]))
        .unwrap();
        assert_eq!(settings.config_dir, PathBuf::from("/etc/payroll/us_2025"));
        assert_eq!(settings.bind_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(settings.seed_file, Some(PathBuf::from("/srv/roster.yaml")));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let settings =
            ServerSettings::from_lookup(lookup_from(&[("PAYROLL_SEED_FILE", "  ")])).unwrap();
        assert!(settings.seed_file.is_none());
    }

    #[test]
    fn test_bad_bind_addr_is_rejected() {
        let result = ServerSettings::from_lookup(lookup_from(&[("PAYROLL_BIND_ADDR", "nope")]));
        assert!(matches!(result, Err(PayrollError::ConfigParseError { .. })));
    }
}
