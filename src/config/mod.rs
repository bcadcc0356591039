//! Configuration loading and management for the payroll batch engine.
//!
//! This module provides functionality to load the tax tables of a tax year
//! from YAML files, and the environment-driven settings of the server.
//!
//! # Example
//!
//! ```no_run
//! use payroll_batch::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/us_2025").unwrap();
//! println!("Tax year: {}", config.config().settings().tax_year);
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::{DEFAULT_BIND_ADDR, DEFAULT_CONFIG_DIR, ServerSettings};
pub use types::{
    EstimateConfig, FederalTaxConfig, FicaConfig, GarnishmentLimits, HallmarkConfig,
    IncomeTaxKind, LocalTaxTable, MedicareConfig, OvertimeConfig, PayrollConfig,
    PayrollSettings, SocialSecurityConfig, StateTaxConfig, StateTaxRule, TaxBracket,
};
