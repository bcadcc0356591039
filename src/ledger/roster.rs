//! Seed roster loaded at start-up.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Timesheet, Worker};

/// Workers and timesheets to preload into a ledger.
///
/// ```yaml
/// workers:
///   - id: W1
///     name: Avery Stone
///     hourlyWage: "20.00"
/// timesheets:
///   - id: ts-1
///     workerId: W1
///     workDate: 2025-01-06
///     hoursWorked: "8"
///     status: approved
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Workers to load.
    #[serde(default)]
    pub workers: Vec<Worker>,
    /// Timesheets to load; each must belong to a listed worker.
    #[serde(default)]
    pub timesheets: Vec<Timesheet>,
}

impl Roster {
    /// Reads a roster from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path_str = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}
