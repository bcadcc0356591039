//! Application state for the payroll API.

use crate::service::PayrollService;

/// Shared application state.
///
/// Wraps the payroll service; cloning shares the same ledger.
#[derive(Clone)]
pub struct AppState {
    service: PayrollService,
}

impl AppState {
    /// Creates a new application state around a payroll service.
    pub fn new(service: PayrollService) -> Self {
        Self { service }
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
