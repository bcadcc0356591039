//! Tracing subscriber set-up.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber for the server binary.
///
/// `RUST_LOG` selects the filter, defaulting to `info`
/// (for example `RUST_LOG=payroll_batch=debug`).
///
/// ```no_run
/// payroll_batch::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber writing through the test harness.
/// Safe to call from every test; only the first call wins.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
