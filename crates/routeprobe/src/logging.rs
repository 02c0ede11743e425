//! Tracing setup for test runs
//!
//! Resolution, selection and comparison log through `tracing`. Call
//! [`init_test_logging`] at the start of a test to see those logs in the test
//! output; `RUST_LOG` picks the level (default `warn`).

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a test-writer subscriber once per process
///
/// # Examples
///
/// ```
/// routeprobe::logging::init_test_logging();
/// routeprobe::logging::init_test_logging();
/// ```
pub fn init_test_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    });
}
