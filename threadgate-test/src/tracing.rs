use tracing_subscriber::EnvFilter;

/// Default filter for tests: threadgate crates at full verbosity, everything else on errors.
const TEST_FILTER: &str = "error,threadgate_server=trace,threadgate_service=trace,threadgate_types=trace";

/// Initialize the logger for testing.
///
/// Output goes through the test writer, so it is only shown for failing tests. `RUST_LOG`
/// replaces the default filter when set. Calling this more than once is harmless.
///
/// # Example
///
/// ```
/// threadgate_test::tracing::init();
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(TEST_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .compact()
        .try_init()
        .ok();
}
