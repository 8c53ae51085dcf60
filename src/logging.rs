use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const LOG_ENV: &str = "EXPENSE_INTEL_LOG";
const DEFAULT_FILTER: &str = "expense_intel=warn";

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. Safe to call more than once.
pub(crate) fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
