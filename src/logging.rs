use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MASTER_CONTROLLER_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Install the fmt subscriber. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
