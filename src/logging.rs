//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr so reports on stdout stay
/// clean. `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second install (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
