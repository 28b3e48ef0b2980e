//! Subscriber installation.

use crate::LogLevel;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured level.
pub const LOG_ENV: &str = "RUST_LOG";

/// Filter for `level`, unless `RUST_LOG` is set and valid.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install a fmt subscriber writing to stderr.
///
/// Stdout stays free for generated output. Calling this more than once is
/// harmless; only the first call installs a subscriber.
pub fn init_logging(level: LogLevel) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Ignore error if already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}
