//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use files_core::config::logging::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init(),
        LogFormat::Compact => fmt().compact().with_env_filter(filter).init(),
        LogFormat::Pretty => fmt().pretty().with_env_filter(filter).with_target(true).init(),
    }
}
