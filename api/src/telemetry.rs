//! Tracing subscriber setup

use std::path::Path;

use tracing_subscriber::EnvFilter;

use tg_shared::config::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `LoggingConfig::level`. Records emitted
/// through the `log` crate, such as actix's request logger, are forwarded
/// to the same subscriber.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_target(true);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Log which `.env` file was loaded, once the subscriber is installed
pub fn report_env_file(path: Option<&Path>) {
    match path {
        Some(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        None => tracing::debug!("No environment file found"),
    }
}
