//! `tracing` subscriber setup.
//!
//! Everything goes to stderr; stdout and the serial line stay clean.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::AppError;
use tracing_subscriber::EnvFilter;

/// Pick the filter: explicit override, then `RUST_LOG`, then the config.
pub fn build_filter(
    config: &LoggingConfig,
    level_override: Option<&str>,
) -> Result<EnvFilter, AppError> {
    let directives = match level_override {
        Some(level) => level.to_string(),
        None => std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| config.level.clone()),
    };
    EnvFilter::try_new(&directives).map_err(|e| AppError::Logging(format!("'{directives}': {e}")))
}

/// Install the global subscriber.
pub fn init(config: &LoggingConfig, level_override: Option<&str>) -> Result<(), AppError> {
    let filter = build_filter(config, level_override)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    result.map_err(|e| AppError::Logging(e.to_string()))
}
