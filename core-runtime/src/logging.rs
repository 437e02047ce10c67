//! # Logging & Tracing Infrastructure
//!
//! Configures the `tracing-subscriber` stack for the core. Supports pretty,
//! compact, and JSON output with `RUST_LOG`-style filtering. Call
//! [`init_logging`] once at startup; later calls fail because a global
//! subscriber is already installed.

use crate::error::{Error, Result};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Filter directive, e.g. `info` or `core_cache=debug,sqlx=warn`.
    /// Overridden by the `RUST_LOG` environment variable when set.
    pub filter: String,
    /// Whether to include span targets in the output
    pub with_target: bool,
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
            with_target: true,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.with_target),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to install subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_filter("core_cache=debug")
            .with_target(false);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "core_cache=debug");
        assert!(!config.with_target);
    }

    #[test]
    fn init_twice_reports_error() {
        // Whichever call wins the race to install the global subscriber, the
        // second must fail cleanly rather than panic.
        let first = init_logging(LoggingConfig::default().with_format(LogFormat::Compact));
        let second = init_logging(LoggingConfig::default());
        assert!(first.is_ok() || second.is_err());
    }
}
