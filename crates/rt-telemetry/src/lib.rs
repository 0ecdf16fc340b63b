//! Structured logging foundation for Response Triage.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSON for agent workflows
//!
//! Components never log through a module global. They receive an
//! [`EventSink`] from the caller, so tests can capture output
//! deterministically with a [`CaptureSink`] while production code wires in
//! a [`TracingSink`].
//!
//! # Usage
//!
//! ```ignore
//! use rt_common::RunIds;
//! use rt_telemetry::{init_logging, event_names, EventSink, LogConfig, LogEvent, TracingSink};
//!
//! // Initialize at startup
//! let config = LogConfig::from_env();
//! init_logging(&config);
//!
//! let ids = RunIds::new("user-1", "proj-9", "sess-a7f3c2");
//! let sink = TracingSink;
//! sink.emit(LogEvent::info(event_names::SESSION_DETECTED, &ids, "Detected session 3"));
//! ```
//!
//! # Design Notes
//!
//! - All log output goes to stderr
//! - Every event carries the caller-supplied user/project/session ids
//! - Sinks must not panic; emission failures are swallowed

pub mod events;
pub mod sink;

pub use events::{event_names, Level, LogEvent};
pub use sink::{CaptureSink, EventSink, TracingSink};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable console format.
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Json,
}

/// Logging configuration resolved from the environment.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Default filter directive when RT_LOG/RUST_LOG are unset.
    pub default_filter: Option<String>,
}

impl LogConfig {
    /// Resolve configuration from RT_LOG_FORMAT ("human" or "json").
    pub fn from_env() -> Self {
        let format = match std::env::var("RT_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };
        LogConfig {
            format,
            default_filter: None,
        }
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. Respects the
/// RUST_LOG environment variable for filtering.
pub fn init_logging(config: &LogConfig) {
    let default_filter = config.default_filter.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert!(config.default_filter.is_none());
    }
}
