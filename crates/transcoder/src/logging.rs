//! Logging setup for transcoder front ends
//!
//! Everything is written to stderr: `convert ... -` streams encoded audio on
//! stdout and must not be interleaved with log lines.

use crate::error::{Result, TranscodeError};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Line format of emitted events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Subscriber settings resolved from the batch config and command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Most verbose level emitted, unless `RUST_LOG` says otherwise
    pub level: Level,
    /// Event line format
    pub format: LogFormat,
    /// Annotate events with source file and line
    pub source_location: bool,
    /// Emit an event with the elapsed time whenever a `transcode` span closes
    pub stage_timings: bool,
}

impl LoggingConfig {
    /// Text output at `level`, no extras
    pub fn at_level(level: Level) -> Self {
        Self {
            level,
            format: LogFormat::Text,
            source_location: false,
            stage_timings: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::at_level(Level::INFO)
    }
}

fn span_events(config: &LoggingConfig) -> FmtSpan {
    if config.stage_timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` directives are honored on top of the configured level. If a
/// global subscriber is already installed it stays in place.
pub fn setup_logging(config: &LoggingConfig) {
    let filter = EnvFilter::from_default_env().add_directive(config.level.into());

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(span_events(config))
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Text => subscriber.try_init(),
    };

    if let Err(e) = installed {
        tracing::debug!("Keeping existing logger: {}", e);
    }
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level)
        .map_err(|_| TranscodeError::config(format!("Invalid log level: {}", level)))
}

/// Record which command is starting, with the library version
pub fn log_startup(command: &str) {
    tracing::info!(version = crate::VERSION, command, "Starting telecodec");
}
