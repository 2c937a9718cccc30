//! Structured logging utilities for csxdeps
//!
//! Components emit `tracing` events with structured fields and never hold a
//! logger of their own. The subscriber is installed once by the binary.
//!
//! # Log Format Conventions
//!
//! - `operation`: The operation being performed (e.g., "project.save", "cache.lookup")
//! - `status`: The result status ("hit", "miss", "error")
//! - `path` / `script`: File the event is about
//! - `hash`: Execution cache key (hex-encoded)
//! - `package` / `version`: Package reference the event is about
//!
//! # Examples
//!
//! ```rust
//! use tracing::warn;
//!
//! let package = "Serilog";
//! let version = "3.*";
//! warn!(
//!     operation = "cache.hash",
//!     package = %package,
//!     version = %version,
//!     "script is not cacheable: package version is not pinned"
//! );
//! ```

use std::str::FromStr;
use std::{fmt as std_fmt, io};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt::{self, format::Writer},
    prelude::*,
    EnvFilter,
};

/// Custom formatter that shows "csxdeps" instead of full module path
struct CsxdepsFormatter {
    with_ansi: bool,
}

impl<S, N> FormatEvent<S, N> for CsxdepsFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let meta = event.metadata();

        write!(
            writer,
            "{} ",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ")
        )?;

        if self.with_ansi {
            let level_style = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m", // Red
                tracing::Level::WARN => "\x1b[33m",  // Yellow
                tracing::Level::INFO => "\x1b[32m",  // Green
                tracing::Level::DEBUG => "\x1b[34m", // Blue
                tracing::Level::TRACE => "\x1b[35m", // Magenta
            };
            write!(writer, "{}{:5}(csxdeps)\x1b[0m: ", level_style, meta.level())?;
        } else {
            write!(writer, "{:5}(csxdeps): ", meta.level())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// How much the tool reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Trace,
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl Verbosity {
    /// Map a user-supplied level name to a verbosity
    ///
    /// Accepts the full names and their one-letter aliases, case-insensitively.
    /// Anything unrecognized falls back to `Warning`.
    pub fn from_alias(alias: &str) -> Self {
        match alias.trim().to_ascii_lowercase().as_str() {
            "t" | "trace" => Self::Trace,
            "d" | "debug" => Self::Debug,
            "i" | "info" => Self::Info,
            "w" | "warn" | "warning" => Self::Warning,
            "e" | "error" => Self::Error,
            "c" | "critical" => Self::Critical,
            _ => Self::Warning,
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            // tracing has no level above ERROR
            Self::Error | Self::Critical => LevelFilter::ERROR,
        }
    }
}

impl FromStr for Verbosity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_alias(s))
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format (default for development)
    Pretty,
    /// Compact format (for CI)
    Compact,
    /// JSON format (for log aggregation systems)
    Json,
}

impl LogFormat {
    /// Parse from environment variable (CSXDEPS_LOG_FORMAT)
    pub fn from_env() -> Self {
        let requested = std::env::var("CSXDEPS_LOG_FORMAT").unwrap_or_default();
        Self::parse(&requested, std::env::var("CI").is_ok())
    }

    fn parse(value: &str, in_ci: bool) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            _ if in_ci => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Filter for the subscriber: `RUST_LOG` when set, the verbosity otherwise
fn build_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.level_filter().to_string()))
}

/// Initialize the global tracing subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: Overrides the verbosity (e.g., "csxdeps=debug")
/// - `CSXDEPS_LOG_FORMAT`: Set format ("pretty", "compact", "json")
/// - `CI`: If set, defaults to compact format
pub fn init(verbosity: Verbosity) {
    let filter = build_filter(verbosity);

    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(CsxdepsFormatter { with_ansi: true })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(CsxdepsFormatter { with_ansi: false })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_ansi(false)
                        .with_writer(io::stderr)
                        .json(),
                )
                .init();
        }
    }
}
