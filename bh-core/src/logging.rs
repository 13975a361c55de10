//! Structured logging setup using the `tracing` ecosystem.
//!
//! The library itself only emits `tracing` events; binaries call one of
//! these functions once at startup to decide where those events go.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::error::{BhError, BhResult};

/// File name prefix of the daily-rotated log.
pub const LOG_FILE_NAME: &str = "bullhorn.log";

/// Keeps the non-blocking file writer alive. Drop it to flush the log file.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Install console logging on stderr plus a daily-rotated file in `log_dir`.
///
/// `config.level` is an `EnvFilter` directive such as `"debug"` or
/// `"bh_api=trace,info"`; an unparsable directive falls back to `info`.
/// With `config.json_output` the file receives one JSON object per event.
pub fn init_logging(config: &LoggingConfig, log_dir: &Path) -> BhResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_NAME));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    let file_layer = if config.json_output {
        file_layer.json().with_thread_ids(true).boxed()
    } else {
        file_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(level_filter(&config.level))
        .with(file_layer)
        .with(console_layer())
        .try_init()
        .map_err(|e| BhError::Config(format!("cannot install logger: {e}")))?;

    tracing::debug!(level = %config.level, dir = %log_dir.display(), "file logging enabled");
    Ok(LogGuard { _guard: guard })
}

/// Install console-only logging on stderr.
///
/// Used when no log directory is available.
pub fn init_console_logging(config: &LoggingConfig) -> BhResult<()> {
    tracing_subscriber::registry()
        .with(level_filter(&config.level))
        .with(console_layer())
        .try_init()
        .map_err(|e| BhError::Config(format!("cannot install logger: {e}")))
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_falls_back_to_info() {
        assert_eq!(level_filter("not a valid directive [").to_string(), "info");
        assert_eq!(level_filter("debug").to_string(), "debug");
    }

    #[test]
    fn test_second_install_is_config_error() {
        let config = LoggingConfig::default();
        // Only one global subscriber may exist per process.
        let first = init_console_logging(&config);
        let second = init_console_logging(&config);
        assert!(first.is_ok() || matches!(first, Err(BhError::Config(_))));
        assert!(matches!(second, Err(BhError::Config(_))));
    }
}
