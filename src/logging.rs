//! File logging. The terminal belongs to the dashboard, so nothing is
//! written to stdout or stderr while it runs.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, Result};

/// Flushes buffered log lines when dropped. Hold it until the program exits.
pub struct LogGuard {
    _file_guard: WorkerGuard,
}

/// Append logs to `path`. `RUST_LOG` overrides the level chosen by `verbose`.
pub fn init_logging(path: &Path, verbose: bool) -> Result<LogGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile { path: path.to_path_buf(), source })?;
    let (writer, file_guard) = tracing_appender::non_blocking(file);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("berth={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    tracing::debug!(path = %path.display(), verbose, "logging initialized");

    Ok(LogGuard { _file_guard: file_guard })
}

/// Console logging for tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("berth=debug"))
        .with_test_writer()
        .try_init();
}
