use std::path::PathBuf;

use thiserror::Error;

use crate::gateway::GatewayError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures that stop the dashboard from starting or keep it from exiting cleanly.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("logging already initialized: {0}")]
    Logging(String),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
