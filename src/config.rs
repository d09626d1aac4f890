//! Command-line options and the runtime configuration built from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::StaleResultPolicy;

/// Shortest busy indicator frame interval accepted.
pub const MIN_TICK_MS: u64 = 16;

/// Interactive dashboard for a Docker or Podman engine.
///
/// The engine endpoint follows DOCKER_HOST; point it at Podman's
/// Docker-compatible socket to manage Podman.
#[derive(Parser, Debug, Clone)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File to write logs to
    #[arg(long, default_value = "berth.log")]
    pub log_file: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Busy indicator frame interval in milliseconds
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,

    /// Show logs/inspect results in whatever pane is open when they arrive,
    /// even if they were requested for another resource
    #[arg(long)]
    pub apply_stale_results: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_file: PathBuf,
    pub debug: bool,
    pub tick_interval: Duration,
    pub stale_results: StaleResultPolicy,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let stale_results = if cli.apply_stale_results {
            StaleResultPolicy::Apply
        } else {
            StaleResultPolicy::Discard
        };
        Self {
            log_file: cli.log_file,
            debug: cli.debug,
            tick_interval: Duration::from_millis(cli.tick_ms.max(MIN_TICK_MS)),
            stale_results,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("berth.log"),
            debug: false,
            tick_interval: Duration::from_millis(100),
            stale_results: StaleResultPolicy::Discard,
        }
    }
}
