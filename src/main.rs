use std::panic;
use std::process::ExitCode;

use berth::app;
use berth::config::{Cli, Config};
use berth::logging::init_logging;
use clap::Parser;
use tracing::{error, info};

fn main() -> ExitCode {
    let config = Config::from(Cli::parse());

    let _guard = match init_logging(&config.log_file, config.debug) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    install_panic_hook();

    info!(tick = ?config.tick_interval, stale = ?config.stale_results, "starting berth");

    match app::run(&config) {
        Ok(()) => {
            info!("berth exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "berth failed");
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Put the terminal back before the panic message is printed.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        app::restore_terminal();
        original_hook(panic_info);
    }));
}
