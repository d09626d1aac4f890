mod state;
mod event_loop;
mod render;
mod input;

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, Clear, ClearType},
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::docker::DockerGateway;
use crate::error::{AppError, Result};
use crate::gateway::EngineGateway;
use crate::model::{Command, EngineKind, Msg};
use crate::view::{Presenter, Theme};

pub use event_loop::{apply_text, handle, init, pretty_json};
pub use render::{body_height, modal_size, render, table_rows};
pub use state::{AppState, BusyIndicator, Modal, StaleResultPolicy, ViewStack};

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

/// Connect to the engine and run the dashboard until the user quits.
pub fn run(config: &Config) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .map_err(AppError::Runtime)?;

    let gateway: Arc<dyn EngineGateway> = {
        let _context = rt.enter();
        Arc::new(DockerGateway::connect()?)
    };
    let engine = match rt.block_on(gateway.engine_kind()) {
        Ok(kind) => kind,
        Err(e) => {
            warn!(error = %e, "could not detect engine kind");
            EngineKind::Unknown
        }
    };
    info!(%engine, "connected");

    let interrupted = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&interrupted))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&interrupted))?;

    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(gateway, rt.handle().clone(), tx.clone(), config.tick_interval);
    let state = AppState::new(engine).with_stale_results(config.stale_results);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
        restore_terminal();
        return Err(e.into());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let input = spawn_input(tx, Arc::clone(&interrupted), Arc::clone(&stop));

    let result = main_loop(&mut stdout, state, &dispatcher, rx);

    stop.store(true, Ordering::Relaxed);
    if input.join().is_err() {
        warn!("input thread panicked");
    }
    restore_terminal();
    rt.shutdown_background();
    result
}

/// Receive, update, draw, dispatch. Returns when a `Quit` command comes out.
fn main_loop(
    out: &mut impl Write,
    mut state: AppState,
    dispatcher: &Dispatcher,
    mut rx: mpsc::UnboundedReceiver<Msg>,
) -> Result<()> {
    let theme = Theme::default();

    let (width, height) = terminal::size()?;
    handle(&mut state, Msg::Resize { width, height });
    dispatcher.dispatch_all(init(&mut state));
    Presenter::draw(out, &render(&state, &theme))?;

    while let Some(msg) = rx.blocking_recv() {
        let commands = handle(&mut state, msg);
        if commands.contains(&Command::Quit) {
            debug!("quit requested");
            break;
        }
        Presenter::draw(out, &render(&state, &theme))?;
        dispatcher.dispatch_all(commands);
    }
    Ok(())
}

/// Forward terminal events and signals to the event loop until `stop` is set.
fn spawn_input(
    tx: UnboundedSender<Msg>,
    interrupted: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            if interrupted.swap(false, Ordering::Relaxed) && tx.send(Msg::Interrupt).is_err() {
                break;
            }
            let msg = match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => Msg::Key(key),
                    Ok(Event::Resize(width, height)) => Msg::Resize { width, height },
                    Ok(_) => continue,
                    Err(e) => {
                        error!(error = %e, "reading terminal event failed");
                        Msg::Interrupt
                    }
                },
                Err(e) => {
                    error!(error = %e, "polling terminal failed");
                    Msg::Interrupt
                }
            };
            let fatal = msg == Msg::Interrupt;
            if tx.send(msg).is_err() || fatal {
                break;
            }
        }
    })
}
