use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::model::{CleanupTier, Command, ResourceKind, View};

use super::state::AppState;

/// Map a key press to state changes and commands.
///
/// Global keys are checked first; anything left goes to the current view and
/// then to the table or pane that owns the visible content.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Command> {
    if key.kind == KeyEventKind::Release {
        return Vec::new();
    }
    let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl_c || key.code == KeyCode::Char('q') {
        return quit_or_close(state);
    }

    match key.code {
        KeyCode::Char(c) => {
            if let Some(view) = View::from_digit(c) {
                debug!(?view, "switch view");
                state.views.switch_to(view);
                return Vec::new();
            }
        }
        _ => {}
    }

    match state.current_view() {
        View::Containers => containers_key(state, key.code),
        View::Images => removal_key(state, key.code, ResourceKind::Images),
        View::Volumes => removal_key(state, key.code, ResourceKind::Volumes),
        View::Networks => networks_key(state, key.code),
        View::System => system_key(state, key.code),
        View::Inspect | View::Logs => pane_key(state, key.code),
    }
}

/// `q` and Ctrl+C leave a modal, or the program from a base view.
fn quit_or_close(state: &mut AppState) -> Vec<Command> {
    if state.current_view().is_modal() {
        close_pane(state);
        Vec::new()
    } else {
        vec![Command::Quit]
    }
}

fn close_pane(state: &mut AppState) {
    let leaving = state.current_view();
    if let Some(modal) = state.modal_mut(leaving) {
        modal.ready = false;
    }
    let back = state.views.pop();
    debug!(?leaving, ?back, "close pane");
}

/// Put up progress text, start the spinner and pair the command with its first tick.
fn start(state: &mut AppState, status: String, command: Command) -> Vec<Command> {
    let generation = state.begin_busy(status);
    vec![command, Command::Tick(generation)]
}

fn selected(state: &AppState, kind: ResourceKind) -> Option<String> {
    state.table(kind).selected_id().map(str::to_string)
}

fn open_pane(state: &mut AppState, pane: View, id: &str) {
    if let Some(modal) = state.modal_mut(pane) {
        modal.open(id);
    }
    state.views.push(pane);
}

fn containers_key(state: &mut AppState, code: KeyCode) -> Vec<Command> {
    let action = matches!(code, KeyCode::Char('s' | 'x' | 'd' | 'l' | 'i'));
    if !action {
        state.containers.handle_key(code);
        return Vec::new();
    }
    let Some(id) = selected(state, ResourceKind::Containers) else {
        return Vec::new();
    };
    match code {
        KeyCode::Char('s') => start(
            state,
            format!("Starting container {}...", id),
            Command::StartContainer(id),
        ),
        KeyCode::Char('x') => start(
            state,
            format!("Stopping container {}...", id),
            Command::StopContainer(id),
        ),
        KeyCode::Char('d') => start(
            state,
            format!("Removing container {}...", id),
            Command::RemoveContainer(id),
        ),
        KeyCode::Char('l') => {
            open_pane(state, View::Logs, &id);
            start(
                state,
                format!("Fetching logs for {}...", id),
                Command::ContainerLogs(id),
            )
        }
        KeyCode::Char('i') => {
            open_pane(state, View::Inspect, &id);
            start(
                state,
                format!("Inspecting container {}...", id),
                Command::InspectContainer(id),
            )
        }
        _ => Vec::new(),
    }
}

/// Images and volumes: `d` removes the selected row.
fn removal_key(state: &mut AppState, code: KeyCode, kind: ResourceKind) -> Vec<Command> {
    if code != KeyCode::Char('d') {
        state.table_mut(kind).handle_key(code);
        return Vec::new();
    }
    let Some(id) = selected(state, kind) else {
        return Vec::new();
    };
    match kind {
        ResourceKind::Images => {
            start(state, format!("Removing image {}...", id), Command::RemoveImage(id))
        }
        ResourceKind::Volumes => {
            start(state, format!("Removing volume {}...", id), Command::RemoveVolume(id))
        }
        _ => Vec::new(),
    }
}

fn networks_key(state: &mut AppState, code: KeyCode) -> Vec<Command> {
    if code != KeyCode::Char('i') {
        state.networks.handle_key(code);
        return Vec::new();
    }
    let Some(id) = selected(state, ResourceKind::Networks) else {
        return Vec::new();
    };
    open_pane(state, View::Inspect, &id);
    start(
        state,
        format!("Inspecting network {}...", id),
        Command::InspectNetwork(id),
    )
}

fn system_key(state: &mut AppState, code: KeyCode) -> Vec<Command> {
    let tier = match code {
        KeyCode::Char('b') => CleanupTier::Basic,
        KeyCode::Char('a') => CleanupTier::Advanced,
        KeyCode::Char('t') => CleanupTier::Total,
        _ => return Vec::new(),
    };
    let status = format!("Performing {} cleanup...", tier.label().to_lowercase());
    start(state, status, Command::Cleanup(tier))
}

fn pane_key(state: &mut AppState, code: KeyCode) -> Vec<Command> {
    if code == KeyCode::Esc {
        close_pane(state);
        return Vec::new();
    }
    let current = state.current_view();
    if let Some(modal) = state.modal_mut(current) {
        modal.viewport.handle_key(code);
    }
    Vec::new()
}
