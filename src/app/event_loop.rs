//! The state machine. Every message goes through [`handle`], which updates
//! the state and returns the commands the dispatcher should run.

use tracing::{debug, error};

use crate::model::{Command, Msg, TextOrigin, View};

use super::input;
use super::render::{modal_size, table_rows};
use super::state::{AppState, Modal, StaleResultPolicy};

/// Commands issued once at startup: fetch everything and animate "Loading...".
pub fn init(state: &mut AppState) -> Vec<Command> {
    let generation = state.begin_busy("Loading...".to_string());
    let mut batch = Command::refresh_all();
    batch.push(Command::Tick(generation));
    batch
}

pub fn handle(state: &mut AppState, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::Key(key) => input::handle_key(state, key),
        Msg::Resize { width, height } => {
            resize(state, width, height);
            Vec::new()
        }
        Msg::Tick(generation) => {
            if state.busy.advance(generation) {
                vec![Command::Tick(generation)]
            } else {
                Vec::new()
            }
        }
        Msg::ResourcesFetched(list) => {
            debug!(kind = %list.kind(), rows = list.len(), "resources fetched");
            let kind = list.kind();
            state.table_mut(kind).set_rows(list.into_cells());
            settle(state);
            Vec::new()
        }
        Msg::SystemInfoFetched(summary) => {
            state.system = summary;
            settle(state);
            Vec::new()
        }
        Msg::TextFetched { origin, body } => {
            settle(state);
            let current = state.current_view();
            apply_text(state, current, origin, body);
            Vec::new()
        }
        Msg::Status(text) => {
            state.error = None;
            state.busy.stop();
            state.status = Some(text);
            Command::refresh_all()
        }
        Msg::Failure(failure) => {
            error!(kind = ?failure.kind, reason = %failure.reason, "engine request failed");
            state.error = Some(failure);
            state.end_busy();
            Vec::new()
        }
        Msg::Interrupt => vec![Command::Quit],
    }
}

/// A successful result arrived: clear the spinner, the status and any error.
fn settle(state: &mut AppState) {
    state.end_busy();
    state.error = None;
}

fn resize(state: &mut AppState, width: u16, height: u16) {
    debug!(width, height, "resize");
    state.width = width;
    state.height = height;

    let rows = table_rows(height);
    for table in [
        &mut state.containers,
        &mut state.images,
        &mut state.volumes,
        &mut state.networks,
    ] {
        table.set_height(rows);
    }

    let (pane_width, pane_height) = modal_size(width, height);
    state.inspect.viewport.set_size(pane_width, pane_height);
    state.logs.viewport.set_size(pane_width, pane_height);

    // Content that arrived before the pane could be laid out gets formatted now.
    let current = state.current_view();
    if let Some(modal) = state.modal_mut(current) {
        if !modal.ready && modal.raw.is_some() {
            format_pane(current, modal);
        }
    }
}

/// Route a logs/inspect body to the pane showing at delivery time.
///
/// With [`StaleResultPolicy::Discard`] the body is dropped unless that pane
/// is still the one it was requested for and still shows the same resource.
pub fn apply_text(state: &mut AppState, current: View, origin: TextOrigin, body: String) {
    let policy = state.stale_results;
    let Some(modal) = state.modal_mut(current) else {
        debug!(resource = %origin.target, view = ?current, "text result with no pane open, dropped");
        return;
    };
    if policy == StaleResultPolicy::Discard
        && (origin.pane != current || modal.target.as_deref() != Some(origin.target.as_str()))
    {
        debug!(
            resource = %origin.target,
            pane = ?origin.pane,
            showing = ?modal.target,
            "stale text result dropped"
        );
        return;
    }
    modal.raw = Some(body);
    format_pane(current, modal);
}

/// Move the raw body into the viewport in the pane's display format.
fn format_pane(view: View, modal: &mut Modal) {
    let Some(raw) = modal.raw.as_deref() else {
        return;
    };
    match view {
        View::Inspect => {
            let text = pretty_json(raw);
            modal.viewport.set_content(&text);
        }
        View::Logs => {
            let text = raw.to_string();
            modal.viewport.set_content(&text);
            modal.viewport.goto_bottom();
        }
        _ => return,
    }
    modal.ready = true;
}

/// Two-space indented JSON, or the input plus a note when it does not parse.
pub fn pretty_json(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
    {
        Ok(pretty) => pretty,
        Err(e) => format!("{}\n\n(Error formatting JSON: {})", raw, e),
    }
}
