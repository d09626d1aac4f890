//! State to frame. Pure: reads the state, never changes it.

use crate::model::{SystemSummary, View};
use crate::view::{clip_chars, rule, Frame, Table, Theme};

use super::state::{AppState, Modal};

const PAD_TOP: usize = 1;
const PAD_BOTTOM: usize = 1;
const PAD_LEFT: &str = "  ";
const PAD_X: usize = 4;
const HEADER_ROWS: usize = 2; // title + rule
const FOOTER_FIXED_ROWS: usize = 2; // rule + legend
const TABLE_HEADER_ROWS: usize = 2; // column titles + rule

/// Rows left for the body once padding, header and footer are drawn.
pub fn body_height(height: u16, status_lines: usize) -> usize {
    (height as usize)
        .saturating_sub(PAD_TOP + HEADER_ROWS + FOOTER_FIXED_ROWS + status_lines + PAD_BOTTOM)
}

/// Data rows a table can show, assuming a one-line status.
pub fn table_rows(height: u16) -> usize {
    body_height(height, 1).saturating_sub(TABLE_HEADER_ROWS)
}

/// Width and height of the Inspect/Logs pane. Content is normally settled by
/// the time it shows, so the footer is assumed to carry no status.
pub fn modal_size(width: u16, height: u16) -> (usize, usize) {
    ((width as usize).saturating_sub(PAD_X), body_height(height, 0))
}

pub fn render(state: &AppState, theme: &Theme) -> Frame {
    let mut frame = Frame::new(state.width, state.height);
    let inner_width = (state.width as usize).saturating_sub(PAD_X);

    if let Some(failure) = &state.error {
        for _ in 0..PAD_TOP {
            frame.push_blank();
        }
        for (i, line) in failure.reason.lines().enumerate() {
            let text = if i == 0 { format!("Error: {}", line) } else { line.to_string() };
            frame.push(format!("{}{}", PAD_LEFT, text), theme.error);
        }
        if failure.reason.is_empty() {
            frame.push(format!("{}Error:", PAD_LEFT), theme.error);
        }
        return frame;
    }

    let status = status_lines(state);
    let body_rows = body_height(state.height, status.len());

    for _ in 0..PAD_TOP {
        frame.push_blank();
    }

    // Header
    let title = format!(
        "Berth - {} - {} Engine",
        state.view_name(),
        state.engine.to_string().to_uppercase()
    );
    frame.push(format!("{}{}", PAD_LEFT, title), theme.header);
    frame.push(format!("{}{}", PAD_LEFT, rule(inner_width)), theme.rule);

    // Body, padded to its full height so the footer stays at the bottom
    let view = state.current_view();
    let body = match (view, view.resource_kind()) {
        (_, Some(kind)) => table_body(state.table(kind), body_rows, &kind.to_string()),
        (View::Inspect, _) => modal_body(&state.inspect, body_rows, inner_width),
        (View::Logs, _) => modal_body(&state.logs, body_rows, inner_width),
        _ => system_body(&state.system),
    };
    let mut shown = 0;
    for (text, kind) in body.into_iter().take(body_rows) {
        let style = match kind {
            BodyLine::Selected => theme.table_selected,
            BodyLine::Heading => theme.table_header,
            BodyLine::Rule => theme.rule,
            BodyLine::Plain => theme.body,
        };
        frame.push(format!("{}{}", PAD_LEFT, text), style);
        shown += 1;
    }
    for _ in shown..body_rows {
        frame.push_blank();
    }

    // Footer
    frame.push(format!("{}{}", PAD_LEFT, rule(inner_width)), theme.rule);
    for line in status {
        frame.push(format!("{}{}", PAD_LEFT, line), theme.status);
    }
    frame.push(format!("{}{}", PAD_LEFT, footer_help(state)), theme.footer);

    for _ in 0..PAD_BOTTOM {
        frame.push_blank();
    }
    frame
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BodyLine {
    Plain,
    Heading,
    Rule,
    Selected,
}

fn status_lines(state: &AppState) -> Vec<String> {
    let Some(status) = state.status.as_deref().filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    let spinner = if state.busy.is_active() {
        format!("{} ", state.busy.glyph())
    } else {
        String::new()
    };
    status
        .lines()
        .enumerate()
        .map(|(i, line)| if i == 0 { format!("{}{}", spinner, line) } else { line.to_string() })
        .collect()
}

fn table_body(table: &Table, rows: usize, noun: &str) -> Vec<(String, BodyLine)> {
    if table.rows().is_empty() {
        return vec![(format!("No {} found.", noun), BodyLine::Plain)];
    }
    let mut lines = vec![
        (table.format_header(), BodyLine::Heading),
        (rule(table.total_width()), BodyLine::Rule),
    ];
    let capacity = rows.saturating_sub(TABLE_HEADER_ROWS);
    for i in table.window(capacity) {
        let kind = if i == table.cursor() { BodyLine::Selected } else { BodyLine::Plain };
        lines.push((table.format_row(i), kind));
    }
    lines
}

fn system_body(info: &SystemSummary) -> Vec<(String, BodyLine)> {
    vec![
        format!(
            "Containers: {} (Running: {}, Paused: {}, Stopped: {})",
            info.containers, info.running, info.paused, info.stopped
        ),
        format!("Images: {}", info.images),
        format!("Volumes: {}", info.volumes),
        format!("Networks: {}", info.networks),
        format!("Disk Usage: {}", info.disk_usage),
    ]
    .into_iter()
    .map(|l| (l, BodyLine::Plain))
    .collect()
}

fn modal_body(modal: &Modal, rows: usize, width: usize) -> Vec<(String, BodyLine)> {
    if !modal.ready {
        return vec![("Loading...".to_string(), BodyLine::Plain)];
    }
    let viewport = &modal.viewport;
    let page = viewport.visible(viewport.height().max(rows));
    // A status line can steal rows from the pane; keep the end in view when scrolled there.
    let skip = if viewport.at_bottom() { page.len().saturating_sub(rows) } else { 0 };
    page[skip..]
        .iter()
        .take(rows)
        .map(|l| (clip_chars(l, width).to_string(), BodyLine::Plain))
        .collect()
}

fn footer_help(state: &AppState) -> String {
    const NAV: &str = "1:Containers • 2:Images • 3:Volumes • 4:Networks • 5:System";
    match state.current_view() {
        View::Containers => format!("{} • s:Start • x:Stop • d:Remove • l:Logs • i:Inspect • q:Quit", NAV),
        View::Images | View::Volumes => format!("{} • d:Remove • q:Quit", NAV),
        View::Networks => format!("{} • i:Inspect • q:Quit", NAV),
        View::System => format!(
            "{} • b:Basic Cleanup • a:Advanced Cleanup • t:Total Cleanup • q:Quit",
            NAV
        ),
        View::Inspect => pane_help(&state.inspect),
        View::Logs => pane_help(&state.logs),
    }
}

fn pane_help(modal: &Modal) -> String {
    if modal.ready {
        format!("q/esc:Return • ↑/↓:Scroll • {}%", modal.viewport.scroll_percent())
    } else {
        "q/esc:Return • ↑/↓:Scroll".to_string()
    }
}
