//! End-to-end checks across the public modules: message sequences through the
//! state machine, rendering of the resulting state, and dispatcher round trips.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use berth::app::{handle, init, render, AppState, StaleResultPolicy};
use berth::dispatcher::{execute, Dispatcher};
use berth::gateway::{EngineGateway, GatewayError, Result};
use berth::logging::init_test_logging;
use berth::model::{
    CleanupTier, Command, ContainerRow, EngineKind, Failure, FailureKind, ImageRow, Msg,
    NetworkRow, ResourceKind, ResourceList, SystemSummary, TextOrigin, View, VolumeRow,
};
use berth::view::Theme;

fn key(c: char) -> Msg {
    Msg::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn container(id: &str, name: &str) -> ContainerRow {
    ContainerRow {
        id: id.into(),
        image: "nginx:latest".into(),
        command: "nginx -g 'daemon off;'".into(),
        created: "5m ago".into(),
        status: "Up 5 minutes".into(),
        ports: "0.0.0.0:8080->80/tcp".into(),
        names: name.into(),
    }
}

fn ready_state(width: u16, height: u16) -> AppState {
    let mut state = AppState::new(EngineKind::Docker);
    handle(&mut state, Msg::Resize { width, height });
    init(&mut state);
    handle(
        &mut state,
        Msg::ResourcesFetched(ResourceList::Containers(vec![
            container("abc123", "web"),
            container("def456", "db"),
        ])),
    );
    state
}

/// Records every call; fails every call when `down` is set.
#[derive(Default)]
struct ScriptedEngine {
    calls: Mutex<Vec<String>>,
    down: Mutex<bool>,
}

impl ScriptedEngine {
    fn call(&self, name: String) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(name.clone());
        }
        if self.down.lock().map(|d| *d).unwrap_or(false) {
            return Err(GatewayError::engine(name, "engine unreachable"));
        }
        Ok(())
    }

    fn set_down(&self, down: bool) {
        if let Ok(mut d) = self.down.lock() {
            *d = down;
        }
    }
}

#[async_trait]
impl EngineGateway for ScriptedEngine {
    async fn engine_kind(&self) -> Result<EngineKind> {
        Ok(EngineKind::Podman)
    }
    async fn list_containers(&self) -> Result<Vec<ContainerRow>> {
        self.call("list containers".into())?;
        Ok(vec![container("abc123", "web")])
    }
    async fn start_container(&self, id: &str) -> Result<()> {
        self.call(format!("start container {}", id))
    }
    async fn stop_container(&self, id: &str) -> Result<()> {
        self.call(format!("stop container {}", id))
    }
    async fn remove_container(&self, id: &str) -> Result<()> {
        self.call(format!("remove container {}", id))
    }
    async fn container_logs(&self, id: &str) -> Result<String> {
        self.call(format!("logs {}", id))?;
        Ok("line1\nline2".into())
    }
    async fn inspect_container(&self, id: &str) -> Result<String> {
        self.call(format!("inspect container {}", id))?;
        Ok(format!(r#"{{"Id":"{}","Name":"/web"}}"#, id))
    }
    async fn list_images(&self) -> Result<Vec<ImageRow>> {
        self.call("list images".into())?;
        Ok(Vec::new())
    }
    async fn remove_image(&self, id: &str) -> Result<()> {
        self.call(format!("remove image {}", id))
    }
    async fn list_volumes(&self) -> Result<Vec<VolumeRow>> {
        self.call("list volumes".into())?;
        Ok(Vec::new())
    }
    async fn remove_volume(&self, name: &str) -> Result<()> {
        self.call(format!("remove volume {}", name))
    }
    async fn list_networks(&self) -> Result<Vec<NetworkRow>> {
        self.call("list networks".into())?;
        Ok(Vec::new())
    }
    async fn inspect_network(&self, id: &str) -> Result<String> {
        self.call(format!("inspect network {}", id))?;
        Ok("{}".into())
    }
    async fn system_info(&self) -> Result<SystemSummary> {
        self.call("system info".into())?;
        Ok(SystemSummary::default())
    }
    async fn cleanup(&self, tier: CleanupTier) -> Result<String> {
        self.call(format!("cleanup {}", tier.label()))?;
        Ok("Volumes pruned: 2".into())
    }
}

#[test]
fn start_container_shows_progress_then_outcome() {
    let mut state = ready_state(120, 30);
    let cmds = handle(&mut state, key('s'));
    assert_eq!(cmds[0], Command::StartContainer("abc123".into()));
    let frame = render(&state, &Theme::default());
    assert!(frame.contains("Starting container abc123..."));

    let cmds = handle(&mut state, Msg::Status("Container abc123 started.".into()));
    assert_eq!(cmds, Command::refresh_all());
    let frame = render(&state, &Theme::default());
    assert!(frame.contains("Container abc123 started."));
}

#[test]
fn logs_flow_ends_at_bottom_and_returns_to_containers() {
    let mut state = ready_state(120, 30);
    handle(&mut state, key('l'));
    assert_eq!(state.current_view(), View::Logs);
    assert!(render(&state, &Theme::default()).contains("Loading..."));

    handle(
        &mut state,
        Msg::TextFetched { origin: TextOrigin::logs("abc123"), body: "line1\nline2".into() },
    );
    assert_eq!(state.logs.viewport.content(), "line1\nline2");
    assert!(state.logs.ready);
    assert!(state.logs.viewport.at_bottom());
    let frame = render(&state, &Theme::default());
    assert!(frame.contains("Logs for abc123"));
    assert!(frame.contains("line2"));

    assert!(handle(&mut state, key('q')).is_empty());
    assert_eq!(state.current_view(), View::Containers);
    assert!(!state.logs.ready);
}

#[test]
fn failure_takes_over_screen_until_next_success() {
    let mut state = ready_state(100, 24);
    handle(&mut state, Msg::Failure(Failure::fetch("engine unreachable")));
    let frame = render(&state, &Theme::default());
    assert!(frame.contains("Error: engine unreachable"));
    assert!(!frame.contains("Berth"));

    handle(&mut state, Msg::ResourcesFetched(ResourceList::Images(Vec::new())));
    let frame = render(&state, &Theme::default());
    assert!(!frame.contains("Error"));
    assert!(frame.contains("Berth - Containers - DOCKER Engine"));
}

#[test]
fn interleaved_fetches_fill_every_table() {
    let mut state = AppState::new(EngineKind::Docker);
    let batch = init(&mut state);
    assert_eq!(batch.iter().filter(|c| matches!(c, Command::Fetch(_))).count(), 4);

    handle(&mut state, Msg::ResourcesFetched(ResourceList::Networks(vec![NetworkRow {
        id: "n1".into(),
        name: "bridge".into(),
        driver: "bridge".into(),
        scope: "local".into(),
    }])));
    handle(&mut state, Msg::SystemInfoFetched(SystemSummary { images: 3, ..Default::default() }));
    handle(&mut state, Msg::ResourcesFetched(ResourceList::Volumes(vec![VolumeRow {
        name: "data".into(),
        driver: "local".into(),
        scope: "local".into(),
        mountpoint: "/var/lib/docker/volumes/data".into(),
    }])));
    handle(&mut state, Msg::ResourcesFetched(ResourceList::Containers(vec![container("c1", "x")])));

    assert_eq!(state.table(ResourceKind::Networks).selected_id(), Some("n1"));
    assert_eq!(state.table(ResourceKind::Volumes).selected_id(), Some("data"));
    assert_eq!(state.table(ResourceKind::Containers).selected_id(), Some("c1"));
    assert_eq!(state.system.images, 3);
    assert!(!state.busy.is_active());
    assert!(state.status.is_none());
}

#[test]
fn late_result_for_closed_pane_is_ignored() {
    let mut state = ready_state(120, 30);
    handle(&mut state, key('i'));
    handle(&mut state, key('q'));
    handle(&mut state, Msg::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
    handle(&mut state, key('l'));
    assert_eq!(state.logs.target.as_deref(), Some("def456"));

    handle(
        &mut state,
        Msg::TextFetched { origin: TextOrigin::inspect("abc123"), body: "{}".into() },
    );
    assert!(!state.logs.ready);
    assert!(!state.inspect.ready);
}

#[test]
fn late_result_applies_when_policy_allows() {
    let mut state = ready_state(120, 30).with_stale_results(StaleResultPolicy::Apply);
    handle(&mut state, key('l'));
    handle(
        &mut state,
        Msg::TextFetched { origin: TextOrigin::logs("zzz"), body: "other".into() },
    );
    assert!(state.logs.ready);
    assert_eq!(state.logs.viewport.content(), "other");
}

#[test]
fn zero_height_terminal_renders() {
    let mut state = ready_state(0, 0);
    handle(&mut state, key('4'));
    let frame = render(&state, &Theme::default());
    assert!(frame.contains("Berth - Networks"));
    assert_eq!(state.containers.height(), 0);
}

#[test]
fn ctrl_c_leaves_pane_before_quitting() {
    let mut state = ready_state(80, 24);
    handle(&mut state, key('i'));
    let ctrl_c = Msg::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(handle(&mut state, ctrl_c.clone()).is_empty());
    assert_eq!(state.current_view(), View::Containers);
    assert!(!state.inspect.ready);
    assert_eq!(handle(&mut state, ctrl_c), vec![Command::Quit]);
}

#[test]
fn interrupt_quits_even_from_a_pane() {
    let mut state = ready_state(80, 24);
    handle(&mut state, key('l'));
    assert_eq!(handle(&mut state, Msg::Interrupt), vec![Command::Quit]);
}

#[tokio::test]
async fn dispatcher_round_trip_drives_state() {
    init_test_logging();
    let engine = Arc::new(ScriptedEngine::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(
        engine.clone(),
        Handle::current(),
        tx,
        Duration::from_millis(10),
    );

    let mut state = ready_state(120, 30);
    let cmds = handle(&mut state, key('l'));
    dispatcher.dispatch_all(cmds);

    // Logs result and at least one spinner frame come back.
    let mut saw_logs = false;
    while !saw_logs {
        let Some(msg) = rx.recv().await else { break };
        saw_logs = matches!(msg, Msg::TextFetched { .. });
        let next = handle(&mut state, msg);
        dispatcher.dispatch_all(next);
    }
    assert!(saw_logs);
    assert_eq!(state.logs.viewport.content(), "line1\nline2");
    assert!(!state.busy.is_active());
}

#[tokio::test]
async fn outage_then_recovery() {
    let engine = ScriptedEngine::default();
    engine.set_down(true);
    let mut state = ready_state(120, 30);
    handle(&mut state, Msg::ResourcesFetched(ResourceList::Images(vec![ImageRow {
        id: "img1".into(),
        repository: "redis".into(),
        tag: "7".into(),
        size: "40.0 MB".into(),
        created: "2d ago".into(),
    }])));

    for cmd in Command::refresh_all() {
        if let Some(msg) = execute(&engine, cmd).await {
            handle(&mut state, msg);
        }
    }
    let failure = state.error.clone().map(|f| (f.kind, f.reason));
    assert!(matches!(failure, Some((FailureKind::Fetch, ref r)) if r.contains("engine unreachable")));

    // Failed fetches leave what was already listed in place.
    assert_eq!(state.containers.rows().len(), 2);
    assert_eq!(state.containers.rows()[1][0], "def456");
    assert_eq!(state.table(ResourceKind::Images).selected_id(), Some("img1"));

    engine.set_down(false);
    if let Some(msg) = execute(&engine, Command::Fetch(ResourceKind::Containers)).await {
        handle(&mut state, msg);
    }
    assert!(state.error.is_none());
    assert_eq!(state.containers.rows().len(), 1);
    assert!(render(&state, &Theme::default()).contains("abc123"));
}

#[tokio::test]
async fn cleanup_reports_summary_and_refreshes() {
    let engine = ScriptedEngine::default();
    let mut state = ready_state(120, 30);
    handle(&mut state, key('5'));
    let cmds = handle(&mut state, key('a'));
    assert_eq!(cmds[0], Command::Cleanup(CleanupTier::Advanced));

    let msg = execute(&engine, cmds[0].clone()).await;
    let Some(msg) = msg else { panic!("no message") };
    let refresh = handle(&mut state, msg);
    assert_eq!(refresh, Command::refresh_all());
    let frame = render(&state, &Theme::default());
    assert!(frame.contains("Advanced cleanup completed:"));
    assert!(frame.contains("Volumes pruned: 2"));
}
