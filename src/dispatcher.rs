//! Runs commands off the event loop thread and reports back with messages.
//!
//! Each command becomes one task on the tokio runtime; each task sends
//! exactly one [`Msg`] back on the channel the event loop reads from.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::gateway::{EngineGateway, Result};
use crate::model::{Command, Failure, Msg, ResourceKind, ResourceList, TextOrigin};

pub struct Dispatcher {
    gateway: Arc<dyn EngineGateway>,
    handle: Handle,
    tx: UnboundedSender<Msg>,
    tick_interval: Duration,
}

impl Dispatcher {
    pub fn new(
        gateway: Arc<dyn EngineGateway>,
        handle: Handle,
        tx: UnboundedSender<Msg>,
        tick_interval: Duration,
    ) -> Self {
        Self { gateway, handle, tx, tick_interval }
    }

    /// Start a command in the background. `Quit` is the event loop's to act on.
    pub fn dispatch(&self, command: Command) {
        match command {
            Command::Quit => {}
            Command::Tick(generation) => {
                let tx = self.tx.clone();
                let interval = self.tick_interval;
                self.handle.spawn(async move {
                    tokio::time::sleep(interval).await;
                    let _ = tx.send(Msg::Tick(generation));
                });
            }
            command => {
                let gateway = Arc::clone(&self.gateway);
                let tx = self.tx.clone();
                self.handle.spawn(async move {
                    if let Some(msg) = execute(gateway.as_ref(), command).await {
                        // The receiver is gone once the loop has exited.
                        let _ = tx.send(msg);
                    }
                });
            }
        }
    }

    /// Start every command of a batch. They run concurrently and report in any order.
    pub fn dispatch_all(&self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }
}

/// Run one command against the engine and turn the outcome into a message.
///
/// Failures become [`Msg::Failure`], classified by whether the command mutates
/// anything. `Tick` and `Quit` never reach the engine and produce nothing here:
/// [`Dispatcher::dispatch`] schedules ticks and the event loop acts on quit.
pub async fn execute(gateway: &dyn EngineGateway, command: Command) -> Option<Msg> {
    let is_action = command.is_action();
    let label = format!("{:?}", command);
    debug!(command = %label, "running");

    match perform(gateway, command).await {
        Ok(None) => None,
        Ok(Some(msg)) => {
            debug!(command = %label, "done");
            Some(msg)
        }
        Err(e) => {
            error!(command = %label, error = %e, "command failed");
            let failure = if is_action {
                Failure::action(e.to_string())
            } else {
                Failure::fetch(e.to_string())
            };
            Some(Msg::Failure(failure))
        }
    }
}

async fn perform(gateway: &dyn EngineGateway, command: Command) -> Result<Option<Msg>> {
    let msg = match command {
        Command::Fetch(kind) => Msg::ResourcesFetched(fetch(gateway, kind).await?),
        Command::FetchSystemInfo => Msg::SystemInfoFetched(gateway.system_info().await?),
        Command::StartContainer(id) => {
            gateway.start_container(&id).await?;
            Msg::Status(format!("Container {} started.", id))
        }
        Command::StopContainer(id) => {
            gateway.stop_container(&id).await?;
            Msg::Status(format!("Container {} stopped.", id))
        }
        Command::RemoveContainer(id) => {
            gateway.remove_container(&id).await?;
            Msg::Status(format!("Container {} removed.", id))
        }
        Command::ContainerLogs(id) => {
            let body = gateway.container_logs(&id).await?;
            Msg::TextFetched { origin: TextOrigin::logs(id), body }
        }
        Command::InspectContainer(id) => {
            let body = gateway.inspect_container(&id).await?;
            Msg::TextFetched { origin: TextOrigin::inspect(id), body }
        }
        Command::RemoveImage(id) => {
            gateway.remove_image(&id).await?;
            Msg::Status(format!("Image {} removed.", id))
        }
        Command::RemoveVolume(name) => {
            gateway.remove_volume(&name).await?;
            Msg::Status(format!("Volume {} removed.", name))
        }
        Command::InspectNetwork(id) => {
            let body = gateway.inspect_network(&id).await?;
            Msg::TextFetched { origin: TextOrigin::inspect(id), body }
        }
        Command::Cleanup(tier) => {
            let summary = gateway.cleanup(tier).await?;
            Msg::Status(format!("{} cleanup completed:\n{}", tier.label(), summary))
        }
        Command::Tick(_) | Command::Quit => return Ok(None),
    };
    Ok(Some(msg))
}

async fn fetch(gateway: &dyn EngineGateway, kind: ResourceKind) -> Result<ResourceList> {
    Ok(match kind {
        ResourceKind::Containers => ResourceList::Containers(gateway.list_containers().await?),
        ResourceKind::Images => ResourceList::Images(gateway.list_images().await?),
        ResourceKind::Volumes => ResourceList::Volumes(gateway.list_volumes().await?),
        ResourceKind::Networks => ResourceList::Networks(gateway.list_networks().await?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use crate::gateway::GatewayError;
    use crate::model::{
        CleanupTier, ContainerRow, EngineKind, FailureKind, ImageRow, NetworkRow, SystemSummary,
        VolumeRow,
    };

    #[derive(Default)]
    struct FakeEngine {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeEngine {
        fn failing() -> Self {
            Self { fail: true, ..Default::default() }
        }

        fn record(&self, call: String) -> Result<()> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call.clone());
            }
            if self.fail {
                Err(GatewayError::engine(call, "engine unreachable"))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl EngineGateway for FakeEngine {
        async fn engine_kind(&self) -> Result<EngineKind> {
            Ok(EngineKind::Docker)
        }
        async fn list_containers(&self) -> Result<Vec<ContainerRow>> {
            self.record("list containers".into())?;
            Ok(vec![ContainerRow { id: "abc123".into(), ..Default::default() }])
        }
        async fn start_container(&self, id: &str) -> Result<()> {
            self.record(format!("start {}", id))
        }
        async fn stop_container(&self, id: &str) -> Result<()> {
            self.record(format!("stop {}", id))
        }
        async fn remove_container(&self, id: &str) -> Result<()> {
            self.record(format!("remove container {}", id))
        }
        async fn container_logs(&self, id: &str) -> Result<String> {
            self.record(format!("logs {}", id))?;
            Ok("line1\nline2".into())
        }
        async fn inspect_container(&self, id: &str) -> Result<String> {
            self.record(format!("inspect container {}", id))?;
            Ok(format!(r#"{{"Id":"{}"}}"#, id))
        }
        async fn list_images(&self) -> Result<Vec<ImageRow>> {
            self.record("list images".into())?;
            Ok(Vec::new())
        }
        async fn remove_image(&self, id: &str) -> Result<()> {
            self.record(format!("remove image {}", id))
        }
        async fn list_volumes(&self) -> Result<Vec<VolumeRow>> {
            self.record("list volumes".into())?;
            Ok(Vec::new())
        }
        async fn remove_volume(&self, name: &str) -> Result<()> {
            self.record(format!("remove volume {}", name))
        }
        async fn list_networks(&self) -> Result<Vec<NetworkRow>> {
            self.record("list networks".into())?;
            Ok(Vec::new())
        }
        async fn inspect_network(&self, id: &str) -> Result<String> {
            self.record(format!("inspect network {}", id))?;
            Ok("{}".into())
        }
        async fn system_info(&self) -> Result<SystemSummary> {
            self.record("system info".into())?;
            Ok(SystemSummary { containers: 1, ..Default::default() })
        }
        async fn cleanup(&self, tier: CleanupTier) -> Result<String> {
            self.record(format!("cleanup {}", tier.label()))?;
            Ok("Containers pruned: 0".into())
        }
    }

    #[tokio::test]
    async fn actions_report_status_text() {
        let engine = FakeEngine::default();
        let msg = execute(&engine, Command::StartContainer("abc123".into())).await;
        assert_eq!(msg, Some(Msg::Status("Container abc123 started.".into())));
        let msg = execute(&engine, Command::RemoveVolume("data".into())).await;
        assert_eq!(msg, Some(Msg::Status("Volume data removed.".into())));
        let msg = execute(&engine, Command::Cleanup(CleanupTier::Basic)).await;
        assert_eq!(
            msg,
            Some(Msg::Status("Basic cleanup completed:\nContainers pruned: 0".into()))
        );
        assert_eq!(engine.calls(), vec!["start abc123", "remove volume data", "cleanup Basic"]);
    }

    #[tokio::test]
    async fn text_results_carry_their_origin() {
        let engine = FakeEngine::default();
        let msg = execute(&engine, Command::ContainerLogs("web".into())).await;
        assert_eq!(
            msg,
            Some(Msg::TextFetched { origin: TextOrigin::logs("web"), body: "line1\nline2".into() })
        );
        let msg = execute(&engine, Command::InspectNetwork("n1".into())).await;
        assert!(matches!(
            msg,
            Some(Msg::TextFetched { origin, .. }) if origin == TextOrigin::inspect("n1")
        ));
    }

    #[tokio::test]
    async fn fetches_map_to_their_list() {
        let engine = FakeEngine::default();
        let msg = execute(&engine, Command::Fetch(ResourceKind::Containers)).await;
        match msg {
            Some(Msg::ResourcesFetched(ResourceList::Containers(rows))) => {
                assert_eq!(rows[0].id, "abc123")
            }
            other => panic!("unexpected {:?}", other),
        }
        let msg = execute(&engine, Command::FetchSystemInfo).await;
        assert!(matches!(msg, Some(Msg::SystemInfoFetched(s)) if s.containers == 1));
    }

    #[tokio::test]
    async fn failures_are_classified() {
        let engine = FakeEngine::failing();
        let Some(Msg::Failure(failure)) = execute(&engine, Command::RemoveImage("x".into())).await
        else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind, FailureKind::Action);
        assert!(failure.reason.contains("engine unreachable"));

        let Some(Msg::Failure(failure)) = execute(&engine, Command::Fetch(ResourceKind::Images)).await
        else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind, FailureKind::Fetch);
    }

    #[tokio::test]
    async fn loop_commands_never_reach_the_engine() {
        let engine = FakeEngine::default();
        assert_eq!(execute(&engine, Command::Quit).await, None);
        assert_eq!(execute(&engine, Command::Tick(3)).await, None);
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn dispatched_batch_answers_once_per_command() {
        let engine = Arc::new(FakeEngine::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher =
            Dispatcher::new(engine.clone(), Handle::current(), tx, Duration::from_millis(1));
        dispatcher.dispatch_all(Command::refresh_all());

        let mut received = 0;
        while received < 5 {
            match rx.recv().await {
                Some(Msg::ResourcesFetched(_)) | Some(Msg::SystemInfoFetched(_)) => received += 1,
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(engine.calls().len(), 5);
    }

    #[tokio::test]
    async fn tick_is_delivered_after_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(
            Arc::new(FakeEngine::default()),
            Handle::current(),
            tx,
            Duration::from_millis(5),
        );
        dispatcher.dispatch(Command::Tick(7));
        dispatcher.dispatch(Command::Quit);
        assert_eq!(rx.recv().await, Some(Msg::Tick(7)));
    }
}
