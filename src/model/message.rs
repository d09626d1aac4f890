use crossterm::event::KeyEvent;

use super::{ResourceKind, ResourceList, SystemSummary, View};

/// Cleanup tiers offered on the System view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CleanupTier {
    /// Stopped containers, unused networks, unused images.
    Basic,
    /// Unused volumes and dangling images.
    Advanced,
    /// Everything unused; stops at the first failing step.
    Total,
}

impl CleanupTier {
    pub fn label(self) -> &'static str {
        match self {
            CleanupTier::Basic => "Basic",
            CleanupTier::Advanced => "Advanced",
            CleanupTier::Total => "Total",
        }
    }
}

/// Read-only fetches vs mutating actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Action,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub reason: String,
}

impl Failure {
    pub fn fetch(reason: impl Into<String>) -> Self {
        Self { kind: FailureKind::Fetch, reason: reason.into() }
    }

    pub fn action(reason: impl Into<String>) -> Self {
        Self { kind: FailureKind::Action, reason: reason.into() }
    }
}

/// Which pane a logs/inspect request was made for, and for which resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextOrigin {
    pub pane: View,
    pub target: String,
}

impl TextOrigin {
    pub fn logs(target: impl Into<String>) -> Self {
        Self { pane: View::Logs, target: target.into() }
    }

    pub fn inspect(target: impl Into<String>) -> Self {
        Self { pane: View::Inspect, target: target.into() }
    }
}

/// Everything the event loop reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Busy indicator frame; carries the generation of the tick chain.
    Tick(u64),
    ResourcesFetched(ResourceList),
    SystemInfoFetched(SystemSummary),
    /// Logs or inspect body.
    TextFetched { origin: TextOrigin, body: String },
    /// Outcome of a mutating action.
    Status(String),
    Failure(Failure),
    /// SIGINT/SIGTERM delivered to the process.
    Interrupt,
}

/// A unit of work requested by the event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Fetch(ResourceKind),
    FetchSystemInfo,
    StartContainer(String),
    StopContainer(String),
    RemoveContainer(String),
    ContainerLogs(String),
    InspectContainer(String),
    RemoveImage(String),
    RemoveVolume(String),
    InspectNetwork(String),
    Cleanup(CleanupTier),
    /// Schedule the next busy indicator frame for the given chain.
    Tick(u64),
    /// Leave the event loop.
    Quit,
}

impl Command {
    /// Full re-fetch of every table plus the system summary.
    pub fn refresh_all() -> Vec<Command> {
        let mut batch: Vec<Command> = ResourceKind::ALL.iter().map(|k| Command::Fetch(*k)).collect();
        batch.push(Command::FetchSystemInfo);
        batch
    }

    /// Mutating commands answer with `Msg::Status`; the rest are fetches.
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            Command::StartContainer(_)
                | Command::StopContainer(_)
                | Command::RemoveContainer(_)
                | Command::RemoveImage(_)
                | Command::RemoveVolume(_)
                | Command::Cleanup(_)
        )
    }
}
