use std::fmt;

/// Which screen of the dashboard is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Containers,
    Images,
    Volumes,
    Networks,
    System,
    Inspect,
    Logs,
}

impl View {
    /// Base views are reachable with the number keys; modal views only by push.
    pub fn is_modal(self) -> bool {
        matches!(self, View::Inspect | View::Logs)
    }

    /// Map a number key to its base view.
    pub fn from_digit(c: char) -> Option<View> {
        match c {
            '1' => Some(View::Containers),
            '2' => Some(View::Images),
            '3' => Some(View::Volumes),
            '4' => Some(View::Networks),
            '5' => Some(View::System),
            _ => None,
        }
    }

    /// The resource kind whose table this view shows, if any.
    pub fn resource_kind(self) -> Option<ResourceKind> {
        match self {
            View::Containers => Some(ResourceKind::Containers),
            View::Images => Some(ResourceKind::Images),
            View::Volumes => Some(ResourceKind::Volumes),
            View::Networks => Some(ResourceKind::Networks),
            View::System | View::Inspect | View::Logs => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Containers,
    Images,
    Volumes,
    Networks,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Containers,
        ResourceKind::Images,
        ResourceKind::Volumes,
        ResourceKind::Networks,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Containers => write!(f, "containers"),
            ResourceKind::Images => write!(f, "images"),
            ResourceKind::Volumes => write!(f, "volumes"),
            ResourceKind::Networks => write!(f, "networks"),
        }
    }
}

/// Container engine detected behind the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EngineKind {
    Docker,
    Podman,
    #[default]
    Unknown,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Docker => write!(f, "docker"),
            EngineKind::Podman => write!(f, "podman"),
            EngineKind::Unknown => write!(f, "unknown"),
        }
    }
}
