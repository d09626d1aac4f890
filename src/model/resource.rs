use super::ResourceKind;

/// Anything that can be shown as one row of a resource table.
pub trait TableRow {
    fn cells(&self) -> Vec<String>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerRow {
    pub id: String,      // short ID (first 12 chars)
    pub image: String,
    pub command: String,
    pub created: String, // human-readable age (e.g. "3h ago")
    pub status: String,
    pub ports: String,   // e.g. "0.0.0.0:8080->80/tcp"
    pub names: String,
}

impl TableRow for ContainerRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.image.clone(),
            self.command.clone(),
            self.created.clone(),
            self.status.clone(),
            self.ports.clone(),
            self.names.clone(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageRow {
    pub id: String,
    pub repository: String,
    pub tag: String,
    pub size: String,
    pub created: String,
}

impl TableRow for ImageRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.repository.clone(),
            self.tag.clone(),
            self.size.clone(),
            self.created.clone(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumeRow {
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub mountpoint: String,
}

impl TableRow for VolumeRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.driver.clone(),
            self.scope.clone(),
            self.mountpoint.clone(),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkRow {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
}

impl TableRow for NetworkRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.driver.clone(),
            self.scope.clone(),
        ]
    }
}

/// Result of a successful list call, one variant per resource kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceList {
    Containers(Vec<ContainerRow>),
    Images(Vec<ImageRow>),
    Volumes(Vec<VolumeRow>),
    Networks(Vec<NetworkRow>),
}

impl ResourceList {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceList::Containers(_) => ResourceKind::Containers,
            ResourceList::Images(_) => ResourceKind::Images,
            ResourceList::Volumes(_) => ResourceKind::Volumes,
            ResourceList::Networks(_) => ResourceKind::Networks,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResourceList::Containers(rows) => rows.len(),
            ResourceList::Images(rows) => rows.len(),
            ResourceList::Volumes(rows) => rows.len(),
            ResourceList::Networks(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into table cells, preserving row order.
    pub fn into_cells(self) -> Vec<Vec<String>> {
        fn cells<R: TableRow>(rows: Vec<R>) -> Vec<Vec<String>> {
            rows.iter().map(TableRow::cells).collect()
        }
        match self {
            ResourceList::Containers(rows) => cells(rows),
            ResourceList::Images(rows) => cells(rows),
            ResourceList::Volumes(rows) => cells(rows),
            ResourceList::Networks(rows) => cells(rows),
        }
    }
}

/// Engine-wide counts shown on the System view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemSummary {
    pub containers: i64,
    pub running: i64,
    pub paused: i64,
    pub stopped: i64,
    pub images: i64,
    pub volumes: i64,
    pub networks: i64,
    pub disk_usage: String,
}
