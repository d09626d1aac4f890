use std::collections::HashMap;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogOutput, LogsOptions,
    PruneContainersOptions, RemoveContainerOptions, StopContainerOptions,
};
use bollard::image::{ListImagesOptions, PruneImagesOptions, RemoveImageOptions};
use bollard::models::{ContainerSummary, ImageSummary, Network, Volume};
use bollard::network::{InspectNetworkOptions, ListNetworksOptions, PruneNetworksOptions};
use bollard::volume::{ListVolumesOptions, PruneVolumesOptions, RemoveVolumeOptions};
use futures_util::StreamExt;
use tracing::debug;

use crate::gateway::{EngineGateway, GatewayError, Result};
use crate::model::{
    CleanupTier, ContainerRow, EngineKind, ImageRow, NetworkRow, SystemSummary, VolumeRow,
};

/// Gateway backed by bollard's Docker client.
///
/// Podman is reached the same way through its Docker-compatible socket
/// (point `DOCKER_HOST` at it).
pub struct DockerGateway {
    client: Docker,
}

impl DockerGateway {
    /// Build a client from local defaults (`DOCKER_HOST` or the platform socket).
    /// This does not contact the engine yet.
    pub fn connect() -> Result<Self> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| GatewayError::Connect(e.to_string()))?;
        Ok(Self { client })
    }

    async fn prune_containers(&self) -> Result<String> {
        let resp = self
            .client
            .prune_containers(None::<PruneContainersOptions<String>>)
            .await
            .map_err(|e| GatewayError::engine("prune containers", e))?;
        let removed = resp.containers_deleted.map(|d| d.len()).unwrap_or(0);
        Ok(format!(
            "Containers pruned: {} removed, {} reclaimed",
            removed,
            format_size(resp.space_reclaimed.unwrap_or(0))
        ))
    }

    async fn prune_networks(&self) -> Result<String> {
        let resp = self
            .client
            .prune_networks(None::<PruneNetworksOptions<String>>)
            .await
            .map_err(|e| GatewayError::engine("prune networks", e))?;
        let removed = resp.networks_deleted.map(|d| d.len()).unwrap_or(0);
        Ok(format!("Networks pruned: {} removed", removed))
    }

    async fn prune_images(&self, dangling_only: bool) -> Result<String> {
        let options = if dangling_only {
            let mut filters = HashMap::new();
            filters.insert("dangling".to_string(), vec!["true".to_string()]);
            Some(PruneImagesOptions { filters })
        } else {
            None
        };
        let resp = self
            .client
            .prune_images(options)
            .await
            .map_err(|e| GatewayError::engine("prune images", e))?;
        let removed = resp.images_deleted.map(|d| d.len()).unwrap_or(0);
        let label = if dangling_only { "Dangling images" } else { "Images" };
        Ok(format!(
            "{} pruned: {} removed, {} reclaimed",
            label,
            removed,
            format_size(resp.space_reclaimed.unwrap_or(0))
        ))
    }

    async fn prune_volumes(&self) -> Result<String> {
        let resp = self
            .client
            .prune_volumes(None::<PruneVolumesOptions<String>>)
            .await
            .map_err(|e| GatewayError::engine("prune volumes", e))?;
        let removed = resp.volumes_deleted.map(|d| d.len()).unwrap_or(0);
        Ok(format!(
            "Volumes pruned: {} removed, {} reclaimed",
            removed,
            format_size(resp.space_reclaimed.unwrap_or(0))
        ))
    }
}

#[async_trait]
impl EngineGateway for DockerGateway {
    async fn engine_kind(&self) -> Result<EngineKind> {
        let version = self
            .client
            .version()
            .await
            .map_err(|e| GatewayError::engine("query engine version", e))?;
        let names = version
            .components
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.name);
        Ok(engine_kind_from_components(names))
    }

    async fn list_containers(&self) -> Result<Vec<ContainerRow>> {
        let options: ListContainersOptions<String> = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let summaries = self
            .client
            .list_containers(Some(options))
            .await
            .map_err(|e| GatewayError::engine("list containers", e))?;
        Ok(summaries.iter().map(container_row).collect())
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.client
            .start_container::<String>(id, None)
            .await
            .map_err(|e| GatewayError::engine(format!("start container {}", id), e))
    }

    async fn stop_container(&self, id: &str) -> Result<()> {
        let options = StopContainerOptions { t: 10 };
        self.client
            .stop_container(id, Some(options))
            .await
            .map_err(|e| GatewayError::engine(format!("stop container {}", id), e))
    }

    async fn remove_container(&self, id: &str) -> Result<()> {
        self.client
            .remove_container(id, None::<RemoveContainerOptions>)
            .await
            .map_err(|e| GatewayError::engine(format!("remove container {}", id), e))
    }

    async fn container_logs(&self, id: &str) -> Result<String> {
        let options: LogsOptions<String> = LogsOptions {
            stdout: true,
            stderr: true,
            follow: false,
            tail: "all".to_string(),
            ..Default::default()
        };
        let mut stream = self.client.logs(id, Some(options));
        let mut body = String::new();
        while let Some(chunk) = stream.next().await {
            let message = match chunk {
                Ok(LogOutput::StdOut { message })
                | Ok(LogOutput::StdErr { message })
                | Ok(LogOutput::Console { message }) => message,
                Ok(LogOutput::StdIn { .. }) => continue,
                Err(e) => return Err(GatewayError::engine(format!("read logs for container {}", id), e)),
            };
            body.push_str(&String::from_utf8_lossy(&message));
        }
        debug!(id, bytes = body.len(), "collected container logs");
        Ok(body)
    }

    async fn inspect_container(&self, id: &str) -> Result<String> {
        let inspect = self
            .client
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| GatewayError::engine(format!("inspect container {}", id), e))?;
        serde_json::to_string(&inspect).map_err(|e| GatewayError::engine("encode inspect data", e))
    }

    async fn list_images(&self) -> Result<Vec<ImageRow>> {
        let options: ListImagesOptions<String> = ListImagesOptions {
            all: false,
            ..Default::default()
        };
        let images = self
            .client
            .list_images(Some(options))
            .await
            .map_err(|e| GatewayError::engine("list images", e))?;
        Ok(images.iter().map(image_row).collect())
    }

    async fn remove_image(&self, id: &str) -> Result<()> {
        self.client
            .remove_image(id, None::<RemoveImageOptions>, None)
            .await
            .map(|_| ())
            .map_err(|e| GatewayError::engine(format!("remove image {}", id), e))
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeRow>> {
        let resp = self
            .client
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await
            .map_err(|e| GatewayError::engine("list volumes", e))?;
        Ok(resp.volumes.unwrap_or_default().iter().map(volume_row).collect())
    }

    async fn remove_volume(&self, name: &str) -> Result<()> {
        self.client
            .remove_volume(name, None::<RemoveVolumeOptions>)
            .await
            .map_err(|e| GatewayError::engine(format!("remove volume {}", name), e))
    }

    async fn list_networks(&self) -> Result<Vec<NetworkRow>> {
        let networks = self
            .client
            .list_networks(None::<ListNetworksOptions<String>>)
            .await
            .map_err(|e| GatewayError::engine("list networks", e))?;
        Ok(networks.iter().map(network_row).collect())
    }

    async fn inspect_network(&self, id: &str) -> Result<String> {
        let network = self
            .client
            .inspect_network(id, None::<InspectNetworkOptions<String>>)
            .await
            .map_err(|e| GatewayError::engine(format!("inspect network {}", id), e))?;
        serde_json::to_string(&network).map_err(|e| GatewayError::engine("encode inspect data", e))
    }

    async fn system_info(&self) -> Result<SystemSummary> {
        let info = self
            .client
            .info()
            .await
            .map_err(|e| GatewayError::engine("get info", e))?;
        let usage = self
            .client
            .df()
            .await
            .map_err(|e| GatewayError::engine("get disk usage", e))?;
        let networks = self.list_networks().await?;

        Ok(SystemSummary {
            containers: info.containers.unwrap_or(0),
            running: info.containers_running.unwrap_or(0),
            paused: info.containers_paused.unwrap_or(0),
            stopped: info.containers_stopped.unwrap_or(0),
            images: info.images.unwrap_or(0),
            volumes: usage.volumes.map(|v| v.len() as i64).unwrap_or(0),
            networks: networks.len() as i64,
            disk_usage: format_size(usage.layers_size.unwrap_or(0)),
        })
    }

    async fn cleanup(&self, tier: CleanupTier) -> Result<String> {
        match tier {
            CleanupTier::Basic => {
                let steps = [
                    report_step(self.prune_containers().await),
                    report_step(self.prune_networks().await),
                    report_step(self.prune_images(false).await),
                ];
                Ok(steps.join("\n"))
            }
            CleanupTier::Advanced => {
                let steps = [
                    report_step(self.prune_volumes().await),
                    report_step(self.prune_images(true).await),
                ];
                Ok(steps.join("\n"))
            }
            CleanupTier::Total => {
                let steps = [
                    self.prune_containers().await?,
                    self.prune_networks().await?,
                    self.prune_images(false).await?,
                    self.prune_volumes().await?,
                ];
                Ok(steps.join("\n"))
            }
        }
    }
}

// --- Free helper functions ---

fn report_step(result: Result<String>) -> String {
    match result {
        Ok(line) => line,
        Err(e) => format!("Failed: {}", e),
    }
}

fn engine_kind_from_components(names: impl IntoIterator<Item = String>) -> EngineKind {
    let mut kind = EngineKind::Unknown;
    for name in names {
        let lower = name.to_lowercase();
        if lower.contains("podman") {
            return EngineKind::Podman;
        }
        if lower.contains("engine") {
            kind = EngineKind::Docker;
        }
    }
    kind
}

fn container_row(s: &ContainerSummary) -> ContainerRow {
    let id_full = s.id.clone().unwrap_or_default();
    let names = s
        .names
        .as_ref()
        .map(|n| {
            n.iter()
                .map(|name| name.trim_start_matches('/'))
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();

    ContainerRow {
        id: short_id(&id_full),
        image: s.image.clone().unwrap_or_default(),
        command: s.command.clone().unwrap_or_default(),
        created: format_age(s.created.unwrap_or(0), chrono::Utc::now().timestamp()),
        status: s.status.clone().unwrap_or_default(),
        ports: format_ports(s),
        names,
    }
}

fn image_row(i: &ImageSummary) -> ImageRow {
    let (repository, tag) = i
        .repo_tags
        .first()
        .map(|t| split_repo_tag(t))
        .unwrap_or_else(|| ("<none>".to_string(), "<none>".to_string()));

    ImageRow {
        id: short_id(&i.id),
        repository,
        tag,
        size: format_size(i.size),
        created: format_age(i.created, chrono::Utc::now().timestamp()),
    }
}

fn volume_row(v: &Volume) -> VolumeRow {
    VolumeRow {
        name: v.name.clone(),
        driver: v.driver.clone(),
        scope: v.scope.as_ref().map(|s| s.to_string()).unwrap_or_default(),
        mountpoint: v.mountpoint.clone(),
    }
}

fn network_row(n: &Network) -> NetworkRow {
    NetworkRow {
        id: short_id(n.id.as_deref().unwrap_or_default()),
        name: n.name.clone().unwrap_or_default(),
        driver: n.driver.clone().unwrap_or_default(),
        scope: n.scope.clone().unwrap_or_default(),
    }
}

/// Strip a `sha256:` prefix and keep the first 12 characters.
fn short_id(id: &str) -> String {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    id.chars().take(12).collect()
}

/// Split `repo:tag`, keeping registry ports (`host:5000/app:1.0`) in the repository.
fn split_repo_tag(repo_tag: &str) -> (String, String) {
    match repo_tag.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo.to_string(), tag.to_string()),
        _ => (repo_tag.to_string(), "<none>".to_string()),
    }
}

fn format_age(created_ts: i64, now: i64) -> String {
    if created_ts == 0 {
        return "unknown".to_string();
    }
    let secs = (now - created_ts).max(0) as u64;

    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

fn format_size(bytes: i64) -> String {
    let bytes = bytes.max(0) as f64;
    if bytes >= 1_073_741_824.0 {
        format!("{:.2} GB", bytes / 1_073_741_824.0)
    } else if bytes >= 1_048_576.0 {
        format!("{:.1} MB", bytes / 1_048_576.0)
    } else if bytes >= 1024.0 {
        format!("{:.1} KB", bytes / 1024.0)
    } else {
        format!("{} B", bytes as u64)
    }
}

fn format_ports(s: &ContainerSummary) -> String {
    let Some(ports) = &s.ports else { return String::new() };
    let mut parts = Vec::new();
    for p in ports {
        let container_port = p.private_port;
        let proto = p.typ.as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "tcp".to_string());
        if let (Some(ip), Some(pub_port)) = (&p.ip, p.public_port) {
            parts.push(format!("{}:{}->{}/{}", ip, pub_port, container_port, proto));
        } else {
            parts.push(format!("{}/{}", container_port, proto));
        }
    }
    parts.join(", ")
}
