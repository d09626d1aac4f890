//! The boundary between the dashboard and a container engine.
//!
//! The event loop never talks to the engine directly: it asks the
//! [`crate::dispatcher::Dispatcher`] to run a command, and the dispatcher
//! calls into an [`EngineGateway`] on a background task.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    CleanupTier, ContainerRow, EngineKind, ImageRow, NetworkRow, SystemSummary, VolumeRow,
};

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Could not build a client for the engine endpoint.
    #[error("failed to connect to container engine: {0}")]
    Connect(String),

    /// The engine rejected or failed an operation.
    #[error("failed to {operation}: {message}")]
    Engine { operation: String, message: String },
}

impl GatewayError {
    pub fn engine(operation: impl Into<String>, message: impl ToString) -> Self {
        GatewayError::Engine {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// Operations the dashboard needs from a container engine.
#[async_trait]
pub trait EngineGateway: Send + Sync {
    async fn engine_kind(&self) -> Result<EngineKind>;

    async fn list_containers(&self) -> Result<Vec<ContainerRow>>;
    async fn start_container(&self, id: &str) -> Result<()>;
    async fn stop_container(&self, id: &str) -> Result<()>;
    async fn remove_container(&self, id: &str) -> Result<()>;
    async fn container_logs(&self, id: &str) -> Result<String>;
    async fn inspect_container(&self, id: &str) -> Result<String>;

    async fn list_images(&self) -> Result<Vec<ImageRow>>;
    async fn remove_image(&self, id: &str) -> Result<()>;

    async fn list_volumes(&self) -> Result<Vec<VolumeRow>>;
    async fn remove_volume(&self, name: &str) -> Result<()>;

    async fn list_networks(&self) -> Result<Vec<NetworkRow>>;
    async fn inspect_network(&self, id: &str) -> Result<String>;

    async fn system_info(&self) -> Result<SystemSummary>;

    /// Run a cleanup tier and return a human-readable summary.
    async fn cleanup(&self, tier: CleanupTier) -> Result<String>;
}
