// Re-export all model types from submodules.

pub use message::{CleanupTier, Command, Failure, FailureKind, Msg, TextOrigin};
pub use resource::{
    ContainerRow, ImageRow, NetworkRow, ResourceList, SystemSummary, TableRow, VolumeRow,
};
pub use view::{EngineKind, ResourceKind, View};

mod message;
mod resource;
mod view;
