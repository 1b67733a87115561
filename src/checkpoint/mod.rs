mod manager;
mod metadata;

pub use manager::{read_snapshot, write_snapshot, CheckpointConfig, CheckpointManager};
pub use metadata::{LoadStatus, ModelMetadata, ModelSnapshot};
