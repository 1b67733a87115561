use serde::{Deserialize, Serialize};

use crate::ai::algorithms::QLearningConfig;
use crate::ai::q_table::QTable;

/// Training context recorded alongside a saved Q-table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub timestamp: u64,
    pub games_trained: u64,
    pub states: usize,
    pub hyperparameters: QLearningConfig,
}

/// On-disk form of a learned model: the complete table plus the exploration
/// rate reached when it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub version: u32,
    pub metadata: ModelMetadata,
    pub epsilon: f64,
    pub table: QTable,
}

impl ModelSnapshot {
    pub const VERSION: u32 = 1;
}

/// Outcome of loading a model file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded { states: usize, games_trained: u64 },
    /// No file at the path; the agent starts from an empty table.
    Missing(std::path::PathBuf),
}
