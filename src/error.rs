use std::path::PathBuf;

/// Errors that can occur while saving or loading learned models.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to read model from {path}: {source}")]
    ModelRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse model from {path}: {source}")]
    ModelParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported model version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while running matches.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("{engine} selected illegal action {action} (legal: {legal:?})")]
    IllegalAction {
        engine: String,
        action: usize,
        legal: Vec<usize>,
    },

    #[error("no learned engine is configured")]
    NoLearner,

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
