use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::ai::algorithms::QLearningAgent;
use crate::checkpoint::metadata::{LoadStatus, ModelSnapshot};
use crate::error::CheckpointError;

/// Where the learned model lives and how its backups are kept.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub model_path: PathBuf,
    pub backup_dir: PathBuf,
    /// Games between timestamped backups; 0 disables them.
    pub backup_interval: usize,
    pub keep_last_n: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        CheckpointConfig {
            model_path: PathBuf::from("q_table.json"),
            backup_dir: PathBuf::from("q_table_backups"),
            backup_interval: 50_000,
            keep_last_n: 5,
        }
    }
}

/// Write `snapshot` to a sibling temp file, then rename it over `path`.
pub fn write_snapshot(path: &Path, snapshot: &ModelSnapshot) -> Result<(), CheckpointError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = tmp_path_for(path);
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    serde_json::to_writer(&mut writer, snapshot)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read a snapshot, or `None` when nothing exists at `path`.
pub fn read_snapshot(path: &Path) -> Result<Option<ModelSnapshot>, CheckpointError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CheckpointError::ModelRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let snapshot: ModelSnapshot = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        CheckpointError::ModelParse {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    if snapshot.version != ModelSnapshot::VERSION {
        return Err(CheckpointError::UnsupportedVersion {
            found: snapshot.version,
            expected: ModelSnapshot::VERSION,
        });
    }
    Ok(Some(snapshot))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Saves, loads, backs up, and prunes learned models.
pub struct CheckpointManager {
    config: CheckpointConfig,
}

impl CheckpointManager {
    pub fn new(config: CheckpointConfig) -> Self {
        CheckpointManager { config }
    }

    pub fn config(&self) -> &CheckpointConfig {
        &self.config
    }

    pub fn save_model(&self, agent: &QLearningAgent) -> Result<PathBuf, CheckpointError> {
        agent.save(&self.config.model_path)?;
        Ok(self.config.model_path.clone())
    }

    pub fn load_model(&self, agent: &mut QLearningAgent) -> Result<LoadStatus, CheckpointError> {
        agent.load(&self.config.model_path)
    }

    /// Whether a backup is due after `games_played` games.
    pub fn backup_due(&self, games_played: usize) -> bool {
        self.config.backup_interval > 0
            && games_played > 0
            && games_played % self.config.backup_interval == 0
    }

    /// Write a backup named after the agent's trained game count, then prune.
    pub fn backup(&self, agent: &QLearningAgent) -> Result<PathBuf, CheckpointError> {
        fs::create_dir_all(&self.config.backup_dir)?;
        let file_name = format!("q_table_{:010}.json", agent.games_trained());
        let path = self.config.backup_dir.join(file_name);

        write_snapshot(&path, &agent.snapshot())?;
        tracing::info!(path = %path.display(), "Q-table backup written");

        self.prune_old_backups()?;
        Ok(path)
    }

    /// Backups sorted oldest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, CheckpointError> {
        if !self.config.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for entry in fs::read_dir(&self.config.backup_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with("q_table_") && name_str.ends_with(".json") {
                results.push(path);
            }
        }
        results.sort();
        Ok(results)
    }

    fn prune_old_backups(&self) -> Result<(), CheckpointError> {
        let backups = self.list_backups()?;
        let excess = backups.len().saturating_sub(self.config.keep_last_n);
        for path in &backups[..excess] {
            fs::remove_file(path)?;
            tracing::debug!(path = %path.display(), "pruned old backup");
        }
        Ok(())
    }
}
