use std::path::Path;

use crate::ai::{EngineKind, HeuristicWeights, QLearningConfig, SearchConfig};
use crate::arena::ArenaConfig;
use crate::checkpoint::CheckpointConfig;
use crate::error::ConfigError;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub heuristic: HeuristicWeights,
    pub qlearning: QLearningConfig,
    pub arena: ArenaConfig,
    pub checkpoint: CheckpointConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == Some(0) {
            return Err(ConfigError::Validation(
                "search.depth must be >= 1 (omit it for unlimited depth)".into(),
            ));
        }

        let h = &self.heuristic;
        if h.block_penalty >= h.one_short {
            return Err(ConfigError::Validation(
                "heuristic.block_penalty must be < heuristic.one_short".into(),
            ));
        }
        if h.one_short >= h.complete {
            return Err(ConfigError::Validation(
                "heuristic.one_short must be < heuristic.complete".into(),
            ));
        }
        if h.two_short < 0 || h.block_penalty < 0 || h.center < 0 {
            return Err(ConfigError::Validation(
                "heuristic weights must be >= 0".into(),
            ));
        }

        let q = &self.qlearning;
        if q.learning_rate <= 0.0 || q.learning_rate > 1.0 {
            return Err(ConfigError::Validation(
                "qlearning.learning_rate must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&q.discount) {
            return Err(ConfigError::Validation(
                "qlearning.discount must be in [0, 1]".into(),
            ));
        }

        // Exploration schedule
        if !(0.0..=1.0).contains(&q.epsilon_start) {
            return Err(ConfigError::Validation(
                "qlearning.epsilon_start must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&q.epsilon_min) {
            return Err(ConfigError::Validation(
                "qlearning.epsilon_min must be in [0, 1]".into(),
            ));
        }
        if q.epsilon_min > q.epsilon_start {
            return Err(ConfigError::Validation(
                "qlearning.epsilon_min must be <= qlearning.epsilon_start".into(),
            ));
        }
        if q.epsilon_decay <= 0.0 || q.epsilon_decay > 1.0 {
            return Err(ConfigError::Validation(
                "qlearning.epsilon_decay must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&q.center_bias) {
            return Err(ConfigError::Validation(
                "qlearning.center_bias must be in [0, 1]".into(),
            ));
        }
        if q.reward_scale < 0.0 {
            return Err(ConfigError::Validation(
                "qlearning.reward_scale must be >= 0".into(),
            ));
        }

        if q.max_states == 0 {
            return Err(ConfigError::Validation(
                "qlearning.max_states must be > 0".into(),
            ));
        }
        if q.eviction_fraction <= 0.0 || q.eviction_fraction > 1.0 {
            return Err(ConfigError::Validation(
                "qlearning.eviction_fraction must be in (0, 1]".into(),
            ));
        }

        if self.arena.games == 0 {
            return Err(ConfigError::Validation("arena.games must be > 0".into()));
        }
        if self.arena.x_engine == EngineKind::Learned && self.arena.o_engine == EngineKind::Learned
        {
            return Err(ConfigError::Validation(
                "at most one side may use the learned engine".into(),
            ));
        }

        if self.checkpoint.keep_last_n == 0 {
            return Err(ConfigError::Validation(
                "checkpoint.keep_last_n must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameKind;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[qlearning]
learning_rate = 0.5
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.qlearning.learning_rate - 0.5).abs() < 1e-9);
        // Other fields should be defaults
        assert!((config.qlearning.discount - 0.9).abs() < 1e-9);
        assert_eq!(config.search.depth, Some(4));
        assert_eq!(config.arena.games, 100);
    }

    #[test]
    fn test_tactical_override_parses() {
        let toml_str = r#"
[qlearning]
tactical_override = true
block_value = 60.0
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(config.qlearning.tactical_override);
        assert_eq!(config.qlearning.win_value, 100.0);
        assert_eq!(config.qlearning.block_value, 60.0);
        assert!(!AppConfig::default().qlearning.tactical_override);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_arena_section_parses_enums() {
        let toml_str = r#"
[arena]
game = "tic_tac_toe"
x_engine = "search"
o_engine = "learned"
seed = 42

[search]
pruning = false
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.arena.game, GameKind::TicTacToe);
        assert_eq!(config.arena.x_engine, EngineKind::Search);
        assert_eq!(config.arena.o_engine, EngineKind::Learned);
        assert_eq!(config.arena.seed, Some(42));
        assert!(!config.search.pruning);
        assert!(config.arena.rewards.is_none());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = AppConfig::default();
        config.search.depth = Some(0);
        assert!(config.validate().is_err());
        config.search.depth = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_block_penalty_above_bonus() {
        let mut config = AppConfig::default();
        config.heuristic.block_penalty = config.heuristic.one_short;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_one_short_above_complete() {
        let mut config = AppConfig::default();
        config.heuristic.one_short = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_weights() {
        let mut config = AppConfig::default();
        config.heuristic.center = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_learning_rate() {
        let mut config = AppConfig::default();
        config.qlearning.learning_rate = 0.0;
        assert!(config.validate().is_err());
        config.qlearning.learning_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_discount() {
        let mut config = AppConfig::default();
        config.qlearning.discount = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_epsilon_start_out_of_range() {
        let mut config = AppConfig::default();
        config.qlearning.epsilon_start = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_epsilon_min_gt_start() {
        let mut config = AppConfig::default();
        config.qlearning.epsilon_start = 0.1;
        config.qlearning.epsilon_min = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_epsilon_decay() {
        let mut config = AppConfig::default();
        config.qlearning.epsilon_decay = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_center_bias_out_of_range() {
        let mut config = AppConfig::default();
        config.qlearning.center_bias = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_max_states() {
        let mut config = AppConfig::default();
        config.qlearning.max_states = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_eviction_fraction_out_of_range() {
        let mut config = AppConfig::default();
        config.qlearning.eviction_fraction = 0.0;
        assert!(config.validate().is_err());
        config.qlearning.eviction_fraction = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.arena.games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_two_learners() {
        let mut config = AppConfig::default();
        config.arena.x_engine = EngineKind::Learned;
        config.arena.o_engine = EngineKind::Learned;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_keep_last_n() {
        let mut config = AppConfig::default();
        config.checkpoint.keep_last_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[arena]
games = 500

[checkpoint]
model_path = "models/c4.json"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.arena.games, 500);
        assert_eq!(config.checkpoint.model_path, Path::new("models/c4.json"));
        // Others are defaults
        assert!((config.qlearning.learning_rate - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[arena]\ngames = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
