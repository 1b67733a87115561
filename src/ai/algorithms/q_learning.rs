use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::ai::agent::Agent;
use crate::ai::baseline::winning_action;
use crate::ai::heuristic::Heuristic;
use crate::ai::q_table::QTable;
use crate::ai::state_encoding::state_key;
use crate::checkpoint::{self, LoadStatus, ModelMetadata, ModelSnapshot};
use crate::error::CheckpointError;
use crate::game::{Board, Side};

/// Q-learning hyperparameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Step size alpha of the temporal-difference update.
    pub learning_rate: f64,
    /// Discount gamma applied to the bootstrapped future value.
    pub discount: f64,
    pub epsilon_start: f64,
    pub epsilon_min: f64,
    /// Multiplicative epsilon decay applied after every chosen action.
    pub epsilon_decay: f64,
    /// Probability of taking the center action when exploring.
    pub center_bias: f64,
    /// Factor applied to the evaluator score to form the shaped reward.
    pub reward_scale: f64,
    /// State count above which eviction runs at the end of an episode.
    pub max_states: usize,
    /// Fraction of states dropped by one eviction.
    pub eviction_fraction: f64,
    /// Whether the state key records the side to move.
    pub key_includes_side: bool,
    /// Play an immediate win, else block an immediate loss, before the
    /// epsilon-greedy choice, stamping `win_value` / `block_value` on it.
    pub tactical_override: bool,
    pub win_value: f64,
    pub block_value: f64,
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        QLearningConfig {
            learning_rate: 0.3,
            discount: 0.9,
            epsilon_start: 0.7,
            epsilon_min: 0.1,
            epsilon_decay: 0.9999,
            center_bias: 0.7,
            reward_scale: 0.02,
            max_states: 500_000,
            eviction_fraction: 0.1,
            key_includes_side: true,
            tactical_override: false,
            win_value: 100.0,
            block_value: 80.0,
            seed: None,
        }
    }
}

/// Online tabular Q-learning agent with epsilon-greedy exploration.
///
/// Each chosen action stays pending until the next call to
/// [`QLearningAgent::choose_action`] (shaped, bootstrapped update) or
/// [`QLearningAgent::apply_terminal_reward`] (final update, episode reset).
pub struct QLearningAgent {
    table: QTable,
    config: QLearningConfig,
    epsilon: f64,
    pending: Option<(String, usize)>,
    heuristic: Option<Box<dyn Heuristic>>,
    rng: StdRng,
    games_trained: u64,
}

impl QLearningAgent {
    pub fn new(config: QLearningConfig, heuristic: Option<Box<dyn Heuristic>>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        QLearningAgent {
            table: QTable::new(),
            epsilon: config.epsilon_start,
            config,
            pending: None,
            heuristic,
            rng,
            games_trained: 0,
        }
    }

    /// Pick an action for `side` and learn from the previous pending choice.
    pub fn choose_action(&mut self, board: &Board, side: Side) -> usize {
        let legal = board.legal_moves();
        assert!(!legal.is_empty(), "No legal actions available");

        let key = state_key(board, side, self.config.key_includes_side);
        self.table.entry_or_init(&key, &legal);
        self.table.record_visit(&key);

        let action = match self.tactical_action(board, side) {
            Some((action, value)) => {
                self.table.set_value(&key, action, value);
                action
            }
            None if self.rng.random::<f64>() < self.epsilon => self.explore(board, &legal),
            None => self
                .table
                .greedy_action(&key, &legal)
                .expect("legal actions are non-empty"),
        };

        if let Some((prev_key, prev_action)) = self.pending.take() {
            let reward = self.shaped_reward(board, side);
            let target = reward + self.config.discount * self.table.max_value(&key);
            self.table
                .update_toward(&prev_key, prev_action, target, self.config.learning_rate);
        }

        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);
        self.pending = Some((key, action));
        action
    }

    /// Final update for the pending choice using the game's outcome reward,
    /// with no bootstrapped future term. Ends the episode.
    pub fn apply_terminal_reward(&mut self, reward: f64) {
        if let Some((key, action)) = self.pending.take() {
            self.table
                .update_toward(&key, action, reward, self.config.learning_rate);
        }
        self.games_trained += 1;
        self.evict_if_oversized();
    }

    /// Drop the least-visited fraction of states once the table exceeds
    /// `max_states`. Returns the number of states removed.
    pub fn evict_if_oversized(&mut self) -> usize {
        let len = self.table.len();
        if len <= self.config.max_states {
            return 0;
        }

        let count = ((len as f64 * self.config.eviction_fraction).floor() as usize).clamp(1, len);
        let removed = self.table.evict_least_visited(count);
        tracing::debug!(removed, remaining = self.table.len(), "evicted least-visited states");
        removed
    }

    fn tactical_action(&self, board: &Board, side: Side) -> Option<(usize, f64)> {
        if !self.config.tactical_override {
            return None;
        }
        let mut scratch = board.clone();
        if let Some(action) = winning_action(&mut scratch, side) {
            return Some((action, self.config.win_value));
        }
        winning_action(&mut scratch, side.other()).map(|action| (action, self.config.block_value))
    }

    fn explore(&mut self, board: &Board, legal: &[usize]) -> usize {
        let center = board.kind().center_action();
        if legal.contains(&center) && self.rng.random::<f64>() < self.config.center_bias {
            return center;
        }
        *legal.choose(&mut self.rng).expect("legal actions are non-empty")
    }

    fn shaped_reward(&self, board: &Board, side: Side) -> f64 {
        self.heuristic
            .as_ref()
            .map_or(0.0, |h| f64::from(h.evaluate(board, side)) * self.config.reward_scale)
    }

    /// Serialize the full table, epsilon, and training metadata to `path`.
    pub fn save(&self, path: &Path) -> Result<(), CheckpointError> {
        checkpoint::write_snapshot(path, &self.snapshot())?;
        tracing::info!(
            path = %path.display(),
            states = self.table.len(),
            "Q-learning model saved"
        );
        Ok(())
    }

    /// Replace the in-memory table with the one stored at `path`.
    ///
    /// A missing file is not an error: the table is reset to empty and
    /// [`LoadStatus::Missing`] is returned.
    pub fn load(&mut self, path: &Path) -> Result<LoadStatus, CheckpointError> {
        self.pending = None;
        match checkpoint::read_snapshot(path)? {
            Some(snapshot) => {
                self.table = snapshot.table;
                self.epsilon = snapshot.epsilon;
                self.games_trained = snapshot.metadata.games_trained;
                tracing::info!(
                    path = %path.display(),
                    states = self.table.len(),
                    "Q-learning model loaded"
                );
                Ok(LoadStatus::Loaded {
                    states: self.table.len(),
                    games_trained: self.games_trained,
                })
            }
            None => {
                self.table.clear();
                tracing::warn!(
                    path = %path.display(),
                    "no saved Q-table found, starting fresh"
                );
                Ok(LoadStatus::Missing(path.to_path_buf()))
            }
        }
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        ModelSnapshot {
            version: ModelSnapshot::VERSION,
            metadata: ModelMetadata {
                timestamp,
                games_trained: self.games_trained,
                states: self.table.len(),
                hyperparameters: self.config.clone(),
            },
            epsilon: self.epsilon,
            table: self.table.clone(),
        }
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    pub fn games_trained(&self) -> u64 {
        self.games_trained
    }

    /// The (state key, action) awaiting its update, if an episode is in progress.
    pub fn pending(&self) -> Option<(&str, usize)> {
        self.pending.as_ref().map(|(key, action)| (key.as_str(), *action))
    }
}

impl Agent for QLearningAgent {
    fn select_action(&mut self, board: &mut Board, side: Side) -> usize {
        self.choose_action(board, side)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn observe_terminal(&mut self, reward: f64) {
        self.apply_terminal_reward(reward);
    }
}
