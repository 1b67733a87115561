use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ai::{EngineKind, EngineSet, SearchConfig};
use crate::arena::rewards::RewardConfig;
use crate::arena::summary::{GameRecord, MatchSummary};
use crate::checkpoint::CheckpointManager;
use crate::error::ArenaError;
use crate::game::{Board, GameKind, Side};

/// Match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub game: GameKind,
    pub games: usize,
    pub x_engine: EngineKind,
    pub o_engine: EngineKind,
    /// Pick the side that moves first at random for every game.
    pub random_first_player: bool,
    /// Games between progress log lines; 0 disables them.
    pub log_interval: usize,
    /// Games between model saves; 0 saves only at the end.
    pub save_interval: usize,
    pub seed: Option<u64>,
    /// Terminal rewards. Defaults to [`RewardConfig::for_game`] when absent.
    pub rewards: Option<RewardConfig>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            game: GameKind::ConnectFour,
            games: 100,
            x_engine: EngineKind::Learned,
            o_engine: EngineKind::Baseline,
            random_first_player: true,
            log_interval: 100,
            save_interval: 5000,
            seed: None,
            rewards: None,
        }
    }
}

impl ArenaConfig {
    pub fn engine_for(&self, side: Side) -> EngineKind {
        match side {
            Side::X => self.x_engine,
            Side::O => self.o_engine,
        }
    }

    /// The side played by the learned engine, if either is.
    pub fn learned_side(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.engine_for(side) == EngineKind::Learned)
    }
}

/// Plays a series of games between two engines, feeding outcomes back to the
/// learned side and persisting its table along the way.
pub struct Arena {
    config: ArenaConfig,
    search: SearchConfig,
    engines: EngineSet,
    checkpoints: Option<CheckpointManager>,
    rewards: RewardConfig,
    rng: StdRng,
}

impl Arena {
    pub fn new(
        config: ArenaConfig,
        search: SearchConfig,
        engines: EngineSet,
        checkpoints: Option<CheckpointManager>,
    ) -> Self {
        let rewards = config
            .rewards
            .clone()
            .unwrap_or_else(|| RewardConfig::for_game(config.game));
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Arena {
            config,
            search,
            engines,
            checkpoints,
            rewards,
            rng,
        }
    }

    pub fn engines(&self) -> &EngineSet {
        &self.engines
    }

    pub fn engines_mut(&mut self) -> &mut EngineSet {
        &mut self.engines
    }

    /// Play every configured game and return the tallies.
    pub fn run(&mut self) -> Result<MatchSummary, ArenaError> {
        let mut summary = MatchSummary::new(
            self.engines.engine_name(self.config.x_engine),
            self.engines.engine_name(self.config.o_engine),
        );

        tracing::info!(
            game = self.config.game.name(),
            games = self.config.games,
            x = ?self.config.x_engine,
            o = ?self.config.o_engine,
            "starting match"
        );

        for game in 1..=self.config.games {
            let record = self.play_game(&mut summary)?;
            summary.record_game(record);

            if self.config.log_interval > 0 && game % self.config.log_interval == 0 {
                tracing::info!(
                    game,
                    x_win_rate = summary.win_rate(Side::X),
                    o_win_rate = summary.win_rate(Side::O),
                    draw_rate = summary.draw_rate(),
                    avg_len = summary.average_game_length(),
                    epsilon = self.engines.learner().map(|l| l.epsilon()),
                    "match progress"
                );
            }

            self.autosave(game);
        }

        if self.config.learned_side().is_some() {
            if let (Some(manager), Some(learner)) = (&self.checkpoints, self.engines.learner()) {
                manager.save_model(learner)?;
            }
        }

        Ok(summary)
    }

    /// Play one game to completion and notify the learned side of the result.
    pub fn play_game(&mut self, summary: &mut MatchSummary) -> Result<GameRecord, ArenaError> {
        let mut board = Board::new(self.config.game);
        let first_mover = if self.config.random_first_player && self.rng.random_bool(0.5) {
            Side::O
        } else {
            Side::X
        };

        let mut side = first_mover;
        while !board.is_terminal() {
            let kind = self.config.engine_for(side);
            let start = Instant::now();
            let action = self
                .engines
                .select_move(&mut board, side, kind, &self.search)?;
            summary.record_decision(side, start.elapsed());

            if board.apply_move(action, side).is_err() {
                return Err(ArenaError::IllegalAction {
                    engine: self.engines.engine_name(kind).to_string(),
                    action,
                    legal: board.legal_moves(),
                });
            }
            side = side.other();
        }

        let moves = board.move_count();
        let winner = board.winner();
        if let (Some(outcome), Some(learned)) = (board.outcome(), self.config.learned_side()) {
            let reward = self.rewards.terminal_reward(outcome, learned, moves);
            self.engines.notify_terminal(reward);
        }

        tracing::debug!(
            winner = ?winner,
            moves,
            first = ?first_mover,
            "game finished"
        );
        Ok(GameRecord {
            winner,
            moves,
            first_mover,
        })
    }

    /// Periodic saves and backups. Failures are logged and the match goes on.
    fn autosave(&self, game: usize) {
        let (Some(manager), Some(learner)) = (&self.checkpoints, self.engines.learner()) else {
            return;
        };

        if self.config.save_interval > 0 && game % self.config.save_interval == 0 {
            if let Err(e) = manager.save_model(learner) {
                tracing::warn!(game, error = %e, "periodic model save failed");
            }
        }
        if manager.backup_due(game) {
            if let Err(e) = manager.backup(learner) {
                tracing::warn!(game, error = %e, "model backup failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{BaselineAgent, MinimaxAgent, QLearningAgent, QLearningConfig};
    use crate::checkpoint::{read_snapshot, CheckpointConfig};

    fn engine_set(learner: Option<QLearningAgent>) -> EngineSet {
        EngineSet::new(
            BaselineAgent::with_seed(9),
            MinimaxAgent::new(SearchConfig::unbounded(), None),
            learner,
        )
    }

    fn learner() -> QLearningAgent {
        QLearningAgent::new(
            QLearningConfig {
                seed: Some(4),
                ..QLearningConfig::default()
            },
            None,
        )
    }

    fn ttt_config(x: EngineKind, o: EngineKind, games: usize) -> ArenaConfig {
        ArenaConfig {
            game: GameKind::TicTacToe,
            games,
            x_engine: x,
            o_engine: o,
            random_first_player: true,
            log_interval: 0,
            save_interval: 0,
            seed: Some(17),
            rewards: None,
        }
    }

    #[test]
    fn test_learned_side() {
        let config = ttt_config(EngineKind::Baseline, EngineKind::Learned, 1);
        assert_eq!(config.learned_side(), Some(Side::O));
        let config = ttt_config(EngineKind::Search, EngineKind::Baseline, 1);
        assert_eq!(config.learned_side(), None);
    }

    #[test]
    fn test_baseline_match_tallies() {
        let config = ttt_config(EngineKind::Baseline, EngineKind::Baseline, 30);
        let mut arena = Arena::new(config, SearchConfig::default(), engine_set(None), None);
        let summary = arena.run().unwrap();

        assert_eq!(summary.games(), 30);
        assert_eq!(
            summary.wins(Side::X) + summary.wins(Side::O) + summary.draws(),
            30
        );
        let avg = summary.average_game_length();
        assert!((5.0..=9.0).contains(&avg), "average length {avg}");
    }

    #[test]
    fn test_search_never_loses_tic_tac_toe() {
        let config = ttt_config(EngineKind::Search, EngineKind::Baseline, 10);
        let mut arena = Arena::new(config, SearchConfig::unbounded(), engine_set(None), None);
        let summary = arena.run().unwrap();
        assert_eq!(summary.wins(Side::O), 0);
    }

    #[test]
    fn test_fixed_first_mover() {
        let mut config = ttt_config(EngineKind::Baseline, EngineKind::Baseline, 1);
        config.random_first_player = false;
        let mut arena = Arena::new(config, SearchConfig::default(), engine_set(None), None);
        let mut summary = MatchSummary::new("a", "b");
        for _ in 0..10 {
            assert_eq!(arena.play_game(&mut summary).unwrap().first_mover, Side::X);
        }
    }

    #[test]
    fn test_random_first_mover_varies() {
        let config = ttt_config(EngineKind::Baseline, EngineKind::Baseline, 1);
        let mut arena = Arena::new(config, SearchConfig::default(), engine_set(None), None);
        let mut summary = MatchSummary::new("a", "b");
        let firsts: Vec<Side> = (0..64)
            .map(|_| arena.play_game(&mut summary).unwrap().first_mover)
            .collect();
        assert!(firsts.contains(&Side::X));
        assert!(firsts.contains(&Side::O));
    }

    #[test]
    fn test_missing_learner_is_error() {
        let config = ttt_config(EngineKind::Learned, EngineKind::Baseline, 1);
        let mut arena = Arena::new(config, SearchConfig::default(), engine_set(None), None);
        assert!(matches!(arena.run(), Err(ArenaError::NoLearner)));
    }

    #[test]
    fn test_learner_trains_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint_config = CheckpointConfig {
            model_path: dir.path().join("model.json"),
            backup_dir: dir.path().join("backups"),
            backup_interval: 4,
            keep_last_n: 5,
        };
        let mut config = ttt_config(EngineKind::Learned, EngineKind::Baseline, 10);
        config.save_interval = 5;

        let mut arena = Arena::new(
            config,
            SearchConfig::default(),
            engine_set(Some(learner())),
            Some(CheckpointManager::new(checkpoint_config.clone())),
        );
        let summary = arena.run().unwrap();
        assert_eq!(summary.games(), 10);

        let trained = arena.engines().learner().unwrap();
        assert_eq!(trained.games_trained(), 10);
        assert!(!trained.table().is_empty());
        assert!(trained.pending().is_none());

        let saved = read_snapshot(&checkpoint_config.model_path)
            .unwrap()
            .expect("model saved at the end");
        assert_eq!(saved.metadata.games_trained, 10);
        assert_eq!(&saved.table, trained.table());

        let backups = CheckpointManager::new(checkpoint_config).list_backups().unwrap();
        assert_eq!(backups.len(), 2);
    }

    #[test]
    fn test_custom_rewards_reach_learner() {
        let mut config = ttt_config(EngineKind::Learned, EngineKind::Baseline, 1);
        config.random_first_player = false;
        config.rewards = Some(RewardConfig {
            win: 7.0,
            win_floor: 7.0,
            win_decay_per_move: 0.0,
            loss: 7.0,
            early_loss: 7.0,
            early_loss_moves: 0,
            draw: 7.0,
        });
        let mut arena = Arena::new(
            config,
            SearchConfig::default(),
            engine_set(Some(learner())),
            None,
        );
        arena.run().unwrap();

        // Every outcome pays 7, so the learner's last move moved toward it.
        let table = arena.engines().learner().unwrap().table();
        let max = table
            .iter()
            .flat_map(|(_, values)| values.values().copied())
            .fold(f64::MIN, f64::max);
        assert!(max >= 0.3 * 7.0 - 1e-9, "max value {max}");
    }
}
