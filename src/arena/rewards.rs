use serde::{Deserialize, Serialize};

use crate::game::{GameKind, GameOutcome, Side};

/// Terminal reward schedule handed to a learned participant.
///
/// A win pays `win - win_decay_per_move * moves`, never less than `win_floor`,
/// so faster wins pay more. Losing within `early_loss_moves` plies costs
/// `early_loss` instead of `loss`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub win: f64,
    pub win_floor: f64,
    pub win_decay_per_move: f64,
    pub loss: f64,
    pub early_loss: f64,
    pub early_loss_moves: usize,
    pub draw: f64,
}

impl RewardConfig {
    pub fn for_game(kind: GameKind) -> Self {
        match kind {
            GameKind::TicTacToe => RewardConfig {
                win: 1.0,
                win_floor: 1.0,
                win_decay_per_move: 0.0,
                loss: -1.0,
                early_loss: -1.0,
                early_loss_moves: 0,
                draw: 0.0,
            },
            GameKind::ConnectFour => RewardConfig {
                win: 50.0,
                win_floor: 10.0,
                win_decay_per_move: 0.3,
                loss: -10.0,
                early_loss: -30.0,
                early_loss_moves: 10,
                draw: -5.0,
            },
        }
    }

    /// Reward for `side` after a game that lasted `moves` plies.
    pub fn terminal_reward(&self, outcome: GameOutcome, side: Side, moves: usize) -> f64 {
        match outcome {
            GameOutcome::Winner(winner) if winner == side => {
                (self.win - self.win_decay_per_move * moves as f64).max(self.win_floor)
            }
            GameOutcome::Winner(_) if moves < self.early_loss_moves => self.early_loss,
            GameOutcome::Winner(_) => self.loss,
            GameOutcome::Draw => self.draw,
        }
    }
}
