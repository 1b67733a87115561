use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::game::{Board, Side};

use super::agent::Agent;

/// Plays an immediate win if one exists, otherwise blocks the opponent's
/// immediate win, otherwise picks uniformly at random.
pub struct BaselineAgent {
    rng: StdRng,
}

impl BaselineAgent {
    pub fn new() -> Self {
        BaselineAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        BaselineAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for BaselineAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// First legal action (in board order) that wins immediately for `side`.
pub fn winning_action(board: &mut Board, side: Side) -> Option<usize> {
    board.legal_moves().into_iter().find(|&action| {
        board.apply_move(action, side).expect("legal action applies");
        let wins = board.winner() == Some(side);
        board.undo_move(action).expect("applied action can be undone");
        wins
    })
}

impl Agent for BaselineAgent {
    fn select_action(&mut self, board: &mut Board, side: Side) -> usize {
        if let Some(action) = winning_action(board, side) {
            return action;
        }
        if let Some(action) = winning_action(board, side.other()) {
            return action;
        }

        let actions = board.legal_moves();
        *actions.choose(&mut self.rng).expect("No legal actions available")
    }

    fn name(&self) -> &str {
        "Baseline"
    }
}
