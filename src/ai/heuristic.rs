use serde::{Deserialize, Serialize};

use crate::game::{Board, Cell, GameKind, Side};

/// Trait for evaluating a board position from a side's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, side: Side) -> i32;
}

/// Window scores for [`WindowHeuristic`]. A window is a straight run of
/// exactly `connect` cells (4 in Connect Four, 3 in Tic-Tac-Toe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Window fully owned.
    pub complete: i32,
    /// Owned except for one empty cell.
    pub one_short: i32,
    /// Owned except for two empty cells.
    pub two_short: i32,
    /// Cost per opponent window one cell short of a line. Kept below
    /// `one_short` so defense never outweighs an equal threat of one's own.
    pub block_penalty: i32,
    /// Per piece in the center column.
    pub center: i32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        HeuristicWeights {
            complete: 100,
            one_short: 10,
            two_short: 1,
            block_penalty: 8,
            center: 3,
        }
    }
}

/// Window counts for one side: full windows, windows one cell short of a
/// line (open threats), and windows two cells short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct WindowTally {
    complete: i32,
    one_short: i32,
    two_short: i32,
}

/// Scans every window in all four directions and scores threats.
///
/// Complete windows, two-short windows and center pieces are scored
/// zero-sum. Open threats are not: the side's own count `one_short` each,
/// the opponent's cost `block_penalty` each. Swapping sides therefore negates
/// the score exactly when neither side has an open threat.
#[derive(Debug, Clone, Default)]
pub struct WindowHeuristic {
    weights: HeuristicWeights,
}

impl WindowHeuristic {
    pub fn new(weights: HeuristicWeights) -> Self {
        WindowHeuristic { weights }
    }

    fn tally(&self, board: &Board, side: Side) -> WindowTally {
        let own_cell = side.to_cell();
        let opp_cell = side.other().to_cell();
        let (rows, cols) = (board.rows() as isize, board.cols() as isize);
        let len = board.kind().connect();
        let span = len as isize - 1;
        let mut tally = WindowTally::default();

        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        for (dr, dc) in DIRECTIONS {
            for row in 0..rows {
                for col in 0..cols {
                    let (end_r, end_c) = (row + dr * span, col + dc * span);
                    if end_r < 0 || end_r >= rows || end_c < 0 || end_c >= cols {
                        continue;
                    }

                    let mut own = 0;
                    let mut empty = 0;
                    for i in 0..len as isize {
                        match board.get((row + dr * i) as usize, (col + dc * i) as usize) {
                            c if c == own_cell => own += 1,
                            c if c == opp_cell => {}
                            Cell::Empty => empty += 1,
                            _ => unreachable!("cell is own, opponent, or empty"),
                        }
                    }

                    if own == len {
                        tally.complete += 1;
                    } else if own + 1 == len && empty == 1 {
                        tally.one_short += 1;
                    } else if own + 2 == len && empty == 2 {
                        tally.two_short += 1;
                    }
                }
            }
        }

        tally
    }

    /// Zero-sum part of one side's score: full and two-short windows plus
    /// the center column bonus.
    fn positional(&self, board: &Board, side: Side, tally: WindowTally) -> i32 {
        let w = &self.weights;
        let mut score = w.complete * tally.complete + w.two_short * tally.two_short;

        // Center column bonus
        if board.cols() % 2 == 1 {
            let center = board.cols() / 2;
            let count = (0..board.rows())
                .filter(|&row| board.get(row, center) == side.to_cell())
                .count();
            score += w.center * count as i32;
        }

        score
    }
}

impl Heuristic for WindowHeuristic {
    fn evaluate(&self, board: &Board, side: Side) -> i32 {
        let own = self.tally(board, side);
        let opp = self.tally(board, side.other());

        self.positional(board, side, own) - self.positional(board, side.other(), opp)
            + self.weights.one_short * own.one_short
            - self.weights.block_penalty * opp.one_short
    }
}

/// The evaluator a game variant uses by default. Tic-Tac-Toe is searched
/// exhaustively and needs none.
pub fn heuristic_for(kind: GameKind, weights: HeuristicWeights) -> Option<Box<dyn Heuristic>> {
    match kind {
        GameKind::TicTacToe => None,
        GameKind::ConnectFour => Some(Box::new(WindowHeuristic::new(weights))),
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_side_swap_differs_only_by_threats(
            actions in prop::collection::vec(0usize..7, 0..30)
        ) {
            let h = WindowHeuristic::default();
            let mut board = Board::new(GameKind::ConnectFour);
            let mut side = Side::X;
            for action in actions {
                if board.apply_move(action, side).is_ok() {
                    side = side.other();
                }
            }

            let w = HeuristicWeights::default();
            let threats = h.tally(&board, Side::X).one_short + h.tally(&board, Side::O).one_short;
            prop_assert_eq!(
                h.evaluate(&board, Side::X) + h.evaluate(&board, Side::O),
                (w.one_short - w.block_penalty) * threats
            );
            if threats == 0 {
                prop_assert_eq!(h.evaluate(&board, Side::X), -h.evaluate(&board, Side::O));
            }
        }
    }
}
