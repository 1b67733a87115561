use serde::{Deserialize, Serialize};

/// Supported game variants. Each one fixes the grid geometry, the line length
/// needed to win, and whether pieces fall under gravity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// 3x3 grid, any empty cell is playable, three in a row wins.
    TicTacToe,
    /// 6x7 grid, pieces drop to the lowest empty cell, four in a row wins.
    ConnectFour,
}

impl GameKind {
    pub fn rows(self) -> usize {
        match self {
            GameKind::TicTacToe => 3,
            GameKind::ConnectFour => 6,
        }
    }

    pub fn cols(self) -> usize {
        match self {
            GameKind::TicTacToe => 3,
            GameKind::ConnectFour => 7,
        }
    }

    /// Number of aligned marks that wins the game.
    pub fn connect(self) -> usize {
        match self {
            GameKind::TicTacToe => 3,
            GameKind::ConnectFour => 4,
        }
    }

    /// Whether actions name columns (pieces drop) rather than cells.
    pub fn has_gravity(self) -> bool {
        matches!(self, GameKind::ConnectFour)
    }

    /// Size of the action space: cells for Tic-Tac-Toe, columns for Connect Four.
    pub fn action_count(self) -> usize {
        if self.has_gravity() {
            self.cols()
        } else {
            self.rows() * self.cols()
        }
    }

    /// The structurally strongest opening action (center cell or center column).
    pub fn center_action(self) -> usize {
        if self.has_gravity() {
            self.cols() / 2
        } else {
            (self.rows() / 2) * self.cols() + self.cols() / 2
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "Tic-Tac-Toe",
            GameKind::ConnectFour => "Connect Four",
        }
    }
}
