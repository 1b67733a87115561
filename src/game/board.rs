use std::fmt;

use super::{GameKind, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// The side owning this cell, if any
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Side::X),
            Cell::O => Some(Side::O),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("action is outside the board")]
    InvalidAction,
    #[error("cell is already occupied")]
    Occupied,
    #[error("column is full")]
    ColumnFull,
    #[error("no piece to undo at this action")]
    NothingToUndo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Side),
    Draw,
}

/// Mutable grid of marks. Row 0 is the top row.
///
/// The board is only ever changed through [`Board::apply_move`] and
/// [`Board::undo_move`], which lets search explore and backtrack in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    kind: GameKind,
    cells: Vec<Cell>,
    filled: usize,
    winner: Option<Side>,
    // Cell index of the move that set `winner`, so undo clears it exactly.
    winning_cell: Option<usize>,
}

impl Board {
    /// Create a new empty board for the given variant
    pub fn new(kind: GameKind) -> Self {
        Board {
            kind,
            cells: vec![Cell::Empty; kind.rows() * kind.cols()],
            filled: 0,
            winner: None,
            winning_cell: None,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn rows(&self) -> usize {
        self.kind.rows()
    }

    pub fn cols(&self) -> usize {
        self.kind.cols()
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols() + col]
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Legal actions in ascending order: empty cells for Tic-Tac-Toe,
    /// non-full columns for Connect Four.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.kind.action_count())
            .filter(|&action| self.is_legal(action))
            .collect()
    }

    pub fn is_legal(&self, action: usize) -> bool {
        self.landing_index(action).is_ok()
    }

    /// Cell index a piece would occupy if `action` were played.
    fn landing_index(&self, action: usize) -> Result<usize, MoveError> {
        if action >= self.kind.action_count() {
            return Err(MoveError::InvalidAction);
        }

        if !self.kind.has_gravity() {
            return if self.cells[action] == Cell::Empty {
                Ok(action)
            } else {
                Err(MoveError::Occupied)
            };
        }

        // Find the lowest empty row in this column
        (0..self.rows())
            .rev()
            .map(|row| row * self.cols() + action)
            .find(|&idx| self.cells[idx] == Cell::Empty)
            .ok_or(MoveError::ColumnFull)
    }

    /// Place a mark for `side`, returning the row where it landed.
    ///
    /// An illegal action is rejected and leaves the board untouched.
    pub fn apply_move(&mut self, action: usize, side: Side) -> Result<usize, MoveError> {
        let idx = self.landing_index(action)?;
        self.cells[idx] = side.to_cell();
        self.filled += 1;

        let (row, col) = (idx / self.cols(), idx % self.cols());
        if self.winner.is_none() && self.check_win(row, col) {
            self.winner = Some(side);
            self.winning_cell = Some(idx);
        }

        Ok(row)
    }

    /// Remove the most recent mark at `action`: the topmost piece of a
    /// Connect Four column, or the named Tic-Tac-Toe cell. Clears the winner
    /// if that mark produced it.
    pub fn undo_move(&mut self, action: usize) -> Result<(), MoveError> {
        if action >= self.kind.action_count() {
            return Err(MoveError::InvalidAction);
        }

        let idx = if self.kind.has_gravity() {
            (0..self.rows())
                .map(|row| row * self.cols() + action)
                .find(|&idx| self.cells[idx] != Cell::Empty)
                .ok_or(MoveError::NothingToUndo)?
        } else if self.cells[action] != Cell::Empty {
            action
        } else {
            return Err(MoveError::NothingToUndo);
        };

        self.cells[idx] = Cell::Empty;
        self.filled -= 1;
        if self.winning_cell == Some(idx) {
            self.winner = None;
            self.winning_cell = None;
        }

        Ok(())
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.filled == self.cells.len()
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.filled
    }

    /// Number of marks placed so far
    pub fn move_count(&self) -> usize {
        self.filled
    }

    /// Game outcome if the game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.winner {
            Some(side) => Some(GameOutcome::Winner(side)),
            None if self.is_full() => Some(GameOutcome::Draw),
            None => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Check if the mark at (row, col) completes a line in any direction
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }

        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let count = 1
                + self.run_length(row, col, dr, dc, cell)
                + self.run_length(row, col, -dr, -dc, cell);
            count >= self.kind.connect()
        })
    }

    /// Count consecutive `cell` marks stepping away from (row, col), exclusive.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && c >= 0
            && (r as usize) < self.rows()
            && (c as usize) < self.cols()
            && self.get(r as usize, c as usize) == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            let line: String = (0..self.cols()).map(|col| self.get(row, col).symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
