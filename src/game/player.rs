use super::board::Cell;

/// One of the two competing sides. X conventionally moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    X,
    O,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::X, Side::O];

    /// Get the other side
    pub fn other(self) -> Side {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// Convert side to the mark it leaves on the board
    pub fn to_cell(self) -> Cell {
        match self {
            Side::X => Cell::X,
            Side::O => Cell::O,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Side::X => 'X',
            Side::O => 'O',
        }
    }

    /// Stable index for per-side arrays
    pub fn index(self) -> usize {
        match self {
            Side::X => 0,
            Side::O => 1,
        }
    }
}
