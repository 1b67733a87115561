use crate::game::{Board, Side};

/// Encode a board as a Q-table state key.
///
/// One symbol per cell in row-major order (`.`, `X`, `O`), followed by
/// `:` and the side to move when `include_side` is set. Without the side,
/// both players share entries for identical boards.
pub fn state_key(board: &Board, side: Side, include_side: bool) -> String {
    let mut key = String::with_capacity(board.cells().len() + 2);
    key.extend(board.cells().iter().map(|cell| cell.symbol()));
    if include_side {
        key.push(':');
        key.push(side.symbol());
    }
    key
}
