//! Core grid-game logic: variant geometry, side and cell types, and a mutable
//! board with move application, undo, and incremental win detection.

mod board;
mod kind;
mod player;

pub use board::{Board, Cell, GameOutcome, MoveError};
pub use kind::GameKind;
pub use player::Side;
