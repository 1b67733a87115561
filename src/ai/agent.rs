use crate::game::{Board, Side};

/// Universal interface for every move-selection engine.
pub trait Agent {
    /// Select a legal action for `side` on a non-terminal board.
    ///
    /// The board is borrowed mutably so engines can apply and undo candidate
    /// moves in place; it is returned unchanged.
    fn select_action(&mut self, board: &mut Board, side: Side) -> usize;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Receive the terminal reward once the game this agent played ends.
    fn observe_terminal(&mut self, _reward: f64) {}
}
