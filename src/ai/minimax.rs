use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::game::{Board, Side};

use super::agent::Agent;
use super::heuristic::Heuristic;

/// Offset added to win scores when an evaluator is configured, so a forced
/// win always outranks any heuristic value.
pub const WIN_SCORE: i32 = 1_000_000;

/// Search parameters: depth limit, wall-clock budget, and pruning toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to look ahead. `None` searches every line to a terminal position.
    pub depth: Option<usize>,
    /// Advisory budget checked on entry to every recursive call.
    pub time_budget_ms: Option<u64>,
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: Some(4),
            time_budget_ms: Some(1_800_000),
            pruning: true,
        }
    }
}

impl SearchConfig {
    /// Full-depth search with pruning and no time budget.
    pub fn unbounded() -> Self {
        SearchConfig {
            depth: None,
            time_budget_ms: None,
            pruning: true,
        }
    }

    pub fn with_depth(depth: usize) -> Self {
        SearchConfig {
            depth: Some(depth),
            time_budget_ms: None,
            pruning: true,
        }
    }

    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Outcome of one root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub action: usize,
    /// Score from the searching side's perspective.
    pub score: i32,
    /// Positions visited, the root included.
    pub nodes: u64,
    /// Whether the time budget cut off part of the tree.
    pub timed_out: bool,
}

struct SearchContext {
    maximizer: Side,
    deadline: Option<Instant>,
    pruning: bool,
    nodes: u64,
    timed_out: bool,
}

impl SearchContext {
    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Depth-limited minimax with optional alpha-beta pruning.
///
/// Moves are applied and undone on the caller's board rather than cloned,
/// so the board is left exactly as it was passed in.
pub struct SearchEngine {
    config: SearchConfig,
    heuristic: Option<Box<dyn Heuristic>>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig, heuristic: Option<Box<dyn Heuristic>>) -> Self {
        SearchEngine { config, heuristic }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Pick the best action for `side`, which is treated as the maximizer.
    ///
    /// Ties keep the first best action in board order. Calling this on a board
    /// with no legal moves or an existing winner is a caller error.
    pub fn search(&self, board: &mut Board, side: Side) -> SearchResult {
        let legal = board.legal_moves();
        assert!(!legal.is_empty(), "No legal actions available");
        assert!(board.winner().is_none(), "Search invoked on a finished game");

        let mut ctx = SearchContext {
            maximizer: side,
            deadline: self.config.time_budget().map(|budget| Instant::now() + budget),
            pruning: self.config.pruning,
            nodes: 1,
            timed_out: false,
        };
        let child_depth = self.config.depth.map(|d| d.max(1) - 1);

        let mut best_action = legal[0];
        let mut best_score = i32::MIN;
        let mut alpha = i32::MIN;

        for action in legal {
            board.apply_move(action, side).expect("legal action applies");
            let score = self.minimax(board, side.other(), child_depth, alpha, i32::MAX, &mut ctx);
            board.undo_move(action).expect("applied action can be undone");

            if score > best_score {
                best_score = score;
                best_action = action;
            }
            alpha = alpha.max(best_score);
        }

        if ctx.timed_out {
            tracing::trace!(
                nodes = ctx.nodes,
                action = best_action,
                "search truncated by time budget"
            );
        }

        SearchResult {
            action: best_action,
            score: best_score,
            nodes: ctx.nodes,
            timed_out: ctx.timed_out,
        }
    }

    fn minimax(
        &self,
        board: &mut Board,
        to_move: Side,
        depth: Option<usize>,
        mut alpha: i32,
        mut beta: i32,
        ctx: &mut SearchContext,
    ) -> i32 {
        ctx.nodes += 1;

        // The previous move won: faster wins (more empties) score further from zero.
        if let Some(winner) = board.winner() {
            let magnitude = self.win_offset() + board.empty_count() as i32 + 1;
            return if winner == ctx.maximizer {
                magnitude
            } else {
                -magnitude
            };
        }

        if ctx.out_of_time() {
            ctx.timed_out = true;
            return self.static_eval(board, ctx.maximizer);
        }

        if board.is_full() || depth == Some(0) {
            return self.static_eval(board, ctx.maximizer);
        }

        let maximizing = to_move == ctx.maximizer;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for action in board.legal_moves() {
            board.apply_move(action, to_move).expect("legal action applies");
            let score = self.minimax(
                board,
                to_move.other(),
                depth.map(|d| d - 1),
                alpha,
                beta,
                ctx,
            );
            board.undo_move(action).expect("applied action can be undone");

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if ctx.pruning && beta <= alpha {
                break;
            }
        }

        best
    }

    fn static_eval(&self, board: &Board, side: Side) -> i32 {
        self.heuristic
            .as_ref()
            .map_or(0, |heuristic| heuristic.evaluate(board, side))
    }

    fn win_offset(&self) -> i32 {
        if self.heuristic.is_some() {
            WIN_SCORE
        } else {
            0
        }
    }
}

/// Agent wrapper around [`SearchEngine`].
pub struct MinimaxAgent {
    engine: SearchEngine,
}

impl MinimaxAgent {
    pub fn new(config: SearchConfig, heuristic: Option<Box<dyn Heuristic>>) -> Self {
        MinimaxAgent {
            engine: SearchEngine::new(config, heuristic),
        }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.engine.set_config(config);
    }
}

impl Agent for MinimaxAgent {
    fn select_action(&mut self, board: &mut Board, side: Side) -> usize {
        self.engine.search(board, side).action
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}
