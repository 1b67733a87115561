//! # ML Grid Games
//!
//! Decision engines for two-player, perfect-information grid games
//! (Tic-Tac-Toe and Connect Four): depth- and time-bounded minimax with
//! alpha-beta pruning, a win/block/random baseline, and a persistent tabular
//! Q-learning agent.
//!
//! ## Modules
//!
//! - [`game`]: Board, sides, game variants, move application and undo
//! - [`ai`]: Agent trait, evaluator, search engine, baseline, Q-learning, engine dispatch
//! - [`arena`]: Plays matches between engines, tallies results, feeds rewards back
//! - [`checkpoint`]: Crash-safe persistence and backups of the learned table
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod arena;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
