mod agent;
pub mod algorithms;
mod baseline;
mod engine;
pub mod heuristic;
pub mod minimax;
pub mod q_table;
pub mod state_encoding;

pub use agent::Agent;
pub use algorithms::{QLearningAgent, QLearningConfig};
pub use baseline::{winning_action, BaselineAgent};
pub use engine::{EngineKind, EngineSet};
pub use heuristic::{heuristic_for, Heuristic, HeuristicWeights, WindowHeuristic};
pub use minimax::{MinimaxAgent, SearchConfig, SearchEngine, SearchResult};
pub use q_table::QTable;
