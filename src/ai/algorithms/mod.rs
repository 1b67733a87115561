mod q_learning;

pub use q_learning::{QLearningAgent, QLearningConfig};
