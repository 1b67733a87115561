mod rewards;
mod runner;
mod summary;

pub use rewards::RewardConfig;
pub use runner::{Arena, ArenaConfig};
pub use summary::{GameRecord, MatchSummary};
