use serde::{Deserialize, Serialize};

use crate::ai::agent::Agent;
use crate::ai::algorithms::QLearningAgent;
use crate::ai::baseline::BaselineAgent;
use crate::ai::minimax::{MinimaxAgent, SearchConfig};
use crate::error::ArenaError;
use crate::game::{Board, Side};

/// Which engine picks a side's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Baseline,
    Search,
    Learned,
}

/// One instance of every engine, dispatched by [`EngineKind`].
///
/// The learner is optional: matches without a learned side never need a table.
pub struct EngineSet {
    baseline: BaselineAgent,
    minimax: MinimaxAgent,
    learner: Option<QLearningAgent>,
}

impl EngineSet {
    pub fn new(
        baseline: BaselineAgent,
        minimax: MinimaxAgent,
        learner: Option<QLearningAgent>,
    ) -> Self {
        EngineSet {
            baseline,
            minimax,
            learner,
        }
    }

    /// Pick an action for `side` using the engine named by `kind`.
    ///
    /// `search` applies only to [`EngineKind::Search`]. The returned action is
    /// whatever the engine produced; callers check legality.
    pub fn select_move(
        &mut self,
        board: &mut Board,
        side: Side,
        kind: EngineKind,
        search: &SearchConfig,
    ) -> Result<usize, ArenaError> {
        if kind == EngineKind::Search && self.minimax.engine().config() != search {
            self.minimax.set_config(search.clone());
        }
        Ok(self.agent(kind)?.select_action(board, side))
    }

    /// Forward a finished game's reward to the learned participant, if any.
    pub fn notify_terminal(&mut self, reward: f64) {
        if let Some(learner) = self.learner.as_mut() {
            learner.observe_terminal(reward);
        }
    }

    pub fn engine_name(&self, kind: EngineKind) -> &str {
        match kind {
            EngineKind::Baseline => self.baseline.name(),
            EngineKind::Search => self.minimax.name(),
            EngineKind::Learned => self.learner.as_ref().map_or("Q-Learning", |l| l.name()),
        }
    }

    pub fn learner(&self) -> Option<&QLearningAgent> {
        self.learner.as_ref()
    }

    pub fn learner_mut(&mut self) -> Option<&mut QLearningAgent> {
        self.learner.as_mut()
    }

    fn agent(&mut self, kind: EngineKind) -> Result<&mut dyn Agent, ArenaError> {
        match kind {
            EngineKind::Baseline => Ok(&mut self.baseline),
            EngineKind::Search => Ok(&mut self.minimax),
            EngineKind::Learned => match self.learner.as_mut() {
                Some(learner) => Ok(learner),
                None => Err(ArenaError::NoLearner),
            },
        }
    }
}
