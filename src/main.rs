use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use ml_grid_games::ai::{
    heuristic_for, BaselineAgent, EngineKind, EngineSet, MinimaxAgent, QLearningAgent,
};
use ml_grid_games::arena::Arena;
use ml_grid_games::checkpoint::{CheckpointManager, LoadStatus};
use ml_grid_games::config::AppConfig;
use ml_grid_games::game::GameKind;

/// Play matches between minimax, baseline, and Q-learning engines.
#[derive(Parser)]
#[command(name = "ml_grid_games", about = "Play and train grid-game engines")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,

    /// Game variant
    #[arg(long, value_enum)]
    game: Option<GameKind>,

    /// Engine playing X
    #[arg(long, value_enum)]
    x_engine: Option<EngineKind>,

    /// Engine playing O
    #[arg(long, value_enum)]
    o_engine: Option<EngineKind>,

    /// Number of games to play
    #[arg(long)]
    games: Option<usize>,

    /// Search depth in plies
    #[arg(long, conflicts_with = "unbounded")]
    depth: Option<usize>,

    /// Search to terminal positions with no time budget
    #[arg(long)]
    unbounded: bool,

    /// Disable alpha-beta pruning
    #[arg(long)]
    no_pruning: bool,

    /// Search time budget in milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Q-table file to load and save
    #[arg(long)]
    model: Option<PathBuf>,

    /// Seed for every random source
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(game) = self.game {
            config.arena.game = game;
        }
        if let Some(engine) = self.x_engine {
            config.arena.x_engine = engine;
        }
        if let Some(engine) = self.o_engine {
            config.arena.o_engine = engine;
        }
        if let Some(games) = self.games {
            config.arena.games = games;
        }
        if self.unbounded {
            config.search.depth = None;
            config.search.time_budget_ms = None;
        }
        if let Some(depth) = self.depth {
            config.search.depth = Some(depth);
        }
        if self.no_pruning {
            config.search.pruning = false;
        }
        if let Some(ms) = self.time_budget_ms {
            config.search.time_budget_ms = Some(ms);
        }
        if let Some(model) = &self.model {
            config.checkpoint.model_path = model.clone();
        }
        if let Some(seed) = self.seed {
            config.arena.seed = Some(seed);
            config.qlearning.seed.get_or_insert(seed);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);
    config
        .validate()
        .context("invalid configuration after command-line overrides")?;

    let game = config.arena.game;
    let mut learner = config
        .arena
        .learned_side()
        .map(|_| QLearningAgent::new(config.qlearning.clone(), heuristic_for(game, config.heuristic)));
    let checkpoints = learner
        .is_some()
        .then(|| CheckpointManager::new(config.checkpoint.clone()));

    if let (Some(manager), Some(learner)) = (&checkpoints, learner.as_mut()) {
        let status = manager.load_model(learner).with_context(|| {
            format!("loading model from {}", config.checkpoint.model_path.display())
        })?;
        if let LoadStatus::Loaded { states, games_trained } = status {
            tracing::info!(states, games_trained, "resuming from saved model");
        }
    }

    let baseline = match config.arena.seed {
        Some(seed) => BaselineAgent::with_seed(seed),
        None => BaselineAgent::new(),
    };
    let minimax = MinimaxAgent::new(config.search.clone(), heuristic_for(game, config.heuristic));
    let engines = EngineSet::new(baseline, minimax, learner);

    let mut arena = Arena::new(config.arena.clone(), config.search.clone(), engines, checkpoints);
    let summary = arena.run().context("match failed")?;

    println!("{summary}");
    Ok(())
}
