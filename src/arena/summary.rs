use std::fmt;
use std::time::Duration;

use crate::game::Side;

/// Result of a single arena game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub winner: Option<Side>,
    pub moves: usize,
    pub first_mover: Side,
}

/// Lifetime tallies for a match between two engines.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    names: [String; 2],
    wins: [usize; 2],
    draws: usize,
    games: usize,
    total_moves: usize,
    decision_time: [Duration; 2],
    decisions: [u32; 2],
}

impl MatchSummary {
    /// `x_name` and `o_name` label the engines playing each side.
    pub fn new(x_name: &str, o_name: &str) -> Self {
        MatchSummary {
            names: [x_name.to_string(), o_name.to_string()],
            wins: [0; 2],
            draws: 0,
            games: 0,
            total_moves: 0,
            decision_time: [Duration::ZERO; 2],
            decisions: [0; 2],
        }
    }

    pub fn record_game(&mut self, record: GameRecord) {
        self.games += 1;
        self.total_moves += record.moves;
        match record.winner {
            Some(side) => self.wins[side.index()] += 1,
            None => self.draws += 1,
        }
    }

    pub fn record_decision(&mut self, side: Side, elapsed: Duration) {
        self.decision_time[side.index()] += elapsed;
        self.decisions[side.index()] += 1;
    }

    pub fn games(&self) -> usize {
        self.games
    }

    pub fn wins(&self, side: Side) -> usize {
        self.wins[side.index()]
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn win_rate(&self, side: Side) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins[side.index()] as f32 / self.games as f32
    }

    pub fn draw_rate(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.draws as f32 / self.games as f32
    }

    pub fn average_game_length(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_moves as f32 / self.games as f32
    }

    pub fn average_decision_time(&self, side: Side) -> Duration {
        let count = self.decisions[side.index()];
        if count == 0 {
            return Duration::ZERO;
        }
        self.decision_time[side.index()] / count
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "games: {}", self.games)?;
        for side in Side::BOTH {
            writeln!(
                f,
                "{} ({}): {} wins ({:.1}%), avg decision {:.3} ms",
                self.names[side.index()],
                side.symbol(),
                self.wins(side),
                self.win_rate(side) * 100.0,
                self.average_decision_time(side).as_secs_f64() * 1000.0,
            )?;
        }
        writeln!(f, "draws: {} ({:.1}%)", self.draws, self.draw_rate() * 100.0)?;
        write!(f, "average game length: {:.1} moves", self.average_game_length())
    }
}
