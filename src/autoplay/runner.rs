use std::fmt;

use tracing::debug;

use super::random::Mover;
use crate::game::{GameOutcome, GameSession};

/// Result of a single headless game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    /// `None` when the turn limit was hit first.
    pub outcome: Option<GameOutcome>,
    pub score: u32,
    pub max_value: u8,
    pub turns: usize,
}

impl GameSummary {
    pub fn won(&self) -> bool {
        self.outcome == Some(GameOutcome::Won)
    }
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            Some(GameOutcome::Won) => "won",
            Some(GameOutcome::GameOver { new_high_score: true }) => "over (new high score)",
            Some(GameOutcome::GameOver { .. }) => "over",
            None => "unfinished",
        };
        write!(
            f,
            "{:<22} score {:>6}  best tile {:>5}  turns {:>5}",
            outcome,
            self.score,
            1u32 << self.max_value,
            self.turns
        )
    }
}

/// Play until the game ends or `max_turns` directions have been issued.
///
/// Animations are acknowledged immediately, so every turn completes inside
/// this call, including the game-over cascade.
pub fn play_to_end(session: &mut GameSession, mover: &mut dyn Mover, max_turns: usize) -> GameSummary {
    let mut turns = 0;
    while turns < max_turns && session.outcome().is_none() {
        let direction = mover.choose(session.board());
        session.handle_direction(direction);
        turns += 1;
        while session.on_move_animation_done() {}
        session.drain_events();
    }
    while session.on_fall_animation_done() {}
    session.drain_events();

    let summary = GameSummary {
        outcome: session.outcome(),
        score: session.score(),
        max_value: session.board().max_value(),
        turns,
    };
    debug!(mover = mover.name(), %summary, "autoplay game finished");
    summary
}

/// Aggregate statistics over many headless games.
#[derive(Debug, Clone, Default)]
pub struct AutoplayStats {
    games: usize,
    wins: usize,
    unfinished: usize,
    total_score: u64,
    best_score: u32,
    best_value: u8,
    total_turns: usize,
}

impl AutoplayStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, summary: &GameSummary) {
        self.games += 1;
        if summary.won() {
            self.wins += 1;
        }
        if summary.outcome.is_none() {
            self.unfinished += 1;
        }
        self.total_score += u64::from(summary.score);
        self.best_score = self.best_score.max(summary.score);
        self.best_value = self.best_value.max(summary.max_value);
        self.total_turns += summary.turns;
    }

    pub fn games(&self) -> usize {
        self.games
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    pub fn unfinished(&self) -> usize {
        self.unfinished
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn best_value(&self) -> u8 {
        self.best_value
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games as f64
    }

    pub fn average_score(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.games as f64
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }
}
