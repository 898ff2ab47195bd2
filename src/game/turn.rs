use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Where the turn sequence is suspended between calls.
///
/// Executing a move and resolving merges happen synchronously inside a single
/// call, so only the points that wait on the presentation layer are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    /// Tiles are sliding; waiting for "move animation done".
    AwaitingMoveAnimation,
    /// Game-over cascade; the tile in storage slot `index` is falling.
    AwaitingFallStep { index: usize },
}

/// How directional input is treated while the turn is not idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputPolicy {
    /// Input arriving mid-turn is rejected.
    #[default]
    Drop,
    /// The most recent mid-turn direction runs once the turn returns to idle.
    QueueLatest,
}

impl FromStr for InputPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(InputPolicy::Drop),
            "queue-latest" => Ok(InputPolicy::QueueLatest),
            other => Err(format!(
                "unknown input policy '{}' (expected 'drop' or 'queue-latest')",
                other
            )),
        }
    }
}

impl fmt::Display for InputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputPolicy::Drop => f.write_str("drop"),
            InputPolicy::QueueLatest => f.write_str("queue-latest"),
        }
    }
}

/// Player commands after key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    GameOver { new_high_score: bool },
}

/// What happened to a directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The move runs now.
    Execute,
    /// Held until the current turn settles.
    Queued,
    /// Discarded because a turn is in flight.
    Dropped,
    /// Discarded because the game has ended; only restart helps.
    Finished,
}

/// Turn bookkeeping: phase, merge flag and the input admission policy.
#[derive(Debug, Clone)]
pub struct TurnController {
    phase: TurnPhase,
    running: bool,
    enable_merge: bool,
    queued: Option<Direction>,
    policy: InputPolicy,
}

impl TurnController {
    pub fn new(policy: InputPolicy) -> Self {
        TurnController {
            phase: TurnPhase::Idle,
            running: false,
            enable_merge: false,
            queued: None,
            policy,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TurnPhase::Idle
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Mark the game as started. Returns true on the first call.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn enable_merge(&self) -> bool {
        self.enable_merge
    }

    pub fn set_enable_merge(&mut self, enabled: bool) {
        self.enable_merge = enabled;
    }

    /// Decide what to do with a directional input.
    pub fn admit(&mut self, direction: Direction, finished: bool) -> Admission {
        if finished {
            return Admission::Finished;
        }
        if self.is_idle() {
            return Admission::Execute;
        }
        match self.policy {
            InputPolicy::Drop => Admission::Dropped,
            InputPolicy::QueueLatest => {
                self.queued = Some(direction);
                Admission::Queued
            }
        }
    }

    pub fn queued(&self) -> Option<Direction> {
        self.queued
    }

    pub fn take_queued(&mut self) -> Option<Direction> {
        self.queued.take()
    }

    pub fn clear_queued(&mut self) {
        self.queued = None;
    }

    /// Back to idle with no transient state. `running` is left as is.
    pub fn reset(&mut self) {
        self.phase = TurnPhase::Idle;
        self.enable_merge = false;
        self.queued = None;
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new(InputPolicy::default())
    }
}
