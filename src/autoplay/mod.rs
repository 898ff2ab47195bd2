//! Headless play: movers that choose directions and a runner that drives a
//! session to the end, acknowledging every animation at once.

mod random;
mod runner;

pub use random::{legal_directions, Mover, RandomMover};
pub use runner::{play_to_end, AutoplayStats, GameSummary};
