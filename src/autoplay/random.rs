use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::game::{Board, Direction};

/// Picks the next direction for a headless game.
pub trait Mover {
    fn choose(&mut self, board: &Board) -> Direction;

    fn name(&self) -> &str;
}

/// Directions that would change the board from its current state.
pub fn legal_directions(board: &Board) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&direction| {
            board
                .tiles()
                .any(|tile| board.resolve_move_target(tile, direction).position != tile.position())
        })
        .collect()
}

/// A mover that selects uniformly at random from legal directions.
pub struct RandomMover {
    rng: StdRng,
}

impl RandomMover {
    pub fn new() -> Self {
        RandomMover {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomMover {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMover {
    fn default() -> Self {
        Self::new()
    }
}

impl Mover for RandomMover {
    fn choose(&mut self, board: &Board) -> Direction {
        let legal = legal_directions(board);
        // A stuck board is about to be reported as over; any direction will do.
        let candidates: &[Direction] = if legal.is_empty() {
            &Direction::ALL
        } else {
            &legal
        };
        candidates[self.rng.random_range(0..candidates.len())]
    }

    fn name(&self) -> &str {
        "Random"
    }
}
