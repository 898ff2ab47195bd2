//! Tile-fusion engine: tile storage and move resolution, the turn state
//! machine driven by animation-completion signals, and the outbound
//! presentation events.

mod board;
mod direction;
mod events;
mod scenario;
mod score;
mod session;
mod tile;
mod turn;

pub use board::{Board, BoardError, EndCheck, MoveSummary, MoveTarget, DEFAULT_BOARD_SIZE};
pub use direction::{Cells, Direction, ScanOrder};
pub use events::{EventQueue, PresentationEvent};
pub use scenario::Scenario;
pub use score::ScoreTracker;
pub use session::{GameConfig, GameSession, Message, START_TILE_VALUE};
pub use tile::{PendingMerge, Position, Tile, TileId, MAX_TILE_VALUE};
pub use turn::{Admission, Command, GameOutcome, InputPolicy, TurnController, TurnPhase};
