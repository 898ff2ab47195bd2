use super::tile::{Position, TileId};

/// Everything the engine asks the presentation layer to do.
///
/// Events are fire-and-forget. Animation completion comes back through
/// [`GameSession::on_move_animation_done`](super::GameSession::on_move_animation_done)
/// and [`GameSession::on_fall_animation_done`](super::GameSession::on_fall_animation_done),
/// never through a return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    TileCreated {
        id: TileId,
        value: u8,
        position: Position,
    },
    TileDestroyed {
        id: TileId,
    },
    TileMoved {
        id: TileId,
        position: Position,
    },
    TileValueChanged {
        id: TileId,
        value: u8,
    },
    BounceEffect {
        id: TileId,
        enabled: bool,
    },
    FallEffect {
        id: TileId,
        enabled: bool,
    },
    /// A tile was absorbed at `position`; `intensity` is its value before removal.
    RemovalEffect {
        position: Position,
        intensity: u8,
    },
    ScoreChanged {
        score: u32,
        hi_score: u32,
    },
    MessageChanged {
        primary: String,
        secondary: String,
    },
    /// The high-score store failed; play continues with the in-memory score.
    PersistenceFailed {
        reason: String,
    },
}

/// Outbound queue the board and session append to.
pub type EventQueue = Vec<PresentationEvent>;
