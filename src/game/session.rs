use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::board::{Board, BoardError, DEFAULT_BOARD_SIZE};
use super::direction::Direction;
use super::events::{EventQueue, PresentationEvent};
use super::scenario::Scenario;
use super::score::ScoreTracker;
use super::turn::{Admission, Command, GameOutcome, InputPolicy, TurnController, TurnPhase};
use crate::highscore::HighScoreStore;

/// Exponent of the two tiles every new game starts with.
pub const START_TILE_VALUE: u8 = 1;
const START_TILES: usize = 2;

const RESTART_HINT: &str = "Restart to play again";

/// Rules of a session.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    /// Spawned tiles take an exponent in `1..=spawn_max_value`.
    pub spawn_max_value: u8,
    pub input_policy: InputPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: DEFAULT_BOARD_SIZE,
            spawn_max_value: 2,
            input_policy: InputPolicy::Drop,
        }
    }
}

/// Text overlaid on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub primary: String,
    pub secondary: String,
}

impl Message {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// One game in progress: the board, the turn sequence around it, scores and
/// the outbound presentation events.
///
/// The session never waits. A move returns right after the tiles have been
/// told where to slide; the turn continues when the presentation layer calls
/// [`on_move_animation_done`](Self::on_move_animation_done), and the game-over
/// cascade advances on [`on_fall_animation_done`](Self::on_fall_animation_done).
pub struct GameSession {
    config: GameConfig,
    board: Board,
    score: ScoreTracker,
    turn: TurnController,
    outcome: Option<GameOutcome>,
    message: Message,
    rng: StdRng,
    store: Box<dyn HighScoreStore>,
    events: EventQueue,
}

impl GameSession {
    /// Start a session with an OS-seeded random generator.
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        Self::with_rng(config, store, StdRng::from_os_rng())
    }

    /// Start a session whose spawns are reproducible.
    pub fn with_seed(config: GameConfig, store: Box<dyn HighScoreStore>, seed: u64) -> Self {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut store: Box<dyn HighScoreStore>, rng: StdRng) -> Self {
        let mut events = Vec::new();
        let hi_score = match store.load() {
            Ok(hi_score) => {
                info!(hi_score, location = %store.location(), "loaded high score");
                hi_score
            }
            Err(e) => {
                warn!(error = %e, "could not load high score, starting from 0");
                events.push(PresentationEvent::PersistenceFailed {
                    reason: e.to_string(),
                });
                0
            }
        };

        let mut session = GameSession {
            board: Board::new(config.board_size),
            score: ScoreTracker::new(hi_score),
            turn: TurnController::new(config.input_policy),
            outcome: None,
            message: Message::default(),
            rng,
            store,
            events,
            config,
        };
        session.restart();
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn hi_score(&self) -> u32 {
        self.score.hi_score()
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Whether the player has made the first move.
    pub fn is_running(&self) -> bool {
        self.turn.running()
    }

    /// Take every presentation event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move(direction) => {
                self.handle_direction(direction);
            }
            Command::Restart => self.restart(),
        }
    }

    /// Handle a numeric direction code. Unknown codes are ignored.
    pub fn handle_direction_code(&mut self, code: u8) -> Option<Admission> {
        match Direction::from_code(code) {
            Some(direction) => Some(self.handle_direction(direction)),
            None => {
                debug!(code, "ignoring unknown direction code");
                None
            }
        }
    }

    pub fn handle_direction(&mut self, direction: Direction) -> Admission {
        let admission = self.turn.admit(direction, self.outcome.is_some());
        match admission {
            Admission::Execute => self.execute_move(direction),
            Admission::Queued => debug!(direction = direction.name(), "queued input until turn settles"),
            Admission::Dropped => debug!(direction = direction.name(), "dropped input during turn"),
            Admission::Finished => debug!(direction = direction.name(), "game has ended, input ignored"),
        }
        admission
    }

    fn execute_move(&mut self, direction: Direction) {
        if self.turn.start() {
            self.set_message("", "");
        }

        let summary = self.board.execute_move(direction, &mut self.events);
        self.turn.set_enable_merge(summary.merges > 0);
        debug!(
            direction = direction.name(),
            moved = summary.moved,
            merges = summary.merges,
            "move executed"
        );

        // Nothing slid, so the presentation layer has nothing to animate.
        if summary.moved {
            self.turn.set_phase(TurnPhase::AwaitingMoveAnimation);
        }
    }

    /// The slide animation has finished: commit merges, spawn, check for the end.
    ///
    /// Returns false (and changes nothing) when no move was being animated.
    pub fn on_move_animation_done(&mut self) -> bool {
        if self.turn.phase() != TurnPhase::AwaitingMoveAnimation {
            debug!(phase = ?self.turn.phase(), "ignoring move-animation signal");
            return false;
        }

        if self.turn.enable_merge() {
            let gained = self.board.resolve_merges(&mut self.events);
            self.turn.set_enable_merge(false);
            self.score.add(gained);
            self.publish_score();
        }
        self.turn.set_phase(TurnPhase::Idle);

        if self.board.moved() {
            self.board.clear_moved();
            if let Err(e) = self.board.spawn_random_tile(
                self.config.spawn_max_value,
                &mut self.rng,
                &mut self.events,
            ) {
                warn!(error = %e, "no room to spawn a tile");
            }

            let end = self.board.check_game_end();
            if end.over {
                self.finish_lost();
            } else if end.won {
                self.finish_won();
            }
        }

        if self.outcome.is_some() {
            self.turn.clear_queued();
        } else if let Some(next) = self.turn.take_queued() {
            self.execute_move(next);
        }
        true
    }

    /// One tile of the game-over cascade has landed; drop the next one.
    ///
    /// Returns false (and changes nothing) outside the cascade.
    pub fn on_fall_animation_done(&mut self) -> bool {
        let TurnPhase::AwaitingFallStep { index } = self.turn.phase() else {
            debug!(phase = ?self.turn.phase(), "ignoring fall-animation signal");
            return false;
        };

        let next = index + 1;
        if self.board.start_fall(next, &mut self.events).is_some() {
            self.turn.set_phase(TurnPhase::AwaitingFallStep { index: next });
        } else {
            debug!("fall cascade finished");
            self.turn.set_phase(TurnPhase::Idle);
        }
        true
    }

    /// Clear the board and start over with two fresh tiles.
    pub fn restart(&mut self) {
        self.board.clear(&mut self.events);
        for _ in 0..START_TILES {
            if let Err(e) =
                self.board
                    .spawn_random_tile(START_TILE_VALUE, &mut self.rng, &mut self.events)
            {
                warn!(error = %e, "could not place starting tile");
            }
        }
        self.reset_turn_state();
        info!(board_size = self.board.size(), "new game");
    }

    /// Replace the board with a hand-built layout (row-major, `0` = empty).
    ///
    /// The score and message reset as on restart. On error the board is unchanged.
    pub fn load_layout(&mut self, rows: &[&[u8]]) -> Result<(), BoardError> {
        self.board.fill_rows(rows, &mut self.events)?;
        self.reset_turn_state();
        Ok(())
    }

    pub fn load_scenario(&mut self, scenario: Scenario) -> Result<(), BoardError> {
        let rows = scenario.rows();
        let rows: Vec<&[u8]> = rows.iter().map(|row| row.as_slice()).collect();
        self.load_layout(&rows)?;
        info!(scenario = scenario.name(), "loaded scenario");
        Ok(())
    }

    fn reset_turn_state(&mut self) {
        self.score.reset();
        self.publish_score();
        self.set_message("", "");
        self.turn.reset();
        self.outcome = None;
    }

    fn finish_lost(&mut self) {
        if self.score.reaches_high_score() {
            self.set_message("New High Score!", RESTART_HINT);
            self.commit_high_score();
            self.board.set_bounce_all(true, &mut self.events);
            self.outcome = Some(GameOutcome::GameOver {
                new_high_score: true,
            });
        } else {
            self.set_message("Game Over!", RESTART_HINT);
            self.outcome = Some(GameOutcome::GameOver {
                new_high_score: false,
            });
            if self.board.start_fall(0, &mut self.events).is_some() {
                self.turn.set_phase(TurnPhase::AwaitingFallStep { index: 0 });
            }
        }
        info!(score = self.score.score(), hi_score = self.score.hi_score(), "game over");
    }

    fn finish_won(&mut self) {
        self.set_message("Congratulations, you have done it!", RESTART_HINT);
        self.commit_high_score();
        self.board.set_bounce_all(true, &mut self.events);
        self.outcome = Some(GameOutcome::Won);
        info!(score = self.score.score(), "game won");
    }

    fn commit_high_score(&mut self) {
        if !self.score.commit_high_score() {
            return;
        }
        self.publish_score();
        let hi_score = self.score.hi_score();
        match self.store.save(hi_score) {
            Ok(()) => info!(hi_score, location = %self.store.location(), "saved high score"),
            Err(e) => {
                warn!(error = %e, "could not save high score");
                self.events.push(PresentationEvent::PersistenceFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn publish_score(&mut self) {
        self.events.push(PresentationEvent::ScoreChanged {
            score: self.score.score(),
            hi_score: self.score.hi_score(),
        });
    }

    fn set_message(&mut self, primary: &str, secondary: &str) {
        self.message = Message {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        };
        self.events.push(PresentationEvent::MessageChanged {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HighScoreError;
    use crate::game::{Position, MAX_TILE_VALUE};
    use crate::highscore::{JsonFileStore, MemoryStore};

    struct FailingStore;

    impl HighScoreStore for FailingStore {
        fn load(&mut self) -> Result<u32, HighScoreError> {
            Err(HighScoreError::NoHomeDir)
        }

        fn save(&mut self, _hi_score: u32) -> Result<(), HighScoreError> {
            Err(HighScoreError::NoHomeDir)
        }

        fn location(&self) -> String {
            "nowhere".to_string()
        }
    }

    fn session(hi_score: u32) -> GameSession {
        GameSession::with_seed(
            GameConfig::default(),
            Box::new(MemoryStore::new(hi_score)),
            42,
        )
    }

    fn session_with(rows: &[&[u8]], hi_score: u32, policy: InputPolicy) -> GameSession {
        let config = GameConfig {
            input_policy: policy,
            ..GameConfig::default()
        };
        let mut s = GameSession::with_seed(config, Box::new(MemoryStore::new(hi_score)), 7);
        s.load_layout(rows).unwrap();
        s.drain_events();
        s
    }

    fn count<F: Fn(&PresentationEvent) -> bool>(events: &[PresentationEvent], f: F) -> usize {
        events.iter().filter(|e| f(e)).count()
    }

    #[test]
    fn test_new_session_starts_with_two_unit_tiles() {
        let mut s = session(0);
        assert_eq!(s.board().tile_count(), 2);
        assert!(s.board().tiles().all(|t| t.value() == START_TILE_VALUE));
        assert_eq!(s.score(), 0);
        assert!(s.message().is_empty());
        assert_eq!(s.phase(), TurnPhase::Idle);
        assert!(!s.is_running());

        let events = s.drain_events();
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::TileCreated { value: 1, .. })),
            2
        );
        assert!(events.contains(&PresentationEvent::ScoreChanged {
            score: 0,
            hi_score: 0
        }));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_merge_waits_for_move_animation() {
        let mut s = session_with(
            &[&[4, 4, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::Drop,
        );

        assert_eq!(s.handle_direction(Direction::Left), Admission::Execute);
        assert!(s.is_running());
        assert_eq!(s.phase(), TurnPhase::AwaitingMoveAnimation);
        // Slid, not yet fused.
        assert_eq!(s.board().tiles_at(Position::new(0, 0)).count(), 2);
        assert_eq!(s.score(), 0);

        assert!(s.on_move_animation_done());
        assert_eq!(s.phase(), TurnPhase::Idle);
        assert_eq!(s.score(), 32);
        assert_eq!(s.board().value_at(Position::new(0, 0)), Some(5));
        // Merged pair became one tile, plus one spawn.
        assert_eq!(s.board().tile_count(), 2);
        assert!(s.board().is_settled());

        let events = s.drain_events();
        assert!(events.contains(&PresentationEvent::ScoreChanged {
            score: 32,
            hi_score: 0
        }));
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::RemovalEffect { intensity: 4, .. })),
            1
        );
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::TileCreated { .. })),
            1
        );
    }

    #[test]
    fn test_first_move_clears_message() {
        let mut s = session_with(
            &[&[0, 0, 0, 1], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::Drop,
        );
        s.handle_direction(Direction::Left);
        let events = s.drain_events();
        assert!(events.contains(&PresentationEvent::MessageChanged {
            primary: String::new(),
            secondary: String::new(),
        }));
    }

    #[test]
    fn test_noop_move_stays_idle_without_spawn() {
        let mut s = session_with(
            &[&[1, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::Drop,
        );
        assert_eq!(s.handle_direction(Direction::Left), Admission::Execute);
        assert_eq!(s.phase(), TurnPhase::Idle);
        assert!(!s.board().moved());
        assert_eq!(s.board().tile_count(), 1);
        assert!(!s.on_move_animation_done());
        assert_eq!(s.board().tile_count(), 1);
    }

    #[test]
    fn test_unknown_direction_code_is_ignored() {
        let mut s = session(0);
        s.drain_events();
        let before: Vec<_> = s.board().tiles().cloned().collect();
        assert_eq!(s.handle_direction_code(4), None);
        assert_eq!(s.handle_direction_code(200), None);
        let after: Vec<_> = s.board().tiles().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(s.phase(), TurnPhase::Idle);
        assert!(!s.is_running());
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_known_direction_code_moves() {
        let mut s = session_with(
            &[&[0, 0, 0, 1], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::Drop,
        );
        assert_eq!(s.handle_direction_code(0), Some(Admission::Execute));
        assert_eq!(s.phase(), TurnPhase::AwaitingMoveAnimation);
    }

    #[test]
    fn test_drop_policy_ignores_input_mid_turn() {
        let mut s = session_with(
            &[&[0, 0, 0, 1], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::Drop,
        );
        s.handle_direction(Direction::Left);
        assert_eq!(s.handle_direction(Direction::Down), Admission::Dropped);
        assert_eq!(s.board().value_at(Position::new(0, 0)), Some(1));
        s.on_move_animation_done();
        assert_eq!(s.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_queue_policy_runs_latest_input_after_turn() {
        let mut s = session_with(
            &[&[1, 0, 0, 1], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::QueueLatest,
        );
        s.handle_direction(Direction::Left);
        assert_eq!(s.handle_direction(Direction::Up), Admission::Queued);
        assert_eq!(s.handle_direction(Direction::Down), Admission::Queued);

        assert!(s.on_move_animation_done());
        assert_eq!(s.score(), 4);
        // The queued "down" has already started the next turn.
        assert_eq!(s.phase(), TurnPhase::AwaitingMoveAnimation);
        assert!(s.board().tiles().all(|t| t.position().y > 0 || t.position().x > 0));

        assert!(s.on_move_animation_done());
        assert_eq!(s.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_stray_signals_are_ignored() {
        let mut s = session(0);
        s.drain_events();
        assert!(!s.on_move_animation_done());
        assert!(!s.on_fall_animation_done());
        assert_eq!(s.board().tile_count(), 2);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_restart_mid_animation_discards_turn() {
        let mut s = session_with(
            &[&[4, 4, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::QueueLatest,
        );
        s.handle_direction(Direction::Left);
        s.handle_direction(Direction::Right);
        s.apply(Command::Restart);

        assert_eq!(s.phase(), TurnPhase::Idle);
        assert_eq!(s.board().tile_count(), 2);
        assert!(s.board().is_settled());
        assert!(!s.on_move_animation_done());
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session_with(
            &[&[4, 4, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::Drop,
        );
        s.handle_direction(Direction::Left);
        s.on_move_animation_done();
        assert_eq!(s.score(), 32);

        s.restart();
        assert_eq!(s.board().tile_count(), 2);
        assert!(s.board().tiles().all(|t| t.value() == 1));
        assert_eq!(s.score(), 0);
        assert!(s.message().is_empty());
        assert_eq!(s.outcome(), None);
        assert_eq!(s.hi_score(), 0);
    }

    #[test]
    fn test_game_over_with_new_high_score_bounces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.json");
        let config = GameConfig::default();
        let mut s = GameSession::with_seed(config, Box::new(JsonFileStore::new(&path, "")), 1);
        s.load_scenario(Scenario::EndGame).unwrap();
        s.drain_events();

        s.handle_direction(Direction::Right);
        assert!(s.on_move_animation_done());

        assert_eq!(
            s.outcome(),
            Some(GameOutcome::GameOver {
                new_high_score: true
            })
        );
        assert_eq!(s.message().primary, "New High Score!");
        assert_eq!(s.phase(), TurnPhase::Idle);

        let events = s.drain_events();
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::BounceEffect { enabled: true, .. })),
            16
        );
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::FallEffect { .. })),
            0
        );
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"HiScore\":0"));
    }

    #[test]
    fn test_game_over_below_high_score_runs_cascade() {
        let mut s = session(1000);
        s.load_scenario(Scenario::EndGame).unwrap();
        s.drain_events();

        s.handle_direction(Direction::Right);
        s.on_move_animation_done();
        assert_eq!(
            s.outcome(),
            Some(GameOutcome::GameOver {
                new_high_score: false
            })
        );
        assert_eq!(s.message().primary, "Game Over!");
        assert_eq!(s.phase(), TurnPhase::AwaitingFallStep { index: 0 });
        assert_eq!(s.hi_score(), 1000);

        // Directions are refused once the game has ended.
        assert_eq!(s.handle_direction(Direction::Left), Admission::Finished);

        for step in 1..16 {
            assert!(s.on_fall_animation_done());
            assert_eq!(s.phase(), TurnPhase::AwaitingFallStep { index: step });
        }
        assert!(s.on_fall_animation_done());
        assert_eq!(s.phase(), TurnPhase::Idle);
        assert!(!s.on_fall_animation_done());

        let events = s.drain_events();
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::FallEffect { enabled: true, .. })),
            16
        );
    }

    #[test]
    fn test_restart_during_cascade() {
        let mut s = session(1000);
        s.load_scenario(Scenario::EndGame).unwrap();
        s.handle_direction(Direction::Right);
        s.on_move_animation_done();
        assert!(matches!(s.phase(), TurnPhase::AwaitingFallStep { .. }));

        s.restart();
        assert_eq!(s.phase(), TurnPhase::Idle);
        assert!(!s.on_fall_animation_done());
        assert_eq!(s.handle_direction(Direction::Left), Admission::Execute);
    }

    #[test]
    fn test_reaching_max_tile_wins() {
        let mut s = session_with(
            &[&[10, 10, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            100,
            InputPolicy::Drop,
        );
        s.handle_direction(Direction::Left);
        s.on_move_animation_done();

        assert_eq!(s.outcome(), Some(GameOutcome::Won));
        assert_eq!(s.board().value_at(Position::new(0, 0)), Some(MAX_TILE_VALUE));
        assert_eq!(s.score(), 2048);
        assert_eq!(s.hi_score(), 2048);
        assert_eq!(s.message().primary, "Congratulations, you have done it!");
        assert_eq!(s.phase(), TurnPhase::Idle);
        assert_eq!(s.handle_direction(Direction::Right), Admission::Finished);

        let events = s.drain_events();
        assert!(events.contains(&PresentationEvent::ScoreChanged {
            score: 2048,
            hi_score: 2048
        }));
        assert!(count(&events, |e| matches!(e, PresentationEvent::BounceEffect { .. })) >= 2);
    }

    #[test]
    fn test_win_below_high_score_keeps_high_score() {
        let mut s = session_with(
            &[&[10, 10, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            10_000,
            InputPolicy::Drop,
        );
        s.handle_direction(Direction::Left);
        s.on_move_animation_done();
        assert_eq!(s.outcome(), Some(GameOutcome::Won));
        assert_eq!(s.hi_score(), 10_000);
    }

    #[test]
    fn test_load_failure_falls_back_to_zero() {
        let mut s = GameSession::with_seed(GameConfig::default(), Box::new(FailingStore), 3);
        assert_eq!(s.hi_score(), 0);
        let events = s.drain_events();
        assert!(matches!(
            events.first(),
            Some(PresentationEvent::PersistenceFailed { .. })
        ));
        assert_eq!(s.board().tile_count(), 2);
    }

    #[test]
    fn test_save_failure_is_reported_not_fatal() {
        let mut s = GameSession::with_seed(GameConfig::default(), Box::new(FailingStore), 3);
        s.load_scenario(Scenario::EndGame).unwrap();
        s.drain_events();
        s.handle_direction(Direction::Right);
        s.on_move_animation_done();

        assert!(matches!(s.outcome(), Some(GameOutcome::GameOver { .. })));
        let events = s.drain_events();
        assert_eq!(
            count(&events, |e| matches!(e, PresentationEvent::PersistenceFailed { .. })),
            1
        );
        s.restart();
        assert_eq!(s.board().tile_count(), 2);
    }

    #[test]
    fn test_scenario_requires_four_by_four() {
        let config = GameConfig {
            board_size: 5,
            ..GameConfig::default()
        };
        let mut s = GameSession::with_seed(config, Box::new(MemoryStore::default()), 0);
        assert!(matches!(
            s.load_scenario(Scenario::MergeShowcase),
            Err(BoardError::RowCount { .. })
        ));
        assert_eq!(s.board().tile_count(), 2);
    }

    #[test]
    fn test_rejected_layout_keeps_game_state() {
        let mut s = session_with(
            &[&[4, 4, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
            InputPolicy::Drop,
        );
        s.handle_direction(Direction::Left);
        s.on_move_animation_done();
        s.drain_events();
        let before: Vec<_> = s.board().tiles().cloned().collect();

        let result = s.load_layout(&[&[1, 12, 0, 0], &[0; 4], &[0; 4], &[0; 4]]);
        assert_eq!(result, Err(BoardError::InvalidValue(12)));

        let after: Vec<_> = s.board().tiles().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(s.score(), 32);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_larger_board_plays() {
        let config = GameConfig {
            board_size: 6,
            ..GameConfig::default()
        };
        let mut s = GameSession::with_seed(config, Box::new(MemoryStore::default()), 11);
        assert_eq!(s.board().slot_count(), 36);
        for direction in Direction::ALL.iter().cycle().take(40) {
            s.handle_direction(*direction);
            s.on_move_animation_done();
            assert!(s.board().is_settled());
            assert!(s.board().tile_count() <= 36);
        }
        assert!(s.is_running());
    }
}
