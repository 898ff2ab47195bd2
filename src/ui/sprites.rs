use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::game::{Position, PresentationEvent, TileId, MAX_TILE_VALUE};

/// Animation timings for the terminal presentation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Redraw interval.
    pub frame_ms: u64,
    /// Time a sliding tile spends on each cell it crosses.
    pub move_step_ms: u64,
    pub fall_ms: u64,
    pub bounce_period_ms: u64,
    /// Spark lifetime for the smallest removed tile.
    pub spark_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            frame_ms: 16,
            move_step_ms: 45,
            fall_ms: 140,
            bounce_period_ms: 600,
            spark_ms: 350,
        }
    }
}

impl AnimationConfig {
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn move_step(&self) -> Duration {
        Duration::from_millis(self.move_step_ms)
    }

    pub fn fall(&self) -> Duration {
        Duration::from_millis(self.fall_ms)
    }

    /// Sparks from bigger tiles linger longer, up to twice `spark_ms`.
    pub fn spark_lifetime(&self, intensity: u8) -> Duration {
        let intensity = u64::from(intensity.min(MAX_TILE_VALUE));
        let max = u64::from(MAX_TILE_VALUE);
        Duration::from_millis(self.spark_ms * (max + intensity) / max)
    }
}

/// Completion signals owed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    MoveDone,
    FallDone,
}

/// Visual state of one tile.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub value: u8,
    /// Cell the sprite is currently drawn in.
    pub shown: Position,
    /// Cell the sprite is sliding towards.
    pub target: Position,
    pub bouncing: bool,
    pub hidden: bool,
    last_step: Instant,
    fall_started: Option<Instant>,
}

impl Sprite {
    pub fn is_settled(&self) -> bool {
        self.shown == self.target
    }

    pub fn is_falling(&self) -> bool {
        self.fall_started.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Spark {
    pub position: Position,
    pub intensity: u8,
    expires: Instant,
}

/// Score and message lines shown around the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub hi_score: u32,
    pub primary: String,
    pub secondary: String,
    pub warning: Option<String>,
}

/// Applies presentation events to per-tile sprites and advances their
/// animations, reporting when the engine's completion signals are due.
#[derive(Debug)]
pub struct SpriteLayer {
    config: AnimationConfig,
    epoch: Instant,
    sprites: BTreeMap<TileId, Sprite>,
    sparks: Vec<Spark>,
    hud: Hud,
    move_pending: bool,
    falling: Option<TileId>,
}

impl SpriteLayer {
    pub fn new(config: AnimationConfig, now: Instant) -> Self {
        SpriteLayer {
            config,
            epoch: now,
            sprites: BTreeMap::new(),
            sparks: Vec::new(),
            hud: Hud::default(),
            move_pending: false,
            falling: None,
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn sprites(&self) -> impl Iterator<Item = (TileId, &Sprite)> {
        self.sprites.iter().map(|(id, sprite)| (*id, sprite))
    }

    pub fn sprite(&self, id: TileId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Whether a slide or fall is still in progress.
    pub fn is_animating(&self) -> bool {
        self.move_pending || self.falling.is_some()
    }

    pub fn apply_all(&mut self, events: Vec<PresentationEvent>, now: Instant) {
        for event in events {
            self.apply(event, now);
        }
    }

    pub fn apply(&mut self, event: PresentationEvent, now: Instant) {
        match event {
            PresentationEvent::TileCreated {
                id,
                value,
                position,
            } => {
                self.sprites.insert(
                    id,
                    Sprite {
                        value,
                        shown: position,
                        target: position,
                        bouncing: false,
                        hidden: false,
                        last_step: now,
                        fall_started: None,
                    },
                );
            }
            PresentationEvent::TileDestroyed { id } => {
                self.sprites.remove(&id);
                if self.falling == Some(id) {
                    self.falling = None;
                }
            }
            PresentationEvent::TileMoved { id, position } => {
                if let Some(sprite) = self.sprites.get_mut(&id) {
                    sprite.target = position;
                    sprite.last_step = now;
                    self.move_pending = true;
                }
            }
            PresentationEvent::TileValueChanged { id, value } => {
                if let Some(sprite) = self.sprites.get_mut(&id) {
                    sprite.value = value;
                }
            }
            PresentationEvent::BounceEffect { id, enabled } => {
                if let Some(sprite) = self.sprites.get_mut(&id) {
                    sprite.bouncing = enabled;
                }
            }
            PresentationEvent::FallEffect { id, enabled } => {
                if let Some(sprite) = self.sprites.get_mut(&id) {
                    if enabled {
                        sprite.fall_started = Some(now);
                        self.falling = Some(id);
                    } else {
                        sprite.fall_started = None;
                    }
                }
            }
            PresentationEvent::RemovalEffect {
                position,
                intensity,
            } => {
                self.sparks.push(Spark {
                    position,
                    intensity,
                    expires: now + self.config.spark_lifetime(intensity),
                });
            }
            PresentationEvent::ScoreChanged { score, hi_score } => {
                self.hud.score = score;
                self.hud.hi_score = hi_score;
            }
            PresentationEvent::MessageChanged { primary, secondary } => {
                self.hud.primary = primary;
                self.hud.secondary = secondary;
            }
            PresentationEvent::PersistenceFailed { reason } => {
                self.hud.warning = Some(reason);
            }
        }
    }

    /// Advance every animation to `now` and return the signals that became due.
    pub fn tick(&mut self, now: Instant) -> Vec<Signal> {
        let mut signals = Vec::new();
        let step = self.config.move_step();

        for sprite in self.sprites.values_mut() {
            while !sprite.is_settled() && now.saturating_duration_since(sprite.last_step) >= step {
                sprite.shown = step_toward(sprite.shown, sprite.target);
                sprite.last_step += step;
            }
        }
        if self.move_pending && self.sprites.values().all(Sprite::is_settled) {
            self.move_pending = false;
            signals.push(Signal::MoveDone);
        }

        if let Some(id) = self.falling {
            let fall = self.config.fall();
            match self.sprites.get_mut(&id) {
                Some(sprite) => {
                    let landed = sprite
                        .fall_started
                        .is_some_and(|start| now.saturating_duration_since(start) >= fall);
                    if landed {
                        sprite.fall_started = None;
                        sprite.hidden = true;
                        self.falling = None;
                        signals.push(Signal::FallDone);
                    }
                }
                None => self.falling = None,
            }
        }

        self.sparks.retain(|spark| spark.expires > now);
        signals
    }

    /// Fraction of the fall completed, `None` when the sprite is not falling.
    pub fn fall_progress(&self, sprite: &Sprite, now: Instant) -> Option<f32> {
        let start = sprite.fall_started?;
        let elapsed = now.saturating_duration_since(start).as_secs_f32();
        let total = self.config.fall().as_secs_f32().max(f32::EPSILON);
        Some((elapsed / total).min(1.0))
    }

    /// Which half of the bounce period a bouncing sprite is in.
    pub fn bounce_up(&self, sprite: &Sprite, now: Instant) -> bool {
        if !sprite.bouncing {
            return false;
        }
        let period = u128::from(self.config.bounce_period_ms.max(1));
        let elapsed = now.saturating_duration_since(self.epoch).as_millis();
        (elapsed / period) % 2 == 0
    }
}

fn step_toward(from: Position, to: Position) -> Position {
    fn step(a: usize, b: usize) -> usize {
        match a.cmp(&b) {
            Ordering::Less => a + 1,
            Ordering::Greater => a - 1,
            Ordering::Equal => a,
        }
    }
    Position::new(step(from.x, to.x), step(from.y, to.y))
}
