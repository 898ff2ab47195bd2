//! Terminal UI: a sprite layer that animates the engine's presentation
//! events, the board widget, and the app loop that feeds animation
//! completions back into the game session.

mod app;
pub mod board_widget;
mod game_view;
pub mod sprites;

pub use app::{key_action, App, KeyAction};
pub use sprites::{AnimationConfig, Hud, Signal, Sprite, SpriteLayer};
