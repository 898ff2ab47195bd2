//! # Tile Fusion
//!
//! A 2048-style sliding tile puzzle. The engine resolves moves and merges
//! on a board of exponent-valued tiles and sequences each turn around
//! animation-completion signals from whatever presents it. Ships with a
//! terminal UI built with Ratatui and a headless autoplay runner.
//!
//! ## Modules
//!
//! - [`game`]: Board, move/merge resolution, turn state machine, session
//! - [`highscore`]: High-score persistence (JSON record or in-memory)
//! - [`autoplay`]: Random mover and headless game runner
//! - [`ui`]: Terminal UI: sprite animation layer, board widget, app loop
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: File-based tracing setup
//! - [`error`]: Structured error types

pub mod autoplay;
pub mod config;
pub mod error;
pub mod game;
pub mod highscore;
pub mod logging;
pub mod ui;
