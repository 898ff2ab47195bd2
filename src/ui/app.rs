use std::io;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::debug;

use super::sprites::{AnimationConfig, Signal, SpriteLayer};
use crate::game::{Command, Direction, GameSession};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(Command),
    Quit,
}

/// Arrow keys, WASD and HJKL move; `r` restarts; `q`/Esc quits.
pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    let direction = match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Direction::Left,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Direction::Up,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Direction::Right,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Direction::Down,
        KeyCode::Char('r') | KeyCode::Char('R') => return Some(KeyAction::Game(Command::Restart)),
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyAction::Quit),
        _ => return None,
    };
    Some(KeyAction::Game(Command::Move(direction)))
}

/// Couples a [`GameSession`] to the sprite layer: engine events go to the
/// sprites, finished animations go back to the engine as completion signals.
pub struct App {
    session: GameSession,
    layer: SpriteLayer,
    should_quit: bool,
}

impl App {
    pub fn new(session: GameSession, animation: AnimationConfig) -> Self {
        let now = Instant::now();
        let mut app = App {
            session,
            layer: SpriteLayer::new(animation, now),
            should_quit: false,
        };
        app.pump(now);
        app
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn layer(&self) -> &SpriteLayer {
        &self.layer
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let board_size = self.session.board().size();
        loop {
            let now = Instant::now();
            self.pump(now);
            terminal.draw(|f| super::game_view::render(f, &self.layer, board_size, now))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Move engine events into the sprite layer and deliver every completion
    /// signal that is due at `now`.
    pub fn pump(&mut self, now: Instant) {
        self.layer.apply_all(self.session.drain_events(), now);
        loop {
            let signals = self.layer.tick(now);
            if signals.is_empty() {
                break;
            }
            for signal in signals {
                let accepted = match signal {
                    Signal::MoveDone => self.session.on_move_animation_done(),
                    Signal::FallDone => self.session.on_fall_animation_done(),
                };
                debug!(?signal, accepted, "delivered animation signal");
            }
            self.layer.apply_all(self.session.drain_events(), now);
        }
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.layer.config().frame())? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key_action(key.code) {
            Some(KeyAction::Quit) => self.should_quit = true,
            Some(KeyAction::Game(command)) => self.session.apply(command),
            None => {}
        }
    }
}
