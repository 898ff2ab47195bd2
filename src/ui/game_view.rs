use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::board_widget;
use super::sprites::{Hud, SpriteLayer};

pub fn render(frame: &mut Frame, layer: &SpriteLayer, board_size: usize, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                    // Header
            Constraint::Min(board_widget::board_height(board_size)), // Board
            Constraint::Length(5),                                    // Message
            Constraint::Length(3),                                    // Controls
        ])
        .split(frame.area());

    render_header(frame, layer.hud(), chunks[0]);
    board_widget::render_board(frame, layer, board_size, now, chunks[1]);
    render_message(frame, layer.hud(), chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, hud: &Hud, area: Rect) {
    let status = Line::from(vec![
        Span::raw("Score: "),
        Span::styled(
            hud.score.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Hi Score: "),
        Span::styled(
            hud.hi_score.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ]);

    let header = Paragraph::new(status)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Tile Fusion"));

    frame.render_widget(header, area);
}

fn render_message(frame: &mut Frame, hud: &Hud, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            hud.primary.as_str(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(hud.secondary.as_str()),
    ];
    if let Some(warning) = &hud.warning {
        lines.push(Line::from(Span::styled(
            warning_text(warning),
            Style::default().fg(Color::Red),
        )));
    }

    let message = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(message, area);
}

/// Load and save failures both surface here.
fn warning_text(warning: &str) -> String {
    format!("high score storage: {warning}")
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from("Arrows/WASD/HJKL: Move  |  R: Restart  |  Q: Quit");
    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
