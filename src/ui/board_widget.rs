use std::time::Instant;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::sprites::SpriteLayer;
use crate::game::Position;

pub const CELL_WIDTH: usize = 8;
pub const CELL_HEIGHT: usize = 3;

/// What one board cell looks like at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellView {
    pub tile: Option<TileView>,
    pub spark: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileView {
    pub value: u8,
    pub bounce_up: bool,
    pub falling: bool,
}

/// Resolve sprites and sparks into a `size`×`size` grid indexed `[y][x]`.
pub fn cell_grid(layer: &SpriteLayer, size: usize, now: Instant) -> Vec<Vec<CellView>> {
    let mut grid = vec![vec![CellView::default(); size]; size];

    for (_, sprite) in layer.sprites() {
        if sprite.hidden {
            continue;
        }
        let Position { x, y } = sprite.shown;
        if x >= size || y >= size {
            continue;
        }
        let view = TileView {
            value: sprite.value,
            bounce_up: layer.bounce_up(sprite, now),
            falling: sprite.is_falling(),
        };
        // The larger of two tiles sharing a cell is the one that stays.
        let cell = &mut grid[y][x];
        if cell.tile.map_or(true, |t| t.value <= view.value) {
            cell.tile = Some(view);
        }
    }

    for spark in layer.sparks() {
        let Position { x, y } = spark.position;
        if x < size && y < size {
            let cell = &mut grid[y][x];
            cell.spark = Some(cell.spark.unwrap_or(0).max(spark.intensity));
        }
    }

    grid
}

fn tile_colors(value: u8) -> (Color, Color) {
    match value {
        1 => (Color::Black, Color::Rgb(238, 228, 218)),
        2 => (Color::Black, Color::Rgb(237, 224, 200)),
        3 => (Color::White, Color::Rgb(242, 177, 121)),
        4 => (Color::White, Color::Rgb(245, 149, 99)),
        5 => (Color::White, Color::Rgb(246, 124, 95)),
        6 => (Color::White, Color::Rgb(246, 94, 59)),
        7 => (Color::White, Color::Rgb(237, 207, 114)),
        8 => (Color::White, Color::Rgb(237, 204, 97)),
        9 => (Color::White, Color::Rgb(237, 200, 80)),
        10 => (Color::White, Color::Rgb(237, 197, 63)),
        _ => (Color::White, Color::Rgb(237, 194, 46)),
    }
}

fn cell_style(cell: &CellView) -> Style {
    match cell.tile {
        None => Style::default().bg(Color::Rgb(205, 193, 180)),
        Some(tile) => {
            let (fg, bg) = tile_colors(tile.value);
            let mut style = Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD);
            if tile.bounce_up {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if tile.falling {
                style = style.add_modifier(Modifier::DIM);
            }
            style
        }
    }
}

/// Text of row `line` (0..CELL_HEIGHT) inside a cell.
fn cell_text(cell: &CellView, line: usize) -> String {
    let middle = CELL_HEIGHT / 2;
    let text = match (cell.tile, cell.spark) {
        (Some(tile), _) if line == middle => (1u32 << tile.value).to_string(),
        (Some(tile), _) if tile.falling && line == CELL_HEIGHT - 1 => "v".to_string(),
        (_, Some(intensity)) if line != middle => "*".repeat(usize::from(intensity).clamp(1, 5)),
        (None, Some(_)) => "*".to_string(),
        _ => String::new(),
    };
    format!("{:^width$}", text, width = CELL_WIDTH)
}

/// Render the board grid centered in `area`.
pub fn render_board(frame: &mut Frame, layer: &SpriteLayer, size: usize, now: Instant, area: Rect) {
    let grid = cell_grid(layer, size, now);
    let gap = Style::default().bg(Color::Rgb(187, 173, 160));
    let blank_row = " ".repeat(size * (CELL_WIDTH + 1) + 1);

    let mut lines = vec![Line::from(Span::styled(blank_row.clone(), gap))];
    for row in &grid {
        for line in 0..CELL_HEIGHT {
            let mut spans = vec![Span::styled(" ", gap)];
            for cell in row {
                spans.push(Span::styled(cell_text(cell, line), cell_style(cell)));
                spans.push(Span::styled(" ", gap));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(Span::styled(blank_row.clone(), gap)));
    }

    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// Height in terminal rows of a rendered board.
pub fn board_height(size: usize) -> u16 {
    u16::try_from(size * (CELL_HEIGHT + 1) + 1).unwrap_or(u16::MAX)
}
