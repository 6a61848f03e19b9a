// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Render the celebration overlay.
//!
//! Balloons and confetti are tracked in screen fractions, so drawing is a
//! matter of scaling each sprite into the current terminal area and painting
//! it cell by cell. The message sequence and finale are centred paragraphs
//! whose styling follows the fade intensity of the animation state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    overlay::{CelebrationOverlay, Intensity},
    render::icons::{BALLOON_SPRITES, ICON_CONFETTI},
    theme::Theme,
};

const CONFETTI_PALETTE: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::LightBlue,
];

const BALLOON_PALETTE: [Color; 3] = [Color::LightRed, Color::LightYellow, Color::LightMagenta];

pub(crate) fn draw_overlay(
    f: &mut Frame,
    area: Rect,
    overlay: &CelebrationOverlay,
    celebration_name: &str,
    theme: &Theme,
) {
    f.render_widget(Clear, area);
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_colour)),
        area,
    );

    draw_balloons(f, area, overlay);
    draw_particles(f, area, overlay);

    if let Some((text, intensity)) = overlay.message() {
        draw_message(f, area, text, intensity, theme);
    }

    if let Some(intensity) = overlay.finale() {
        draw_finale(f, area, celebration_name, intensity, theme);
    }
}

fn draw_balloons(f: &mut Frame, area: Rect, overlay: &CelebrationOverlay) {
    for balloon in overlay.balloons() {
        let Some((x, y)) = cell_at(area, balloon.x, balloon.y) else {
            continue;
        };
        let sprite = BALLOON_SPRITES[balloon.sprite % BALLOON_SPRITES.len()];
        let colour = BALLOON_PALETTE[balloon.sprite % BALLOON_PALETTE.len()];
        let cell = Rect::new(x, y, 1, 1);
        f.render_widget(Paragraph::new(sprite).fg(colour), cell);
    }
}

fn draw_particles(f: &mut Frame, area: Rect, overlay: &CelebrationOverlay) {
    for particle in overlay.particles() {
        let Some((x, y)) = cell_at(area, particle.x, particle.y) else {
            continue;
        };
        let colour = CONFETTI_PALETTE[particle.hue % CONFETTI_PALETTE.len()];
        let cell = Rect::new(x, y, 1, 1);
        f.render_widget(Paragraph::new(ICON_CONFETTI).fg(colour), cell);
    }
}

/// Maps a screen-fraction coordinate to a terminal cell, or `None` when the
/// point lies outside the visible area.
fn cell_at(area: Rect, fx: f64, fy: f64) -> Option<(u16, u16)> {
    if !(0.0..1.0).contains(&fx) || !(0.0..1.0).contains(&fy) {
        return None;
    }
    let x = area.x + (fx * area.width as f64) as u16;
    let y = area.y + (fy * area.height as f64) as u16;
    if x >= area.x + area.width || y >= area.y + area.height {
        return None;
    }
    Some((x, y))
}

fn draw_message(f: &mut Frame, area: Rect, text: &str, intensity: Intensity, theme: &Theme) {
    let style = match intensity {
        Intensity::Faint => Style::default().fg(theme.muted_fg),
        Intensity::Rising => Style::default().fg(Color::White),
        Intensity::Bright => Style::default()
            .fg(theme.accent_colour)
            .add_modifier(Modifier::BOLD),
    };

    let line_area = vertical_band(area, 1);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
            .alignment(Alignment::Center),
        line_area,
    );
}

fn draw_finale(
    f: &mut Frame,
    area: Rect,
    celebration_name: &str,
    intensity: Intensity,
    theme: &Theme,
) {
    let title_style = match intensity {
        Intensity::Faint => Style::default().fg(theme.muted_fg),
        Intensity::Rising => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        Intensity::Bright => Style::default()
            .fg(theme.accent_colour)
            .add_modifier(Modifier::BOLD),
    };

    let band = vertical_band(area, 5);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(band);

    let title = format!("Happy Birthday {}!", celebration_name);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(title, title_style))).alignment(Alignment::Center),
        chunks[0],
    );

    let card_width = 40.min(area.width);
    let card_area = Rect::new(
        area.x + (area.width.saturating_sub(card_width)) / 2,
        chunks[2].y,
        card_width,
        chunks[2].height.min(3),
    );
    let card = Paragraph::new("Wishing you a wonderful year ahead")
        .alignment(Alignment::Center)
        .fg(Color::White)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent_colour)),
        );
    f.render_widget(card, card_area);
}

/// A horizontally full, vertically centred band of the given height.
fn vertical_band(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x, y, area.width, height)
}
