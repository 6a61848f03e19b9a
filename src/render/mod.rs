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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event. The frame is split into a now-playing pane, the
//! player bar, and a status line; the playlist popup and the celebration
//! overlay draw on top when open.

pub(crate) mod icons;
mod overlay;
mod player;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Style, Stylize},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{App, render::player::draw_player};

/// Renders the user interface to the terminal frame.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let player_height = if app.controller.state.compact_controls {
        3
    } else {
        7
    };

    // Outer layout: now playing, player bar, status line
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(player_height),
            Constraint::Length(1),
        ])
        .split(area);

    draw_now_playing(f, outer[0], app);
    draw_player(f, outer[1], app);
    draw_status(f, outer[2], app);

    if app.controller.state.show_playlist {
        let active_id = app.controller.state.active_track.clone();
        app.playlist_view
            .draw(f, outer[0], &app.catalog, &active_id, &app.theme);
    }

    if app.overlay.visible {
        overlay::draw_overlay(
            f,
            area,
            &app.overlay,
            &app.config.celebration_name,
            &app.theme,
        );
    }
}

fn draw_now_playing(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::uniform(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let track = app.catalog.track(&app.controller.state.active_track);

    let title = track
        .map(|t| t.title.clone())
        .unwrap_or_else(|| app.controller.state.active_track.clone());
    let author = track.map(|t| t.author.clone()).unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .fg(app.theme.accent_colour)
            .bold(),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(author)
            .alignment(Alignment::Center)
            .fg(app.theme.muted_fg),
        chunks[2],
    );
}

fn draw_status(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let text = if let Some((message, _)) = &app.status {
        message.clone()
    } else if !app.adapter_ready {
        "Starting playback engine...".to_string()
    } else if app.controller.state.is_playing && app.controller.state.is_buffering {
        "Buffering...".to_string()
    } else if !app.controller.state.is_playing {
        "Press space to play, l for playlist, b to celebrate, q to quit".to_string()
    } else {
        String::new()
    };

    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(app.theme.muted_fg)),
        area,
    );
}
