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

//! Render the player bar.
//!
//! Visual representation of the current track, playback status, progress and
//! volume. The bar has a full layout and a compact single-line layout driven
//! by the cosmetic compact-controls flag.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    render::icons::{ICON_BUFFERING, ICON_PAUSE, ICON_PLAY},
    util,
};

/// Renders the main player widget including track info and controls.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.controller.state.compact_controls {
        draw_compact(f, inner_area, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[0]);

    f.render_widget(Paragraph::new(track_line(app)), info_chunks[0]);
    f.render_widget(
        Paragraph::new(time_line(app)).alignment(Alignment::Right),
        info_chunks[1],
    );

    let control_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(chunks[2]);

    draw_volume(f, control_chunks[1], app);

    let position = app.controller.progress().unwrap_or(0.0);
    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(position)
        .label("")
        .use_unicode(true);
    f.render_widget(position_gauge, chunks[4]);
}

fn draw_compact(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(18),
            Constraint::Length(26),
        ])
        .split(area);

    f.render_widget(Paragraph::new(track_line(app)), chunks[0]);
    f.render_widget(
        Paragraph::new(time_line(app)).alignment(Alignment::Right),
        chunks[1],
    );
    draw_volume(f, chunks[2], app);
}

fn track_line(app: &App) -> Line<'static> {
    let state = &app.controller.state;
    let icon = if state.is_buffering {
        ICON_BUFFERING
    } else if state.is_playing {
        ICON_PLAY
    } else {
        ICON_PAUSE
    };

    let track = app.catalog.track(&state.active_track);
    let title = track
        .map(|t| t.title.clone())
        .unwrap_or_else(|| state.active_track.clone());
    let author = track.map(|t| t.author.clone()).unwrap_or_default();

    let mut spans = vec![
        Span::styled(
            format!(" {} ", icon),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(Color::White),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD))
            .fg(app.theme.accent_colour),
    ];

    if !author.is_empty() {
        spans.push(Span::raw(" by "));
        spans.push(
            Span::styled(author, Style::default().add_modifier(Modifier::BOLD))
                .fg(app.theme.accent_colour),
        );
    }

    Line::from(spans)
}

fn time_line(app: &App) -> Line<'static> {
    let time = app.controller.state.current_time.max(0.0) as u64;
    let duration = app.controller.state.duration.max(0.0) as u64;

    Line::from(vec![
        Span::styled(
            util::format::format_time(time),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
        Span::styled(" / ", Style::default()).fg(Color::White),
        Span::styled(
            util::format::format_time(duration),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
    ])
}

fn draw_volume(f: &mut Frame, area: Rect, app: &App) {
    let volume = app.controller.state.volume.clamp(0, 100);
    let ratio = volume as f64 / 100.0;

    let volume_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(ratio)
        .label("")
        .use_unicode(true);
    f.render_widget(gauge, volume_layout[0]);

    let label = Paragraph::new(format!(" {}%", volume))
        .alignment(Alignment::Right)
        .fg(Color::White);
    f.render_widget(label, volume_layout[1]);
}
