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

//! UI rendering logic for the playlist popup.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};

use crate::{
    components::playlist::{PlaylistTab, PlaylistView},
    model::catalog::Catalog,
    render::icons::{ICON_ACTIVE, ICON_STAR},
    theme::Theme,
};

impl PlaylistView {
    pub(crate) fn draw(
        &mut self,
        f: &mut Frame,
        area: Rect,
        catalog: &Catalog,
        active_id: &str,
        theme: &Theme,
    ) {
        let popup = centered_rect(area, 70, 70);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_colour))
            .padding(Padding::horizontal(1))
            .title(" Playlist ");
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        self.draw_tabs(f, chunks[0], catalog, theme);

        if self.tab == PlaylistTab::Add {
            self.draw_add_form(f, chunks[1], theme);
        } else {
            self.draw_track_list(f, chunks[1], catalog, active_id, theme);
        }
    }

    fn draw_tabs(&self, f: &mut Frame, area: Rect, catalog: &Catalog, theme: &Theme) {
        let tab = |label: &str, current: PlaylistTab| {
            let style = if self.tab == current {
                Style::default()
                    .fg(theme.accent_colour)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted_fg)
            };
            Span::styled(format!(" {} ", label), style)
        };

        let line = Line::from(vec![
            tab("1:All", PlaylistTab::All),
            tab("2:Starred", PlaylistTab::Starred),
            tab("3:Add", PlaylistTab::Add),
            Span::styled(
                format!("   {} tracks", catalog.entries().len()),
                Style::default().fg(theme.muted_fg),
            ),
        ]);

        let header = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border_colour)),
        );
        f.render_widget(header, area);
    }

    fn draw_track_list(
        &mut self,
        f: &mut Frame,
        area: Rect,
        catalog: &Catalog,
        active_id: &str,
        theme: &Theme,
    ) {
        let tracks = self.visible_tracks(catalog);

        if tracks.is_empty() {
            let hint = if self.tab == PlaylistTab::Starred {
                "Nothing starred yet, press s on a track to star it"
            } else {
                "No tracks"
            };
            f.render_widget(
                Paragraph::new(hint).fg(theme.muted_fg),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = tracks
            .iter()
            .map(|track| {
                let marker = if track.id == active_id {
                    Span::styled(
                        format!("{} ", ICON_ACTIVE),
                        Style::default().fg(theme.accent_colour),
                    )
                } else {
                    Span::raw("  ")
                };
                let star = if catalog.is_starred(&track.id) {
                    Span::styled(
                        format!("{} ", ICON_STAR),
                        Style::default().fg(theme.star_fg),
                    )
                } else {
                    Span::raw("  ")
                };
                let author = if track.author.is_empty() {
                    String::new()
                } else {
                    format!("  {}", track.author)
                };

                ListItem::new(Line::from(vec![
                    marker,
                    star,
                    Span::styled(
                        track.title.clone(),
                        Style::default().fg(theme.list_track_fg),
                    ),
                    Span::styled(author, Style::default().fg(theme.muted_fg)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.gauge_track_colour)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected.min(tracks.len() - 1)));

        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_add_form(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new("Paste a video URL or identifier, Enter to add")
                .fg(theme.muted_fg),
            chunks[0],
        );

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent_colour));
        let input_area = input_block.inner(chunks[1]);
        f.render_widget(input_block, chunks[1]);

        let scroll = self.input.visual_scroll(input_area.width.max(1) as usize);
        f.render_widget(
            Paragraph::new(self.input.value()).scroll((0, scroll as u16)),
            input_area,
        );
        f.set_cursor_position((
            input_area.x + (self.input.visual_cursor().saturating_sub(scroll)) as u16,
            input_area.y,
        ));
    }
}

/// Centers a popup rectangle covering the given percentages of the area.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
