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

//! Playlist popup state.
//!
//! This module coordinates the playlist popup: three tabs (all tracks, the
//! starred subset, and a free-text add form), a list cursor, and the text
//! input used to paste a new identifier or share URL. Input handling lives
//! in [`event`], rendering in [`render`].

mod event;
mod render;

use tui_input::Input;

use crate::model::{Track, catalog::Catalog};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlaylistTab {
    All,
    Starred,
    Add,
}

/// Actions the popup hands back to the event loop for application-level
/// handling (catalog mutation, activation, persistence).
#[derive(Debug, PartialEq)]
pub(crate) enum PlaylistAction {
    Activate(String),
    ToggleStar(String),
    Remove(String),
    Add(String),
    Close,
}

pub(crate) struct PlaylistView {
    pub(crate) tab: PlaylistTab,
    pub(crate) selected: usize,
    pub(crate) input: Input,
}

impl PlaylistView {
    pub(crate) fn new() -> Self {
        Self {
            tab: PlaylistTab::All,
            selected: 0,
            input: Input::default(),
        }
    }

    /// Tracks visible under the current tab, in catalog order.
    pub(crate) fn visible_tracks<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Track> {
        match self.tab {
            PlaylistTab::Starred => catalog.starred_tracks(),
            _ => catalog.entries().iter().collect(),
        }
    }

    /// The track currently under the cursor, if any.
    pub(crate) fn selected_track<'a>(&self, catalog: &'a Catalog) -> Option<&'a Track> {
        let tracks = self.visible_tracks(catalog);
        tracks.get(self.selected.min(tracks.len().saturating_sub(1))).copied()
    }

    fn clamp_selection(&mut self, catalog: &Catalog) {
        let count = self.visible_tracks(catalog).len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }
}
