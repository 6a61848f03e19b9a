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

//! Input routing for the playlist popup.
//!
//! Keys are interpreted against the active tab: the list tabs navigate and
//! act on the selected track, while the add tab delegates everything except
//! submission and tab switches to the managed text input.

use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::backend::crossterm::EventHandler;

use crate::{
    components::playlist::{PlaylistAction, PlaylistTab, PlaylistView},
    model::catalog::Catalog,
};

impl PlaylistView {
    /// Processes a key while the popup is open, returning the resulting
    /// application-level action, if any.
    pub(crate) fn process_key(
        &mut self,
        key: KeyEvent,
        catalog: &Catalog,
    ) -> Option<PlaylistAction> {
        if self.tab == PlaylistTab::Add {
            return self.process_add_key(key);
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('l') => Some(PlaylistAction::Close),

            KeyCode::Tab => {
                self.tab = match self.tab {
                    PlaylistTab::All => PlaylistTab::Starred,
                    PlaylistTab::Starred => PlaylistTab::Add,
                    PlaylistTab::Add => PlaylistTab::All,
                };
                self.selected = 0;
                None
            }
            KeyCode::Char('1') => {
                self.tab = PlaylistTab::All;
                self.selected = 0;
                None
            }
            KeyCode::Char('2') => {
                self.tab = PlaylistTab::Starred;
                self.selected = 0;
                None
            }
            KeyCode::Char('3') | KeyCode::Char('a') => {
                self.tab = PlaylistTab::Add;
                None
            }

            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = self.selected.saturating_add(1);
                self.clamp_selection(catalog);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }

            KeyCode::Enter => self
                .selected_track(catalog)
                .map(|t| PlaylistAction::Activate(t.id.clone())),

            KeyCode::Char('s') => self
                .selected_track(catalog)
                .map(|t| PlaylistAction::ToggleStar(t.id.clone())),

            KeyCode::Char('x') | KeyCode::Delete => self
                .selected_track(catalog)
                .map(|t| PlaylistAction::Remove(t.id.clone())),

            _ => None,
        }
    }

    fn process_add_key(&mut self, key: KeyEvent) -> Option<PlaylistAction> {
        match key.code {
            KeyCode::Esc => {
                self.input.reset();
                self.tab = PlaylistTab::All;
                None
            }
            KeyCode::Tab => {
                self.tab = PlaylistTab::All;
                self.selected = 0;
                None
            }
            KeyCode::Enter => {
                let raw = self.input.value().trim().to_string();
                if raw.is_empty() {
                    return None;
                }
                self.input.reset();
                self.tab = PlaylistTab::All;
                Some(PlaylistAction::Add(raw))
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;
    use crate::model::Track;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn catalog_of(ids: &[&str]) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.set_entries_for_test(ids.iter().map(|id| Track::synthesized(id)).collect());
        catalog
    }

    #[test]
    fn enter_activates_the_selected_track() {
        let catalog = catalog_of(&["A", "B", "C"]);
        let mut view = PlaylistView::new();

        view.process_key(key(KeyCode::Down), &catalog);
        let action = view.process_key(key(KeyCode::Enter), &catalog);
        assert_eq!(action, Some(PlaylistAction::Activate("B".to_string())));
    }

    #[test]
    fn selection_clamps_to_the_list_end() {
        let catalog = catalog_of(&["A", "B"]);
        let mut view = PlaylistView::new();

        for _ in 0..10 {
            view.process_key(key(KeyCode::Down), &catalog);
        }
        assert_eq!(view.selected, 1);

        view.process_key(key(KeyCode::Up), &catalog);
        assert_eq!(view.selected, 0);
        view.process_key(key(KeyCode::Up), &catalog);
        assert_eq!(view.selected, 0);
    }

    #[test]
    fn starred_tab_acts_on_the_filtered_list() {
        let mut catalog = catalog_of(&["A", "B", "C"]);
        catalog.toggle_star("C");
        let mut view = PlaylistView::new();

        view.process_key(key(KeyCode::Char('2')), &catalog);
        let action = view.process_key(key(KeyCode::Enter), &catalog);
        assert_eq!(action, Some(PlaylistAction::Activate("C".to_string())));
    }

    #[test]
    fn add_tab_collects_text_and_submits_on_enter() {
        let catalog = catalog_of(&["A"]);
        let mut view = PlaylistView::new();

        view.process_key(key(KeyCode::Char('3')), &catalog);
        for c in "xyz987".chars() {
            view.process_key(key(KeyCode::Char(c)), &catalog);
        }
        let action = view.process_key(key(KeyCode::Enter), &catalog);

        assert_eq!(action, Some(PlaylistAction::Add("xyz987".to_string())));
        assert_eq!(view.tab, PlaylistTab::All);
        assert!(view.input.value().is_empty());
    }

    #[test]
    fn add_tab_ignores_empty_submissions() {
        let catalog = catalog_of(&["A"]);
        let mut view = PlaylistView::new();

        view.process_key(key(KeyCode::Char('3')), &catalog);
        let action = view.process_key(key(KeyCode::Enter), &catalog);
        assert_eq!(action, None);
        assert_eq!(view.tab, PlaylistTab::Add);
    }

    #[test]
    fn escape_closes_the_popup_from_list_tabs() {
        let catalog = catalog_of(&["A"]);
        let mut view = PlaylistView::new();
        assert_eq!(
            view.process_key(key(KeyCode::Esc), &catalog),
            Some(PlaylistAction::Close)
        );
    }

    #[test]
    fn remove_and_star_target_the_selection() {
        let catalog = catalog_of(&["A", "B"]);
        let mut view = PlaylistView::new();
        view.process_key(key(KeyCode::Down), &catalog);

        assert_eq!(
            view.process_key(key(KeyCode::Char('s')), &catalog),
            Some(PlaylistAction::ToggleStar("B".to_string()))
        );
        assert_eq!(
            view.process_key(key(KeyCode::Char('x')), &catalog),
            Some(PlaylistAction::Remove("B".to_string()))
        );
    }
}
