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

//! Track catalog management.
//!
//! This module provides state for the full set of known tracks plus the
//! starred subset. The catalog is the single source of truth for track
//! resolution: while persisted tracks are still being loaded it serves the
//! built-in default list, so callers never need to special-case the loading
//! phase themselves.
//!
//! All mutations happen here; the playback controller only ever reads a
//! snapshot via [`Catalog::entries`].

use thiserror::Error;

use crate::model::{DEFAULT_TRACK_IDS, Track, is_card_id, unix_now};

use super::media_url;

/// User-visible rejections for catalog mutations. None of these change any
/// state; they are surfaced as status-line warnings.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum CatalogError {
    #[error("This track is already in your list")]
    Duplicate(String),

    #[error("Cannot remove default tracks")]
    RemoveDefault(String),

    #[error("Still loading your tracks, try again in a moment")]
    Loading,
}

enum CatalogState {
    Loading,
    Ready(Vec<Track>),
}

/// The full set of known tracks plus the starred subset.
pub(crate) struct Catalog {
    state: CatalogState,
    starred: Vec<String>,
    defaults: Vec<Track>,
    /// Bumped on every (re)load; stale metadata responses carrying an older
    /// generation are discarded by the event loop.
    generation: u64,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        let defaults = DEFAULT_TRACK_IDS
            .iter()
            .map(|id| Track::synthesized(id))
            .collect();

        Self {
            state: CatalogState::Loading,
            starred: Vec::new(),
            defaults,
            generation: 0,
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(self.state, CatalogState::Loading)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// The one resolution function for "what tracks exist right now".
    ///
    /// While persisted tracks are still loading this is the default list, so
    /// track selection always has something to operate over.
    pub(crate) fn entries(&self) -> &[Track] {
        match &self.state {
            CatalogState::Loading => &self.defaults,
            CatalogState::Ready(tracks) => tracks,
        }
    }

    pub(crate) fn first_default_id(&self) -> &str {
        DEFAULT_TRACK_IDS[0]
    }

    pub(crate) fn is_default(&self, id: &str) -> bool {
        DEFAULT_TRACK_IDS.contains(&id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.entries().iter().any(|t| t.id == id)
    }

    pub(crate) fn track(&self, id: &str) -> Option<&Track> {
        self.entries().iter().find(|t| t.id == id)
    }

    pub(crate) fn is_starred(&self, id: &str) -> bool {
        self.starred.iter().any(|s| s == id)
    }

    pub(crate) fn starred(&self) -> &[String] {
        &self.starred
    }

    /// Tracks in the starred subset, in catalog order. Stray starred
    /// identifiers that no longer resolve to a track are filtered out here
    /// rather than validated at star time.
    pub(crate) fn starred_tracks(&self) -> Vec<&Track> {
        self.entries()
            .iter()
            .filter(|t| self.is_starred(&t.id))
            .collect()
    }

    /// The user-added (non-default) subset, which is the only part that gets
    /// persisted.
    pub(crate) fn user_tracks(&self) -> Vec<Track> {
        self.entries()
            .iter()
            .filter(|t| !self.is_default(&t.id))
            .cloned()
            .collect()
    }

    /// Completes loading by merging persisted user tracks with the
    /// synthesized defaults.
    ///
    /// User tracks come first and shadow any default sharing their
    /// identifier, so user edits win.
    pub(crate) fn finish_load(&mut self, user_tracks: Vec<Track>, starred: Vec<String>) {
        let mut tracks = user_tracks;
        for default in &self.defaults {
            if !tracks.iter().any(|t| t.id == default.id) {
                tracks.push(default.clone());
            }
        }

        self.state = CatalogState::Ready(tracks);
        self.starred = starred;
        self.generation += 1;
    }

    /// Adds a track from raw user input, either a bare identifier or a full
    /// share URL.
    ///
    /// Returns the canonical identifier of the appended track.
    pub(crate) fn add(&mut self, raw: &str) -> Result<String, CatalogError> {
        let id = extract_track_id(raw);

        let CatalogState::Ready(tracks) = &mut self.state else {
            return Err(CatalogError::Loading);
        };

        if tracks.iter().any(|t| t.id == id) {
            return Err(CatalogError::Duplicate(id));
        }

        let track = if is_card_id(&id) {
            Track {
                id: id.clone(),
                title: id.clone(),
                author: String::new(),
                thumbnail: String::new(),
                card_url: Some(media_url(&id)),
                starred: false,
                added_on: unix_now(),
            }
        } else {
            Track::synthesized(&id)
        };

        tracks.push(track);

        Ok(id)
    }

    /// Removes a user-added track from both the track list and the starred
    /// set. Default tracks cannot be removed.
    pub(crate) fn remove(&mut self, id: &str) -> Result<(), CatalogError> {
        if self.is_default(id) {
            return Err(CatalogError::RemoveDefault(id.to_string()));
        }

        let CatalogState::Ready(tracks) = &mut self.state else {
            return Err(CatalogError::Loading);
        };

        tracks.retain(|t| t.id != id);
        self.starred.retain(|s| s != id);

        Ok(())
    }

    /// Flips starred membership for an identifier.
    ///
    /// Starring an identifier the catalog does not know about is accepted;
    /// the stray entry is invisible to every reader because the starred view
    /// filters through the track list.
    pub(crate) fn toggle_star(&mut self, id: &str) {
        if let Some(pos) = self.starred.iter().position(|s| s == id) {
            self.starred.remove(pos);
        } else {
            self.starred.push(id.to_string());
        }
    }

    /// Replaces the track list wholesale, bypassing the default merge.
    #[cfg(test)]
    pub(crate) fn set_entries_for_test(&mut self, tracks: Vec<Track>) {
        self.state = CatalogState::Ready(tracks);
        self.generation += 1;
    }

    /// Merges resolved metadata into matching tracks. Unknown identifiers
    /// are ignored, so a response for a since-removed track is harmless.
    pub(crate) fn apply_metadata(&mut self, items: Vec<crate::metadata::TrackMeta>) {
        let CatalogState::Ready(tracks) = &mut self.state else {
            return;
        };

        for item in items {
            if let Some(track) = tracks.iter_mut().find(|t| t.id == item.id) {
                track.title = item.title;
                track.author = item.author;
                if !item.thumbnail.is_empty() {
                    track.thumbnail = item.thumbnail;
                }
                if item.card_url.is_some() {
                    track.card_url = item.card_url;
                }
            }
        }
    }
}

/// Extracts the canonical track identifier from raw user input.
///
/// Accepts a bare identifier, a `youtube.com/watch?v=` URL, or a `youtu.be/`
/// short URL; the identifier ends at the first `&`, `?`, `#`, or whitespace.
/// Embed-card share URLs pass through whole, as the full URL is their
/// identifier.
pub(crate) fn extract_track_id(raw: &str) -> String {
    let trimmed = raw.trim();

    if is_card_id(trimmed) {
        return trimmed.to_string();
    }

    let after_marker = ["youtube.com/watch?v=", "youtu.be/"]
        .iter()
        .find_map(|marker| {
            trimmed
                .find(marker)
                .map(|pos| &trimmed[pos + marker.len()..])
        });

    match after_marker {
        Some(rest) => rest
            .split(['&', '?', '#'])
            .next()
            .unwrap_or(rest)
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.finish_load(vec![], vec![]);
        catalog
    }

    #[test]
    fn loading_catalog_serves_defaults() {
        let catalog = Catalog::new();
        assert!(catalog.is_loading());
        let ids: Vec<&str> = catalog.entries().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, DEFAULT_TRACK_IDS);
    }

    #[test]
    fn user_tracks_shadow_defaults_on_load() {
        let mut catalog = Catalog::new();
        let mut edited = Track::synthesized(DEFAULT_TRACK_IDS[0]);
        edited.title = "My title".to_string();
        catalog.finish_load(vec![edited], vec![]);

        let entries = catalog.entries();
        assert_eq!(entries.len(), DEFAULT_TRACK_IDS.len());
        assert_eq!(entries[0].title, "My title");
        assert_eq!(
            entries
                .iter()
                .filter(|t| t.id == DEFAULT_TRACK_IDS[0])
                .count(),
            1
        );
    }

    #[test]
    fn add_rejects_duplicates_without_state_change() {
        let mut catalog = loaded_catalog();
        catalog.add("videoId123").unwrap();
        let count_before = catalog.entries().len();

        let err = catalog.add("videoId123").unwrap_err();
        assert_eq!(err, CatalogError::Duplicate("videoId123".to_string()));
        assert_eq!(catalog.entries().len(), count_before);
        assert_eq!(
            catalog
                .entries()
                .iter()
                .filter(|t| t.id == "videoId123")
                .count(),
            1
        );
    }

    #[test]
    fn add_extracts_identifier_from_share_url() {
        let mut catalog = loaded_catalog();
        let id = catalog.add("https://youtu.be/xyz987&t=5").unwrap();
        assert_eq!(id, "xyz987");
        assert!(catalog.contains("xyz987"));
    }

    #[test]
    fn add_keeps_card_urls_whole() {
        let mut catalog = loaded_catalog();
        let url = "https://open.spotify.com/track/4uLU6hMC";
        let id = catalog.add(url).unwrap();
        assert_eq!(id, url);
        assert!(catalog.track(url).unwrap().card_url.is_some());
    }

    #[test]
    fn remove_rejects_default_tracks() {
        let mut catalog = loaded_catalog();
        catalog.toggle_star(DEFAULT_TRACK_IDS[0]);
        let count_before = catalog.entries().len();
        let starred_before = catalog.starred().to_vec();

        let err = catalog.remove(DEFAULT_TRACK_IDS[0]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::RemoveDefault(DEFAULT_TRACK_IDS[0].to_string())
        );
        assert_eq!(catalog.entries().len(), count_before);
        assert_eq!(catalog.starred(), starred_before);
    }

    #[test]
    fn remove_drops_track_and_star() {
        let mut catalog = loaded_catalog();
        catalog.add("gone42").unwrap();
        catalog.toggle_star("gone42");

        catalog.remove("gone42").unwrap();
        assert!(!catalog.contains("gone42"));
        assert!(!catalog.is_starred("gone42"));
    }

    #[test]
    fn toggle_star_twice_restores_membership() {
        let mut catalog = loaded_catalog();
        let before = catalog.starred().to_vec();

        catalog.toggle_star(DEFAULT_TRACK_IDS[1]);
        assert!(catalog.is_starred(DEFAULT_TRACK_IDS[1]));

        catalog.toggle_star(DEFAULT_TRACK_IDS[1]);
        assert_eq!(catalog.starred(), before);
    }

    #[test]
    fn stray_starred_identifier_is_invisible() {
        let mut catalog = loaded_catalog();
        catalog.toggle_star("never-added");
        assert!(catalog.starred_tracks().is_empty());
    }

    #[test]
    fn extract_handles_watch_urls() {
        assert_eq!(
            extract_track_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(extract_track_id("  bare-id  "), "bare-id");
        assert_eq!(extract_track_id("https://youtu.be/xyz987&t=5"), "xyz987");
    }

    #[test]
    fn apply_metadata_updates_matching_tracks_only() {
        let mut catalog = loaded_catalog();
        catalog.add("meta1").unwrap();

        catalog.apply_metadata(vec![
            crate::metadata::TrackMeta {
                id: "meta1".to_string(),
                title: "Real Title".to_string(),
                author: "Real Author".to_string(),
                thumbnail: String::new(),
                card_url: None,
            },
            crate::metadata::TrackMeta {
                id: "unknown".to_string(),
                title: "Ignored".to_string(),
                author: String::new(),
                thumbnail: String::new(),
                card_url: None,
            },
        ]);

        let track = catalog.track("meta1").unwrap();
        assert_eq!(track.title, "Real Title");
        assert_eq!(track.author, "Real Author");
        // Placeholder thumbnail survives an empty enrichment value.
        assert!(track.thumbnail.contains("meta1"));
    }
}
