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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application, primarily the
//! [`Track`] record describing a single playable playlist entry, and the
//! built-in default track list the player falls back to when nothing has
//! been persisted yet.

pub(crate) mod catalog;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// The built-in track identifiers every installation starts with.
///
/// These are synthesized into full [`Track`] records at load time and are
/// never persisted; user-added tracks with a colliding identifier shadow the
/// corresponding default.
pub(crate) const DEFAULT_TRACK_IDS: [&str; 5] = [
    "jfKfPfyJRdk",
    "5qap5aO4i9A",
    "DWcJFNfaw9c",
    "lTRiuFIWV54",
    "4xDzrJKXOOY",
];

pub(crate) const DEFAULT_VOLUME: i64 = 50;

/// A single playable playlist entry.
///
/// The identifier is the unique key within the catalog: either a bare video
/// identifier or, for embed-card sources, a full share URL. The serialized
/// field names match the on-disk record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Track {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(rename = "channelTitle", default)]
    pub(crate) author: String,
    #[serde(default)]
    pub(crate) thumbnail: String,
    /// Alternate embed source, present only for embed-card tracks.
    #[serde(rename = "iframeUrl", default, skip_serializing_if = "Option::is_none")]
    pub(crate) card_url: Option<String>,
    #[serde(default)]
    pub(crate) starred: bool,
    /// Unix timestamp (seconds) of when the track was added.
    #[serde(rename = "addedOn", default)]
    pub(crate) added_on: i64,
}

impl Track {
    /// Synthesizes a placeholder record for an identifier.
    ///
    /// The title and author are stand-ins until metadata enrichment resolves
    /// the real values; enrichment failure simply leaves them in place.
    pub(crate) fn synthesized(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Video {}", id),
            author: "YouTube".to_string(),
            thumbnail: format!("https://img.youtube.com/vi/{}/default.jpg", id),
            card_url: None,
            starred: false,
            added_on: unix_now(),
        }
    }
}

pub(crate) fn is_card_id(id: &str) -> bool {
    id.contains("open.spotify.com")
}

/// Resolves a track identifier to a URL the playback engine can load.
///
/// Full URLs (embed-card sources) pass through untouched; bare identifiers
/// are expanded to a watch URL.
pub(crate) fn media_url(id: &str) -> String {
    if id.starts_with("http://") || id.starts_with("https://") {
        id.to_string()
    } else {
        format!("https://www.youtube.com/watch?v={}", id)
    }
}

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_track_uses_placeholder_metadata() {
        let track = Track::synthesized("abc123");
        assert_eq!(track.id, "abc123");
        assert_eq!(track.title, "Video abc123");
        assert_eq!(track.author, "YouTube");
        assert!(track.thumbnail.contains("abc123"));
        assert!(!track.starred);
    }

    #[test]
    fn media_url_expands_bare_identifiers() {
        assert_eq!(
            media_url("xyz987"),
            "https://www.youtube.com/watch?v=xyz987"
        );
    }

    #[test]
    fn media_url_passes_full_urls_through() {
        let url = "https://open.spotify.com/track/123";
        assert_eq!(media_url(url), url);
    }

    #[test]
    fn track_round_trips_through_json() {
        let track = Track::synthesized("roundtrip");
        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(track, back);
    }
}
