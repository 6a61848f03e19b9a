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

//! Remote metadata enrichment.
//!
//! This module resolves display metadata (title, author, thumbnail) for
//! track identifiers through public oEmbed endpoints: plain video
//! identifiers through the YouTube endpoint, embed-card share URLs through
//! the Spotify endpoint (which additionally yields the embeddable iframe
//! URL).
//!
//! Everything here is best-effort. The command worker hands each batch to a
//! short-lived lookup thread, a failed lookup simply drops out of the batch,
//! and the UI keeps showing the raw identifier as the title. Neither
//! playback nor persistence ever waits on any of this.

use anyhow::Result;

use crate::model::is_card_id;

/// Resolved display metadata for one identifier.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackMeta {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) thumbnail: String,
    pub(crate) card_url: Option<String>,
}

/// Resolves a batch of identifiers, skipping any that fail.
pub(crate) fn lookup_batch(agent: &ureq::Agent, ids: &[String]) -> Vec<TrackMeta> {
    ids.iter()
        .filter_map(|id| {
            if is_card_id(id) {
                lookup_card(agent, id).ok()
            } else {
                lookup_video(agent, id).ok()
            }
        })
        .collect()
}

/// Resolves a plain video identifier through the YouTube oEmbed endpoint.
fn lookup_video(agent: &ureq::Agent, id: &str) -> Result<TrackMeta> {
    let url = format!(
        "https://www.youtube.com/oembed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3D{}&format=json",
        id
    );
    let body: serde_json::Value = agent.get(&url).call()?.into_json()?;

    Ok(meta_from_oembed(id, &body))
}

/// Resolves an embed-card share URL through the Spotify oEmbed endpoint.
fn lookup_card(agent: &ureq::Agent, share_url: &str) -> Result<TrackMeta> {
    let url = format!("https://open.spotify.com/oembed?url={}", share_url);
    let body: serde_json::Value = agent.get(&url).call()?.into_json()?;

    Ok(meta_from_oembed(share_url, &body))
}

/// Maps an oEmbed response body onto a [`TrackMeta`], tolerating missing
/// fields. An absent title degrades to the raw identifier.
fn meta_from_oembed(id: &str, body: &serde_json::Value) -> TrackMeta {
    let field = |name: &str| {
        body.get(name)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let title = field("title");
    let author = field("author_name");
    let provider = field("provider_name");
    let card_url = body
        .get("iframe_url")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    TrackMeta {
        id: id.to_string(),
        title: if title.is_empty() { id.to_string() } else { title },
        author: if author.is_empty() { provider } else { author },
        thumbnail: field("thumbnail_url"),
        card_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oembed_body_maps_to_meta() {
        let body = serde_json::json!({
            "title": "Some Song",
            "author_name": "Some Channel",
            "thumbnail_url": "https://example.com/t.jpg",
        });

        let meta = meta_from_oembed("abc", &body);
        assert_eq!(meta.title, "Some Song");
        assert_eq!(meta.author, "Some Channel");
        assert_eq!(meta.thumbnail, "https://example.com/t.jpg");
        assert_eq!(meta.card_url, None);
    }

    #[test]
    fn card_responses_carry_the_iframe_url() {
        let body = serde_json::json!({
            "title": "Card Track",
            "provider_name": "Spotify",
            "thumbnail_url": "https://example.com/c.jpg",
            "iframe_url": "https://open.spotify.com/embed/track/1",
        });

        let meta = meta_from_oembed("https://open.spotify.com/track/1", &body);
        assert_eq!(meta.author, "Spotify");
        assert_eq!(
            meta.card_url.as_deref(),
            Some("https://open.spotify.com/embed/track/1")
        );
    }

    #[test]
    fn missing_fields_degrade_to_the_identifier() {
        let body = serde_json::json!({});
        let meta = meta_from_oembed("fallback-id", &body);
        assert_eq!(meta.title, "fallback-id");
        assert_eq!(meta.author, "");
        assert_eq!(meta.thumbnail, "");
    }
}
