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

//! Local persistence layer.
//!
//! This module handles all interactions with the SQLite database, a single
//! key-value table with last-write-wins semantics. It is owned by the
//! command worker thread; the UI thread never touches the connection.
//!
//! # Keys
//!
//! * `addedSongs` - JSON array of user-added track records (non-default only).
//! * `starred`    - JSON array of starred identifiers.
//! * `activeSong` - plain string identifier of the active track.
//! * `volume`     - JSON-encoded integer, 0 to 100.
//!
//! Read or parse failures on any key degrade to the empty/default value;
//! they are never surfaced to the user.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{DEFAULT_VOLUME, Track};

const KEY_ADDED_TRACKS: &str = "addedSongs";
const KEY_STARRED: &str = "starred";
const KEY_ACTIVE_TRACK: &str = "activeSong";
const KEY_VOLUME: &str = "volume";

/// Handle to the key-value store backing playlist, starred, active-track and
/// volume state.
pub(crate) struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the store at the given path and configures the
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be opened, the PRAGMA
    /// configuration fails, or the schema cannot be created.
    pub(crate) fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store at {}", path))?;

        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
        if journal_mode != "wal" {
            anyhow::bail!(
                "Failed to switch to WAL mode. Current mode: {}",
                journal_mode
            );
        }

        Self::with_connection(conn)
    }

    // In-memory databases cannot use WAL, so the journal pragma is skipped.
    pub(crate) fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("Failed to create store schema")?;

        conn.set_prepared_statement_cache_capacity(16);

        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
        let value = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        )?;
        stmt.execute(params![key, value])?;
        Ok(())
    }

    /// Loads the persisted user-added tracks. Missing or unparseable data is
    /// an empty list.
    pub(crate) fn load_added_tracks(&self) -> Vec<Track> {
        self.get(KEY_ADDED_TRACKS)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub(crate) fn save_added_tracks(&self, tracks: &[Track]) -> Result<()> {
        let json = serde_json::to_string(tracks)?;
        self.set(KEY_ADDED_TRACKS, &json)
    }

    pub(crate) fn load_starred(&self) -> Vec<String> {
        self.get(KEY_STARRED)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub(crate) fn save_starred(&self, starred: &[String]) -> Result<()> {
        let json = serde_json::to_string(starred)?;
        self.set(KEY_STARRED, &json)
    }

    /// The active track identifier is stored as a plain string, not JSON.
    pub(crate) fn load_active_track(&self) -> Option<String> {
        self.get(KEY_ACTIVE_TRACK)
            .ok()
            .flatten()
            .filter(|id| !id.is_empty())
    }

    pub(crate) fn save_active_track(&self, id: &str) -> Result<()> {
        self.set(KEY_ACTIVE_TRACK, id)
    }

    pub(crate) fn load_volume(&self) -> i64 {
        self.get(KEY_VOLUME)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str::<i64>(&raw).ok())
            .map(|v| v.clamp(0, 100))
            .unwrap_or(DEFAULT_VOLUME)
    }

    pub(crate) fn save_volume(&self, volume: i64) -> Result<()> {
        let json = serde_json::to_string(&volume.clamp(0, 100))?;
        self.set(KEY_VOLUME, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_degrade_to_defaults() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load_added_tracks().is_empty());
        assert!(store.load_starred().is_empty());
        assert_eq!(store.load_active_track(), None);
        assert_eq!(store.load_volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn corrupt_values_degrade_to_defaults() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_ADDED_TRACKS, "{not json").unwrap();
        store.set(KEY_STARRED, "also not json").unwrap();
        store.set(KEY_VOLUME, "\"NaN\"").unwrap();

        assert!(store.load_added_tracks().is_empty());
        assert!(store.load_starred().is_empty());
        assert_eq!(store.load_volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn added_tracks_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let tracks = vec![Track::synthesized("one"), Track::synthesized("two")];
        store.save_added_tracks(&tracks).unwrap();
        assert_eq!(store.load_added_tracks(), tracks);
    }

    #[test]
    fn starred_round_trips_as_json_array() {
        let store = Store::open_in_memory().unwrap();
        store
            .save_starred(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(store.load_starred(), vec!["a", "b"]);
    }

    #[test]
    fn active_track_is_a_plain_string() {
        let store = Store::open_in_memory().unwrap();
        store.save_active_track("xyz987").unwrap();
        assert_eq!(store.get(KEY_ACTIVE_TRACK).unwrap().unwrap(), "xyz987");
        assert_eq!(store.load_active_track(), Some("xyz987".to_string()));
    }

    #[test]
    fn volume_round_trips_and_clamps() {
        let store = Store::open_in_memory().unwrap();
        store.save_volume(37).unwrap();
        assert_eq!(store.load_volume(), 37);

        store.save_volume(250).unwrap();
        assert_eq!(store.load_volume(), 100);
    }

    #[test]
    fn last_write_wins() {
        let store = Store::open_in_memory().unwrap();
        store.save_active_track("first").unwrap();
        store.save_active_track("second").unwrap();
        assert_eq!(store.load_active_track(), Some("second".to_string()));
    }
}
