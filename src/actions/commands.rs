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

//! Asynchronous application command processing.
//!
//! This module implements the command pattern used to offload blocking work
//! from the main UI thread: all store reads and writes, and the best-effort
//! oEmbed metadata lookups. A dedicated worker loop translates [`AppCommand`]
//! requests into store and network operations and broadcasts the results
//! back to the application via [`AppEvent`]s.
//!
//! The worker owns the store connection; it is never touched from the UI
//! thread. Metadata lookups are handed off to their own short-lived thread
//! so a slow network can never hold up persistence writes queued behind a
//! lookup batch.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
    time::Duration,
};

use anyhow::Result;

use crate::{
    actions::events::AppEvent,
    config::AppConfig,
    metadata,
    model::Track,
    store::Store,
};

#[derive(Debug)]
pub(crate) enum AppCommand {
    /// Read all persisted state and broadcast it as one snapshot.
    LoadCatalog,
    SaveAddedTracks(Vec<Track>),
    SaveStarred(Vec<String>),
    SaveActiveTrack(String),
    SaveVolume(i64),
    /// Resolve display metadata for a batch of identifiers. The generation
    /// lets the UI discard responses that arrive after a catalog reload.
    FetchMetadata { generation: u64, ids: Vec<String> },
}

/// Spawns the background worker thread that processes application commands.
///
/// The worker opens its own store connection; if that fails the error is
/// broadcast as a fatal event and the worker exits.
pub(crate) fn spawn_command_worker(
    config: &AppConfig,
    store_path: String,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let store = match Store::open(&store_path) {
            Ok(store) => store,
            Err(e) => {
                let _ = event_tx.send(AppEvent::FatalError(format!(
                    "Failed to open store: {:?}",
                    e
                )));
                return;
            }
        };

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        while let Ok(command) = command_rx.recv() {
            if let Err(e) = handle_command(&config, &store, &agent, command, &event_tx) {
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
    });
}

/// Executes a single command and sends the result back through the
/// application event channel.
fn handle_command(
    config: &AppConfig,
    store: &Store,
    agent: &ureq::Agent,
    command: AppCommand,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    match command {
        AppCommand::LoadCatalog => {
            event_tx.send(AppEvent::CatalogLoaded {
                tracks: store.load_added_tracks(),
                starred: store.load_starred(),
                active_track: store.load_active_track(),
                volume: store.load_volume(),
            })?;
        }
        AppCommand::SaveAddedTracks(tracks) => {
            store.save_added_tracks(&tracks)?;
        }
        AppCommand::SaveStarred(starred) => {
            store.save_starred(&starred)?;
        }
        AppCommand::SaveActiveTrack(id) => {
            store.save_active_track(&id)?;
        }
        AppCommand::SaveVolume(volume) => {
            store.save_volume(volume)?;
        }
        AppCommand::FetchMetadata { generation, ids } => {
            if config.metadata_lookup && !ids.is_empty() {
                // Lookups block on the network for up to the agent timeout
                // per id, so they run apart from the persistence queue.
                let agent = agent.clone();
                let event_tx = event_tx.clone();
                thread::spawn(move || {
                    let items = metadata::lookup_batch(&agent, &ids);
                    if !items.is_empty() {
                        let _ = event_tx.send(AppEvent::MetadataResolved { generation, items });
                    }
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, sync::mpsc, time::Duration};

    use super::*;

    // Persistence writes queued after a metadata batch must not wait on the
    // network: a save sent right behind a lookup has to land promptly.
    #[test]
    fn saves_are_not_queued_behind_metadata_lookups() {
        let path = env::temp_dir().join(format!("partoui-worker-{}.db", std::process::id()));
        let path_str = path.to_string_lossy().into_owned();

        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        spawn_command_worker(&AppConfig::default(), path_str, command_rx, event_tx);

        command_tx
            .send(AppCommand::FetchMetadata {
                generation: 1,
                ids: vec!["one".to_string(), "two".to_string(), "three".to_string()],
            })
            .unwrap();
        command_tx.send(AppCommand::SaveVolume(37)).unwrap();
        command_tx.send(AppCommand::LoadCatalog).unwrap();

        let volume = loop {
            match event_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                AppEvent::CatalogLoaded { volume, .. } => break volume,
                _ => {}
            }
        };
        assert_eq!(volume, 37);

        drop(command_tx);
        for suffix in ["", "-wal", "-shm"] {
            fs::remove_file(format!("{}{}", path.to_string_lossy(), suffix)).ok();
        }
    }
}
