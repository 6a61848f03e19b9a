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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging user input (keyboard), background worker updates (store,
//! metadata, playback engine), and the UI rendering pipeline.
//!
//! # Architecture
//!
//! 1. **Capture**: Events arrive as [`AppEvent`]s through the application
//!    channel.
//! 2. **Process**: [`process_events`] updates the catalog, the playback
//!    controller, and the overlay, and dispatches commands to the background
//!    workers.
//! 3. **Render**: After each event the UI is re-drawn.
//!
//! Asynchronous callbacks never act on captured state: every handler reads
//! the live catalog and controller fields at processing time, so an event
//! queued before the catalog finished loading still sees the loaded catalog.

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    actions::commands::AppCommand,
    components::PlaylistAction,
    metadata::TrackMeta,
    model::Track,
    player::{AdapterControl, AdapterState, AudioPlayer},
    render::draw,
};

const VOLUME_DELTA: i64 = 5;
const FINE_VOLUME_DELTA: i64 = 1;

const FINE_SEEK_DELTA: f64 = 5.0;
const SEEK_DELTA: f64 = 20.0;

/// Seconds between UI ticks; also the animation step for the overlay.
pub(crate) const TICK_SECS: f64 = 0.25;

/// How many ticks a status-line message stays visible.
const STATUS_TICKS: u8 = 16;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    /// Persisted state snapshot from the store worker.
    CatalogLoaded {
        tracks: Vec<Track>,
        starred: Vec<String>,
        active_track: Option<String>,
        volume: i64,
    },
    MetadataResolved {
        generation: u64,
        items: Vec<TrackMeta>,
    },

    /// The playback engine finished constructing.
    AdapterReady,
    AdapterStateChanged(AdapterState),
    TimeChanged(f64),
    DurationChanged(f64),
    VolumeChanged(i64),

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI.
///
/// Loops until an exit event is received or the event channel is closed.
///
/// # Errors
///
/// Returns an error if a background worker reports a fatal failure or a
/// command channel closes unexpectedly.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,

            AppEvent::CatalogLoaded {
                tracks,
                starred,
                active_track,
                volume,
            } => {
                app.catalog.finish_load(tracks, starred);
                app.controller.restore(active_track, volume, &app.catalog);

                let ids: Vec<String> = app
                    .catalog
                    .entries()
                    .iter()
                    .map(|t| t.id.clone())
                    .collect();
                app.command_tx.send(AppCommand::FetchMetadata {
                    generation: app.catalog.generation(),
                    ids,
                })?;

                maybe_start_playback(app)?;
            }

            AppEvent::MetadataResolved { generation, items } => {
                // A response from before the last catalog (re)load is stale;
                // dropping it keeps late arrivals from clobbering anything.
                if generation == app.catalog.generation() {
                    app.catalog.apply_metadata(items);
                }
            }

            AppEvent::AdapterReady => {
                app.adapter_ready = true;
                maybe_start_playback(app)?;
            }

            AppEvent::AdapterStateChanged(code) => {
                app.controller.on_adapter_state_change(
                    code,
                    &app.catalog,
                    adapter_ref(app.adapter_ready, &app.audio_player),
                )?;
            }

            AppEvent::TimeChanged(seconds) => app.controller.record_time(seconds),
            AppEvent::DurationChanged(seconds) => app.controller.record_duration(seconds),
            AppEvent::VolumeChanged(volume) => app.controller.record_volume(volume),

            AppEvent::Tick => {
                app.overlay.advance(TICK_SECS, &mut rand::rng());

                if let Some((_, ticks)) = &mut app.status {
                    *ticks = ticks.saturating_sub(1);
                    if *ticks == 0 {
                        app.status = None;
                    }
                }
            }

            AppEvent::Error(message) => set_status(app, message),
            AppEvent::FatalError(message) => return Err(anyhow!(message)),

            AppEvent::ExitApplication => unreachable!(),
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

fn adapter_ref(ready: bool, player: &AudioPlayer) -> Option<&dyn AdapterControl> {
    ready.then_some(player as &dyn AdapterControl)
}

/// Kicks off playback once both the engine and the persisted catalog are in.
fn maybe_start_playback(app: &mut App) -> Result<()> {
    if app.adapter_ready && !app.catalog.is_loading() && !app.playback_started {
        app.playback_started = true;
        app.controller.start(&app.audio_player)?;
    }
    Ok(())
}

fn set_status(app: &mut App, message: String) {
    app.status = Some((message, STATUS_TICKS));
}

/// Maps keyboard input to playback, playlist, and overlay actions.
///
/// The celebration overlay and the playlist popup each take priority over
/// the global bindings while open; the two are mutually exclusive.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.overlay.visible {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Enter => app.overlay.close(),
            KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,
            _ => {}
        }
        return Ok(());
    }

    if app.controller.state.show_playlist {
        if let Some(action) = app.playlist_view.process_key(key, &app.catalog) {
            apply_playlist_action(app, action)?;
        }
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        // Playback controls
        (KeyCode::Char(' '), _) => {
            app.controller
                .toggle_play_pause(adapter_ref(app.adapter_ready, &app.audio_player))?;
        }
        (KeyCode::Char('n'), _) | (KeyCode::Right, _) => {
            app.controller.select_next(
                &app.catalog,
                adapter_ref(app.adapter_ready, &app.audio_player),
            )?;
        }
        (KeyCode::Char('p'), _) | (KeyCode::Left, _) => {
            app.controller.select_previous(
                &app.catalog,
                adapter_ref(app.adapter_ready, &app.audio_player),
            )?;
        }

        (KeyCode::Char(','), _) => seek_by(app, -FINE_SEEK_DELTA)?,
        (KeyCode::Char('.'), _) => seek_by(app, FINE_SEEK_DELTA)?,
        (KeyCode::Char('<'), _) => seek_by(app, -SEEK_DELTA)?,
        (KeyCode::Char('>'), _) => seek_by(app, SEEK_DELTA)?,

        (KeyCode::Char('-'), _) => adjust_volume(app, -FINE_VOLUME_DELTA)?,
        (KeyCode::Char('='), _) => adjust_volume(app, FINE_VOLUME_DELTA)?,
        (KeyCode::Char('_'), _) => adjust_volume(app, -VOLUME_DELTA)?,
        (KeyCode::Char('+'), _) => adjust_volume(app, VOLUME_DELTA)?,

        // Views
        (KeyCode::Char('l'), _) => {
            app.controller.state.show_playlist = !app.controller.state.show_playlist;
            app.overlay.close();
        }
        (KeyCode::Char('b'), _) => {
            app.overlay.toggle(&mut rand::rng());
            app.controller.state.show_playlist = false;
        }
        (KeyCode::Char('c'), _) => {
            app.controller.state.compact_controls = !app.controller.state.compact_controls;
        }

        _ => {}
    }

    Ok(())
}

fn seek_by(app: &mut App, delta: f64) -> Result<()> {
    app.controller
        .seek_by(delta, adapter_ref(app.adapter_ready, &app.audio_player))
}

fn adjust_volume(app: &mut App, delta: i64) -> Result<()> {
    app.controller
        .adjust_volume(delta, adapter_ref(app.adapter_ready, &app.audio_player))
}

/// Applies a playlist popup action to the catalog and controller, persisting
/// whatever changed.
fn apply_playlist_action(app: &mut App, action: PlaylistAction) -> Result<()> {
    match action {
        PlaylistAction::Close => {
            app.controller.state.show_playlist = false;
        }

        PlaylistAction::Activate(id) => {
            app.controller
                .activate_track(&id, adapter_ref(app.adapter_ready, &app.audio_player))?;
        }

        PlaylistAction::ToggleStar(id) => {
            app.catalog.toggle_star(&id);
            app.command_tx
                .send(AppCommand::SaveStarred(app.catalog.starred().to_vec()))?;
        }

        PlaylistAction::Remove(id) => match app.catalog.remove(&id) {
            Ok(()) => {
                app.command_tx
                    .send(AppCommand::SaveAddedTracks(app.catalog.user_tracks()))?;
                app.command_tx
                    .send(AppCommand::SaveStarred(app.catalog.starred().to_vec()))?;
            }
            Err(e) => set_status(app, e.to_string()),
        },

        PlaylistAction::Add(raw) => match app.catalog.add(&raw) {
            Ok(id) => {
                app.command_tx
                    .send(AppCommand::SaveAddedTracks(app.catalog.user_tracks()))?;
                app.command_tx.send(AppCommand::FetchMetadata {
                    generation: app.catalog.generation(),
                    ids: vec![id],
                })?;
                set_status(app, "Track added".to_string());
            }
            Err(e) => set_status(app, e.to_string()),
        },
    }

    Ok(())
}
