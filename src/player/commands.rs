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

//! MPV-backed playback engine and event processing.
//!
//! This module bridges the application's command-based interface and the
//! low-level MPV property observation system on a dedicated worker thread.
//!
//! # Architecture
//!
//! 1. **Command Channel**: Receives [`PlayerCommand`]s to control playback
//!    (load, play, pause, volume, seek).
//! 2. **Event Channel**: Broadcasts [`AppEvent`]s for engine readiness,
//!    status-code transitions, and progress updates.
//!
//! Tracks are externally hosted, so the engine is configured without video
//! output and loads stream URLs rather than local files.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use crate::{
    actions::events::AppEvent,
    player::{AdapterState, AudioPlayer},
};

#[derive(Debug)]
pub(crate) enum PlayerCommand {
    Load(String),
    Play,
    Pause,
    SetVolume(i64),
    SeekTo(f64),
}

/// Spawns the engine worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and broadcast
/// as a fatal application event.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<PlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the playback engine backend.
///
/// Initializes a local MPV context, announces readiness, and then alternates
/// between draining pending commands and polling engine events.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the event
/// channel closes while an event is being broadcast.
fn player_worker(command_rx: Receiver<PlayerCommand>, event_tx: Sender<AppEvent>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<f64>("volume", 0)
        .context("Failed to observe volume")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;
    handler
        .observe_property::<bool>("paused-for-cache", 0)
        .context("Failed to observe paused-for-cache")?;

    // The engine exists from here on; playback operations are meaningful.
    event_tx
        .send(AppEvent::AdapterReady)
        .context("Failed to send ready event")?;

    let mut is_paused = false;
    let mut is_idle = true;
    let mut is_buffering = false;

    let mut current_state = AdapterState::Unstarted;

    loop {
        process_commands(&mut handler, &command_rx)?;
        process_engine_events(
            &mut handler,
            &mut is_paused,
            &mut is_idle,
            &mut is_buffering,
            &mut current_state,
            &event_tx,
        )?;
    }
}

/// Drains and executes all pending commands from the application channel.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<PlayerCommand>,
) -> Result<()> {
    while let Ok(command) = command_rx.try_recv() {
        match command {
            PlayerCommand::Load(url) => {
                handler
                    .command(&["loadfile", &url, "replace"])
                    .context(format!("Failed to load track: {}", &url))?;
                handler.set_property("pause", false)?;
            }
            PlayerCommand::Play => {
                handler.set_property("pause", false)?;
            }
            PlayerCommand::Pause => {
                handler.set_property("pause", true)?;
            }
            PlayerCommand::SetVolume(volume) => {
                handler.set_property("volume", volume as f64)?;
            }
            PlayerCommand::SeekTo(seconds) => {
                handler.command(&["seek", &seconds.to_string(), "absolute"])?;
            }
        }
    }

    Ok(())
}

/// Polls for MPV events and synchronizes the derived status code.
///
/// Waits for up to 50ms for an event from the MPV context. Property changes
/// update the internal flags; a status-code transition is broadcast only
/// when the derived code actually changes, except for end-of-file which is
/// always broadcast so the track-end handling can run.
fn process_engine_events(
    handler: &mut mpv::MpvHandler,
    is_paused: &mut bool,
    is_idle: &mut bool,
    is_buffering: &mut bool,
    current_state: &mut AdapterState,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        let app_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("pause", Format::Flag(pause)) => {
                    *is_paused = pause;
                    None
                }
                ("duration", Format::Double(duration)) if duration >= 0.0 => {
                    Some(AppEvent::DurationChanged(duration))
                }
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(AppEvent::TimeChanged(seconds))
                }
                ("volume", Format::Double(volume)) => {
                    Some(AppEvent::VolumeChanged(volume.round() as i64))
                }
                ("idle-active", Format::Flag(idle_active)) => {
                    *is_idle = idle_active;
                    None
                }
                ("paused-for-cache", Format::Flag(buffering)) => {
                    *is_buffering = buffering;
                    None
                }
                _ => None,
            },
            mpv::Event::EndFile(result) => {
                if let Ok(reason) = result {
                    match reason {
                        mpv::EndFileReason::MPV_END_FILE_REASON_EOF => {
                            Some(AppEvent::AdapterStateChanged(AdapterState::Ended))
                        }
                        _ => None,
                    }
                } else {
                    None
                }
            }
            _ => None,
        };

        let new_state = AudioPlayer::derive_state(*is_idle, *is_paused, *is_buffering);

        if new_state != *current_state {
            *current_state = new_state;
            event_tx
                .send(AppEvent::AdapterStateChanged(new_state))
                .context("Failed to send engine state event")?;
        }

        if let Some(event) = app_event {
            event_tx.send(event).context("Failed to send event")?;
        }
    }

    Ok(())
}
