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

//! External playback engine control.
//!
//! This module provides the high-level [`AudioPlayer`] interface used by the
//! playback controller. The engine itself (MPV) lives on a background worker
//! thread; this handle is a command proxy, so no playback operation can ever
//! block the main application thread.
//!
//! Engine construction is asynchronous: the worker broadcasts a one-shot
//! ready notification once the engine exists, and until then the controller
//! treats every playback operation as a no-op.

mod commands;

use std::sync::mpsc;

use anyhow::Result;

use crate::{actions::events::AppEvent, player::commands::PlayerCommand};

/// Status codes reported by the playback engine.
///
/// These mirror the lifecycle of an embedded player widget: a freshly loaded
/// track is `Unstarted`, moves through `Buffering` into `Playing`, and ends
/// in `Ended` unless paused along the way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum AdapterState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
}

/// Control surface the playback controller drives.
///
/// Implemented by [`AudioPlayer`] for the real engine and by channel-backed
/// fakes in tests, which is what keeps the controller independently
/// testable.
pub(crate) trait AdapterControl {
    /// Loads a track URL into the engine, replacing whatever is playing.
    fn load(&self, url: &str) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    /// Sets the absolute volume, 0 to 100.
    fn set_volume(&self, volume: i64) -> Result<()>;

    /// Seeks to an absolute position in seconds.
    fn seek_to(&self, seconds: f64) -> Result<()>;
}

/// A handle to the playback engine worker.
pub(crate) struct AudioPlayer {
    command_tx: mpsc::Sender<PlayerCommand>,
}

impl AudioPlayer {
    /// Spawns the engine worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel used to broadcast engine notifications
    ///   (ready, state changes, progress) back to the main event loop.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<PlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Ok(Self { command_tx })
    }

    // Maps the observed engine flags to a single status code.
    fn derive_state(is_idle: bool, is_paused: bool, is_buffering: bool) -> AdapterState {
        if is_idle {
            AdapterState::Unstarted
        } else if is_buffering {
            AdapterState::Buffering
        } else if is_paused {
            AdapterState::Paused
        } else {
            AdapterState::Playing
        }
    }
}

impl AdapterControl for AudioPlayer {
    fn load(&self, url: &str) -> Result<()> {
        self.command_tx.send(PlayerCommand::Load(url.to_string()))?;
        Ok(())
    }

    fn play(&self) -> Result<()> {
        self.command_tx.send(PlayerCommand::Play)?;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.command_tx.send(PlayerCommand::Pause)?;
        Ok(())
    }

    fn set_volume(&self, volume: i64) -> Result<()> {
        self.command_tx
            .send(PlayerCommand::SetVolume(volume.clamp(0, 100)))?;
        Ok(())
    }

    fn seek_to(&self, seconds: f64) -> Result<()> {
        self.command_tx
            .send(PlayerCommand::SeekTo(seconds.max(0.0)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_state_prefers_idle_over_everything() {
        assert_eq!(
            AudioPlayer::derive_state(true, false, true),
            AdapterState::Unstarted
        );
    }

    #[test]
    fn derived_state_orders_buffering_before_pause() {
        assert_eq!(
            AudioPlayer::derive_state(false, true, true),
            AdapterState::Buffering
        );
        assert_eq!(
            AudioPlayer::derive_state(false, true, false),
            AdapterState::Paused
        );
        assert_eq!(
            AudioPlayer::derive_state(false, false, false),
            AdapterState::Playing
        );
    }
}
