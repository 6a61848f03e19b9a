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

//! Playback state and track selection.
//!
//! This module owns the "what is playing" state: the active track, the
//! playing and buffering flags, volume, and progress. It consumes status
//! codes from the playback engine and catalog snapshots, and decides which
//! track plays next (adjacent stepping for the next/previous controls,
//! random-excluding-current on track end).
//!
//! Collaborators are passed in explicitly on every call: the catalog is read
//! at call time (never captured, so a catalog that finished loading between
//! events is always seen fresh), the engine by `Option<&dyn AdapterControl>`
//! (absent while the engine is still starting, in which case every
//! playback-affecting operation is a silent no-op), and persistence as a
//! command channel to the store worker.

use std::sync::mpsc::Sender;

use anyhow::Result;
use rand::{Rng, RngExt};

use crate::{
    actions::commands::AppCommand,
    model::{DEFAULT_VOLUME, catalog::Catalog, media_url},
    player::{AdapterControl, AdapterState},
};

/// The playback-facing application state.
#[derive(Debug, Clone)]
pub(crate) struct PlaybackState {
    /// Identifier of the track currently loaded into the engine. Always
    /// references a catalog entry, falling back to the first default.
    pub(crate) active_track: String,
    pub(crate) is_playing: bool,
    pub(crate) is_buffering: bool,
    /// Volume, 0 to 100.
    pub(crate) volume: i64,
    pub(crate) current_time: f64,
    pub(crate) duration: f64,
    pub(crate) show_playlist: bool,
    /// Cosmetic: collapses the player bar to a single line.
    pub(crate) compact_controls: bool,
}

pub(crate) struct PlaybackController {
    pub(crate) state: PlaybackState,
    command_tx: Sender<AppCommand>,
}

impl PlaybackController {
    pub(crate) fn new(command_tx: Sender<AppCommand>, catalog: &Catalog) -> Self {
        Self {
            state: PlaybackState {
                active_track: catalog.first_default_id().to_string(),
                is_playing: false,
                is_buffering: false,
                volume: DEFAULT_VOLUME,
                current_time: 0.0,
                duration: 0.0,
                show_playlist: false,
                compact_controls: false,
            },
            command_tx,
        }
    }

    /// Adopts persisted state at startup.
    ///
    /// An active identifier that does not resolve against the catalog falls
    /// back to the first default track. Nothing is written back and nothing
    /// is loaded into the engine; [`Self::start`] does that once the engine
    /// is ready.
    pub(crate) fn restore(&mut self, active: Option<String>, volume: i64, catalog: &Catalog) {
        self.state.active_track = match active {
            Some(id) if catalog.contains(&id) => id,
            _ => catalog.first_default_id().to_string(),
        };
        self.state.volume = volume.clamp(0, 100);
    }

    /// Cues the active track on a freshly ready engine.
    ///
    /// The persisted volume is applied to the engine without being written
    /// back; only explicit user volume changes persist. The track is loaded
    /// paused, so nothing plays until the first user interaction.
    pub(crate) fn start(&mut self, adapter: &dyn AdapterControl) -> Result<()> {
        adapter.set_volume(self.state.volume)?;
        adapter.load(&media_url(&self.state.active_track))?;
        adapter.pause()?;
        Ok(())
    }

    /// Handles a status-code notification from the playback engine.
    ///
    /// The catalog reference is the caller's live catalog, read here at
    /// notification time: the catalog may have finished loading between the
    /// event being queued and this call, and the fresh snapshot is the one
    /// that counts.
    pub(crate) fn on_adapter_state_change(
        &mut self,
        code: AdapterState,
        catalog: &Catalog,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        match code {
            AdapterState::Ended => {
                let entries = catalog.entries();
                if entries.len() > 1 {
                    let current = entries
                        .iter()
                        .position(|t| t.id == self.state.active_track);
                    let index = pick_other_index(entries.len(), current, &mut rand::rng());

                    let id = &entries[index].id;
                    let next = if id.is_empty() {
                        catalog.first_default_id().to_string()
                    } else {
                        id.clone()
                    };
                    self.activate_track(&next, adapter)?;
                }
                // A single-track catalog repeats via the engine's own loop.
                self.state.is_buffering = false;
            }
            AdapterState::Playing => {
                self.state.is_playing = true;
                self.state.is_buffering = false;
            }
            AdapterState::Paused => {
                self.state.is_playing = false;
                self.state.is_buffering = false;
            }
            AdapterState::Buffering | AdapterState::Unstarted => {
                self.state.is_buffering = true;
            }
        }

        Ok(())
    }

    /// Selects a track explicitly (playlist click or track-end draw).
    ///
    /// Activation always persists the identifier, so a restart resumes on
    /// the same track.
    pub(crate) fn activate_track(
        &mut self,
        id: &str,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        self.state.active_track = id.to_string();
        self.state.current_time = 0.0;
        self.state.duration = 0.0;

        self.command_tx
            .send(AppCommand::SaveActiveTrack(id.to_string()))?;

        if let Some(adapter) = adapter {
            adapter.load(&media_url(id))?;
        }

        Ok(())
    }

    /// Advances to the next catalog entry; at the last index, wraps to the
    /// first default track.
    pub(crate) fn select_next(
        &mut self,
        catalog: &Catalog,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        let entries = catalog.entries();
        let current = entries
            .iter()
            .position(|t| t.id == self.state.active_track);

        let next = match current {
            Some(index) if index + 1 >= entries.len() => None,
            Some(index) => entries.get(index + 1).map(|t| t.id.clone()),
            None => entries.first().map(|t| t.id.clone()),
        };

        let next = next
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| catalog.first_default_id().to_string());

        self.activate_track(&next, adapter)
    }

    /// Steps back to the previous catalog entry; at index zero (or when the
    /// active track is unknown), wraps to the last entry.
    pub(crate) fn select_previous(
        &mut self,
        catalog: &Catalog,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        let entries = catalog.entries();
        let current = entries
            .iter()
            .position(|t| t.id == self.state.active_track);

        let previous = match current {
            Some(index) if index > 0 => entries.get(index - 1).map(|t| t.id.clone()),
            _ => entries.last().map(|t| t.id.clone()),
        };

        let previous = previous
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| catalog.first_default_id().to_string());

        self.activate_track(&previous, adapter)
    }

    /// Toggles play/pause. A silent no-op while the engine is starting.
    pub(crate) fn toggle_play_pause(&mut self, adapter: Option<&dyn AdapterControl>) -> Result<()> {
        let Some(adapter) = adapter else {
            return Ok(());
        };

        if self.state.is_playing {
            adapter.pause()?;
        } else {
            adapter.play()?;
        }
        self.state.is_playing = !self.state.is_playing;

        Ok(())
    }

    /// Sets the volume from a user interaction: forwarded to the engine and
    /// persisted. No-op while the engine is starting.
    pub(crate) fn set_volume(
        &mut self,
        volume: i64,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        let Some(adapter) = adapter else {
            return Ok(());
        };

        let volume = volume.clamp(0, 100);
        adapter.set_volume(volume)?;
        self.state.volume = volume;
        self.command_tx.send(AppCommand::SaveVolume(volume))?;

        Ok(())
    }

    pub(crate) fn adjust_volume(
        &mut self,
        delta: i64,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        self.set_volume(self.state.volume + delta, adapter)
    }

    /// Seeks to an absolute position. No-op while the engine is starting.
    pub(crate) fn seek_to(
        &mut self,
        seconds: f64,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        let Some(adapter) = adapter else {
            return Ok(());
        };

        adapter.seek_to(seconds.max(0.0))?;
        Ok(())
    }

    pub(crate) fn seek_by(
        &mut self,
        delta: f64,
        adapter: Option<&dyn AdapterControl>,
    ) -> Result<()> {
        let target = (self.state.current_time + delta).clamp(0.0, self.state.duration.max(0.0));
        self.seek_to(target, adapter)
    }

    /// Records a volume reported by the engine itself. Not persisted.
    pub(crate) fn record_volume(&mut self, volume: i64) {
        self.state.volume = volume.clamp(0, 100);
    }

    pub(crate) fn record_time(&mut self, seconds: f64) {
        self.state.current_time = seconds.max(0.0);
        if self.state.current_time > self.state.duration {
            self.state.duration = self.state.current_time;
        }
    }

    pub(crate) fn record_duration(&mut self, seconds: f64) {
        self.state.duration = seconds.max(0.0);
        if self.state.current_time > self.state.duration {
            self.state.current_time = self.state.duration;
        }
    }

    /// Playback progress as a ratio, when the duration is known.
    pub(crate) fn progress(&self) -> Option<f64> {
        if self.state.duration > 0.0 {
            Some((self.state.current_time / self.state.duration).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// Draws a uniformly random index that differs from `current`.
///
/// Redraws until the sampled index differs, which is uniform over the other
/// indices and always terminates for `len > 1` (the caller's precondition).
fn pick_other_index(len: usize, current: Option<usize>, rng: &mut impl Rng) -> usize {
    debug_assert!(len > 1);
    loop {
        let index = rng.random_range(0..len);
        if Some(index) != current {
            return index;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::mpsc::{self, Receiver};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::model::{DEFAULT_TRACK_IDS, Track};

    #[derive(Debug, PartialEq)]
    enum Call {
        Load(String),
        Play,
        Pause,
        SetVolume(i64),
        SeekTo(f64),
    }

    #[derive(Default)]
    struct FakeAdapter {
        calls: RefCell<Vec<Call>>,
    }

    impl AdapterControl for FakeAdapter {
        fn load(&self, url: &str) -> Result<()> {
            self.calls.borrow_mut().push(Call::Load(url.to_string()));
            Ok(())
        }

        fn play(&self) -> Result<()> {
            self.calls.borrow_mut().push(Call::Play);
            Ok(())
        }

        fn pause(&self) -> Result<()> {
            self.calls.borrow_mut().push(Call::Pause);
            Ok(())
        }

        fn set_volume(&self, volume: i64) -> Result<()> {
            self.calls.borrow_mut().push(Call::SetVolume(volume));
            Ok(())
        }

        fn seek_to(&self, seconds: f64) -> Result<()> {
            self.calls.borrow_mut().push(Call::SeekTo(seconds));
            Ok(())
        }
    }

    fn controller(catalog: &Catalog) -> (PlaybackController, Receiver<AppCommand>) {
        let (tx, rx) = mpsc::channel();
        (PlaybackController::new(tx, catalog), rx)
    }

    fn catalog_of(ids: &[&str]) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.set_entries_for_test(ids.iter().map(|id| Track::synthesized(id)).collect());
        catalog
    }

    fn drain(rx: &Receiver<AppCommand>) -> Vec<AppCommand> {
        let mut commands = vec![];
        while let Ok(c) = rx.try_recv() {
            commands.push(c);
        }
        commands
    }

    #[test]
    fn ended_selects_a_different_track() {
        let catalog = catalog_of(&["A", "B", "C"]);
        let (mut controller, _rx) = controller(&catalog);
        let adapter = FakeAdapter::default();

        for _ in 0..50 {
            controller.state.active_track = "B".to_string();
            controller
                .on_adapter_state_change(AdapterState::Ended, &catalog, Some(&adapter))
                .unwrap();
            assert_ne!(controller.state.active_track, "B");
            assert!(["A", "C"].contains(&controller.state.active_track.as_str()));
            assert!(!controller.state.is_buffering);
        }
    }

    #[test]
    fn ended_persists_and_loads_the_new_track() {
        let catalog = catalog_of(&["A", "B"]);
        let (mut controller, rx) = controller(&catalog);
        controller.state.active_track = "A".to_string();
        let adapter = FakeAdapter::default();

        controller
            .on_adapter_state_change(AdapterState::Ended, &catalog, Some(&adapter))
            .unwrap();

        assert_eq!(controller.state.active_track, "B");
        assert!(matches!(
            drain(&rx).as_slice(),
            [AppCommand::SaveActiveTrack(id)] if id == "B"
        ));
        assert_eq!(
            *adapter.calls.borrow(),
            vec![Call::Load(media_url("B"))]
        );
    }

    #[test]
    fn ended_with_single_track_only_clears_buffering() {
        let catalog = catalog_of(&["A"]);
        let (mut controller, rx) = controller(&catalog);
        controller.state.active_track = "A".to_string();
        controller.state.is_buffering = true;
        let adapter = FakeAdapter::default();

        controller
            .on_adapter_state_change(AdapterState::Ended, &catalog, Some(&adapter))
            .unwrap();

        assert_eq!(controller.state.active_track, "A");
        assert!(!controller.state.is_buffering);
        assert!(drain(&rx).is_empty());
        assert!(adapter.calls.borrow().is_empty());
    }

    #[test]
    fn playing_paused_and_buffering_codes_update_flags() {
        let catalog = catalog_of(&["A"]);
        let (mut controller, _rx) = controller(&catalog);

        controller
            .on_adapter_state_change(AdapterState::Buffering, &catalog, None)
            .unwrap();
        assert!(controller.state.is_buffering);

        controller
            .on_adapter_state_change(AdapterState::Playing, &catalog, None)
            .unwrap();
        assert!(controller.state.is_playing);
        assert!(!controller.state.is_buffering);

        controller
            .on_adapter_state_change(AdapterState::Unstarted, &catalog, None)
            .unwrap();
        assert!(controller.state.is_buffering);

        controller
            .on_adapter_state_change(AdapterState::Paused, &catalog, None)
            .unwrap();
        assert!(!controller.state.is_playing);
        assert!(!controller.state.is_buffering);
    }

    #[test]
    fn next_advances_and_wraps_to_first_default() {
        let catalog = catalog_of(&["A", "B", "C"]);
        let (mut controller, _rx) = controller(&catalog);
        controller.state.active_track = "A".to_string();

        controller.select_next(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, "B");

        controller.state.active_track = "C".to_string();
        controller.select_next(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, DEFAULT_TRACK_IDS[0]);
    }

    #[test]
    fn previous_steps_back_and_wraps_to_last() {
        let catalog = catalog_of(&["A", "B", "C"]);
        let (mut controller, _rx) = controller(&catalog);
        controller.state.active_track = "B".to_string();

        controller.select_previous(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, "A");

        controller.select_previous(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, "C");
    }

    #[test]
    fn next_and_previous_are_adjacent_inverses_away_from_boundaries() {
        let catalog = catalog_of(&["A", "B", "C", "D"]);
        let (mut controller, _rx) = controller(&catalog);
        controller.state.active_track = "B".to_string();

        controller.select_next(&catalog, None).unwrap();
        controller.select_previous(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, "B");
    }

    #[test]
    fn unknown_active_track_resolves_to_list_edges() {
        let catalog = catalog_of(&["A", "B"]);
        let (mut controller, _rx) = controller(&catalog);

        controller.state.active_track = "missing".to_string();
        controller.select_next(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, "A");

        controller.state.active_track = "missing".to_string();
        controller.select_previous(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, "B");
    }

    #[test]
    fn selection_works_while_catalog_is_loading() {
        // A still-loading catalog resolves to the default list.
        let catalog = Catalog::new();
        assert!(catalog.is_loading());
        let (mut controller, _rx) = controller(&catalog);

        controller.select_next(&catalog, None).unwrap();
        assert_eq!(controller.state.active_track, DEFAULT_TRACK_IDS[1]);
    }

    #[test]
    fn toggle_without_adapter_is_a_no_op() {
        let catalog = catalog_of(&["A"]);
        let (mut controller, _rx) = controller(&catalog);

        controller.toggle_play_pause(None).unwrap();
        assert!(!controller.state.is_playing);
    }

    #[test]
    fn toggle_with_adapter_flips_and_forwards() {
        let catalog = catalog_of(&["A"]);
        let (mut controller, _rx) = controller(&catalog);
        let adapter = FakeAdapter::default();

        controller.toggle_play_pause(Some(&adapter)).unwrap();
        assert!(controller.state.is_playing);

        controller.toggle_play_pause(Some(&adapter)).unwrap();
        assert!(!controller.state.is_playing);

        assert_eq!(*adapter.calls.borrow(), vec![Call::Play, Call::Pause]);
    }

    #[test]
    fn set_volume_forwards_clamps_and_persists() {
        let catalog = catalog_of(&["A"]);
        let (mut controller, rx) = controller(&catalog);
        let adapter = FakeAdapter::default();

        controller.set_volume(37, Some(&adapter)).unwrap();
        assert_eq!(controller.state.volume, 37);
        assert!(matches!(
            drain(&rx).as_slice(),
            [AppCommand::SaveVolume(37)]
        ));

        controller.set_volume(140, Some(&adapter)).unwrap();
        assert_eq!(controller.state.volume, 100);
        assert_eq!(
            *adapter.calls.borrow(),
            vec![Call::SetVolume(37), Call::SetVolume(100)]
        );
    }

    #[test]
    fn start_applies_volume_without_persisting() {
        let catalog = catalog_of(&["A"]);
        let (mut controller, rx) = controller(&catalog);
        controller.restore(Some("A".to_string()), 42, &catalog);
        let adapter = FakeAdapter::default();

        controller.start(&adapter).unwrap();

        assert_eq!(
            *adapter.calls.borrow(),
            vec![Call::SetVolume(42), Call::Load(media_url("A")), Call::Pause]
        );
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn restore_falls_back_to_first_default_for_unknown_ids() {
        let catalog = catalog_of(&["A", "B"]);
        let (mut controller, _rx) = controller(&catalog);

        controller.restore(Some("nope".to_string()), 60, &catalog);
        assert_eq!(controller.state.active_track, DEFAULT_TRACK_IDS[0]);
        assert_eq!(controller.state.volume, 60);

        controller.restore(Some("B".to_string()), 60, &catalog);
        assert_eq!(controller.state.active_track, "B");
    }

    #[test]
    fn progress_tracks_the_duration_invariant() {
        let catalog = catalog_of(&["A"]);
        let (mut controller, _rx) = controller(&catalog);

        assert_eq!(controller.progress(), None);

        controller.record_duration(100.0);
        controller.record_time(25.0);
        assert_eq!(controller.progress(), Some(0.25));

        // Time past the known duration stretches the duration.
        controller.record_time(120.0);
        assert!(controller.state.duration >= controller.state.current_time);
        assert_eq!(controller.progress(), Some(1.0));
    }

    #[test]
    fn pick_other_index_is_in_range_and_differs() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 2..6 {
            for current in 0..len {
                for _ in 0..100 {
                    let index = pick_other_index(len, Some(current), &mut rng);
                    assert!(index < len);
                    assert_ne!(index, current);
                }
            }
        }
    }
}
