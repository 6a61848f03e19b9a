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

//! Unicode symbols for the TUI.
//!
//! These are selected for compatibility with most modern terminal emulators
//! and fonts.

// Standard Media Controls (Unicode)
pub(crate) const ICON_PLAY: &str = "\u{25B6}";
pub(crate) const ICON_PAUSE: &str = "\u{23F8}";
pub(crate) const ICON_BUFFERING: &str = "\u{231B}";

// Playlist markers
pub(crate) const ICON_ACTIVE: &str = "\u{25B8}";
pub(crate) const ICON_STAR: &str = "\u{2605}";

// Celebration overlay sprites. The balloon variants are plain geometric
// glyphs so the colour styling applies; the confetti glyph stays tiny.
pub(crate) const BALLOON_SPRITES: [&str; 3] = ["\u{25CF}", "\u{2B24}", "\u{25C9}"];
pub(crate) const ICON_CONFETTI: &str = "\u{2022}";
