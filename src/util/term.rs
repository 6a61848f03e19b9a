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

//! Terminal emulator background control.
//!
//! The whole window is painted with the theme background colour so the
//! alternate screen does not sit inside a black border. OSC 11 recolours the
//! emulator background and OSC 111 hands it back to the user's own
//! configuration; both sequences go straight to stdout, outside the ratatui
//! render path. Support for these codes is common across modern emulators
//! (XTerm, iTerm2, Alacritty, Kitty).

use std::io::{self, Write};

use ratatui::style::Color;

use crate::theme::Theme;

/// Paints the terminal emulator background with the given theme colour.
///
/// Flushes stdout immediately so the recolour lands before the first frame.
pub(crate) fn apply_background(colour: Color) {
    write_sequence(&set_sequence(&Theme::to_hex(colour)));
}

/// Restores the terminal emulator's own background colour.
///
/// Part of teardown, so it is best-effort and ignores write failures.
pub(crate) fn reset_background() {
    write_sequence(reset_sequence());
}

fn set_sequence(hex_colour: &str) -> String {
    format!("\x1b]11;{}\x07", hex_colour)
}

const fn reset_sequence() -> &'static str {
    "\x1b]111\x07"
}

fn write_sequence(sequence: &str) {
    print!("{}", sequence);
    io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_sequences_are_well_formed_osc() {
        assert_eq!(set_sequence("#18122b"), "\x1b]11;#18122b\x07");
        assert_eq!(reset_sequence(), "\x1b]111\x07");
    }

    #[test]
    fn theme_background_renders_as_hex() {
        let theme = Theme::default_theme();
        let sequence = set_sequence(&Theme::to_hex(theme.background_colour));
        assert!(sequence.starts_with("\x1b]11;#"));
        assert!(sequence.ends_with('\x07'));
    }
}
