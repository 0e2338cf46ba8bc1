//! Escape-sequence builders: pure producers of terminal control bytes.
//!
//! This is the catalog of virtual-terminal sequences the engine emits.
//! Nothing here carries state or can fail; each item is either a constant
//! or a function that appends/returns the bytes for one sequence. The
//! writing variants (`write_*`) back the typed emitters of
//! [`OutputBuffer`](crate::terminal::OutputBuffer), keeping the per-cell
//! hot path allocation-free; the string variants serve one-off callers.

use crate::buffer::{Attrs, Color};
use std::io::Write;

/// Hide the cursor (DECTCEM).
pub const HIDE_CURSOR: &str = "\x1b[?25l";

/// Show the cursor (DECTCEM).
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Switch to the alternate screen buffer.
pub const USE_ALTERNATE_SCREEN: &str = "\x1b[?1049h";

/// Switch back to the main screen buffer.
pub const USE_MAIN_SCREEN: &str = "\x1b[?1049l";

/// Reset all graphic rendition attributes to their defaults (SGR 0).
pub const RESET_ATTRIBUTES: &str = "\x1b[0m";

/// Cursor-position sequence for a cell coordinate (CUP).
///
/// Takes 0-based cell coordinates; the emitted sequence is 1-based per the
/// terminal protocol.
pub fn set_cursor_position(x: u16, y: u16) -> String {
    format!("\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Append a cursor-position sequence for a cell coordinate (CUP).
#[inline]
pub fn write_set_cursor_position(out: &mut Vec<u8>, x: u16, y: u16) {
    let _ = write!(out, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
}

/// SGR code for a named foreground color. Callers split out `Rgb` before
/// reaching here.
const fn fg_code(color: Color) -> u8 {
    match color {
        Color::Black => 30,
        Color::Red => 31,
        Color::Green => 32,
        Color::Yellow => 33,
        Color::Blue => 34,
        Color::Magenta => 35,
        Color::Cyan => 36,
        Color::White | Color::Rgb(..) => 37,
        Color::BrightBlack => 90,
        Color::BrightRed => 91,
        Color::BrightGreen => 92,
        Color::BrightYellow => 93,
        Color::BrightBlue => 94,
        Color::BrightMagenta => 95,
        Color::BrightCyan => 96,
        Color::BrightWhite => 97,
    }
}

/// Foreground SGR sequence for a color token.
pub fn foreground(color: Color) -> String {
    let mut out = Vec::with_capacity(16);
    write_foreground(&mut out, color);
    String::from_utf8(out).expect("SGR sequences are ASCII")
}

/// Append a foreground SGR sequence for a color token.
#[inline]
pub fn write_foreground(out: &mut Vec<u8>, color: Color) {
    if let Color::Rgb(r, g, b) = color {
        let _ = write!(out, "\x1b[38;2;{r};{g};{b}m");
    } else {
        let _ = write!(out, "\x1b[{}m", fg_code(color));
    }
}

/// Background SGR sequence for a color token.
pub fn background(color: Color) -> String {
    let mut out = Vec::with_capacity(16);
    write_background(&mut out, color);
    String::from_utf8(out).expect("SGR sequences are ASCII")
}

/// Append a background SGR sequence for a color token.
#[inline]
pub fn write_background(out: &mut Vec<u8>, color: Color) {
    if let Color::Rgb(r, g, b) = color {
        let _ = write!(out, "\x1b[48;2;{r};{g};{b}m");
    } else {
        // Background codes sit 10 above the foreground codes.
        let _ = write!(out, "\x1b[{}m", fg_code(color) + 10);
    }
}

/// Append SGR sequences enabling each attribute in `attrs`.
///
/// Only additive sequences are emitted; removing an attribute requires a
/// full [`RESET_ATTRIBUTES`] first (SGR has per-attribute disables, but the
/// diff layer tracks state and resets instead, which is smaller in the
/// common case of attribute-free cells).
pub fn write_attrs(out: &mut Vec<u8>, attrs: Attrs) {
    if attrs.contains(Attrs::BOLD) {
        out.extend_from_slice(b"\x1b[1m");
    }
    if attrs.contains(Attrs::DIM) {
        out.extend_from_slice(b"\x1b[2m");
    }
    if attrs.contains(Attrs::UNDERLINE) {
        out.extend_from_slice(b"\x1b[4m");
    }
    if attrs.contains(Attrs::REVERSED) {
        out.extend_from_slice(b"\x1b[7m");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_position_is_one_based() {
        assert_eq!(set_cursor_position(0, 0), "\x1b[1;1H");
        assert_eq!(set_cursor_position(10, 5), "\x1b[6;11H");
    }

    #[test]
    fn named_foreground_codes() {
        assert_eq!(foreground(Color::Black), "\x1b[30m");
        assert_eq!(foreground(Color::White), "\x1b[37m");
        assert_eq!(foreground(Color::BrightCyan), "\x1b[96m");
    }

    #[test]
    fn named_background_codes() {
        assert_eq!(background(Color::Black), "\x1b[40m");
        assert_eq!(background(Color::BrightBlue), "\x1b[104m");
    }

    #[test]
    fn rgb_colors_use_truecolor_sgr() {
        assert_eq!(foreground(Color::Rgb(255, 128, 0)), "\x1b[38;2;255;128;0m");
        assert_eq!(background(Color::Rgb(1, 2, 3)), "\x1b[48;2;1;2;3m");
    }

    #[test]
    fn attrs_emit_in_code_order() {
        let mut out = Vec::new();
        write_attrs(&mut out, Attrs::BOLD | Attrs::UNDERLINE);
        assert_eq!(out, b"\x1b[1m\x1b[4m");
    }
}
