//! Terminal state: cache, raw modes, and the scoped restore guard.
//!
//! The engine treats the OS terminal as an external collaborator with a
//! small surface: capture its current configuration, switch it into the raw
//! input/output modes the renderer and event stream need, and put
//! everything back on the way out. Restoration is idempotent and safe to
//! run from two overlapping guards in either drop order; whichever guard
//! drops last determines the final state, which is the pre-engine one.

use crossterm::{cursor, execute, terminal};
use std::io::{self, Write};
use tracing::debug;

use super::sequences;

/// Terminal configuration captured before the engine touched anything.
#[derive(Debug, Clone, Copy)]
pub struct CachedState {
    /// Whether raw mode was already enabled when we arrived.
    raw_mode: bool,
    /// Cursor position at capture time, when it could be read.
    cursor: Option<(u16, u16)>,
}

/// Capture the current terminal configuration.
pub fn cache_state() -> io::Result<CachedState> {
    Ok(CachedState {
        raw_mode: terminal::is_raw_mode_enabled()?,
        cursor: cursor::position().ok(),
    })
}

/// Restore a previously captured configuration.
///
/// Only undoes what the engine could have changed: raw mode is disabled
/// unless it was already on at capture time, and the cursor is moved back
/// when `restore_cursor` is set and a position was captured. Failures are
/// swallowed; restore runs on teardown paths where there is nothing left to
/// do about them.
pub fn restore_state(state: &CachedState, restore_cursor: bool) {
    if !state.raw_mode {
        let _ = terminal::disable_raw_mode();
    }
    if restore_cursor {
        if let Some((x, y)) = state.cursor {
            let _ = execute!(io::stdout(), cursor::MoveTo(x, y));
        }
    }
}

/// The terminal's current size in cells.
pub fn screen_size() -> io::Result<(u16, u16)> {
    terminal::size()
}

/// Ask the terminal to resize itself. Best effort: many emulators ignore
/// programmatic resize, so a `false` return is not an error.
pub fn try_set_screen_size(width: u16, height: u16) -> bool {
    execute!(io::stdout(), terminal::SetSize(width, height)).is_ok()
}

/// Put the terminal into raw output mode (no newline translation, escape
/// sequences pass through unprocessed).
pub fn enable_raw_output_mode() -> io::Result<()> {
    terminal::enable_raw_mode()
}

/// Put the terminal into raw input mode (no line buffering or echo; key and
/// resize records are delivered as events).
pub fn enable_raw_input_mode() -> io::Result<()> {
    terminal::enable_raw_mode()
}

/// Which parts of the terminal a [`TerminalSession`] claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionKind {
    /// Raw output + alternate screen + hidden cursor (renderer).
    Output,
    /// Raw input only (event stream).
    Input,
}

/// Scoped terminal acquisition: capture on construction, restore on drop.
///
/// The renderer and the event stream each hold their own session over
/// overlapping terminal state; restoration is last-writer-wins safe.
#[derive(Debug)]
pub struct TerminalSession {
    cached: CachedState,
    kind: SessionKind,
}

impl TerminalSession {
    /// Claim the terminal for rendering: raw output mode, alternate screen
    /// buffer, hidden cursor.
    ///
    /// Fatal on failure: a renderer running against a terminal that strips
    /// or mangles escape sequences would only produce garbage.
    pub fn output() -> io::Result<Self> {
        let cached = cache_state()?;
        enable_raw_output_mode()?;

        let mut stdout = io::stdout();
        stdout.write_all(sequences::USE_ALTERNATE_SCREEN.as_bytes())?;
        stdout.write_all(sequences::HIDE_CURSOR.as_bytes())?;
        stdout.flush()?;

        debug!(raw_was_enabled = cached.raw_mode, "terminal output session opened");
        Ok(Self {
            cached,
            kind: SessionKind::Output,
        })
    }

    /// Claim the terminal for input: raw input mode so key and resize
    /// records arrive as events instead of cooked lines.
    pub fn input() -> io::Result<Self> {
        let cached = cache_state()?;
        enable_raw_input_mode()?;

        debug!(raw_was_enabled = cached.raw_mode, "terminal input session opened");
        Ok(Self {
            cached,
            kind: SessionKind::Input,
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.kind == SessionKind::Output {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(sequences::RESET_ATTRIBUTES.as_bytes());
            let _ = stdout.write_all(sequences::SHOW_CURSOR.as_bytes());
            let _ = stdout.write_all(sequences::USE_MAIN_SCREEN.as_bytes());
            let _ = stdout.flush();
        }
        restore_state(&self.cached, self.kind == SessionKind::Output);
        debug!(kind = ?self.kind, "terminal session restored");
    }
}
