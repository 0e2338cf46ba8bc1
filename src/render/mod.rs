//! Renderer: double-buffered, diff-based drawing to the terminal.
//!
//! The renderer owns an arena of exactly two [`GlyphGrid`]s. Draw calls go
//! to the back grid; [`Renderer::present`] emits the minimal escape stream
//! that makes the terminal match it, then flips which grid is which. A
//! generation counter stamped into every drawn cell implements the clear
//! policy: by default, cells not touched since the last present are reset
//! before diffing, so callers redraw each frame. Incremental drawing
//! suppresses the reset and copies the back grid forward instead of
//! swapping, letting content persist until overdrawn.

use crate::buffer::diff::{self, DiffStats, EmitState};
use crate::buffer::{Color, Glyph, GlyphGrid};
use crate::terminal::{state, OutputBuffer, TerminalSession};
use std::io;
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

/// Where presented bytes go.
enum Target {
    /// A real terminal, claimed for the renderer's lifetime.
    Terminal {
        out: io::Stdout,
        _session: TerminalSession,
    },
    /// An in-memory capture; used by tests and benches.
    Headless { captured: Vec<u8> },
}

/// The diff-based terminal renderer.
pub struct Renderer {
    /// The two-grid arena; `back_index` selects the grid accepting draws.
    grids: [GlyphGrid; 2],
    back_index: usize,
    /// Bumped once per present; draw calls stamp it into touched cells.
    generation: u64,
    /// Forces the next present to emit every cell.
    redraw_all: bool,
    /// Whether undrawn cells persist across presents.
    incremental: bool,
    /// Whether any draw or clear happened since the last present.
    touched: bool,
    emit: EmitState,
    output: OutputBuffer,
    stats: DiffStats,
    target: Target,
}

impl Renderer {
    /// Claim the terminal and size the grids to its current dimensions.
    ///
    /// Caches the terminal state, enables raw output mode, switches to the
    /// alternate screen buffer, and hides the cursor; everything is
    /// restored when the renderer is dropped.
    ///
    /// # Errors
    ///
    /// Fails when the terminal cannot be claimed or queried; there is no
    /// degraded mode.
    pub fn new() -> io::Result<Self> {
        let session = TerminalSession::output()?;
        let (width, height) = state::screen_size()?;
        debug!(width, height, "renderer attached to terminal");
        Ok(Self::build(
            width,
            height,
            Target::Terminal {
                out: io::stdout(),
                _session: session,
            },
        ))
    }

    /// Claim the terminal and ask it to resize to the given dimensions.
    ///
    /// The resize is best effort; the grids use the requested size either
    /// way and the first present paints in full.
    ///
    /// # Errors
    ///
    /// Fails when the terminal cannot be claimed.
    pub fn with_size(width: u16, height: u16) -> io::Result<Self> {
        let session = TerminalSession::output()?;
        if !state::try_set_screen_size(width, height) {
            debug!(width, height, "terminal rejected programmatic resize");
        }
        Ok(Self::build(
            width,
            height,
            Target::Terminal {
                out: io::stdout(),
                _session: session,
            },
        ))
    }

    /// A renderer that touches no terminal and captures presented bytes in
    /// memory. Retrieve them with [`Renderer::take_captured`].
    pub fn headless(width: u16, height: u16) -> Self {
        Self::build(width, height, Target::Headless { captured: Vec::new() })
    }

    fn build(width: u16, height: u16, target: Target) -> Self {
        Self {
            grids: [GlyphGrid::new(width, height), GlyphGrid::new(width, height)],
            back_index: 0,
            generation: 1,
            redraw_all: true,
            incremental: false,
            touched: false,
            emit: EmitState::new(),
            output: OutputBuffer::new(),
            stats: DiffStats::default(),
            target,
        }
    }

    /// Grid width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.grids[0].width()
    }

    /// Grid height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.grids[0].height()
    }

    /// The grid currently accepting draw calls.
    #[inline]
    pub fn back_grid(&self) -> &GlyphGrid {
        &self.grids[self.back_index]
    }

    /// Whether incremental drawing is enabled.
    #[inline]
    pub const fn incremental_drawing(&self) -> bool {
        self.incremental
    }

    /// Enable or disable incremental drawing.
    ///
    /// Enabled, draw calls persist across presents at the cost of a grid
    /// copy per frame, and the caller owns cleanup of stale content. Only
    /// enable when not clearing and redrawing in full every frame.
    #[inline]
    pub fn set_incremental_drawing(&mut self, incremental: bool) {
        self.incremental = incremental;
    }

    /// Statistics for the most recent present.
    #[inline]
    pub const fn last_present_stats(&self) -> DiffStats {
        self.stats
    }

    /// Reset every back-grid cell to the given glyph.
    pub fn clear(&mut self, fill: Glyph) {
        let stamped = fill.with_generation(self.generation);
        self.grids[self.back_index].fill(stamped);
        self.touched = true;
    }

    /// Write one glyph into the back grid.
    ///
    /// Returns `false` (a no-op) when the coordinates fall outside the
    /// grid; a wayward draw is cosmetic, not fatal. A two-column glyph also
    /// claims the following cell as its continuation.
    pub fn draw(&mut self, x: u16, y: u16, glyph: Glyph) -> bool {
        let stamped = glyph.with_generation(self.generation);
        let grid = &mut self.grids[self.back_index];
        if !grid.set(x, y, stamped) {
            return false;
        }
        if stamped.width() == 2 {
            grid.set(
                x + 1,
                y,
                Glyph::CONTINUATION
                    .with_bg(stamped.bg())
                    .with_generation(self.generation),
            );
        }
        self.touched = true;
        true
    }

    /// Draw a single character.
    pub fn draw_char(&mut self, x: u16, y: u16, ch: char, fg: Color, bg: Color) -> bool {
        self.draw(x, y, Glyph::new(ch).with_fg(fg).with_bg(bg))
    }

    /// Draw a single glyph given as a string slice.
    ///
    /// # Panics
    ///
    /// Panics when `content` is not exactly one Unicode scalar; handing a
    /// multi-character string to a single-glyph draw is a programmer error.
    pub fn draw_glyph(&mut self, x: u16, y: u16, content: &str, fg: Color, bg: Color) -> bool {
        self.draw(x, y, Glyph::from_single(content).with_fg(fg).with_bg(bg))
    }

    /// Draw a string left to right, clipping at the right edge.
    ///
    /// Returns the AND of the per-glyph results: a partially clipped draw
    /// reports `false` so callers can detect clipping, but the cells that
    /// fit stay drawn. Each grapheme cluster must be a single Unicode
    /// scalar (see [`Renderer::draw_glyph`]).
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Color, bg: Color) -> bool {
        if x >= self.width() || y >= self.height() {
            return false;
        }

        let mut result = true;
        let mut col = x;
        for cluster in text.graphemes(true) {
            if col >= self.width() {
                result = false;
                break;
            }
            let glyph = Glyph::from_single(cluster).with_fg(fg).with_bg(bg);
            let width = u16::from(glyph.width().max(1));
            result = self.draw(col, y, glyph) && result;
            col += width;
        }
        result
    }

    /// Reconcile the back grid against the terminal.
    ///
    /// Emits the minimal escape stream for changed cells (every cell when a
    /// resize forced a full repaint), flushes it in a single write followed
    /// by a hide-cursor, and flips the grid roles so the back grid becomes
    /// the new mirror of the screen. Under incremental drawing the back
    /// grid is copied forward instead of swapped. A present with no
    /// intervening draws is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal write fails; terminal I/O is not
    /// retried.
    pub fn present(&mut self) -> io::Result<()> {
        if !self.touched && !self.redraw_all {
            self.generation = self.generation.wrapping_add(1);
            self.stats = DiffStats::default();
            return Ok(());
        }

        // Full-clear policy: anything the frame did not draw does not
        // survive into the present.
        if !self.incremental {
            let generation = self.generation;
            self.grids[self.back_index].reset_untouched(generation);
        }

        let front_index = 1 - self.back_index;
        self.output.clear();
        let stats = diff::emit_diff(
            &self.grids[front_index],
            &self.grids[self.back_index],
            self.redraw_all,
            &mut self.emit,
            &mut self.output,
        );
        self.redraw_all = false;

        if !self.output.is_empty() {
            self.output.cursor_hide();
            match &mut self.target {
                Target::Terminal { out, .. } => self.output.flush_to(out)?,
                Target::Headless { captured } => {
                    captured.extend_from_slice(self.output.as_bytes());
                }
            }
        }

        if self.incremental {
            let (left, right) = self.grids.split_at_mut(1);
            if self.back_index == 0 {
                right[0].copy_from(&left[0]);
            } else {
                left[0].copy_from(&right[0]);
            }
        } else {
            self.back_index = front_index;
        }

        self.generation = self.generation.wrapping_add(1);
        self.touched = false;
        self.stats = stats;
        trace!(
            cells = stats.cells_changed,
            cursor_moves = stats.cursor_moves,
            color_changes = stats.color_changes,
            "present"
        );
        Ok(())
    }

    /// Resize both grids, discarding all content.
    ///
    /// Diff state is invalidated and the next present paints every cell.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width() && height == self.height() {
            return;
        }
        debug!(width, height, "renderer resized");
        self.grids = [GlyphGrid::new(width, height), GlyphGrid::new(width, height)];
        self.back_index = 0;
        self.redraw_all = true;
        self.touched = false;
        self.emit.reset();
    }

    /// Take the bytes captured by a headless renderer. Always empty for a
    /// terminal-backed renderer.
    pub fn take_captured(&mut self) -> Vec<u8> {
        match &mut self.target {
            Target::Headless { captured } => std::mem::take(captured),
            Target::Terminal { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drained(r: &mut Renderer) {
        // Swallow the initial full paint so tests observe steady state.
        r.present().unwrap();
        let _ = r.take_captured();
    }

    #[test]
    fn draw_bounds_safety() {
        let mut r = Renderer::headless(10, 5);

        assert!(!r.draw_char(10, 0, 'x', Color::White, Color::Black));
        assert!(!r.draw_char(0, 5, 'x', Color::White, Color::Black));
        assert!(r.draw_char(9, 4, 'x', Color::Cyan, Color::Black));

        let cell = r.back_grid().get(9, 4).unwrap();
        assert_eq!(cell.as_str(), "x");
        assert_eq!(cell.fg(), Color::Cyan);
    }

    #[test]
    fn draw_text_reports_clipping() {
        let mut r = Renderer::headless(5, 2);

        assert!(r.draw_text(0, 0, "abc", Color::White, Color::Black));
        assert!(!r.draw_text(3, 1, "abc", Color::White, Color::Black));

        // The cells that fit were still drawn.
        assert_eq!(r.back_grid().get(3, 1).unwrap().as_str(), "a");
        assert_eq!(r.back_grid().get(4, 1).unwrap().as_str(), "b");
    }

    #[test]
    fn draw_text_out_of_bounds_is_noop() {
        let mut r = Renderer::headless(5, 2);
        assert!(!r.draw_text(0, 2, "abc", Color::White, Color::Black));
        assert_eq!(r.back_grid().get(0, 1).unwrap(), &Glyph::EMPTY);
    }

    #[test]
    #[should_panic(expected = "exactly one character")]
    fn draw_glyph_rejects_multiple_scalars() {
        let mut r = Renderer::headless(5, 2);
        let _ = r.draw_glyph(0, 0, "ab", Color::White, Color::Black);
    }

    #[test]
    fn first_present_paints_everything() {
        let mut r = Renderer::headless(6, 3);
        r.present().unwrap();
        assert_eq!(r.last_present_stats().cells_changed, 6 * 3);
        assert!(!r.take_captured().is_empty());
    }

    #[test]
    fn present_without_draws_is_idempotent() {
        let mut r = Renderer::headless(6, 3);
        drained(&mut r);

        r.draw_char(2, 1, 'X', Color::Red, Color::Black);
        r.present().unwrap();
        assert!(!r.take_captured().is_empty());

        r.present().unwrap();
        assert!(r.take_captured().is_empty());
        assert_eq!(r.last_present_stats().cells_changed, 0);
    }

    #[test]
    fn diff_emits_only_changed_cells() {
        let mut r = Renderer::headless(8, 4);
        drained(&mut r);

        r.draw_char(1, 1, 'A', Color::White, Color::Black);
        r.present().unwrap();
        let _ = r.take_captured();
        let first = r.last_present_stats().cells_changed;

        // Redraw the same cell plus one new one; only the new one differs.
        r.draw_char(1, 1, 'A', Color::White, Color::Black);
        r.draw_char(2, 1, 'B', Color::White, Color::Black);
        r.present().unwrap();

        assert_eq!(first, 1);
        assert_eq!(r.last_present_stats().cells_changed, 1);
    }

    #[test]
    fn undrawn_cells_are_cleared_by_default_policy() {
        let mut r = Renderer::headless(8, 4);
        drained(&mut r);

        r.draw_char(1, 1, 'A', Color::White, Color::Black);
        r.present().unwrap();
        let _ = r.take_captured();

        // Next frame draws elsewhere; 'A' was not redrawn, so the present
        // erases it (one emit) and draws 'B' (another).
        r.draw_char(3, 1, 'B', Color::White, Color::Black);
        r.present().unwrap();
        assert_eq!(r.last_present_stats().cells_changed, 2);
    }

    #[test]
    fn incremental_drawing_persists_content() {
        let mut r = Renderer::headless(8, 4);
        r.set_incremental_drawing(true);
        drained(&mut r);

        r.draw_char(1, 1, 'A', Color::White, Color::Black);
        r.present().unwrap();
        let _ = r.take_captured();

        // Only draw 'B'; 'A' persists and produces no output.
        r.draw_char(3, 1, 'B', Color::White, Color::Black);
        r.present().unwrap();
        assert_eq!(r.last_present_stats().cells_changed, 1);
        assert_eq!(r.back_grid().get(1, 1).unwrap().as_str(), "A");
    }

    #[test]
    fn resize_forces_full_repaint() {
        let mut r = Renderer::headless(8, 4);
        drained(&mut r);

        r.resize(10, 6);
        r.draw_char(0, 0, 'Z', Color::White, Color::Black);
        r.present().unwrap();

        assert_eq!(r.last_present_stats().cells_changed, 10 * 6);
    }

    #[test]
    fn wide_glyph_claims_continuation_cell() {
        let mut r = Renderer::headless(8, 2);
        assert!(r.draw_glyph(0, 0, "日", Color::White, Color::Black));
        assert!(r.back_grid().get(1, 0).unwrap().is_continuation());
    }
}
