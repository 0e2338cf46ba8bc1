//! Diff emission: turn two grids into a minimal escape-code stream.
//!
//! This is the heart of the renderer. It compares the front grid (what the
//! terminal currently shows) against the back grid (what the frame drew) and
//! appends, for each changed cell, only the escape sequences the terminal
//! actually needs:
//!
//! 1. A cursor move only when the cursor is not already there
//! 2. A foreground/background change only when it differs from the last one
//! 3. An attribute change only when the attribute set differs
//!
//! Everything is emitted through one [`OutputBuffer`]; the caller flushes
//! it in a single write.

use super::{Attrs, Color, Glyph, GlyphGrid};
use crate::terminal::OutputBuffer;

/// Tracker for the terminal state implied by previously emitted sequences.
///
/// Persisting this across presents lets consecutive frames continue to
/// suppress redundant cursor moves and color changes.
#[derive(Debug, Clone, Default)]
pub struct EmitState {
    /// Where the cursor lands after the last emitted cell; `None` forces a
    /// position sequence on the next emission.
    cursor: Option<(u16, u16)>,
    /// Last emitted foreground.
    fg: Option<Color>,
    /// Last emitted background.
    bg: Option<Color>,
    /// Last emitted attribute set.
    attrs: Option<Attrs>,
}

impl EmitState {
    /// A state with nothing known about the terminal.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Forget everything; the next emission re-establishes cursor, colors,
    /// and attributes. Called after a resize or any out-of-band output.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Counters describing one diff emission.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffStats {
    /// Cells that produced output.
    pub cells_changed: usize,
    /// Cursor-position sequences emitted.
    pub cursor_moves: usize,
    /// Foreground/background sequences emitted.
    pub color_changes: usize,
    /// Attribute sequences emitted (including resets).
    pub attr_changes: usize,
}

/// Append the escape stream that transforms the terminal from `front` to
/// `back`.
///
/// When `redraw_all` is set every cell is treated as changed (used after a
/// resize or on the first present). Continuation halves of wide glyphs are
/// never emitted; the wide glyph covers both columns.
///
/// The grids must have identical dimensions.
pub fn emit_diff(
    front: &GlyphGrid,
    back: &GlyphGrid,
    redraw_all: bool,
    state: &mut EmitState,
    out: &mut OutputBuffer,
) -> DiffStats {
    debug_assert_eq!(front.width(), back.width());
    debug_assert_eq!(front.height(), back.height());

    let mut stats = DiffStats::default();
    let width = back.width();

    for (i, cell) in back.cells().iter().enumerate() {
        if !redraw_all && *cell == front.cells()[i] {
            continue;
        }

        if cell.is_continuation() {
            continue;
        }

        #[allow(clippy::cast_possible_truncation)]
        let x = (i % width as usize) as u16;
        #[allow(clippy::cast_possible_truncation)]
        let y = (i / width as usize) as u16;

        stats.cells_changed += 1;
        emit_cell(cell, x, y, state, out, &mut stats);
    }

    stats
}

/// Emit one cell: position, colors, attributes, then the glyph bytes.
fn emit_cell(
    cell: &Glyph,
    x: u16,
    y: u16,
    state: &mut EmitState,
    out: &mut OutputBuffer,
    stats: &mut DiffStats,
) {
    if state.cursor != Some((x, y)) {
        out.cursor_move(x, y);
        stats.cursor_moves += 1;
    }

    // Dropping an attribute needs a full SGR reset, which also clears the
    // color state, so handle removals before colors.
    let attrs = cell.attrs();
    let removed = state.attrs.unwrap_or(Attrs::empty()).difference(attrs);
    if !removed.is_empty() {
        out.reset_attrs();
        state.fg = None;
        state.bg = None;
        state.attrs = None;
        stats.attr_changes += 1;
    }

    if state.fg != Some(cell.fg()) {
        out.set_fg(cell.fg());
        state.fg = Some(cell.fg());
        stats.color_changes += 1;
    }

    if state.bg != Some(cell.bg()) {
        out.set_bg(cell.bg());
        state.bg = Some(cell.bg());
        stats.color_changes += 1;
    }

    if state.attrs != Some(attrs) {
        // Removals were handled above, so only additions remain.
        out.set_attrs(attrs.difference(state.attrs.unwrap_or(Attrs::empty())));
        state.attrs = Some(attrs);
        stats.attr_changes += 1;
    }

    out.write_str(cell.as_str());

    // A wide glyph moves the cursor two columns.
    state.cursor = Some((x + u16::from(cell.width().max(1)), y));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(front: &GlyphGrid, back: &GlyphGrid, redraw_all: bool) -> (Vec<u8>, DiffStats) {
        let mut out = OutputBuffer::new();
        let mut state = EmitState::new();
        let stats = emit_diff(front, back, redraw_all, &mut state, &mut out);
        (out.as_bytes().to_vec(), stats)
    }

    #[test]
    fn identical_grids_emit_nothing() {
        let a = GlyphGrid::new(10, 5);
        let b = GlyphGrid::new(10, 5);

        let (out, stats) = emit(&a, &b, false);

        assert!(out.is_empty());
        assert_eq!(stats.cells_changed, 0);
    }

    #[test]
    fn single_cell_change_emits_one_cell() {
        let front = GlyphGrid::new(10, 5);
        let mut back = GlyphGrid::new(10, 5);
        back.set(5, 2, Glyph::new('X'));

        let (out, stats) = emit(&front, &back, false);

        assert_eq!(stats.cells_changed, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[3;6H"));
        assert!(text.ends_with('X'));
    }

    #[test]
    fn adjacent_cells_skip_cursor_moves() {
        let front = GlyphGrid::new(10, 5);
        let mut back = GlyphGrid::new(10, 5);
        back.set(3, 0, Glyph::new('A'));
        back.set(4, 0, Glyph::new('B'));
        back.set(5, 0, Glyph::new('C'));

        let (_, stats) = emit(&front, &back, false);

        assert_eq!(stats.cells_changed, 3);
        assert_eq!(stats.cursor_moves, 1);
    }

    #[test]
    fn repeated_colors_are_suppressed() {
        let front = GlyphGrid::new(10, 5);
        let mut back = GlyphGrid::new(10, 5);
        let red = Color::Rgb(255, 0, 0);
        back.set(0, 0, Glyph::new('A').with_fg(red));
        back.set(1, 0, Glyph::new('B').with_fg(red));

        let (_, stats) = emit(&front, &back, false);

        // First cell establishes fg + bg; second changes neither.
        assert_eq!(stats.color_changes, 2);
    }

    #[test]
    fn redraw_all_emits_every_cell() {
        let a = GlyphGrid::new(8, 4);
        let b = GlyphGrid::new(8, 4);

        let (_, stats) = emit(&a, &b, true);

        assert_eq!(stats.cells_changed, 8 * 4);
    }

    #[test]
    fn wide_glyph_advances_two_columns() {
        let front = GlyphGrid::new(10, 1);
        let mut back = GlyphGrid::new(10, 1);
        back.set(0, 0, Glyph::new('日'));
        back.set(1, 0, Glyph::CONTINUATION);
        back.set(2, 0, Glyph::new('x'));

        let (_, stats) = emit(&front, &back, false);

        // Continuation is skipped, and 'x' needs no cursor move because the
        // wide glyph left the cursor at column 2.
        assert_eq!(stats.cells_changed, 2);
        assert_eq!(stats.cursor_moves, 1);
    }

    #[test]
    fn attribute_removal_resets_then_recolors() {
        let mut front = GlyphGrid::new(4, 1);
        let mut back = GlyphGrid::new(4, 1);
        front.set(0, 0, Glyph::new('a').with_attrs(Attrs::BOLD));
        back.set(0, 0, Glyph::new('a'));

        let mut out = OutputBuffer::new();
        let mut state = EmitState {
            cursor: Some((0, 0)),
            fg: Some(Color::DEFAULT_FG),
            bg: Some(Color::DEFAULT_BG),
            attrs: Some(Attrs::BOLD),
        };
        emit_diff(&front, &back, false, &mut state, &mut out);

        let text = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        // Reset, then both colors re-established.
        assert!(text.starts_with("\x1b[0m"));
        assert!(text.contains("\x1b[37m"));
        assert!(text.contains("\x1b[40m"));
    }

    #[test]
    fn state_persists_across_emissions() {
        let mut state = EmitState::new();
        let mut out = OutputBuffer::new();

        let front = GlyphGrid::new(4, 1);
        let mut back = GlyphGrid::new(4, 1);
        back.set(0, 0, Glyph::new('a'));
        emit_diff(&front, &back, false, &mut state, &mut out);

        out.clear();
        let mut back2 = GlyphGrid::new(4, 1);
        back2.set(0, 0, Glyph::new('a'));
        back2.set(1, 0, Glyph::new('b'));
        let stats = emit_diff(&back, &back2, false, &mut state, &mut out);

        // 'b' sits right after 'a', where the cursor already is.
        assert_eq!(stats.cursor_moves, 0);
        assert_eq!(stats.color_changes, 0);
    }
}
