//! `OutputBuffer`: single-write accumulation of escape streams.

use crate::buffer::{Attrs, Color};
use crate::terminal::sequences;
use std::io::Write;

/// Pre-allocated byte buffer for building one frame's terminal output.
///
/// The diff scan emits every sequence through the typed methods here;
/// everything accumulates and is flushed with a single `write`, so the
/// terminal never observes a half-applied frame.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create an output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical full-screen frame (16 KiB).
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// The accumulated bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether nothing has been accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a string (glyph content or other literal output).
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Append a cursor move to a cell coordinate.
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        sequences::write_set_cursor_position(&mut self.data, x, y);
    }

    /// Append a hide-cursor sequence.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data
            .extend_from_slice(sequences::HIDE_CURSOR.as_bytes());
    }

    /// Append a foreground color change.
    #[inline]
    pub fn set_fg(&mut self, color: Color) {
        sequences::write_foreground(&mut self.data, color);
    }

    /// Append a background color change.
    #[inline]
    pub fn set_bg(&mut self, color: Color) {
        sequences::write_background(&mut self.data, color);
    }

    /// Append enable sequences for a set of attributes.
    #[inline]
    pub fn set_attrs(&mut self, attrs: Attrs) {
        sequences::write_attrs(&mut self.data, attrs);
    }

    /// Append a full attribute reset.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data
            .extend_from_slice(sequences::RESET_ATTRIBUTES.as_bytes());
    }

    /// Flush the accumulated bytes to a writer in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
