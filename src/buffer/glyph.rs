//! Glyph: the atomic drawable unit of the terminal grid.
//!
//! A glyph stores the UTF-8 encoding of exactly one Unicode scalar inline
//! (1–4 bytes), its display width, foreground/background color tokens, a set
//! of text attributes, and a "last touched" generation stamp used by the
//! renderer's clear policy. Equality ignores the generation stamp: two
//! glyphs that look the same on screen compare equal.

use bitflags::bitflags;
use std::hash::{Hash, Hasher};
use unicode_width::UnicodeWidthChar;

/// A color token: one of the 16 named ANSI colors or a 24-bit RGB value.
///
/// Tokens are pure data; the escape-sequence layer in
/// [`crate::terminal::sequences`] renders them to SGR byte sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Named ANSI black (SGR 30/40).
    Black,
    /// Named ANSI red.
    Red,
    /// Named ANSI green.
    Green,
    /// Named ANSI yellow.
    Yellow,
    /// Named ANSI blue.
    Blue,
    /// Named ANSI magenta.
    Magenta,
    /// Named ANSI cyan.
    Cyan,
    /// Named ANSI white.
    White,
    /// Bright/bold black (SGR 90/100).
    BrightBlack,
    /// Bright red.
    BrightRed,
    /// Bright green.
    BrightGreen,
    /// Bright yellow.
    BrightYellow,
    /// Bright blue.
    BrightBlue,
    /// Bright magenta.
    BrightMagenta,
    /// Bright cyan.
    BrightCyan,
    /// Bright white.
    BrightWhite,
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Default foreground for an untouched cell.
    pub const DEFAULT_FG: Self = Self::White;
    /// Default background for an untouched cell.
    pub const DEFAULT_BG: Self = Self::Black;

    /// Create a 24-bit color from a hex value (e.g. `0xFF8000`).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::Rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT_FG
    }
}

bitflags! {
    /// Text attributes applied to a glyph.
    ///
    /// Attributes combine with bitwise OR and are emitted as SGR sequences
    /// only when they change between emitted cells.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        /// Bold / increased intensity.
        const BOLD = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM = 0b0000_0010;
        /// Underline.
        const UNDERLINE = 0b0000_0100;
        /// Swapped foreground/background.
        const REVERSED = 0b0000_1000;
    }
}

impl std::fmt::Debug for Attrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// One character cell: a single Unicode scalar plus its colors, attributes,
/// and the generation stamp of the frame that last drew it.
#[derive(Clone, Copy)]
pub struct Glyph {
    /// Inline UTF-8 storage for the scalar.
    bytes: [u8; 4],
    /// Byte length of the scalar (1–4; 0 marks a wide-glyph continuation).
    len: u8,
    /// Display width in columns (0 for a continuation, 1 normal, 2 wide).
    width: u8,
    /// Foreground color token.
    fg: Color,
    /// Background color token.
    bg: Color,
    /// Text attributes.
    attrs: Attrs,
    /// Generation of the frame that last touched this cell.
    generation: u64,
}

impl Default for Glyph {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Glyph {
    /// The default cell: a space with default colors and no attributes.
    pub const EMPTY: Self = Self {
        bytes: [b' ', 0, 0, 0],
        len: 1,
        width: 1,
        fg: Color::DEFAULT_FG,
        bg: Color::DEFAULT_BG,
        attrs: Attrs::empty(),
        generation: 0,
    };

    /// The trailing half of a wide (two-column) glyph. Never emitted; the
    /// diff scan skips it and lets the wide glyph cover both columns.
    pub const CONTINUATION: Self = Self {
        bytes: [0, 0, 0, 0],
        len: 0,
        width: 0,
        fg: Color::DEFAULT_FG,
        bg: Color::DEFAULT_BG,
        attrs: Attrs::empty(),
        generation: 0,
    };

    /// Create a glyph from a character with default colors.
    #[inline]
    #[allow(clippy::missing_panics_doc)]
    pub fn new(ch: char) -> Self {
        let mut bytes = [0u8; 4];
        let encoded = ch.encode_utf8(&mut bytes);
        let len = u8::try_from(encoded.len()).unwrap();
        let width = u8::try_from(UnicodeWidthChar::width(ch).unwrap_or(1)).unwrap_or(1);

        Self {
            bytes,
            len,
            width,
            fg: Color::DEFAULT_FG,
            bg: Color::DEFAULT_BG,
            attrs: Attrs::empty(),
            generation: 0,
        }
    }

    /// Create a glyph from a string that must encode exactly one Unicode
    /// scalar.
    ///
    /// # Panics
    ///
    /// Panics if `s` is empty or contains more than one scalar. A caller
    /// handing a multi-character string to a single-glyph operation is a
    /// programmer error; continuing would silently corrupt the grid.
    #[inline]
    pub fn from_single(s: &str) -> Self {
        let mut chars = s.chars();
        let Some(ch) = chars.next() else {
            panic!("glyph content must be exactly one character, got an empty string");
        };
        assert!(
            chars.next().is_none(),
            "glyph content must be exactly one character, got {s:?}"
        );
        Self::new(ch)
    }

    /// The glyph's UTF-8 bytes as a string slice.
    #[inline]
    #[allow(unsafe_code)]
    pub fn as_str(&self) -> &str {
        // SAFETY: constructors only ever store the UTF-8 encoding of a
        // single char in `bytes[..len]`.
        unsafe { std::str::from_utf8_unchecked(&self.bytes[..self.len as usize]) }
    }

    /// Display width in columns (0 for a continuation cell).
    #[inline]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Whether this cell is the trailing half of a wide glyph.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.len == 0
    }

    /// Foreground color token.
    #[inline]
    pub const fn fg(&self) -> Color {
        self.fg
    }

    /// Background color token.
    #[inline]
    pub const fn bg(&self) -> Color {
        self.bg
    }

    /// Text attributes.
    #[inline]
    pub const fn attrs(&self) -> Attrs {
        self.attrs
    }

    /// Generation of the frame that last touched this cell.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Set the text attributes (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Stamp the generation of the frame drawing this glyph.
    #[inline]
    #[must_use]
    pub const fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

impl PartialEq for Glyph {
    /// Content equality. The generation stamp is bookkeeping for the clear
    /// policy, not visible content, so it is excluded; otherwise the diff
    /// scan would re-emit visually identical cells every frame.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
            && self.len == other.len
            && self.fg == other.fg
            && self.bg == other.bg
            && self.attrs == other.attrs
            && self.width == other.width
    }
}

impl Eq for Glyph {}

impl Hash for Glyph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
        self.len.hash(state);
        self.width.hash(state);
        self.fg.hash(state);
        self.bg.hash(state);
        self.attrs.hash(state);
    }
}

impl std::fmt::Debug for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Glyph")
            .field("ch", &self.as_str())
            .field("width", &self.width)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("attrs", &self.attrs)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_new_ascii() {
        let g = Glyph::new('A');
        assert_eq!(g.as_str(), "A");
        assert_eq!(g.width(), 1);
        assert!(!g.is_continuation());
    }

    #[test]
    fn glyph_new_cjk_is_wide() {
        let g = Glyph::new('日');
        assert_eq!(g.as_str(), "日");
        assert_eq!(g.width(), 2);
    }

    #[test]
    fn from_single_accepts_one_scalar() {
        let g = Glyph::from_single("é");
        assert_eq!(g.as_str(), "é");
    }

    #[test]
    #[should_panic(expected = "exactly one character")]
    fn from_single_rejects_multiple_scalars() {
        let _ = Glyph::from_single("ab");
    }

    #[test]
    #[should_panic(expected = "exactly one character")]
    fn from_single_rejects_empty() {
        let _ = Glyph::from_single("");
    }

    #[test]
    fn equality_ignores_generation() {
        let a = Glyph::new('X').with_fg(Color::Red).with_generation(1);
        let b = Glyph::new('X').with_fg(Color::Red).with_generation(99);
        assert_eq!(a, b);

        let c = Glyph::new('X').with_fg(Color::Green).with_generation(1);
        assert_ne!(a, c);
    }

    #[test]
    fn builder_pattern() {
        let g = Glyph::new('X')
            .with_fg(Color::Rgb(255, 0, 0))
            .with_bg(Color::Blue)
            .with_attrs(Attrs::BOLD | Attrs::UNDERLINE);

        assert_eq!(g.fg(), Color::Rgb(255, 0, 0));
        assert_eq!(g.bg(), Color::Blue);
        assert!(g.attrs().contains(Attrs::BOLD));
        assert!(g.attrs().contains(Attrs::UNDERLINE));
        assert!(!g.attrs().contains(Attrs::DIM));
    }

    #[test]
    fn continuation_cell() {
        let c = Glyph::CONTINUATION;
        assert!(c.is_continuation());
        assert_eq!(c.width(), 0);
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(Glyph::default(), Glyph::EMPTY);
        assert_eq!(Glyph::EMPTY.as_str(), " ");
    }

    #[test]
    fn color_from_hex() {
        assert_eq!(Color::from_u32(0xFF8000), Color::Rgb(255, 128, 0));
    }
}
