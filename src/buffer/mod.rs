//! Buffer module: the glyph grid and diff engine behind the renderer.
//!
//! This module contains:
//! - [`Glyph`]: one character cell (scalar + colors + attributes)
//! - [`Color`]: named ANSI and 24-bit color tokens
//! - [`Attrs`]: text attribute bitflags
//! - [`GlyphGrid`]: a flat row-major grid of glyphs
//! - [`diff`]: emission of minimal escape streams between two grids

mod glyph;
mod grid;
pub mod diff;

pub use glyph::{Attrs, Color, Glyph};
pub use grid::GlyphGrid;
