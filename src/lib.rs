//! # Glint
//!
//! A double-buffered, diff-rendering game engine for the terminal.
//!
//! Glint turns a grid of drawn glyphs into the minimal sequence of escape
//! codes needed to update the terminal, drives a fixed-cadence main loop
//! with sub-millisecond pacing, and normalizes raw terminal input into a
//! stable event model.
//!
//! ## Core concepts
//!
//! - **Double-buffered rendering**: draw into the back grid; `present`
//!   emits only what changed and flips the buffers
//! - **Frame pacing**: a three-tier sleep/yield/spin idle hits frame
//!   budgets finer than the OS sleep granularity
//! - **Input modes**: discrete key events (Keys) or an in-place line
//!   editor (Lines), behind one normalized event model
//! - **Scoped terminal state**: raw modes and the alternate screen are
//!   claimed on construction and always restored on drop
//!
//! ## Example
//!
//! ```rust,ignore
//! use glint::{Color, Engine, Game, Renderer};
//! use std::time::Duration;
//!
//! struct Hello;
//!
//! impl Game for Hello {
//!     fn tick(&mut self, _engine: &mut Engine, _delta: Duration) {}
//!
//!     fn render(&mut self, _engine: &Engine, renderer: &mut Renderer) {
//!         renderer.draw_text(2, 1, "hello", Color::BrightGreen, Color::Black);
//!     }
//! }
//!
//! let mut engine = Engine::new();
//! engine.start_game(&mut Hello)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod engine;
pub mod input;
pub mod render;
pub mod terminal;
pub mod time;

// Re-exports for convenience
pub use buffer::{Attrs, Color, Glyph, GlyphGrid};
pub use engine::{Engine, FrameTimings, Game};
pub use input::{EventSink, EventStream, InputEvent, Key, KeyInputMode, LineEditor};
pub use render::Renderer;
pub use time::Stopwatch;
