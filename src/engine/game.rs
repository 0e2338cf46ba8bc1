//! The application contract: what the engine calls back into.

use super::Engine;
use crate::input::Key;
use crate::render::Renderer;
use std::time::Duration;

/// A game (or any interactive application) run by [`Engine::start_game`].
///
/// `tick` and `render` are required; everything else defaults to a no-op.
/// Input hooks return `true` to claim an event, which stops the engine's
/// own handling (Escape-to-quit, the command bar) for that event.
pub trait Game {
    /// Called once when the game starts, before the first frame.
    fn begin_play(&mut self, engine: &mut Engine) {
        let _ = engine;
    }

    /// Called once when the game stops, after the last frame.
    fn end_play(&mut self, engine: &mut Engine) {
        let _ = engine;
    }

    /// Advance the simulation. `delta` is the wall-clock time since the
    /// previous iteration started, including idle time.
    fn tick(&mut self, engine: &mut Engine, delta: Duration);

    /// Draw the frame into the renderer's back buffer. The buffer was
    /// cleared before this call; draw everything that should be visible.
    fn render(&mut self, engine: &Engine, renderer: &mut Renderer);

    /// A key was pressed (Keys mode). Return `true` to claim it.
    fn on_key_down(&mut self, engine: &mut Engine, key: Key) -> bool {
        let _ = (engine, key);
        false
    }

    /// A key was released (Keys mode). Return `true` to claim it.
    fn on_key_up(&mut self, engine: &mut Engine, key: Key) -> bool {
        let _ = (engine, key);
        false
    }

    /// A line was submitted (Lines mode). Return `true` to claim it;
    /// unclaimed lines are interpreted as engine commands.
    fn on_line_input(&mut self, engine: &mut Engine, line: &str) -> bool {
        let _ = (engine, line);
        false
    }

    /// The terminal was resized and the renderer now has the new size.
    fn on_window_resize(&mut self, engine: &mut Engine, width: u16, height: u16) {
        let _ = (engine, width, height);
    }
}
