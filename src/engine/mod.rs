//! Engine: the fixed-cadence main loop.
//!
//! One iteration is {drain input → resize check → tick → render → present →
//! idle}. Everything runs on the caller's thread; there is no concurrency
//! anywhere in the loop, so no locks are needed. Pacing uses a three-tier
//! idle (sleep, then yield, then busy-wait) to hit frame budgets finer than
//! the OS sleep granularity.

mod game;

pub use game::Game;

use crate::buffer::{Color, Glyph};
use crate::input::{EventStream, InputEvent, Key, KeyInputMode};
use crate::render::Renderer;
use crate::time::Stopwatch;
use std::io;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Timing breakdown of the most recent loop iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimings {
    /// Full iteration, including idle.
    pub total: Duration,
    /// The game's `tick` callback.
    pub tick: Duration,
    /// Clear plus the game's `render` callback.
    pub render: Duration,
    /// Diff emission and the terminal write.
    pub present: Duration,
    /// Time spent waiting out the frame budget.
    pub idle: Duration,
}

/// Lifecycle of an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    NotStarted,
    Running,
    Stopped,
}

/// Remaining-time threshold above which the idle loop sleeps.
const SLEEP_SLACK: Duration = Duration::from_micros(1500);
/// Remaining-time threshold above which the idle loop yields; below it the
/// loop busy-waits to the deadline.
const YIELD_SLACK: Duration = Duration::from_micros(100);

/// The main loop: owns pacing, input dispatch, and the present cadence.
///
/// Construct one, then hand it a [`Game`] with [`Engine::start_game`],
/// which blocks until [`Engine::stop_game`] is requested (by the game, by
/// Escape, or by a `quit` command). The engine is also passed back into
/// every game hook as the control surface for frame rate, render size, and
/// telemetry.
pub struct Engine {
    state: RunState,
    should_stop: bool,
    /// Frames per second to pace to; 0 runs uncapped.
    target_fps: u32,
    /// Size the renderer should match; updated by resize events.
    desired_size: (u16, u16),
    show_fps: bool,
    show_timings: bool,
    command_bar_open: bool,
    timings: FrameTimings,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the default 60 FPS target.
    pub const fn new() -> Self {
        Self {
            state: RunState::NotStarted,
            should_stop: false,
            target_fps: 60,
            desired_size: (0, 0),
            show_fps: false,
            show_timings: false,
            command_bar_open: false,
            timings: FrameTimings {
                total: Duration::ZERO,
                tick: Duration::ZERO,
                render: Duration::ZERO,
                present: Duration::ZERO,
                idle: Duration::ZERO,
            },
        }
    }

    /// Request the loop to stop after the current iteration. Idempotent.
    pub fn stop_game(&mut self) {
        self.should_stop = true;
    }

    /// The configured frame-rate target; 0 means uncapped.
    pub const fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Set the frame-rate target. 0 disables pacing entirely.
    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps;
    }

    /// The size the renderer currently matches (or will match at the next
    /// iteration boundary).
    pub const fn render_size(&self) -> (u16, u16) {
        self.desired_size
    }

    /// Ask for a renderer resize at the next iteration boundary.
    pub fn set_desired_render_size(&mut self, width: u16, height: u16) {
        self.desired_size = (width, height);
    }

    /// Timing breakdown of the most recent iteration.
    pub const fn last_frame_timings(&self) -> FrameTimings {
        self.timings
    }

    /// Whether the FPS overlay is showing.
    pub const fn fps_overlay_visible(&self) -> bool {
        self.show_fps
    }

    /// Whether the frame-timings overlay is showing.
    pub const fn timings_overlay_visible(&self) -> bool {
        self.show_timings
    }

    /// Run a game until stopped.
    ///
    /// Blocks the calling thread for the lifetime of the game. Claims the
    /// terminal (renderer output and raw input) on entry and restores it on
    /// every exit path, including panics unwinding out of game code.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal cannot be claimed or a terminal
    /// write fails mid-frame; neither is retried.
    ///
    /// # Panics
    ///
    /// Panics when called more than once; the engine's lifecycle is
    /// not-started → running → stopped.
    pub fn start_game(&mut self, game: &mut dyn Game) -> io::Result<()> {
        assert_eq!(
            self.state,
            RunState::NotStarted,
            "an engine instance runs exactly one game"
        );

        let mut renderer = Renderer::new()?;
        let mut events = EventStream::new()?;
        self.desired_size = (renderer.width(), renderer.height());
        self.state = RunState::Running;
        debug!(width = self.desired_size.0, height = self.desired_size.1, "game loop starting");

        game.begin_play(self);

        let mut frame_timer = Stopwatch::new();
        let mut tick_timer = Stopwatch::new();
        let mut render_timer = Stopwatch::new();
        let mut present_timer = Stopwatch::new();
        let mut idle_timer = Stopwatch::new();

        while !self.should_stop {
            let delta = frame_timer.elapsed();
            frame_timer.restart();

            // The command bar runs on line input; everything else on keys.
            let mode = if self.command_bar_open {
                KeyInputMode::Lines
            } else {
                KeyInputMode::Keys
            };
            events.set_key_input_mode(mode);

            // Drain input, giving the game first claim on every event.
            for event in events.process_events()? {
                match event {
                    InputEvent::KeyDown(key) => {
                        let claimed = if self.command_bar_open {
                            false
                        } else {
                            game.on_key_down(self, key)
                        };
                        if !claimed {
                            self.handle_key_down(key);
                        }
                    }
                    InputEvent::KeyUp(key) => {
                        let _ = game.on_key_up(self, key);
                    }
                    InputEvent::Line(line) => {
                        if !game.on_line_input(self, &line) {
                            self.handle_line(&line);
                        }
                    }
                    InputEvent::Resize(width, height) => {
                        self.desired_size = (width, height);
                    }
                }
            }

            // Match the renderer to the desired size before the frame.
            if renderer.width() != self.desired_size.0
                || renderer.height() != self.desired_size.1
            {
                renderer.resize(self.desired_size.0, self.desired_size.1);
                game.on_window_resize(self, self.desired_size.0, self.desired_size.1);
            }

            tick_timer.restart();
            game.tick(self, delta);
            tick_timer.stop();

            render_timer.restart();
            renderer.clear(Glyph::EMPTY);
            game.render(self, &mut renderer);
            render_timer.stop();

            if self.command_bar_open {
                draw_command_bar(&mut renderer, events.current_line());
            }
            if self.show_fps {
                self.draw_fps_overlay(&mut renderer);
            }
            if self.show_timings {
                self.draw_timings_overlay(&mut renderer);
            }

            present_timer.restart();
            renderer.present()?;
            present_timer.stop();

            idle_timer.restart();
            if self.target_fps > 0 {
                let budget = Duration::from_secs_f64(1.0 / f64::from(self.target_fps));
                idle_until(&frame_timer, budget);
            }
            idle_timer.stop();
            frame_timer.stop();

            self.timings = FrameTimings {
                total: frame_timer.elapsed(),
                tick: tick_timer.elapsed(),
                render: render_timer.elapsed(),
                present: present_timer.elapsed(),
                idle: idle_timer.elapsed(),
            };
        }

        self.state = RunState::Stopped;
        game.end_play(self);
        debug!("game loop stopped");
        Ok(())
    }

    /// Engine-level key handling, after the game declined the event.
    fn handle_key_down(&mut self, key: Key) {
        if self.command_bar_open {
            if matches!(key, Key::Escape | Key::GraveAccent) {
                self.command_bar_open = false;
            }
            return;
        }
        match key {
            Key::Escape => self.stop_game(),
            Key::GraveAccent => self.command_bar_open = true,
            _ => {}
        }
    }

    /// Engine commands, after the game declined the line.
    fn handle_line(&mut self, line: &str) {
        match line {
            "quit" | "exit" => self.stop_game(),
            "fps" => self.show_fps = !self.show_fps,
            "stats" | "timings" => self.show_timings = !self.show_timings,
            _ => {}
        }
    }

    /// Draw the FPS counter, right-aligned in the upper quarter.
    fn draw_fps_overlay(&self, renderer: &mut Renderer) {
        if self.timings.total.is_zero() {
            return;
        }
        let fps = (1.0 / self.timings.total.as_secs_f64()).round();
        let text = format!("{fps:.0} FPS");
        #[allow(clippy::cast_possible_truncation)]
        let x = (renderer.width() as usize).saturating_sub(text.len() + 1) as u16;
        let y = (renderer.height() / 4).saturating_sub(3);
        renderer.draw_text(x, y, &text, Color::BrightCyan, Color::Black);
    }

    /// Draw the five-row frame-timings readout, with the slowest of
    /// tick/render/present highlighted.
    fn draw_timings_overlay(&self, renderer: &mut Renderer) {
        const LABELS: [&str; 5] = ["Frame:   ", "Tick:    ", "Render:  ", "Present: ", "Idle:    "];

        let to_ms = |d: Duration| d.as_secs_f64() * 1000.0;
        let values = [
            to_ms(self.timings.total),
            to_ms(self.timings.tick),
            to_ms(self.timings.render),
            to_ms(self.timings.present),
            to_ms(self.timings.idle),
        ];
        let rendered: Vec<String> = values.iter().map(|v| format!("{v:>5.2}ms")).collect();

        #[allow(clippy::cast_possible_truncation)]
        let label_len = LABELS[0].len() as u16;
        #[allow(clippy::cast_possible_truncation)]
        let value_len = rendered.iter().map(String::len).max().unwrap_or(0) as u16;
        let x = renderer
            .width()
            .saturating_sub(label_len + value_len + 1);
        let mut y = (renderer.height() / 4).saturating_sub(2);

        let slowest = values[1..4].iter().copied().fold(0.0_f64, f64::max);
        for (i, (label, value)) in LABELS.iter().zip(&rendered).enumerate() {
            renderer.draw_text(x, y, label, Color::White, Color::Black);
            let highlighted = (1..=3).contains(&i) && slowest > 0.0 && values[i] >= slowest;
            let color = if highlighted {
                Color::BrightYellow
            } else {
                Color::BrightWhite
            };
            renderer.draw_text(x + label_len, y, value, color, Color::Black);
            y += 1;
        }
    }
}

/// Draw the command bar over the bottom row.
fn draw_command_bar(renderer: &mut Renderer, line: &str) {
    let y = renderer.height().saturating_sub(1);
    for x in 0..renderer.width() {
        renderer.draw_char(x, y, ' ', Color::Black, Color::BrightBlue);
    }
    renderer.draw_text(0, y, "> ", Color::BrightWhite, Color::BrightBlue);
    renderer.draw_text(2, y, line, Color::BrightWhite, Color::BrightBlue);
}

/// Wait out the remainder of the frame budget.
///
/// Three tiers: sleep while the remainder is comfortably above the OS
/// scheduler's granularity (leaving [`SLEEP_SLACK`] unslept), spin-yield
/// while above [`YIELD_SLACK`], and busy-wait the last stretch. A single
/// sleep for the full remainder would overshoot the budget by the
/// scheduler's wakeup error, which is larger than a whole frame at high
/// target rates.
fn idle_until(frame_timer: &Stopwatch, budget: Duration) {
    loop {
        let elapsed = frame_timer.elapsed();
        if elapsed >= budget {
            return;
        }
        let remaining = budget - elapsed;
        if remaining > SLEEP_SLACK {
            thread::sleep(remaining - SLEEP_SLACK);
        } else if remaining > YIELD_SLACK {
            thread::yield_now();
        }
    }
}
