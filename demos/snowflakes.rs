//! Snowflakes: a small interactive toy on top of the engine.
//!
//! Move the spawner with A/D or the arrow keys, drop a snowflake with
//! Space, and toggle autoplay with P (or by typing `autoplay` into the
//! command bar, opened with the backquote key).

use glint::{Color, Engine, Game, Key, Renderer};
use std::time::Duration;

const FALL_STEP: Duration = Duration::from_millis(100);
const AUTOPLAY_STEP: Duration = Duration::from_millis(50);
const TRAIL_LENGTH: i32 = 5;

struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from(self.state >> 8) / f64::from(1u32 << 24)
    }
}

#[derive(Clone, Copy)]
struct Snowflake {
    /// Row of the flake's head; -1 marks an inactive slot.
    y: i32,
    accrued: Duration,
}

struct Snowflakes {
    position: i32,
    velocity: i32,
    autoplay: bool,
    autoplay_accrued: Duration,
    rng: Lcg,
    columns: Vec<Vec<Snowflake>>,
}

impl Snowflakes {
    fn new() -> Self {
        Self {
            position: 0,
            velocity: 0,
            autoplay: false,
            autoplay_accrued: Duration::ZERO,
            rng: Lcg::new(7),
            columns: Vec::new(),
        }
    }

    fn spawn(&mut self) {
        #[allow(clippy::cast_sign_loss)]
        let column = self.position as usize;
        if let Some(flakes) = self.columns.get_mut(column) {
            flakes.push(Snowflake {
                y: 1,
                accrued: Duration::ZERO,
            });
        }
    }

    fn tick_autoplay(&mut self, engine: &Engine, delta: Duration) {
        self.autoplay_accrued += delta;
        if self.autoplay_accrued < AUTOPLAY_STEP {
            return;
        }
        self.autoplay_accrued = Duration::ZERO;

        let width = i32::from(engine.render_size().0);
        if self.position <= 0 {
            self.velocity = 1;
            return;
        }
        if self.position >= width - 1 {
            self.velocity = -1;
            return;
        }

        let movement = self.rng.next_f64();
        if self.velocity == 0 && movement < 0.2 {
            self.velocity = if movement < 0.1 { -1 } else { 1 };
        } else if movement < 0.2 {
            self.velocity = 0;
        } else if movement < 0.21 {
            self.velocity = -self.velocity;
        }

        if self.rng.next_f64() < 0.1 {
            self.spawn();
        }
    }
}

impl Game for Snowflakes {
    fn begin_play(&mut self, engine: &mut Engine) {
        engine.set_target_fps(240);
        let (width, _) = engine.render_size();
        self.position = i32::from(width) / 2;
        self.columns.resize(usize::from(width), Vec::new());
    }

    fn tick(&mut self, engine: &mut Engine, delta: Duration) {
        if self.autoplay {
            self.tick_autoplay(engine, delta);
        }

        let width = i32::from(engine.render_size().0);
        let height = i32::from(engine.render_size().1);
        self.position = (self.position + self.velocity).clamp(0, (width - 1).max(0));

        for flakes in &mut self.columns {
            for flake in flakes.iter_mut() {
                if flake.y == -1 {
                    continue;
                }

                flake.accrued += delta;
                if flake.accrued < FALL_STEP {
                    continue;
                }
                flake.accrued -= FALL_STEP;
                flake.y += 1;

                // Retire once the whole trail has left the screen.
                if flake.y - TRAIL_LENGTH >= height {
                    flake.y = -1;
                    flake.accrued = Duration::ZERO;
                }
            }
        }
    }

    fn render(&mut self, _engine: &Engine, renderer: &mut Renderer) {
        #[allow(clippy::cast_sign_loss)]
        let spawner_x = self.position as u16;
        renderer.draw_glyph(spawner_x, 0, "▼", Color::BrightWhite, Color::Black);

        for (x, flakes) in self.columns.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let x = x as u16;
            for flake in flakes {
                if flake.y < 0 {
                    continue;
                }
                if let Ok(y) = u16::try_from(flake.y) {
                    renderer.draw_glyph(x, y, "❄", Color::BrightCyan, Color::Black);
                }
                for j in 1..TRAIL_LENGTH {
                    let trail_y = flake.y - j;
                    if trail_y < 1 {
                        break;
                    }
                    if let Ok(y) = u16::try_from(trail_y) {
                        renderer.draw_glyph(x, y, "•", Color::Cyan, Color::Black);
                    }
                }
            }
        }
    }

    fn on_key_down(&mut self, _engine: &mut Engine, key: Key) -> bool {
        match key {
            Key::Space => {
                self.spawn();
                true
            }
            Key::A | Key::Left => {
                if self.velocity > -1 {
                    self.velocity -= 1;
                }
                true
            }
            Key::D | Key::Right => {
                if self.velocity < 1 {
                    self.velocity += 1;
                }
                true
            }
            Key::P => {
                self.autoplay = !self.autoplay;
                true
            }
            _ => false,
        }
    }

    fn on_key_up(&mut self, _engine: &mut Engine, key: Key) -> bool {
        match key {
            Key::A | Key::Left => {
                if self.velocity < 1 {
                    self.velocity += 1;
                }
                true
            }
            Key::D | Key::Right => {
                if self.velocity > -1 {
                    self.velocity -= 1;
                }
                true
            }
            _ => false,
        }
    }

    fn on_line_input(&mut self, _engine: &mut Engine, line: &str) -> bool {
        if line == "autoplay" {
            self.autoplay = !self.autoplay;
            return true;
        }
        false
    }

    fn on_window_resize(&mut self, _engine: &mut Engine, width: u16, _height: u16) {
        self.position = self.position.min(i32::from(width) - 1).max(0);
        self.columns.resize(usize::from(width), Vec::new());
    }
}

fn main() -> std::io::Result<()> {
    let mut engine = Engine::new();
    let mut game = Snowflakes::new();
    engine.start_game(&mut game)
}
