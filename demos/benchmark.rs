//! Renderer benchmark: five measured phases of screen noise.
//!
//! Each phase churns a rising share of the screen's cells every frame
//! (10% → 90%) with the frame rate uncapped, then reports per-phase
//! average frame timings. Press R to restart; resizing the terminal
//! restarts the measurement from phase 1.

use glint::{Color, Engine, FrameTimings, Game, Key, Renderer};
use std::time::Duration;

const FRAMES_PER_PHASE: u64 = 2000;
const NUM_PHASES: usize = 5;
const INTRO_DELAY: Duration = Duration::from_secs(3);

/// Numerical-Recipes LCG; deterministic noise without an RNG dependency.
struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

const COLORS: [Color; 26] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::BrightRed,
    Color::BrightGreen,
    Color::BrightYellow,
    Color::BrightBlue,
    Color::BrightMagenta,
    Color::BrightCyan,
    Color::BrightWhite,
    Color::Rgb(0, 0, 0),
    Color::Rgb(50, 50, 50),
    Color::Rgb(100, 100, 100),
    Color::Rgb(150, 150, 150),
    Color::Rgb(100, 100, 100),
    Color::Rgb(150, 150, 150),
    Color::Rgb(200, 200, 200),
    Color::Rgb(250, 250, 250),
    Color::Rgb(255, 255, 255),
    Color::Rgb(255, 0, 0),
    Color::Rgb(0, 255, 0),
    Color::Rgb(0, 0, 255),
];

#[derive(Default)]
struct PhaseResult {
    frames: u64,
    average: FrameTimings,
}

struct Benchmark {
    rng: Lcg,
    /// 0 = intro countdown, 1..=NUM_PHASES measured, beyond = report.
    phase: usize,
    current_frame: u64,
    change_percent: u64,
    accrued: Duration,
    noise: Vec<(char, usize)>,
    noise_original: Vec<(char, usize)>,
    phase_timings: Vec<Vec<FrameTimings>>,
    results: Vec<PhaseResult>,
}

impl Benchmark {
    fn new() -> Self {
        Self {
            rng: Lcg::new(42),
            phase: 0,
            current_frame: 0,
            change_percent: 10,
            accrued: Duration::ZERO,
            noise: Vec::new(),
            noise_original: Vec::new(),
            phase_timings: Vec::new(),
            results: Vec::new(),
        }
    }

    fn restart(&mut self, engine: &Engine) {
        let (width, height) = engine.render_size();
        self.noise.clear();
        self.noise
            .resize(usize::from(width) * usize::from(height), (' ', 0));
        for (c, color) in &mut self.noise {
            *c = char::from(b'0' + u8::try_from(self.rng.next_range(u32::from(b'z' - b'0' + 1))).unwrap());
            *color = self.rng.next_range(u32::try_from(COLORS.len()).unwrap()) as usize;
        }
        self.noise_original = self.noise.clone();

        self.accrued = Duration::ZERO;
        self.current_frame = 0;
        self.change_percent = 10;
        self.phase = 0;

        self.phase_timings.clear();
        self.phase_timings
            .resize_with(NUM_PHASES, || Vec::with_capacity(FRAMES_PER_PHASE as usize));
        self.results.clear();
    }

    fn advance_phase(&mut self) {
        self.accrued = Duration::ZERO;
        self.current_frame = 0;
        if self.phase != 0 {
            self.change_percent += 20;
        }
        self.noise = self.noise_original.clone();
        self.phase += 1;
    }

    fn finalize_results(&mut self) {
        if !self.results.is_empty() {
            return;
        }
        for timings in &self.phase_timings {
            let n = timings.len().max(1) as f64;
            let avg = |pick: fn(&FrameTimings) -> Duration| {
                let sum: f64 = timings.iter().map(|t| pick(t).as_secs_f64()).sum();
                Duration::from_secs_f64(sum / n)
            };
            self.results.push(PhaseResult {
                frames: timings.len() as u64,
                average: FrameTimings {
                    total: avg(|t| t.total),
                    tick: avg(|t| t.tick),
                    render: avg(|t| t.render),
                    present: avg(|t| t.present),
                    idle: avg(|t| t.idle),
                },
            });
        }
    }

    fn churn(&mut self) {
        for (i, (c, color)) in self.noise.iter_mut().enumerate() {
            if (self.current_frame + i as u64) % 100 >= self.change_percent {
                continue;
            }
            *c = if *c >= 'z' { '0' } else { char::from(*c as u8 + 1) };
            *color = (*color + 1) % COLORS.len();
        }
    }

    fn render_intro(&self, renderer: &mut Renderer) {
        let mut y = 0;
        let lines = [
            "Benchmark will simulate/render frames of random symbols and colors, 5 times:",
            "    Test 1 - 10% of symbols change each frame",
            "    Test 2 - 30% of symbols change each frame",
            "    Test 3 - 50% of symbols change each frame",
            "    Test 4 - 70% of symbols change each frame",
            "    Test 5 - 90% of symbols change each frame",
        ];
        for line in lines {
            renderer.draw_text(0, y, line, Color::White, Color::Black);
            y += 1;
        }
        let remaining = INTRO_DELAY.saturating_sub(self.accrued).as_secs() + 1;
        renderer.draw_text(
            0,
            y + 1,
            &format!("Starting in {remaining} seconds..."),
            Color::BrightYellow,
            Color::Black,
        );
    }

    fn render_report(&self, renderer: &mut Renderer) {
        let mut y = 0;
        renderer.draw_text(0, y, "Benchmark complete.", Color::White, Color::Black);
        y += 1;

        let to_ms = |d: Duration| d.as_secs_f64() * 1000.0;
        let percents = [10, 30, 50, 70, 90];
        for (i, result) in self.results.iter().enumerate() {
            y += 1;
            renderer.draw_text(
                0,
                y,
                &format!("Test {} - {}% of symbols change each frame", i + 1, percents[i]),
                Color::White,
                Color::Black,
            );
            y += 1;

            let x = "    Average present time: ".len() as u16;
            let rows = [
                ("    Total frames: ", format!("{:>7}", result.frames), Color::BrightWhite),
                ("    Average frame time:   ", format!("{:>5.2}ms", to_ms(result.average.total)), Color::BrightWhite),
                ("    Average tick time:    ", format!("{:>5.2}ms", to_ms(result.average.tick)), Color::BrightWhite),
                ("    Average render time:  ", format!("{:>5.2}ms", to_ms(result.average.render)), Color::BrightWhite),
                ("    Average present time: ", format!("{:>5.2}ms", to_ms(result.average.present)), Color::BrightYellow),
                ("    Average idle time:    ", format!("{:>5.2}ms", to_ms(result.average.idle)), Color::BrightWhite),
            ];
            for (label, value, color) in rows {
                renderer.draw_text(0, y, label, Color::White, Color::Black);
                renderer.draw_text(x, y, &value, color, Color::Black);
                y += 1;
            }
        }
    }

    fn render_noise(&self, engine: &Engine, renderer: &mut Renderer) {
        let width = renderer.width();
        for (i, (c, color)) in self.noise.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let x = (i % usize::from(width)) as u16;
            #[allow(clippy::cast_possible_truncation)]
            let y = (i / usize::from(width)) as u16;
            renderer.draw_char(x, y, *c, COLORS[*color], Color::Black);
        }

        let timings = engine.last_frame_timings();
        let to_ms = |d: Duration| d.as_secs_f64() * 1000.0;
        let fps = if timings.total.is_zero() {
            0.0
        } else {
            (1.0 / timings.total.as_secs_f64()).round()
        };

        let x = "Present time: ".len() as u16;
        let rows = [
            ("Test phase:   ", format!("{:>7}", self.phase), Color::BrightYellow),
            ("Entropy:      ", format!("{:>6}%", self.change_percent), Color::BrightBlue),
            ("Frame:        ", format!("{:>7}", self.current_frame), Color::BrightCyan),
            ("FPS:          ", format!("{fps:>7.0}"), Color::BrightGreen),
            ("Frame time:   ", format!("{:>5.2}ms", to_ms(timings.total)), Color::BrightWhite),
            ("Tick time:    ", format!("{:>5.2}ms", to_ms(timings.tick)), Color::BrightWhite),
            ("Render time:  ", format!("{:>5.2}ms", to_ms(timings.render)), Color::BrightWhite),
            ("Present time: ", format!("{:>5.2}ms", to_ms(timings.present)), Color::BrightWhite),
            ("Idle time:    ", format!("{:>5.2}ms", to_ms(timings.idle)), Color::BrightWhite),
        ];
        for (y, (label, value, color)) in rows.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let y = y as u16;
            renderer.draw_text(0, y, label, Color::White, Color::Black);
            renderer.draw_text(x, y, value, *color, Color::Black);
        }
    }
}

impl Game for Benchmark {
    fn begin_play(&mut self, engine: &mut Engine) {
        engine.set_target_fps(0);
        self.restart(engine);
    }

    fn tick(&mut self, engine: &mut Engine, delta: Duration) {
        if self.phase == 0 {
            self.accrued += delta;
            if self.accrued < INTRO_DELAY {
                return;
            }
            self.advance_phase();
        }

        if self.phase > NUM_PHASES {
            self.finalize_results();
            return;
        }

        if self.current_frame != 0 {
            self.phase_timings[self.phase - 1].push(engine.last_frame_timings());
        }
        self.current_frame += 1;
        self.churn();

        if self.current_frame > FRAMES_PER_PHASE {
            self.advance_phase();
        }
    }

    fn render(&mut self, engine: &Engine, renderer: &mut Renderer) {
        if self.phase == 0 {
            self.render_intro(renderer);
        } else if self.phase > NUM_PHASES {
            self.render_report(renderer);
        } else {
            self.render_noise(engine, renderer);
        }
    }

    fn on_key_down(&mut self, engine: &mut Engine, key: Key) -> bool {
        if key == Key::R {
            self.restart(engine);
            return true;
        }
        false
    }

    fn on_window_resize(&mut self, engine: &mut Engine, _width: u16, _height: u16) {
        // A measurement against a resized grid is not comparable; start
        // over unless the run already finished.
        if self.phase <= NUM_PHASES {
            self.restart(engine);
        }
    }
}

fn main() -> std::io::Result<()> {
    let mut engine = Engine::new();
    let mut game = Benchmark::new();
    engine.start_game(&mut game)
}
