//! Stopwatch: interval measurement for frame timing.

use std::time::{Duration, Instant};

/// Measures elapsed wall-clock time across start/stop intervals.
///
/// `start` resumes an interval (accumulating across pauses), `restart`
/// zeroes and starts in one step, and `elapsed` reads through while the
/// watch is running.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    /// When the current interval began, if running.
    started_at: Option<Instant>,
    /// Time accumulated by completed intervals.
    accumulated: Duration,
}

impl Stopwatch {
    /// A stopped stopwatch with zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start, or resume, measuring. A no-op while already running.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Stop measuring, folding the current interval into the total. A
    /// no-op while already stopped.
    pub fn stop(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }

    /// Stop and zero the elapsed time.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Zero the elapsed time and start measuring.
    pub fn restart(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = Some(Instant::now());
    }

    /// Elapsed time: accumulated intervals plus the running one, if any.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + started.elapsed(),
            None => self.accumulated,
        }
    }

    /// Elapsed time in seconds as a float.
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Whether the stopwatch is currently measuring.
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}
