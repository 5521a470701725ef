//! Elapsed-time sources and per-tick delta guards.

use std::time::{Duration, Instant};

use crate::config::TimingConfig;

/// Reports wall-clock time in seconds since some fixed origin.
pub trait Clock {
    fn now_seconds(&mut self) -> f64;
}

/// Real time from `Instant`.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_seconds(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock that advances a fixed step on every read.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    now: f64,
    step: f64,
}

impl FixedStepClock {
    pub fn new(step_seconds: f64) -> Self {
        Self {
            now: 0.0,
            step: step_seconds,
        }
    }

    /// Clock ticking at `fps` frames per second.
    pub fn from_fps(fps: f64) -> Self {
        Self::new(1.0 / fps)
    }
}

impl Clock for FixedStepClock {
    fn now_seconds(&mut self) -> f64 {
        self.now += self.step;
        self.now
    }
}

/// Replace a zero, negative or non-finite delta with `min_seconds`.
pub fn sanitize_dt(dt: f32, min_seconds: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { min_seconds }
}

/// Turns successive clock readings into per-tick deltas.
///
/// The first tick has no predecessor and reports the minimum delta. Every
/// delta is clamped into `[min_frame_seconds, max_frame_seconds]` so a pause
/// does not turn into one huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    timing: TimingConfig,
}

impl FrameClock {
    pub fn new(timing: TimingConfig) -> Self {
        Self { last: None, timing }
    }

    pub fn tick(&mut self, now: f64) -> f32 {
        let raw = match self.last {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        let dt = sanitize_dt(raw, self.timing.min_frame_seconds).min(self.timing.max_frame_seconds);
        if dt != raw {
            tracing::debug!(raw, dt, "clamped frame delta");
        }
        dt
    }

    /// Forget the previous reading, e.g. after the loop was suspended.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Rolling window of recent frame durations for instrumentation.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    /// Record one duration, overwriting the oldest once the window is full.
    pub fn record(&mut self, frame: Duration) {
        self.history[self.index] = frame;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.samples().iter().sum::<Duration>() / count as u32
    }

    pub fn min(&self) -> Duration {
        self.samples().iter().copied().min().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.samples().iter().copied().max().unwrap_or_default()
    }

    fn samples(&self) -> &[Duration] {
        &self.history[..self.count()]
    }
}
