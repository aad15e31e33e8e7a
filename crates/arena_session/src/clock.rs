//! Frame timing
//!
//! Behaviors never read a clock; the session asks a [`FrameClock`] for each
//! frame's delta and passes it down.

use std::time::Instant;

pub trait FrameClock {
    /// Seconds since the previous tick
    fn tick(&mut self) -> f32;
}

/// Wall-clock deltas; the first tick returns 0
#[derive(Debug, Default)]
pub struct WallClock {
    last: Option<Instant>,
}

impl WallClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameClock for WallClock {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt
    }
}

/// Constant delta per tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedStep(pub f32);

impl FixedStep {
    pub fn fps(rate: f32) -> Self {
        Self(1.0 / rate)
    }
}

impl FrameClock for FixedStep {
    fn tick(&mut self) -> f32 {
        self.0
    }
}
