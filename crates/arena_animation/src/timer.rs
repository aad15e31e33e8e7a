//! Countdown timer
//!
//! Frame-stepped replacement for a wall-clock countdown. The owner advances it
//! with the frame delta and reads back what is left.

/// Counts down from a duration in caller-supplied steps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountdownTimer {
    duration: f32,
    remaining: f32,
}

impl CountdownTimer {
    /// Create a timer armed for `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    /// A timer that has already run out
    pub fn expired() -> Self {
        Self::new(0.0)
    }

    /// Advance by `dt` seconds and return the time left
    ///
    /// The result goes negative once the timer has run out; it is never
    /// clamped so callers can compare against small thresholds.
    pub fn elapse(&mut self, dt: f32) -> f32 {
        self.remaining -= dt;
        self.remaining
    }

    /// Time left without advancing
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    /// Re-arm with the original duration
    pub fn restart(&mut self) {
        self.remaining = self.duration;
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::expired()
    }
}
