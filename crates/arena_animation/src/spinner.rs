//! Spinner behavior
//!
//! Turns the object about its vertical axis. The first trigger picks a random
//! direction; later triggers keep the guard timer armed, and rotation is only
//! applied while that timer has time left.

use crate::error::{AnimatorError, Result};
use crate::timer::CountdownTimer;
use arena_core::AnimatedObject;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for a spinner
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerConfig {
    /// Angular speed in degrees per second
    pub spin_velocity: f32,
    /// Seconds of rotation granted by each retrigger
    pub guard_secs: f32,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            spin_velocity: 180.0,
            guard_secs: 2.0,
        }
    }
}

impl SpinnerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.spin_velocity.is_finite() || self.spin_velocity == 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "spinner.spin_velocity",
                reason: format!("must be finite and non-zero, got {}", self.spin_velocity),
            });
        }
        if !self.guard_secs.is_finite() || self.guard_secs <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "spinner.guard_secs",
                reason: format!("must be positive, got {}", self.guard_secs),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Spinner {
    config: SpinnerConfig,
    velocity: f32,
    timer: CountdownTimer,
}

impl Spinner {
    pub fn new(config: SpinnerConfig) -> Self {
        Self {
            config,
            velocity: 0.0,
            timer: CountdownTimer::expired(),
        }
    }

    /// Signed angular velocity (0 until first triggered)
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.velocity != 0.0 {
            self.timer = CountdownTimer::new(self.config.guard_secs);
        } else {
            let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            self.velocity = self.config.spin_velocity * direction;
        }
    }

    pub fn update(&mut self, object: &mut AnimatedObject, dt: f32) {
        if self.timer.elapse(dt) > 0.0 {
            object.rot_y += self.velocity * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_first_start_picks_direction() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut spinner = Spinner::new(SpinnerConfig::default());
            spinner.start(&mut rng);
            assert_eq!(spinner.velocity().abs(), 180.0);
        }
    }

    #[test]
    fn test_both_directions_occur() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen_pos = false;
        let mut seen_neg = false;
        for _ in 0..64 {
            let mut spinner = Spinner::new(SpinnerConfig::default());
            spinner.start(&mut rng);
            seen_pos |= spinner.velocity() > 0.0;
            seen_neg |= spinner.velocity() < 0.0;
        }
        assert!(seen_pos && seen_neg);
    }

    #[test]
    fn test_no_rotation_until_guard_armed() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut spinner = Spinner::new(SpinnerConfig::default());
        let mut object = AnimatedObject::new();

        spinner.start(&mut rng);
        spinner.update(&mut object, 0.1);
        assert_eq!(object.rot_y, 0.0);

        // Retrigger arms the guard and rotation begins
        spinner.start(&mut rng);
        spinner.update(&mut object, 0.1);
        assert!((object.rot_y.abs() - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_stops_when_guard_expires() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut spinner = Spinner::new(SpinnerConfig::default());
        let mut object = AnimatedObject::new();
        spinner.start(&mut rng);
        spinner.start(&mut rng);

        for _ in 0..30 {
            spinner.update(&mut object, 0.1);
        }
        let settled = object.rot_y;
        assert!(!spinner.is_active());

        spinner.update(&mut object, 0.1);
        assert_eq!(object.rot_y, settled);
        // Velocity is kept for the next trigger
        assert_ne!(spinner.velocity(), 0.0);
    }

    #[test]
    fn test_validate_rejects_zero_velocity() {
        let config = SpinnerConfig {
            spin_velocity: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(SpinnerConfig::default().validate().is_ok());
    }
}
