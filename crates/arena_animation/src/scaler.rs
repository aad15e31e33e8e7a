//! Scaler behavior
//!
//! Grows and shrinks between the object's initial scale and
//! `initial * end_scale` while its timer runs.

use crate::error::{AnimatorError, Result};
use crate::timer::CountdownTimer;
use arena_core::AnimatedObject;
use serde::{Deserialize, Serialize};

/// Configuration for a scaler
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    /// Far endpoint relative to the initial scale
    pub end_scale: f32,
    /// Scale change per second
    pub scale_velocity: f32,
    /// Seconds of oscillation granted by each trigger
    pub active_secs: f32,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            end_scale: 0.5,
            scale_velocity: 0.025,
            active_secs: 2.0,
        }
    }
}

impl ScalerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.end_scale.is_finite() || self.end_scale <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "scaler.end_scale",
                reason: format!("must be positive, got {}", self.end_scale),
            });
        }
        if !self.scale_velocity.is_finite() || self.scale_velocity <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "scaler.scale_velocity",
                reason: format!("must be positive, got {}", self.scale_velocity),
            });
        }
        if !self.active_secs.is_finite() || self.active_secs <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "scaler.active_secs",
                reason: format!("must be positive, got {}", self.active_secs),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Scaler {
    config: ScalerConfig,
    /// (low, high)
    endpoints: (f32, f32),
    direction: f32,
    timer: CountdownTimer,
}

impl Scaler {
    pub fn new(config: ScalerConfig, object: &AnimatedObject) -> Self {
        let initial = object.scale;
        let end = initial * config.end_scale;
        let endpoints = if initial <= end {
            (initial, end)
        } else {
            (end, initial)
        };
        Self {
            config,
            endpoints,
            direction: if config.end_scale < 1.0 { -1.0 } else { 1.0 },
            timer: CountdownTimer::expired(),
        }
    }

    pub fn endpoints(&self) -> (f32, f32) {
        self.endpoints
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start(&mut self) {
        self.timer = CountdownTimer::new(self.config.active_secs);
    }

    pub fn update(&mut self, object: &mut AnimatedObject, dt: f32) {
        if self.timer.elapse(dt) <= 0.0 {
            return;
        }

        let (low, high) = self.endpoints;
        let step = self.config.scale_velocity * dt;
        let next = object.scale + self.direction * step;
        if next < low || next > high {
            self.direction = -self.direction;
        }
        object.scale = (object.scale + self.direction * step).clamp(low, high);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_sorted() {
        let object = AnimatedObject::new().with_scale(2.0);
        let shrink = Scaler::new(ScalerConfig::default(), &object);
        assert_eq!(shrink.endpoints(), (1.0, 2.0));
        assert_eq!(shrink.direction(), -1.0);

        let grow = Scaler::new(
            ScalerConfig {
                end_scale: 1.5,
                ..Default::default()
            },
            &object,
        );
        assert_eq!(grow.endpoints(), (2.0, 3.0));
        assert_eq!(grow.direction(), 1.0);
    }

    #[test]
    fn test_idle_until_started() {
        let mut object = AnimatedObject::new();
        let mut scaler = Scaler::new(ScalerConfig::default(), &object);
        scaler.update(&mut object, 0.1);
        assert_eq!(object.scale, 1.0);
    }

    #[test]
    fn test_stays_in_range_and_flips_at_edges() {
        let mut object = AnimatedObject::new();
        let config = ScalerConfig {
            scale_velocity: 0.8,
            active_secs: 10.0,
            ..Default::default()
        };
        let mut scaler = Scaler::new(config, &object);
        let (low, high) = scaler.endpoints();
        scaler.start();

        let mut flips = 0;
        let mut direction = scaler.direction();
        for _ in 0..500 {
            scaler.update(&mut object, 0.02);
            assert!(object.scale >= low && object.scale <= high);
            if scaler.direction() != direction {
                flips += 1;
                // Flips only happen at the edges of the range
                let reach = 2.0 * 0.8 * 0.02 + 1e-5;
                let at_edge = (object.scale - low) < reach || (high - object.scale) < reach;
                assert!(at_edge);
                direction = scaler.direction();
            }
        }
        assert!(flips >= 2);
    }

    #[test]
    fn test_stops_after_active_window() {
        let mut object = AnimatedObject::new();
        let mut scaler = Scaler::new(ScalerConfig::default(), &object);
        scaler.start();
        for _ in 0..30 {
            scaler.update(&mut object, 0.1);
        }
        let scale = object.scale;
        assert!(!scaler.is_active());
        scaler.update(&mut object, 0.1);
        assert_eq!(object.scale, scale);
        assert!(scale < 1.0);
    }
}
