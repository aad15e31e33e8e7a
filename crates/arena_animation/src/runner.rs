//! Runner behavior
//!
//! Flees along the floor directly away from whatever triggered it, then snaps
//! back to where it started once the return timer runs out. The trigger
//! position must be in the same frame as the object (arena-local).

use crate::error::{AnimatorError, Result};
use crate::timer::CountdownTimer;
use arena_core::{AnimatedObject, Vec3};
use serde::{Deserialize, Serialize};

/// Configuration for a runner
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Flee speed along the floor (m/s)
    pub run_speed: f32,
    /// Seconds spent fleeing before returning
    pub return_time: f32,
    /// A new trigger is accepted once less than this much time is left
    pub rearm_threshold: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            run_speed: 0.3,
            return_time: 0.3,
            rearm_threshold: 0.02,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.run_speed.is_finite() || self.run_speed <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "runner.run_speed",
                reason: format!("must be positive, got {}", self.run_speed),
            });
        }
        if !self.return_time.is_finite() || self.return_time <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "runner.return_time",
                reason: format!("must be positive, got {}", self.return_time),
            });
        }
        if !self.rearm_threshold.is_finite() || self.rearm_threshold < 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "runner.rearm_threshold",
                reason: format!("must not be negative, got {}", self.rearm_threshold),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Runner {
    config: RunnerConfig,
    origin_x: f32,
    origin_z: f32,
    /// Unit vector on the floor plane (y is always 0)
    run_direction: Vec3,
    timer: CountdownTimer,
}

impl Runner {
    pub fn new(config: RunnerConfig, object: &AnimatedObject) -> Self {
        Self {
            config,
            origin_x: object.position.x,
            origin_z: object.position.z,
            run_direction: Vec3::ZERO,
            timer: CountdownTimer::expired(),
        }
    }

    /// Recorded (x, z) the runner returns to
    pub fn origin(&self) -> (f32, f32) {
        (self.origin_x, self.origin_z)
    }

    pub fn run_direction(&self) -> Vec3 {
        self.run_direction
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start(&mut self, object: &AnimatedObject, from: Vec3) {
        if self.timer.remaining() >= self.config.rearm_threshold {
            return;
        }

        let away = (object.position - from).horizontal();
        if away.length() <= f32::EPSILON {
            tracing::warn!("Runner triggered from its own position; ignoring");
            return;
        }

        self.run_direction = away.normalize();
        self.timer = CountdownTimer::new(self.config.return_time);
    }

    pub fn update(&mut self, object: &mut AnimatedObject, dt: f32) {
        if self.timer.elapse(dt) > 0.0 {
            let step = self.run_direction * (self.config.run_speed * dt);
            object.position.x += step.x;
            object.position.z += step.z;
        } else {
            object.position.x = self.origin_x;
            object.position.z = self.origin_z;
        }
    }
}
