//! Jumper behavior
//!
//! A burst of hops with gravity-driven fall. Each landing relaunches the
//! object while jumps remain, then it settles on the floor it was created on.

use crate::error::{AnimatorError, Result};
use arena_core::AnimatedObject;
use serde::{Deserialize, Serialize};

/// Configuration for a jumper
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumperConfig {
    /// Upward launch speed (m/s)
    pub jump_velocity: f32,
    /// Vertical acceleration (m/s², negative pulls down)
    pub gravity_coeff: f32,
    /// Extra hops granted by a fresh trigger
    pub jump_count: u32,
    /// Height above the floor an object is lifted to on launch
    pub launch_offset: f32,
}

impl Default for JumperConfig {
    fn default() -> Self {
        Self {
            jump_velocity: 0.6,
            gravity_coeff: -4.5,
            jump_count: 3,
            launch_offset: 0.005,
        }
    }
}

impl JumperConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.jump_velocity.is_finite() || self.jump_velocity <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "jumper.jump_velocity",
                reason: format!("must be positive, got {}", self.jump_velocity),
            });
        }
        if !self.gravity_coeff.is_finite() || self.gravity_coeff >= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "jumper.gravity_coeff",
                reason: format!("must be negative, got {}", self.gravity_coeff),
            });
        }
        if !self.launch_offset.is_finite() || self.launch_offset <= 0.0 {
            return Err(AnimatorError::InvalidParameter {
                name: "jumper.launch_offset",
                reason: format!("must be positive, got {}", self.launch_offset),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Jumper {
    config: JumperConfig,
    floor_height: f32,
    jumps_remaining: u32,
    velocity: f32,
}

impl Jumper {
    /// Create a jumper resting at the object's current height
    pub fn new(config: JumperConfig, object: &AnimatedObject) -> Self {
        Self {
            config,
            floor_height: object.position.y,
            jumps_remaining: 0,
            velocity: 0.0,
        }
    }

    pub fn floor_height(&self) -> f32 {
        self.floor_height
    }

    pub fn jumps_remaining(&self) -> u32 {
        self.jumps_remaining
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Airborne, or still owed a relaunch
    pub fn is_active(&self, object: &AnimatedObject) -> bool {
        object.position.y > self.floor_height || self.jumps_remaining > 0
    }

    pub fn start(&mut self, object: &mut AnimatedObject) {
        if self.jumps_remaining == 0 {
            self.jumps_remaining = self.config.jump_count;
        } else {
            self.jumps_remaining -= 1;
        }

        // Launch only from the floor; no air-jumping
        if object.position.y <= self.floor_height {
            object.position.y = self.floor_height + self.config.launch_offset;
            self.velocity = self.config.jump_velocity;
        }
    }

    pub fn update(&mut self, object: &mut AnimatedObject, dt: f32) {
        // A zero step must not relaunch from the landing frame
        if dt <= 0.0 {
            return;
        }

        if object.position.y > self.floor_height {
            self.velocity += self.config.gravity_coeff * dt;
            object.position.y = (object.position.y + self.velocity * dt).max(self.floor_height);
            return;
        }

        self.velocity = 0.0;
        if self.jumps_remaining > 0 {
            self.start(object);
        } else {
            object.position.y = self.floor_height;
        }
    }
}
