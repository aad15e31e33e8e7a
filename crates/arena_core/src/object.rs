//! Animated object transform

use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// A positionable, rotatable, scalable virtual object
///
/// Rotation is around the vertical axis only, in degrees. Scale is uniform.
/// Positions are arena-local: the session maps them into world space through
/// the current [`ArenaFrame`](crate::ArenaFrame) when drawing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedObject {
    pub position: Vec3,
    pub rot_y: f32,
    pub scale: f32,
}

impl Default for AnimatedObject {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rot_y: 0.0,
            scale: 1.0,
        }
    }
}

impl AnimatedObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create at a position
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set rotation around the y axis (degrees)
    pub fn with_rot_y(mut self, degrees: f32) -> Self {
        self.rot_y = degrees;
        self
    }

    /// Set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}
