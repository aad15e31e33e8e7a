//! Arena reference frame
//!
//! The physical arena is a tracked rigid body. Everything virtual is laid out
//! in arena-local coordinates and follows the arena as it is tracked. Only the
//! yaw of the arena is applied: the arena rests on the floor, so pitch and roll
//! reported by the tracker are treated as noise.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaFrame {
    /// Arena origin in world space
    pub origin: Vec3,
    /// Rotation about y in degrees (tracked yaw plus marker alignment)
    pub yaw: f32,
}

impl ArenaFrame {
    pub fn new(origin: Vec3, yaw: f32) -> Self {
        Self { origin, yaw }
    }

    /// Map an arena-local point into world space
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        rotate_y(local, self.yaw.to_radians()) + self.origin
    }

    /// Map a world-space point into arena-local space
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        rotate_y(world - self.origin, -self.yaw.to_radians())
    }
}

fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_world_roundtrip() {
        let frame = ArenaFrame::new(Vec3::new(0.4, 0.1, -1.2), 37.0);
        let p = Vec3::new(0.25, 0.05, -0.3);
        assert!(frame.to_local(frame.to_world(p)).approx_eq(p, 1e-5));
        assert!(frame.to_world(frame.to_local(p)).approx_eq(p, 1e-5));
    }

    #[test]
    fn test_quarter_turn() {
        let frame = ArenaFrame::new(Vec3::ZERO, 90.0);
        let w = frame.to_world(Vec3::new(1.0, 0.0, 0.0));
        assert!(w.approx_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_translation_only() {
        let frame = ArenaFrame::new(Vec3::new(1.0, 2.0, 3.0), 0.0);
        assert_eq!(frame.to_local(Vec3::new(1.0, 2.0, 3.0)), Vec3::ZERO);
    }
}
