//! Motion-capture tracking
//!
//! The tracker itself is external. [`PoseSource`] is the pull contract the
//! session needs from it: refresh once per frame, then read rigid-body poses
//! and the arena's raw marker cloud.

use crate::config::SessionConfig;
use crate::error::TrackingError;
use arena_core::{ArenaFrame, Vec3};
use serde::{Deserialize, Serialize};

/// Position and heading of a tracked rigid body in world space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyPose {
    pub position: Vec3,
    /// Rotation about y in degrees
    pub yaw: f32,
}

/// A motion-capture client
pub trait PoseSource {
    /// Pull the latest frame from the tracker
    fn poll(&mut self) -> Result<(), TrackingError>;

    /// Current pose of a rigid body, if it is tracked this frame
    fn pose(&self, body: &str) -> Option<RigidBodyPose>;

    /// World-space markers belonging to a rigid body
    fn markers(&self, body: &str) -> Option<&[Vec3]>;

    /// Re-zero a rigid body's reported orientation
    fn reset_orientation(&mut self, body: &str) -> Result<(), TrackingError>;
}

/// Extra yaw (degrees) that lines the arena's x axis up with the direction of
/// greatest marker spread on the floor plane
///
/// Returns `None` for fewer than two markers or a cloud with no horizontal
/// spread. The result is only defined up to a half turn.
pub fn marker_yaw(markers: &[Vec3]) -> Option<f32> {
    if markers.len() < 2 {
        return None;
    }

    let n = markers.len() as f32;
    let (sum_x, sum_z) = markers
        .iter()
        .fold((0.0, 0.0), |(sx, sz), m| (sx + m.x, sz + m.z));
    let (cx, cz) = (sum_x / n, sum_z / n);

    let (mut sxx, mut szz, mut sxz) = (0.0f32, 0.0f32, 0.0f32);
    for m in markers {
        let dx = m.x - cx;
        let dz = m.z - cz;
        sxx += dx * dx;
        szz += dz * dz;
        sxz += dx * dz;
    }
    if sxx + szz <= f32::EPSILON {
        return None;
    }

    // Principal axis angle measured from +x toward +z
    let theta = 0.5 * (2.0 * sxz).atan2(sxx - szz);
    Some(-theta.to_degrees())
}

/// Subject trajectory for [`ScriptedPoseSource`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CirclePath {
    /// Arena-local circle center
    pub center: Vec3,
    pub radius: f32,
    /// Radians per second
    pub angular_speed: f32,
}

impl CirclePath {
    pub fn at(&self, t: f32) -> Vec3 {
        let angle = self.angular_speed * t;
        self.center + Vec3::new(self.radius * angle.cos(), 0.0, self.radius * angle.sin())
    }

    /// Heading (degrees) of travel along the path at `t`
    pub fn heading(&self, t: f32) -> f32 {
        let angle = self.angular_speed * t;
        let dx = -angle.sin() * self.angular_speed.signum();
        let dz = angle.cos() * self.angular_speed.signum();
        -dz.atan2(dx).to_degrees()
    }
}

/// Deterministic stand-in for a motion-capture client
///
/// The arena sits still with a fixed true yaw and a rectangular marker cloud;
/// the subject walks a circle in arena space. After an orientation reset the
/// arena reports zero yaw, like a real tracker re-zeroing a rigid body, and
/// only its markers reveal the true heading.
#[derive(Clone, Debug)]
pub struct ScriptedPoseSource {
    arena_body: String,
    subject_body: String,
    arena: ArenaFrame,
    yaw_offset: f32,
    markers: Vec<Vec3>,
    path: CirclePath,
    step: f32,
    time: f32,
    polls: u64,
    /// Polls after which the subject drops out of tracking
    dropout_after: Option<u64>,
}

impl ScriptedPoseSource {
    pub fn new(
        arena_body: impl Into<String>,
        subject_body: impl Into<String>,
        arena: ArenaFrame,
        path: CirclePath,
        step: f32,
    ) -> Self {
        // 0.8 x 0.5 m arena, long side on local x
        let markers = [(0.4, 0.25), (-0.4, 0.25), (-0.4, -0.25), (0.4, -0.25), (0.0, 0.25)]
            .into_iter()
            .map(|(x, z)| arena.to_world(Vec3::new(x, 0.0, z)))
            .collect();

        Self {
            arena_body: arena_body.into(),
            subject_body: subject_body.into(),
            arena,
            yaw_offset: 0.0,
            markers,
            path,
            step,
            time: 0.0,
            polls: 0,
            dropout_after: None,
        }
    }

    /// A source matching a session config: the subject circles the arena
    /// center through the side anchors at object height
    pub fn for_config(config: &SessionConfig, arena: ArenaFrame, step: f32) -> Self {
        let anchor = format!("PosSide{}", config.experiment.corner);
        let side = config
            .scene
            .anchors
            .get(&anchor)
            .copied()
            .unwrap_or(Vec3::new(0.25, 0.03, 0.0));
        let path = CirclePath {
            center: Vec3::new(0.0, side.y, 0.0),
            radius: side.horizontal().length().max(0.05),
            angular_speed: 0.8,
        };
        Self::new(
            config.tracking.arena_body.clone(),
            config.tracking.subject_body.clone(),
            arena,
            path,
            step,
        )
    }

    /// Stop reporting the subject after `polls` successful polls
    pub fn with_dropout_after(mut self, polls: u64) -> Self {
        self.dropout_after = Some(polls);
        self
    }

    fn subject_tracked(&self) -> bool {
        self.dropout_after.map_or(true, |n| self.polls <= n)
    }
}

impl PoseSource for ScriptedPoseSource {
    fn poll(&mut self) -> Result<(), TrackingError> {
        self.polls += 1;
        self.time += self.step;
        Ok(())
    }

    fn pose(&self, body: &str) -> Option<RigidBodyPose> {
        if body == self.arena_body {
            Some(RigidBodyPose {
                position: self.arena.origin,
                yaw: self.arena.yaw - self.yaw_offset,
            })
        } else if body == self.subject_body && self.subject_tracked() {
            Some(RigidBodyPose {
                position: self.arena.to_world(self.path.at(self.time)),
                yaw: self.path.heading(self.time) + self.arena.yaw,
            })
        } else {
            None
        }
    }

    fn markers(&self, body: &str) -> Option<&[Vec3]> {
        (body == self.arena_body).then_some(self.markers.as_slice())
    }

    fn reset_orientation(&mut self, body: &str) -> Result<(), TrackingError> {
        if body == self.arena_body {
            self.yaw_offset = self.arena.yaw;
            Ok(())
        } else if body == self.subject_body {
            Ok(())
        } else {
            Err(TrackingError::UnknownBody(body.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaw_close(a: f32, b: f32) -> bool {
        // Principal axes are equivalent modulo a half turn
        let d = (a - b).rem_euclid(180.0);
        d < 1e-2 || (180.0 - d) < 1e-2
    }

    #[test]
    fn test_marker_yaw_recovers_rotation() {
        for yaw in [0.0, 30.0, -55.0, 80.0] {
            let frame = ArenaFrame::new(Vec3::new(1.0, 0.0, 2.0), yaw);
            let markers: Vec<Vec3> = [(0.4, 0.1), (-0.4, 0.1), (-0.4, -0.1), (0.4, -0.1)]
                .into_iter()
                .map(|(x, z)| frame.to_world(Vec3::new(x, 0.0, z)))
                .collect();
            let estimated = marker_yaw(&markers).unwrap();
            assert!(yaw_close(estimated, yaw), "{estimated} vs {yaw}");
        }
    }

    #[test]
    fn test_marker_yaw_degenerate() {
        assert_eq!(marker_yaw(&[]), None);
        assert_eq!(marker_yaw(&[Vec3::ZERO]), None);
        assert_eq!(marker_yaw(&[Vec3::ONE, Vec3::ONE]), None);
    }

    #[test]
    fn test_reset_zeroes_arena_yaw() {
        let arena = ArenaFrame::new(Vec3::ZERO, 25.0);
        let path = CirclePath {
            center: Vec3::ZERO,
            radius: 0.2,
            angular_speed: 1.0,
        };
        let mut source = ScriptedPoseSource::new("Arena", "Rat", arena, path, 0.01);
        assert_eq!(source.pose("Arena").unwrap().yaw, 25.0);

        source.reset_orientation("Arena").unwrap();
        assert_eq!(source.pose("Arena").unwrap().yaw, 0.0);
        assert!(matches!(
            source.reset_orientation("Cage"),
            Err(TrackingError::UnknownBody(_))
        ));
    }

    #[test]
    fn test_subject_follows_path_in_arena_space() {
        let arena = ArenaFrame::new(Vec3::new(0.5, 0.0, 0.5), 40.0);
        let path = CirclePath {
            center: Vec3::new(0.0, 0.03, 0.0),
            radius: 0.25,
            angular_speed: 0.8,
        };
        let mut source = ScriptedPoseSource::new("Arena", "Rat", arena, path, 0.1);
        for _ in 0..7 {
            source.poll().unwrap();
            let world = source.pose("Rat").unwrap().position;
            let local = arena.to_local(world);
            assert!((local.horizontal().length() - 0.25).abs() < 1e-4);
            assert!((local.y - 0.03).abs() < 1e-5);
        }
    }

    #[test]
    fn test_dropout() {
        let path = CirclePath {
            center: Vec3::ZERO,
            radius: 0.1,
            angular_speed: 1.0,
        };
        let mut source =
            ScriptedPoseSource::new("Arena", "Rat", ArenaFrame::default(), path, 0.1)
                .with_dropout_after(2);
        source.poll().unwrap();
        source.poll().unwrap();
        assert!(source.pose("Rat").is_some());
        source.poll().unwrap();
        assert!(source.pose("Rat").is_none());
        assert!(source.pose("Arena").is_some());
    }
}
