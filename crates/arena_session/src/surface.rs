//! Render surface
//!
//! The renderer is external. Each frame the session composes a [`FrameView`]
//! of everything that should be on screen in world space and hands it over.

use crate::config::ProjectorConfig;
use crate::error::RenderError;
use crate::scene::Scene;
use crate::tracking::RigidBodyPose;
use arena_core::{ArenaFrame, Vec3};

/// One object to draw, in world space
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem<'a> {
    pub name: &'a str,
    pub mesh: &'a str,
    pub position: Vec3,
    /// Degrees about y, arena rotation included
    pub rot_y: f32,
    pub scale: f32,
    /// The object's behavior is mid-animation
    pub active: bool,
}

/// Everything a surface needs to draw one frame
#[derive(Clone, Debug)]
pub struct FrameView<'a> {
    pub phase: u32,
    pub frame: u64,
    /// Where the arena mesh goes
    pub arena: ArenaFrame,
    /// The virtual scene camera rides on the subject's head
    pub camera: RigidBodyPose,
    pub projector: &'a ProjectorConfig,
    pub objects: Vec<DrawItem<'a>>,
}

impl<'a> FrameView<'a> {
    pub fn compose(
        phase: u32,
        frame: u64,
        arena: ArenaFrame,
        camera: RigidBodyPose,
        projector: &'a ProjectorConfig,
        scene: &'a Scene,
    ) -> Self {
        let objects = scene
            .iter()
            .map(|(_, entry)| DrawItem {
                name: &entry.name,
                mesh: &entry.mesh,
                position: arena.to_world(entry.object.position),
                rot_y: entry.object.rot_y + arena.yaw,
                scale: entry.object.scale,
                active: entry
                    .behavior
                    .as_ref()
                    .is_some_and(|behavior| behavior.is_active(&entry.object)),
            })
            .collect();

        Self {
            phase,
            frame,
            arena,
            camera,
            projector,
            objects,
        }
    }
}

/// A window or projector output
pub trait RenderSurface {
    /// Draw the frame into the back buffer
    fn draw(&mut self, view: &FrameView<'_>) -> Result<(), RenderError>;

    /// Present the back buffer
    fn flip(&mut self) -> Result<(), RenderError>;

    /// Whether the operator asked to stop (escape key)
    fn quit_requested(&mut self) -> bool;

    /// Release the surface
    fn close(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A surface with no output, for dry runs and tests
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    frame_limit: Option<u64>,
    drawn: u64,
    flipped: u64,
    last_object_count: usize,
    closed: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request quit once this many frames have been presented
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn frames_drawn(&self) -> u64 {
        self.drawn
    }

    pub fn frames_flipped(&self) -> u64 {
        self.flipped
    }

    pub fn last_object_count(&self) -> usize {
        self.last_object_count
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RenderSurface for HeadlessSurface {
    fn draw(&mut self, view: &FrameView<'_>) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::Surface("draw after close".into()));
        }
        self.drawn += 1;
        self.last_object_count = view.objects.len();
        tracing::trace!(
            "Frame {} (phase {}): {} objects",
            view.frame,
            view.phase,
            view.objects.len()
        );
        Ok(())
    }

    fn flip(&mut self) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::Surface("flip after close".into()));
        }
        self.flipped += 1;
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        self.frame_limit.is_some_and(|limit| self.flipped >= limit)
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.closed = true;
        Ok(())
    }
}
