//! Arena Session
//!
//! Runs one VR engagement experiment: calibrate the tracked arena, place the
//! virtual objects for each phase, then drive the frame loop that triggers
//! and updates their behaviors and hands each frame to the renderer and the
//! experiment log.
//!
//! The tracker, renderer and log are traits ([`PoseSource`],
//! [`RenderSurface`], [`ExperimentLog`]) so the loop runs the same against
//! real hardware or the scripted stand-ins shipped here.
//!
//! ```rust
//! use arena_core::{ArenaFrame, Vec3};
//! use arena_session::{
//!     FixedStep, HeadlessSurface, InteractionLevel, MemoryLog, ScriptedPoseSource, Session,
//!     SessionConfig,
//! };
//!
//! let config = SessionConfig::default()
//!     .with_interaction_level(InteractionLevel::Interactive)
//!     .with_phases(1, 0.5)
//!     .with_seed(1);
//! let source = ScriptedPoseSource::for_config(&config, ArenaFrame::new(Vec3::ZERO, 0.0), 1.0 / 60.0);
//!
//! let mut session = Session::init_tracking(config, source).unwrap();
//! session.init_scene().unwrap();
//!
//! let mut surface = HeadlessSurface::new();
//! let summary = session
//!     .run(&mut surface, &mut MemoryLog::new(), &mut FixedStep::fps(60.0))
//!     .unwrap();
//! assert_eq!(summary.phases_completed, 1);
//! session.teardown(&mut surface).unwrap();
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod log;
pub mod scene;
pub mod session;
pub mod surface;
pub mod tracking;

pub use clock::{FixedStep, FrameClock, WallClock};
pub use config::{
    ExperimentConfig, InteractionLevel, LogConfig, Metadata, ProjectorConfig, SceneConfig,
    SessionConfig, TrackingConfig,
};
pub use error::{LogError, RenderError, Result, SessionError, TrackingError};
pub use log::{ExperimentLog, FrameRecord, JsonLinesLog, LogRecord, MemoryLog, ObjectRecord};
pub use scene::{build_phase_scenes, ObjectId, Scene, SceneObject, Triggered};
pub use session::{RunSummary, Session};
pub use surface::{DrawItem, FrameView, HeadlessSurface, RenderSurface};
pub use tracking::{marker_yaw, CirclePath, PoseSource, RigidBodyPose, ScriptedPoseSource};
