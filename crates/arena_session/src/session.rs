//! Session lifecycle
//!
//! `init_tracking` → `init_scene` → `run` → `teardown`. Each stage is an
//! explicit call so a caller can swap any collaborator (tracker, surface,
//! log, clock) without touching the frame loop.

use crate::clock::FrameClock;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::log::{ExperimentLog, FrameRecord};
use crate::scene::{build_phase_scenes, Scene};
use crate::surface::{FrameView, RenderSurface};
use crate::tracking::{marker_yaw, PoseSource, RigidBodyPose};
use arena_core::ArenaFrame;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

/// What a run produced
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Phases that ran to the end of their timer
    pub phases_completed: u32,
    pub frames: u64,
    pub triggers: u64,
    /// Seconds of frame time covered
    pub elapsed: f64,
    /// The surface asked to stop before the last phase ended
    pub quit: bool,
}

pub struct Session<P: PoseSource> {
    config: SessionConfig,
    source: P,
    rng: StdRng,
    marker_yaw: f32,
    arena: ArenaFrame,
    scenes: Vec<Scene>,
}

impl<P: PoseSource> Session<P> {
    /// Connect to tracking and calibrate the arena orientation
    ///
    /// The arena's reported orientation is reset a few times so the tracker
    /// settles, then the marker cloud decides how far the virtual arena must
    /// turn to match the physical one.
    pub fn init_tracking(config: SessionConfig, mut source: P) -> Result<Self> {
        config.validate()?;

        source.poll()?;
        let arena_body = config.tracking.arena_body.as_str();
        for _ in 0..config.tracking.orientation_resets {
            source.reset_orientation(arena_body)?;
            source.poll()?;
        }

        let markers = source
            .markers(arena_body)
            .ok_or_else(|| SessionError::MissingBody(arena_body.to_string()))?;
        let marker_yaw = marker_yaw(markers).unwrap_or_else(|| {
            tracing::warn!("Arena markers have no horizontal spread; using tracked yaw only");
            0.0
        });

        let pose = source
            .pose(arena_body)
            .ok_or_else(|| SessionError::MissingBody(arena_body.to_string()))?;
        let arena = ArenaFrame::new(pose.position, pose.yaw + marker_yaw);
        tracing::info!(
            "Tracking ready: arena at {:?}, marker yaw {:.2} deg",
            pose.position,
            marker_yaw
        );

        let rng = match config.experiment.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            source,
            rng,
            marker_yaw,
            arena,
            scenes: Vec::new(),
        })
    }

    /// Place the virtual objects for every phase
    pub fn init_scene(&mut self) -> Result<()> {
        self.scenes = build_phase_scenes(&self.config, &mut self.rng)?;
        tracing::info!(
            "Built {} phase scenes ({} objects each, level {:?})",
            self.scenes.len(),
            self.scenes.first().map_or(0, Scene::len),
            self.config.experiment.interaction_level
        );
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Arena frame as of the last tracked frame
    pub fn arena_frame(&self) -> ArenaFrame {
        self.arena
    }

    pub fn marker_yaw(&self) -> f32 {
        self.marker_yaw
    }

    /// Run every phase
    ///
    /// Stops early when the surface requests quit. Tracking, render and log
    /// failures end the run with an error.
    pub fn run<S, L, C>(&mut self, surface: &mut S, log: &mut L, clock: &mut C) -> Result<RunSummary>
    where
        S: RenderSurface,
        L: ExperimentLog,
        C: FrameClock,
    {
        if self.scenes.len() != self.config.experiment.phases as usize {
            self.init_scene()?;
        }

        log.metadata(&self.config.metadata())?;
        let mut summary = RunSummary::default();

        'phases: for phase in 0..self.config.experiment.phases {
            tracing::info!("Start of phase {}", phase);
            log.line(summary.elapsed, &format!("Start of Phase {phase}"))?;

            let phase_secs = f64::from(self.config.experiment.phase_secs);
            let mut phase_time = 0.0_f64;
            loop {
                if surface.quit_requested() {
                    tracing::info!("Quit requested during phase {}", phase);
                    summary.quit = true;
                    break 'phases;
                }

                let dt = clock.tick();
                phase_time += f64::from(dt);
                if phase_time >= phase_secs {
                    break;
                }
                summary.elapsed += f64::from(dt);

                self.frame(
                    phase,
                    summary.frames,
                    dt,
                    summary.elapsed,
                    surface,
                    log,
                    &mut summary.triggers,
                )?;
                summary.frames += 1;
            }

            summary.phases_completed += 1;
            log.line(summary.elapsed, &format!("End of Phase {phase}"))?;
        }

        log.flush()?;
        tracing::info!(
            "Session finished: {} phases, {} frames, {} triggers",
            summary.phases_completed,
            summary.frames,
            summary.triggers
        );
        Ok(summary)
    }

    #[allow(clippy::too_many_arguments)]
    fn frame<S, L>(
        &mut self,
        phase: u32,
        frame: u64,
        dt: f32,
        time: f64,
        surface: &mut S,
        log: &mut L,
        triggers: &mut u64,
    ) -> Result<()>
    where
        S: RenderSurface,
        L: ExperimentLog,
    {
        self.source.poll()?;

        let arena_pose = self.body_pose(&self.config.tracking.arena_body)?;
        self.arena = ArenaFrame::new(arena_pose.position, arena_pose.yaw + self.marker_yaw);
        let subject = self.body_pose(&self.config.tracking.subject_body)?;
        let subject_local = self.arena.to_local(subject.position);

        let scene = &mut self.scenes[phase as usize];
        let triggered = scene.step(
            subject_local,
            self.config.experiment.interaction_distance,
            dt,
            &mut self.rng,
        )?;
        *triggers += triggered.len() as u64;

        let view = FrameView::compose(
            phase,
            frame,
            self.arena,
            subject,
            &self.config.projector,
            &self.scenes[phase as usize],
        );
        surface.draw(&view)?;

        if self.config.log.frames {
            let names: SmallVec<[String; 2]> = triggered
                .iter()
                .filter_map(|&id| self.scenes[phase as usize].get(id))
                .map(|entry| entry.name.clone())
                .collect();
            log.frame(FrameRecord::from_view(&view, time, names))?;
        }

        surface.flip()?;
        Ok(())
    }

    fn body_pose(&self, body: &str) -> Result<RigidBodyPose> {
        self.source
            .pose(body)
            .ok_or_else(|| SessionError::MissingBody(body.to_string()))
    }

    /// Close the surface and hand the pose source back
    pub fn teardown<S: RenderSurface>(self, surface: &mut S) -> Result<P> {
        surface.close()?;
        tracing::info!("Session closed");
        Ok(self.source)
    }
}
