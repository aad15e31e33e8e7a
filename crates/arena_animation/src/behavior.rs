//! Behavior dispatch
//!
//! [`Behavior`] is the one type a scene stores per object. It forwards the
//! shared `start` / `update` contract to the variant it wraps.

use crate::error::{AnimatorError, Result};
use crate::jumper::{Jumper, JumperConfig};
use crate::runner::{Runner, RunnerConfig};
use crate::scaler::{Scaler, ScalerConfig};
use crate::spinner::{Spinner, SpinnerConfig};
use arena_core::{AnimatedObject, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior variant identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    Spinner,
    Jumper,
    Scaler,
    Runner,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 4] = [
        BehaviorKind::Spinner,
        BehaviorKind::Jumper,
        BehaviorKind::Scaler,
        BehaviorKind::Runner,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BehaviorKind::Spinner => "spinner",
            BehaviorKind::Jumper => "jumper",
            BehaviorKind::Scaler => "scaler",
            BehaviorKind::Runner => "runner",
        }
    }

    /// Whether `start` must be given the triggering position
    pub fn needs_trigger_position(self) -> bool {
        matches!(self, BehaviorKind::Runner)
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for every behavior variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub spinner: SpinnerConfig,
    pub jumper: JumperConfig,
    pub scaler: ScalerConfig,
    pub runner: RunnerConfig,
}

impl BehaviorConfig {
    pub fn validate(&self) -> Result<()> {
        self.spinner.validate()?;
        self.jumper.validate()?;
        self.scaler.validate()?;
        self.runner.validate()
    }
}

/// A reactive behavior attached to one object
#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    Spinner(Spinner),
    Jumper(Jumper),
    Scaler(Scaler),
    Runner(Runner),
}

impl Behavior {
    /// Create a behavior, capturing any rest state (floor, origin, base
    /// scale) from the object as it is now
    pub fn new(kind: BehaviorKind, object: &AnimatedObject, config: &BehaviorConfig) -> Self {
        match kind {
            BehaviorKind::Spinner => Behavior::Spinner(Spinner::new(config.spinner)),
            BehaviorKind::Jumper => Behavior::Jumper(Jumper::new(config.jumper, object)),
            BehaviorKind::Scaler => Behavior::Scaler(Scaler::new(config.scaler, object)),
            BehaviorKind::Runner => Behavior::Runner(Runner::new(config.runner, object)),
        }
    }

    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Spinner(_) => BehaviorKind::Spinner,
            Behavior::Jumper(_) => BehaviorKind::Jumper,
            Behavior::Scaler(_) => BehaviorKind::Scaler,
            Behavior::Runner(_) => BehaviorKind::Runner,
        }
    }

    /// Whether the behavior is mid-animation
    pub fn is_active(&self, object: &AnimatedObject) -> bool {
        match self {
            Behavior::Spinner(s) => s.is_active(),
            Behavior::Jumper(j) => j.is_active(object),
            Behavior::Scaler(s) => s.is_active(),
            Behavior::Runner(r) => r.is_active(),
        }
    }

    /// Trigger the behavior
    ///
    /// `from` is the triggering subject's position in the object's frame.
    /// Only the runner requires it; the others ignore it.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        object: &mut AnimatedObject,
        from: Option<Vec3>,
        rng: &mut R,
    ) -> Result<()> {
        let kind = self.kind();
        if kind.needs_trigger_position() && from.is_none() {
            return Err(AnimatorError::MissingTrigger { kind });
        }

        match self {
            Behavior::Spinner(s) => s.start(rng),
            Behavior::Jumper(j) => j.start(object),
            Behavior::Scaler(s) => s.start(),
            Behavior::Runner(r) => r.start(object, from.unwrap_or_default()),
        }
        Ok(())
    }

    /// Advance by one frame
    pub fn update(&mut self, object: &mut AnimatedObject, dt: f32) {
        match self {
            Behavior::Spinner(s) => s.update(object, dt),
            Behavior::Jumper(j) => j.update(object, dt),
            Behavior::Scaler(s) => s.update(object, dt),
            Behavior::Runner(r) => r.update(object, dt),
        }
    }
}
