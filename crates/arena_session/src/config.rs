//! Session configuration
//!
//! Loaded from a TOML file. Every field has a default, so a config only needs
//! the values that differ from the standard engagement protocol:
//!
//! ```toml
//! [experiment]
//! experimenter = "J. Doe"
//! corner = 3
//! interaction_level = "interactive"
//!
//! [behavior.spinner]
//! spin_velocity = 90.0
//! ```

use crate::error::{Result, SessionError};
use arena_animation::{BehaviorConfig, BehaviorKind};
use arena_core::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How much the virtual objects do
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionLevel {
    /// Arena only, no virtual objects
    #[default]
    None,
    /// Objects are placed but never react
    Static,
    /// Objects react when the subject comes close
    Interactive,
}

impl InteractionLevel {
    /// Numeric level recorded in session metadata (0-2)
    pub fn level(self) -> u8 {
        match self {
            InteractionLevel::None => 0,
            InteractionLevel::Static => 1,
            InteractionLevel::Interactive => 2,
        }
    }

    pub fn has_objects(self) -> bool {
        !matches!(self, InteractionLevel::None)
    }
}

/// Protocol parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub name: String,
    pub experimenter: String,
    /// Number of phases; each phase gets its own set of objects
    pub phases: u32,
    pub phase_secs: f32,
    /// Arena corner (1-4) where objects appear
    pub corner: u8,
    pub interaction_level: InteractionLevel,
    /// Subject-object distance (meters) below which behaviors trigger
    pub interaction_distance: f32,
    /// Seed for object selection and spin directions; random when absent
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "VR_Engagement".to_string(),
            experimenter: String::new(),
            phases: 2,
            phase_secs: 5.0 * 60.0,
            corner: 1,
            interaction_level: InteractionLevel::None,
            interaction_distance: 0.05,
            seed: None,
        }
    }
}

/// Rigid bodies in the tracking project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub arena_body: String,
    pub subject_body: String,
    /// Orientation resets performed before reading the arena markers
    pub orientation_resets: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            arena_body: "Arena".to_string(),
            subject_body: "Rat".to_string(),
            orientation_resets: 3,
        }
    }
}

/// Virtual object placement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Mesh names objects are drawn from
    pub primitives: Vec<String>,
    /// Behaviors assigned at the interactive level
    pub behaviors: Vec<BehaviorKind>,
    /// Arena-local anchor positions (`PosCenter`, `PosSide<n>`, `PosCorner<n>`)
    pub anchors: BTreeMap<String, Vec3>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        const H: f32 = 0.03;
        const R: f32 = 0.25;
        let anchors = [
            ("PosCenter", Vec3::new(0.0, H, 0.0)),
            ("PosSide1", Vec3::new(R, H, 0.0)),
            ("PosSide2", Vec3::new(0.0, H, R)),
            ("PosSide3", Vec3::new(-R, H, 0.0)),
            ("PosSide4", Vec3::new(0.0, H, -R)),
            ("PosCorner1", Vec3::new(R, H, R)),
            ("PosCorner2", Vec3::new(-R, H, R)),
            ("PosCorner3", Vec3::new(-R, H, -R)),
            ("PosCorner4", Vec3::new(R, H, -R)),
        ]
        .into_iter()
        .map(|(name, pos)| (name.to_string(), pos))
        .collect();

        Self {
            primitives: ["Cube", "Sphere", "Cylinder", "Cone", "Torus"]
                .into_iter()
                .map(String::from)
                .collect(),
            behaviors: vec![
                BehaviorKind::Jumper,
                BehaviorKind::Scaler,
                BehaviorKind::Spinner,
            ],
            anchors,
        }
    }
}

impl SceneConfig {
    /// Anchor names used for a corner, as (role, anchor) pairs
    pub fn anchor_names(corner: u8) -> [(&'static str, String); 3] {
        [
            ("center", "PosCenter".to_string()),
            ("side", format!("PosSide{corner}")),
            ("corner", format!("PosCorner{corner}")),
        ]
    }
}

/// Projector camera settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Clear color (rgb)
    pub background: [f32; 3],
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            fov_y: 27.8,
            background: [0.0, 0.0, 0.5],
        }
    }
}

/// Experiment log output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub directory: PathBuf,
    /// Record every frame, not just phase boundaries
    pub frames: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            frames: true,
        }
    }
}

/// Full configuration for one experiment session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub experiment: ExperimentConfig,
    pub tracking: TrackingConfig,
    pub scene: SceneConfig,
    pub projector: ProjectorConfig,
    pub log: LogConfig,
    pub behavior: BehaviorConfig,
}

/// Session parameters written at the top of the experiment log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub experiment: String,
    pub experimenter: String,
    pub total_phases: u32,
    pub phase_secs: f32,
    pub corner: u8,
    /// 0 = none, 1 = static, 2 = interactive
    pub interaction_level: u8,
    pub interaction_distance: f32,
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SessionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: SessionConfig =
            toml::from_str(&content).map_err(|source| SessionError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SessionConfig =
            toml::from_str(content).map_err(|source| SessionError::ConfigParse {
                path: PathBuf::from("<string>"),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let exp = &self.experiment;
        if exp.phases == 0 {
            return Err(SessionError::Config("experiment.phases must be at least 1".into()));
        }
        if !exp.phase_secs.is_finite() || exp.phase_secs <= 0.0 {
            return Err(SessionError::Config(format!(
                "experiment.phase_secs must be positive, got {}",
                exp.phase_secs
            )));
        }
        if !(1..=4).contains(&exp.corner) {
            return Err(SessionError::Config(format!(
                "experiment.corner must be 1-4, got {}",
                exp.corner
            )));
        }
        if !exp.interaction_distance.is_finite() || exp.interaction_distance <= 0.0 {
            return Err(SessionError::Config(format!(
                "experiment.interaction_distance must be positive, got {}",
                exp.interaction_distance
            )));
        }
        if self.tracking.arena_body.is_empty() || self.tracking.subject_body.is_empty() {
            return Err(SessionError::Config("tracking body names must not be empty".into()));
        }

        if exp.interaction_level.has_objects() {
            if self.scene.primitives.is_empty() {
                return Err(SessionError::Config("scene.primitives is empty".into()));
            }
            for (_, anchor) in SceneConfig::anchor_names(exp.corner) {
                if !self.scene.anchors.contains_key(&anchor) {
                    return Err(SessionError::Config(format!("missing scene anchor '{anchor}'")));
                }
            }
        }
        if exp.interaction_level == InteractionLevel::Interactive && self.scene.behaviors.is_empty()
        {
            return Err(SessionError::Config("scene.behaviors is empty".into()));
        }

        self.behavior.validate()?;
        Ok(())
    }

    pub fn metadata(&self) -> Metadata {
        let exp = &self.experiment;
        Metadata {
            experiment: exp.name.clone(),
            experimenter: exp.experimenter.clone(),
            total_phases: exp.phases,
            phase_secs: exp.phase_secs,
            corner: exp.corner,
            interaction_level: exp.interaction_level.level(),
            interaction_distance: exp.interaction_distance,
            seed: exp.seed,
        }
    }

    /// Set the experimenter name
    pub fn with_experimenter(mut self, name: impl Into<String>) -> Self {
        self.experiment.experimenter = name.into();
        self
    }

    /// Set the interaction level
    pub fn with_interaction_level(mut self, level: InteractionLevel) -> Self {
        self.experiment.interaction_level = level;
        self
    }

    /// Set the phase count and duration
    pub fn with_phases(mut self, phases: u32, phase_secs: f32) -> Self {
        self.experiment.phases = phases;
        self.experiment.phase_secs = phase_secs;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.experiment.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.experiment.phases, 2);
        assert_eq!(config.experiment.phase_secs, 300.0);
        assert_eq!(config.projector.fov_y, 27.8);
    }

    #[test]
    fn test_partial_toml() {
        let config = SessionConfig::from_toml_str(
            r#"
            [experiment]
            experimenter = "J. Doe"
            corner = 3
            interaction_level = "interactive"

            [behavior.spinner]
            spin_velocity = 90.0
            "#,
        )
        .unwrap();

        assert_eq!(config.experiment.corner, 3);
        assert_eq!(config.experiment.interaction_level, InteractionLevel::Interactive);
        assert_eq!(config.behavior.spinner.spin_velocity, 90.0);
        // Untouched fields keep their defaults
        assert_eq!(config.behavior.spinner.guard_secs, 2.0);
        assert_eq!(config.tracking.subject_body, "Rat");
    }

    #[test]
    fn test_rejects_bad_corner() {
        let err = SessionConfig::from_toml_str("[experiment]\ncorner = 5\n").unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_rejects_missing_anchor() {
        let mut config = SessionConfig::default().with_interaction_level(InteractionLevel::Static);
        config.scene.anchors.remove("PosSide1");
        assert!(config.validate().is_err());

        // Without objects the anchors are never read
        config.experiment.interaction_level = InteractionLevel::None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_behavior_params() {
        let mut config = SessionConfig::default();
        config.behavior.runner.run_speed = -1.0;
        assert!(matches!(config.validate(), Err(SessionError::Animator(_))));
    }

    #[test]
    fn test_unparseable_toml() {
        let err = SessionConfig::from_toml_str("[experiment\nphases = ").unwrap_err();
        assert!(matches!(err, SessionError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SessionConfig::load(Path::new("/nonexistent/arena.toml")).unwrap_err();
        assert!(matches!(err, SessionError::ConfigRead { .. }));
    }

    #[test]
    fn test_metadata_levels() {
        let config = SessionConfig::default()
            .with_interaction_level(InteractionLevel::Interactive)
            .with_experimenter("N. D.");
        let meta = config.metadata();
        assert_eq!(meta.interaction_level, 2);
        assert_eq!(meta.experimenter, "N. D.");
        assert_eq!(meta.interaction_distance, 0.05);
    }
}
