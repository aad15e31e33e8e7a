//! Virtual scenes
//!
//! One scene per experiment phase. Each holds the objects placed at the
//! selected corner's anchors, every object owning at most one behavior.

use crate::config::{InteractionLevel, SceneConfig, SessionConfig};
use crate::error::{Result, SessionError};
use arena_animation::Behavior;
use arena_core::{AnimatedObject, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to an object in a scene
    pub struct ObjectId;
}

/// A placed virtual object
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Placement role (`center`, `side`, `corner`)
    pub name: String,
    /// Mesh drawn for this object
    pub mesh: String,
    /// Arena-local transform
    pub object: AnimatedObject,
    pub behavior: Option<Behavior>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: impl Into<String>, object: AnimatedObject) -> Self {
        Self {
            name: name.into(),
            mesh: mesh.into(),
            object,
            behavior: None,
        }
    }

    /// Attach a behavior
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

/// Objects triggered during one step
pub type Triggered = SmallVec<[ObjectId; 4]>;

#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        self.objects.insert(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter()
    }

    /// Run one frame of object behavior
    ///
    /// `subject` is the tracked subject in arena-local space. Every object
    /// closer than `interaction_distance` is triggered, then every behavior is
    /// advanced by `dt`.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        subject: Vec3,
        interaction_distance: f32,
        dt: f32,
        rng: &mut R,
    ) -> Result<Triggered> {
        let mut triggered = Triggered::new();

        for (id, entry) in self.objects.iter_mut() {
            let Some(behavior) = entry.behavior.as_mut() else {
                continue;
            };

            if subject.distance(entry.object.position) < interaction_distance {
                behavior.start(&mut entry.object, Some(subject), rng)?;
                tracing::debug!("Triggered {} ({}) on {}", entry.name, behavior.kind(), entry.mesh);
                triggered.push(id);
            }

            behavior.update(&mut entry.object, dt);
        }

        Ok(triggered)
    }
}

/// Build one scene per phase
///
/// Objects are placed at the center, side and corner anchors of the
/// configured corner, each with a randomly chosen mesh. At the interactive
/// level every object also gets a randomly chosen behavior.
pub fn build_phase_scenes<R: Rng + ?Sized>(
    config: &SessionConfig,
    rng: &mut R,
) -> Result<Vec<Scene>> {
    let level = config.experiment.interaction_level;
    let mut scenes = Vec::with_capacity(config.experiment.phases as usize);

    for phase in 0..config.experiment.phases {
        let mut scene = Scene::new();
        if level.has_objects() {
            for (role, anchor) in SceneConfig::anchor_names(config.experiment.corner) {
                let position = *config
                    .scene
                    .anchors
                    .get(&anchor)
                    .ok_or_else(|| SessionError::Config(format!("missing scene anchor '{anchor}'")))?;
                let mesh = config
                    .scene
                    .primitives
                    .choose(rng)
                    .ok_or_else(|| SessionError::Config("scene.primitives is empty".into()))?;

                let object = AnimatedObject::at(position);
                let mut entry = SceneObject::new(role, mesh.as_str(), object);

                if level == InteractionLevel::Interactive {
                    let kind = *config
                        .scene
                        .behaviors
                        .choose(rng)
                        .ok_or_else(|| SessionError::Config("scene.behaviors is empty".into()))?;
                    entry = entry.with_behavior(Behavior::new(kind, &object, &config.behavior));
                }

                tracing::debug!("Phase {}: placed {} at {} ({:?})", phase, mesh, anchor, position);
                scene.insert(entry);
            }
        }
        scenes.push(scene);
    }

    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_animation::{BehaviorConfig, BehaviorKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(level: InteractionLevel) -> SessionConfig {
        SessionConfig::default().with_interaction_level(level)
    }

    #[test]
    fn test_no_objects_at_level_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let scenes = build_phase_scenes(&config(InteractionLevel::None), &mut rng).unwrap();
        assert_eq!(scenes.len(), 2);
        assert!(scenes.iter().all(Scene::is_empty));
    }

    #[test]
    fn test_static_objects_have_no_behavior() {
        let mut rng = StdRng::seed_from_u64(2);
        let cfg = config(InteractionLevel::Static);
        let scenes = build_phase_scenes(&cfg, &mut rng).unwrap();

        for scene in &scenes {
            assert_eq!(scene.len(), 3);
            for (_, entry) in scene.iter() {
                assert!(entry.behavior.is_none());
                assert!(cfg.scene.primitives.contains(&entry.mesh));
            }
        }
    }

    #[test]
    fn test_interactive_objects_use_configured_kinds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cfg = config(InteractionLevel::Interactive);
        cfg.experiment.corner = 2;
        cfg.scene.behaviors = vec![BehaviorKind::Runner];
        let scenes = build_phase_scenes(&cfg, &mut rng).unwrap();

        let scene = &scenes[0];
        let mut names: Vec<&str> = scene.iter().map(|(_, e)| e.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["center", "corner", "side"]);

        for (_, entry) in scene.iter() {
            assert_eq!(entry.behavior.map(|b| b.kind()), Some(BehaviorKind::Runner));
            if entry.name == "corner" {
                assert_eq!(entry.object.position, cfg.scene.anchors["PosCorner2"]);
            }
        }
    }

    #[test]
    fn test_step_triggers_only_nearby() {
        let mut rng = StdRng::seed_from_u64(4);
        let behaviors = BehaviorConfig::default();
        let mut scene = Scene::new();

        let near = AnimatedObject::at(Vec3::new(0.0, 0.0, 0.0));
        let far = AnimatedObject::at(Vec3::new(1.0, 0.0, 0.0));
        let near_id = scene.insert(
            SceneObject::new("near", "Cube", near)
                .with_behavior(Behavior::new(BehaviorKind::Jumper, &near, &behaviors)),
        );
        scene.insert(
            SceneObject::new("far", "Cube", far)
                .with_behavior(Behavior::new(BehaviorKind::Jumper, &far, &behaviors)),
        );
        scene.insert(SceneObject::new("plain", "Sphere", AnimatedObject::new()));

        let triggered = scene
            .step(Vec3::new(0.02, 0.0, 0.0), 0.05, 1.0 / 60.0, &mut rng)
            .unwrap();
        assert_eq!(triggered.as_slice(), &[near_id]);

        let heights: Vec<f32> = scene.iter().map(|(_, e)| e.object.position.y).collect();
        assert_eq!(heights.iter().filter(|&&y| y > 0.0).count(), 1);
        assert!(scene.get(near_id).unwrap().object.position.y > 0.0);
    }

    #[test]
    fn test_runner_flees_subject() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut scene = Scene::new();
        let object = AnimatedObject::at(Vec3::new(0.25, 0.03, 0.0));
        let id = scene.insert(SceneObject::new("side", "Cone", object).with_behavior(Behavior::new(
            BehaviorKind::Runner,
            &object,
            &BehaviorConfig::default(),
        )));

        scene
            .step(Vec3::new(0.22, 0.03, 0.0), 0.05, 0.05, &mut rng)
            .unwrap();
        let moved = scene.get(id).unwrap().object.position;
        assert!(moved.x > 0.25);
        assert!((moved.z).abs() < 1e-6);
    }
}
