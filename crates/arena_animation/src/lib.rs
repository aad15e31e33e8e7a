//! Arena Reactive Animator
//!
//! Small per-object behaviors that react when the tracked subject comes
//! within interaction distance of a virtual object.
//!
//! # Behaviors
//!
//! - **Spinner**: turns about the vertical axis while its guard timer runs
//! - **Jumper**: a bounded burst of gravity-driven hops
//! - **Scaler**: oscillates scale between its initial size and an end factor
//! - **Runner**: flees away from the trigger, then snaps back to its origin
//!
//! Every behavior exposes the same `start` / `update(dt)` contract and is
//! wrapped in [`Behavior`] so a scene can hold them uniformly. `dt` always
//! comes from the caller; nothing here reads a clock.
//!
//! ```rust
//! use arena_animation::{Behavior, BehaviorConfig, BehaviorKind};
//! use arena_core::{AnimatedObject, Vec3};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut object = AnimatedObject::at(Vec3::new(0.1, 0.0, 0.2));
//! let mut behavior = Behavior::new(BehaviorKind::Jumper, &object, &BehaviorConfig::default());
//!
//! behavior.start(&mut object, None, &mut rng).unwrap();
//! for _ in 0..10 {
//!     behavior.update(&mut object, 1.0 / 60.0);
//! }
//! assert!(object.position.y > 0.0);
//! ```

pub mod behavior;
pub mod error;
pub mod jumper;
pub mod runner;
pub mod scaler;
pub mod spinner;
pub mod timer;

pub use behavior::{Behavior, BehaviorConfig, BehaviorKind};
pub use error::{AnimatorError, Result};
pub use jumper::{Jumper, JumperConfig};
pub use runner::{Runner, RunnerConfig};
pub use scaler::{Scaler, ScalerConfig};
pub use spinner::{Spinner, SpinnerConfig};
pub use timer::CountdownTimer;
