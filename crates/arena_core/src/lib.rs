//! Arena Core
//!
//! Shared primitives for the arena VR experiment:
//!
//! - **Vec3**: small 3D vector with the horizontal-plane helpers the
//!   behaviors and proximity checks need
//! - **AnimatedObject**: position, y-rotation and uniform scale of a
//!   virtual object, mutated in place by its behavior each frame
//! - **ArenaFrame**: the tracked arena's pose, used to move points between
//!   world (motion capture) space and arena-local space

pub mod frame;
pub mod math;
pub mod object;

pub use frame::ArenaFrame;
pub use math::Vec3;
pub use object::AnimatedObject;
