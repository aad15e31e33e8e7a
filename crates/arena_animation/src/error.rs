//! Error types for arena_animation

use crate::behavior::BehaviorKind;
use thiserror::Error;

/// Errors raised by behavior construction and triggering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimatorError {
    /// The behavior needs the triggering object's position and none was given
    #[error("{kind} behavior started without a triggering position")]
    MissingTrigger { kind: BehaviorKind },

    /// A configuration value is out of range
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Result type for arena_animation operations
pub type Result<T> = std::result::Result<T, AnimatorError>;
