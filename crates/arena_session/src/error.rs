//! Error types for arena_session

use arena_animation::AnimatorError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a pose source
#[derive(Error, Debug)]
pub enum TrackingError {
    /// The tracking system could not be reached or produced no frame
    #[error("tracking unavailable: {0}")]
    Unavailable(String),

    /// The requested rigid body is not part of the tracking project
    #[error("unknown rigid body '{0}'")]
    UnknownBody(String),
}

/// Failures reported by a render surface
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(String),
}

/// Failures writing the experiment log
#[derive(Error, Debug)]
pub enum LogError {
    #[error("log io: {0}")]
    Io(#[from] std::io::Error),

    #[error("log encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors that end a session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration parsed but is not usable
    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    /// A configured rigid body produced no pose this frame
    #[error("rigid body '{0}' is not tracked")]
    MissingBody(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Animator(#[from] AnimatorError),
}

/// Result type for arena_session operations
pub type Result<T> = std::result::Result<T, SessionError>;
