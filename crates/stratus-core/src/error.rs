use std::fmt;

/// Result type for loop and backend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which GPU parameter block an upload targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterBlockKind {
    Camera,
    Weather,
}

impl fmt::Display for ParameterBlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterBlockKind::Camera => f.write_str("camera"),
            ParameterBlockKind::Weather => f.write_str("weather"),
        }
    }
}

/// Errors that can occur while setting up or running the frame loop
///
/// `Setup` and `Shader` are fatal: resource creation failed at startup or resize.
/// `Upload` and `Frame` are per-tick and recovered by the loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Shader error: {0}")]
    Shader(String),

    #[error("Upload of {block} block failed: {reason}")]
    Upload {
        block: ParameterBlockKind,
        reason: String,
    },

    #[error("Frame error: {0}")]
    Frame(String),
}

impl Error {
    /// Whether this error must abort startup rather than degrade one frame
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Setup(_) | Error::Shader(_))
    }
}
