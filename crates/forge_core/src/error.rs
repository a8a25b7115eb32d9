//! Error types for the build session.

use thiserror::Error;

/// Result type alias for session operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the session controller and its collaborators.
///
/// Generation failures are not represented here: they are recorded as
/// session failure state, not returned.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    /// No credential configured; the caller should open configuration.
    #[error("API configuration missing. Please add your key in settings.")]
    MissingCredential,

    #[error("Invalid state for {operation}: current={current}")]
    InvalidState { current: String, operation: String },

    #[error("Version index {index} out of bounds (history has {len} entries)")]
    OutOfBounds { index: usize, len: usize },

    /// A completion arrived for a build that is no longer outstanding.
    #[error("Build {0} is no longer outstanding")]
    StaleBuild(u64),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn invalid_state(current: impl std::fmt::Debug, operation: &str) -> Self {
        Self::InvalidState {
            current: format!("{:?}", current),
            operation: operation.to_string(),
        }
    }
}

/// Why a copy to the clipboard did not happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("No content to copy")]
    Empty,

    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
}
