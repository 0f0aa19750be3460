//! Top-level error type for a mouse-controls session.

use thiserror::Error;

use crate::application::governor::CursorError;
use crate::infrastructure::key_capture::CaptureError;
use crate::infrastructure::storage::config::ConfigError;

/// Everything that can end a session abnormally.
#[derive(Debug, Error)]
pub enum MouseControlError {
    /// The configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The cursor or keyboard backend is missing or failed.
    #[error("input device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The governor thread could not be started.
    #[error("failed to start the cursor governor thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The governor thread panicked.
    #[error("the cursor governor thread panicked")]
    GovernorPanicked,
}

impl From<CursorError> for MouseControlError {
    fn from(e: CursorError) -> Self {
        Self::DeviceUnavailable(e.to_string())
    }
}

impl From<CaptureError> for MouseControlError {
    fn from(e: CaptureError) -> Self {
        Self::DeviceUnavailable(e.to_string())
    }
}
