//! Error types for automation backends

use thiserror::Error;

/// Failures a backend reports from fallible primitives
#[derive(Debug, Error, Clone)]
pub enum BackendError {
    /// The platform refused or failed to start the app
    #[error("{0}")]
    LaunchFailed(String),

    /// The backend lost its connection to the platform
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub fn launch_failed(message: impl Into<String>) -> Self {
        Self::LaunchFailed(message.into())
    }
}
