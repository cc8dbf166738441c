//! Error types for the application crate.

use thiserror::Error;

/// Why a landmark source could not be started.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcquisitionError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera available: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("could not start hand tracking: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// The source was lost when a tracking worker panicked.
    #[error("landmark source is no longer available")]
    SourceLost,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("window error: {0}")]
    Window(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
