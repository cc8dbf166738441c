//! Errors for malformed detector output.

use thiserror::Error;

/// Why a frame of landmarks could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    /// A hand did not carry exactly 21 points.
    #[error("expected {expected} landmarks per hand, found {found}")]
    WrongPointCount { expected: usize, found: usize },

    /// A coordinate was NaN or infinite.
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    /// The detector reported more hands than the interpreter handles.
    #[error("at most 2 hands are supported, found {found}")]
    TooManyHands { found: usize },
}
