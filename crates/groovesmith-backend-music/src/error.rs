//! Error types for the music backend.

use groovesmith_backend_audio::AudioError;
use groovesmith_spec::{BackendError, SpecError};
use thiserror::Error;

/// Result type for composition.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors that can occur while composing.
///
/// Only malformed requests are errors. Unknown genres, moods, and chord
/// symbols fall back to defaults and are reported as warnings.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A request or record failed validation.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// An audio-side helper rejected its input.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Writing the MIDI file failed.
    #[error("MIDI write error: {0}")]
    Midi(#[from] std::io::Error),
}

impl ComposeError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl BackendError for ComposeError {
    fn code(&self) -> &'static str {
        match self {
            ComposeError::Spec(_) => "MUSIC_001",
            ComposeError::Audio(_) => "MUSIC_002",
            ComposeError::InvalidParameter { .. } => "MUSIC_003",
            ComposeError::Midi(_) => "MUSIC_004",
        }
    }

    fn category(&self) -> &'static str {
        "music"
    }
}
