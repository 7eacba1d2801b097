//! Error types shared by every groovesmith crate.

use thiserror::Error;

/// Result type for spec-level operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors raised while constructing or validating groovesmith records.
///
/// Every variant is fatal to the call that produced it. Recoverable conditions
/// (unknown genres, exhausted retries, skipped notes) are reported as
/// [`GenerationWarning`](crate::report::GenerationWarning) instead.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A parameter is outside its contract (zero bars, non-finite value, ...).
    #[error("invalid input '{field}': {message}")]
    InvalidInput {
        /// Name of the offending field.
        field: String,
        /// Human-readable reason.
        message: String,
    },

    /// A chord symbol could not be parsed.
    #[error("invalid chord symbol '{symbol}': {message}")]
    InvalidChord {
        /// The symbol as given.
        symbol: String,
        /// Why it was rejected.
        message: String,
    },

    /// A pattern grid did not have the canonical shape.
    #[error("invalid pattern grid: {0}")]
    InvalidPattern(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl SpecError {
    /// Creates an invalid input error.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid chord error.
    pub fn invalid_chord(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidChord {
            symbol: symbol.into(),
            message: message.into(),
        }
    }
}

/// Common interface for errors surfaced by the groovesmith backends.
///
/// Hosts use this to report a stable code and category without matching on
/// the concrete error enum of each crate.
///
/// # Example
///
/// ```
/// use groovesmith_spec::error::{BackendError, SpecError};
///
/// fn describe<E: BackendError>(err: &E) -> String {
///     format!("[{}] {}", err.code(), err.message())
/// }
///
/// let err = SpecError::invalid_input("bars", "must be at least 1");
/// assert!(describe(&err).starts_with("[SPEC_001]"));
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as `"AUDIO_001"`.
    fn code(&self) -> &'static str;

    /// Human-readable message, by default the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category such as `"audio"` or `"music"`.
    fn category(&self) -> &'static str;
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::InvalidInput { .. } => "SPEC_001",
            SpecError::InvalidChord { .. } => "SPEC_002",
            SpecError::InvalidPattern(_) => "SPEC_003",
            SpecError::JsonParse(_) => "SPEC_004",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}
