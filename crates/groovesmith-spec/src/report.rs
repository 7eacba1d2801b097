//! Recoverable generation outcomes.
//!
//! Generation and rendering either fail with an error (bad input) or succeed
//! with an artifact. A successful artifact may still have been produced with
//! fallback content; those cases are listed in [`Generated::warnings`].

use std::fmt;

use serde::Serialize;

/// Which lookup table a name was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Genre,
    Style,
    Mood,
    Key,
    Scale,
    Chord,
    TimeSignature,
}

impl Category {
    /// Returns the lowercase category name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Genre => "genre",
            Category::Style => "style",
            Category::Mood => "mood",
            Category::Key => "key",
            Category::Scale => "scale",
            Category::Chord => "chord",
            Category::TimeSignature => "time_signature",
        }
    }
}

/// A condition that was recovered from while producing an artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// An unrecognized name was replaced by a default.
    UnknownCategory {
        category: Category,
        requested: String,
        fallback: String,
    },
    /// A bounded loop ran out of attempts and used its uniform fallback.
    ExhaustedRetry { stage: String, attempts: usize },
    /// A single note, step, or chord could not be synthesized and was skipped.
    SynthesisDegradation { unit: String, reason: String },
    /// Inputs disagreed and were reconciled by a documented rule.
    Reconciled { field: String, message: String },
    /// A generator failed internally and returned its fixed fallback artifact.
    FallbackContent { stage: String, reason: String },
}

impl GenerationWarning {
    /// Creates an unknown-category warning.
    pub fn unknown(
        category: Category,
        requested: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        Self::UnknownCategory {
            category,
            requested: requested.into(),
            fallback: fallback.into(),
        }
    }

    /// Creates a synthesis degradation warning.
    pub fn degraded(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SynthesisDegradation {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Stable warning code.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationWarning::UnknownCategory { .. } => "W_UNKNOWN_CATEGORY",
            GenerationWarning::ExhaustedRetry { .. } => "W_EXHAUSTED_RETRY",
            GenerationWarning::SynthesisDegradation { .. } => "W_SYNTHESIS_DEGRADED",
            GenerationWarning::Reconciled { .. } => "W_RECONCILED",
            GenerationWarning::FallbackContent { .. } => "W_FALLBACK_CONTENT",
        }
    }

    /// Emits the warning as a `tracing` event and returns it.
    pub fn logged(self) -> Self {
        tracing::warn!(code = self.code(), "{}", self);
        self
    }
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationWarning::UnknownCategory {
                category,
                requested,
                fallback,
            } => write!(
                f,
                "unknown {} '{}', using '{}'",
                category.as_str(),
                requested,
                fallback
            ),
            GenerationWarning::ExhaustedRetry { stage, attempts } => {
                write!(f, "{} did not converge after {} attempts", stage, attempts)
            }
            GenerationWarning::SynthesisDegradation { unit, reason } => {
                write!(f, "skipped {}: {}", unit, reason)
            }
            GenerationWarning::Reconciled { field, message } => {
                write!(f, "reconciled {}: {}", field, message)
            }
            GenerationWarning::FallbackContent { stage, reason } => {
                write!(f, "{} fell back to fixed content: {}", stage, reason)
            }
        }
    }
}

/// An artifact together with the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated<T> {
    /// The produced artifact.
    pub value: T,
    /// Recovered conditions, in the order they occurred.
    pub warnings: Vec<GenerationWarning>,
}

impl<T> Generated<T> {
    /// Wraps an artifact that was produced without any fallback.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Wraps an artifact with previously collected warnings.
    pub fn with_warnings(value: T, warnings: Vec<GenerationWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if no fallback was taken.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Discards the warnings.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Splits into artifact and warnings.
    pub fn into_parts(self) -> (T, Vec<GenerationWarning>) {
        (self.value, self.warnings)
    }

    /// Maps the artifact, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Returns the artifact and appends its warnings to `sink`.
    pub fn drain_into(self, sink: &mut Vec<GenerationWarning>) -> T {
        sink.extend(self.warnings);
        self.value
    }
}
