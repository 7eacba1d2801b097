//! Request parameter records.
//!
//! These are the shapes the surrounding layer deserializes from JSON and
//! hands to the composers. Every field has a default so partial requests
//! are accepted; unknown fields are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::validation::{validate_bars, validate_duration, validate_tempo};

/// Analysis of a reference track, used as an optional bias.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceAnalysis {
    pub tempo: Option<u32>,
    pub key: Option<String>,
    pub genre: Option<String>,
    pub energy: Option<f64>,
    pub mood: Option<String>,
    pub time_signature: Option<String>,
    pub chord_progression: Option<Vec<String>>,
}

impl ReferenceAnalysis {
    /// The analysis assumed when a reference track could not be analyzed.
    pub fn neutral() -> Self {
        Self {
            tempo: Some(120),
            key: Some("C".to_string()),
            genre: Some("pop".to_string()),
            energy: Some(0.7),
            mood: Some("neutral".to_string()),
            time_signature: Some("4/4".to_string()),
            chord_progression: Some(
                ["I", "V", "vi", "IV"].iter().map(|s| s.to_string()).collect(),
            ),
        }
    }

    /// Rejects non-finite energy and a zero tempo.
    pub fn validate(&self) -> SpecResult<()> {
        if let Some(tempo) = self.tempo {
            validate_tempo(tempo).map_err(|_| {
                SpecError::invalid_input("reference.tempo", "must be greater than 0 BPM")
            })?;
        }
        if let Some(energy) = self.energy {
            if !energy.is_finite() {
                return Err(SpecError::invalid_input(
                    "reference.energy",
                    format!("must be finite, got {}", energy),
                ));
            }
        }
        Ok(())
    }
}

/// Drum pattern request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeatParams {
    pub genre: String,
    pub tempo: u32,
    pub bars: u32,
    pub complexity: f64,
    pub reference: Option<ReferenceAnalysis>,
}

impl Default for BeatParams {
    fn default() -> Self {
        Self {
            genre: "hip-hop".to_string(),
            tempo: 120,
            bars: 4,
            complexity: 0.7,
            reference: None,
        }
    }
}

impl BeatParams {
    /// Checks tempo, bar count, and numeric fields.
    pub fn validate(&self) -> SpecResult<()> {
        validate_tempo(self.tempo)?;
        validate_bars(self.bars)?;
        if !self.complexity.is_finite() {
            return Err(SpecError::invalid_input(
                "complexity",
                format!("must be finite, got {}", self.complexity),
            ));
        }
        if let Some(reference) = &self.reference {
            reference.validate()?;
        }
        Ok(())
    }
}

/// Melody request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MelodyParams {
    pub key: String,
    pub scale: String,
    pub tempo: u32,
    pub bars: u32,
    pub chord_progression: Option<Vec<String>>,
    pub reference: Option<ReferenceAnalysis>,
}

impl Default for MelodyParams {
    fn default() -> Self {
        Self {
            key: "C".to_string(),
            scale: "major".to_string(),
            tempo: 120,
            bars: 4,
            chord_progression: None,
            reference: None,
        }
    }
}

impl MelodyParams {
    /// Checks tempo and bar count.
    pub fn validate(&self) -> SpecResult<()> {
        validate_tempo(self.tempo)?;
        validate_bars(self.bars)?;
        if let Some(reference) = &self.reference {
            reference.validate()?;
        }
        Ok(())
    }
}

/// Chord progression suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarmonyParams {
    pub key: String,
    pub genre: String,
    pub mood: String,
    pub bars: u32,
}

impl Default for HarmonyParams {
    fn default() -> Self {
        Self {
            key: "C".to_string(),
            genre: "pop".to_string(),
            mood: "happy".to_string(),
            bars: 4,
        }
    }
}

impl HarmonyParams {
    /// Checks the bar count.
    pub fn validate(&self) -> SpecResult<()> {
        validate_bars(self.bars)?;
        Ok(())
    }
}

/// Whole-song request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SongParams {
    pub style: String,
    pub tempo: u32,
    pub key: String,
    /// Target length in seconds; the last section may overshoot it.
    pub total_duration: f64,
}

impl Default for SongParams {
    fn default() -> Self {
        Self {
            style: "pop".to_string(),
            tempo: 120,
            key: "C".to_string(),
            total_duration: 180.0,
        }
    }
}

impl SongParams {
    /// Checks tempo and target duration.
    pub fn validate(&self) -> SpecResult<()> {
        validate_tempo(self.tempo)?;
        validate_duration("total_duration", self.total_duration)?;
        Ok(())
    }
}
