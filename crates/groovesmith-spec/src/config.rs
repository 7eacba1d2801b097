//! Render and mix settings.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::pcm::DEFAULT_SAMPLE_RATE;
use crate::validation::{validate_positive, validate_sample_rate};

/// ADSR envelope timing. Times are in seconds, sustain is a level in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Envelope {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
        }
    }
}

impl Envelope {
    /// Checks that every stage is finite and non-negative and sustain is a level.
    pub fn validate(&self) -> SpecResult<()> {
        for (field, value) in [
            ("envelope.attack", self.attack),
            ("envelope.decay", self.decay),
            ("envelope.release", self.release),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpecError::invalid_input(
                    field,
                    format!("must be a non-negative time, got {}", value),
                ));
            }
        }
        if !self.sustain.is_finite() || !(0.0..=1.0).contains(&self.sustain) {
            return Err(SpecError::invalid_input(
                "envelope.sustain",
                format!("must be within [0, 1], got {}", self.sustain),
            ));
        }
        Ok(())
    }
}

/// Normalization targets must stay within full scale.
fn validate_peak(field: &str, peak: f64) -> SpecResult<()> {
    validate_positive(field, peak)?;
    if peak > 1.0 {
        return Err(SpecError::invalid_input(
            field,
            format!("must not exceed full scale (1.0), got {}", peak),
        ));
    }
    Ok(())
}

/// Settings for the render engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub sample_rate: u32,
    /// Peak level every render path normalizes to.
    pub target_peak: f64,
    /// Velocity given to every melody note event.
    pub note_velocity: u8,
    /// Beats each chord sounds for.
    pub chord_beats: f64,
    /// Gain of the drum stem in a song render.
    pub beat_weight: f64,
    /// Gain of the melody stem in a song render.
    pub melody_weight: f64,
    pub envelope: Envelope,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            target_peak: 0.8,
            note_velocity: 80,
            chord_beats: 2.0,
            beat_weight: 0.6,
            melody_weight: 0.4,
            envelope: Envelope::default(),
        }
    }
}

impl RenderConfig {
    /// Validates every field.
    pub fn validate(&self) -> SpecResult<()> {
        validate_sample_rate(self.sample_rate)?;
        validate_peak("target_peak", self.target_peak)?;
        validate_positive("chord_beats", self.chord_beats)?;
        if self.note_velocity == 0 || self.note_velocity > 127 {
            return Err(SpecError::invalid_input(
                "note_velocity",
                format!("must be within 1..=127, got {}", self.note_velocity),
            ));
        }
        for (field, weight) in [
            ("beat_weight", self.beat_weight),
            ("melody_weight", self.melody_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SpecError::invalid_input(
                    field,
                    format!("must be a non-negative gain, got {}", weight),
                ));
            }
        }
        self.envelope.validate()
    }
}

/// Settings for the track combiner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MixConfig {
    /// Level above which compression applies.
    pub threshold: f64,
    /// Compression ratio (4.0 means 4:1).
    pub ratio: f64,
    /// Peak level after normalization.
    pub target_peak: f64,
    /// Apply `tanh` mastering saturation after normalization.
    pub saturation: bool,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            ratio: 4.0,
            target_peak: 0.9,
            saturation: false,
        }
    }
}

impl MixConfig {
    /// Validates every field.
    pub fn validate(&self) -> SpecResult<()> {
        validate_positive("threshold", self.threshold)?;
        validate_peak("target_peak", self.target_peak)?;
        if !self.ratio.is_finite() || self.ratio < 1.0 {
            return Err(SpecError::invalid_input(
                "ratio",
                format!("must be at least 1.0, got {}", self.ratio),
            ));
        }
        Ok(())
    }
}
