//! Render engine: symbolic artifacts to PCM and note events.
//!
//! A [`RenderEngine`] owns its settings and a pre-rendered [`DrumKit`]. All
//! render methods take `&self`, so one engine can serve concurrent callers.
//!
//! Every render path validates its inputs before allocating, skips units that
//! fail to synthesize (recording a warning), and peak-normalizes the result
//! to [`RenderConfig::target_peak`].

mod chords;
mod events;
mod notes;
mod pattern;
mod song;

use groovesmith_spec::{GenerationWarning, Generated, PcmBuffer, RenderConfig};

use crate::error::AudioResult;
use crate::mixer::normalize_to_peak;
use crate::rng::derive_component_seed;
use crate::synthesis::drums::DrumKit;

pub use events::melody_to_events;

/// Renders patterns, melodies, chords, and songs.
#[derive(Debug, Clone)]
pub struct RenderEngine {
    config: RenderConfig,
    kit: DrumKit,
}

impl RenderEngine {
    /// Creates an engine, synthesizing the drum kit from `seed`.
    ///
    /// # Errors
    /// Returns an error if `config` fails validation.
    pub fn new(config: RenderConfig, seed: u32) -> AudioResult<Self> {
        config.validate()?;
        let kit = DrumKit::new(config.sample_rate, derive_component_seed(seed, "drum_kit"))?;
        Ok(Self { config, kit })
    }

    /// Engine with default settings.
    pub fn with_seed(seed: u32) -> AudioResult<Self> {
        Self::new(RenderConfig::default(), seed)
    }

    /// Render settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The drum templates.
    pub fn kit(&self) -> &DrumKit {
        &self.kit
    }

    fn sample_rate(&self) -> f64 {
        self.config.sample_rate as f64
    }

    fn finish(
        &self,
        mut samples: Vec<f64>,
        warnings: Vec<GenerationWarning>,
    ) -> AudioResult<Generated<PcmBuffer>> {
        normalize_to_peak(&mut samples, self.config.target_peak);
        let buffer = PcmBuffer::new(samples, self.config.sample_rate)?;
        Ok(Generated::with_warnings(buffer, warnings))
    }
}

/// Returns true if every sample is finite.
fn all_finite(samples: &[f64]) -> bool {
    samples.iter().all(|s| s.is_finite())
}

#[cfg(test)]
mod tests;
