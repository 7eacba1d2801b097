//! Sound generators.
//!
//! - `drums` - procedural percussion voices and the pre-rendered kit
//! - `harmonics` - additive tones for melody notes and chords

pub mod drums;
pub mod harmonics;

use rand_pcg::Pcg32;

/// Common trait for all sound generators.
pub trait Synthesizer {
    /// Generates audio samples.
    ///
    /// # Arguments
    /// * `num_samples` - Number of samples to generate
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `rng` - Deterministic RNG for any randomness
    fn synthesize(&self, num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64>;
}
