//! Additive tones built from a fundamental and integer harmonics.

use std::f64::consts::PI;

use rand_pcg::Pcg32;

use super::Synthesizer;

/// Partials used for melody notes: fundamental, 2nd and 3rd harmonic.
pub const NOTE_PARTIALS: [(f64, f64); 3] = [(1.0, 1.0), (2.0, 0.5), (3.0, 0.25)];

/// Partials used for chord tones: fundamental and octave.
pub const CHORD_PARTIALS: [(f64, f64); 2] = [(1.0, 1.0), (2.0, 0.5)];

/// A sum of sine partials at multiples of a fundamental.
#[derive(Debug, Clone)]
pub struct HarmonicTone {
    /// Fundamental frequency in Hz.
    pub frequency: f64,
    /// `(frequency multiple, amplitude)` pairs.
    pub partials: Vec<(f64, f64)>,
    /// Overall gain applied after summing.
    pub gain: f64,
}

impl HarmonicTone {
    /// Creates a tone from a partial table.
    pub fn new(frequency: f64, partials: &[(f64, f64)], gain: f64) -> Self {
        Self {
            frequency,
            partials: partials.to_vec(),
            gain,
        }
    }
}

impl Synthesizer for HarmonicTone {
    fn synthesize(&self, num_samples: usize, sample_rate: f64, _rng: &mut Pcg32) -> Vec<f64> {
        (0..num_samples)
            .map(|i| {
                let t = i as f64 / sample_rate;
                let sum: f64 = self
                    .partials
                    .iter()
                    .map(|&(mult, amp)| amp * (2.0 * PI * self.frequency * mult * t).sin())
                    .sum();
                sum * self.gain
            })
            .collect()
    }
}
