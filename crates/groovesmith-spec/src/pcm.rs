//! Mono PCM sample buffers.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::validation::validate_sample_rate;

/// Sample rate used for every render and mix path.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Mono audio at a fixed sample rate.
///
/// Samples are always finite; construction rejects NaN and infinities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcmBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl PcmBuffer {
    /// Wraps samples.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a zero sample rate or a non-finite sample.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> SpecResult<Self> {
        validate_sample_rate(sample_rate)?;
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(SpecError::invalid_input(
                "samples",
                format!("non-finite sample at index {}", index),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// A buffer of `len` zero samples.
    pub fn silent(len: usize, sample_rate: u32) -> SpecResult<Self> {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// The samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consumes the buffer, returning the samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
    }

    /// Root-mean-square level.
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|s| s * s).sum();
        (sum / self.samples.len() as f64).sqrt()
    }
}
