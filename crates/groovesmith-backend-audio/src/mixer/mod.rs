//! Track combiner.
//!
//! Mixes independently rendered buffers: shorter tracks are looped up to the
//! longest one, each track is scaled by its level, the sum is compressed
//! above [`MixConfig::threshold`] and finally peak-normalized.

pub mod processing;

use std::collections::HashMap;

use groovesmith_spec::{MixConfig, PcmBuffer};
use serde::{Deserialize, Serialize};

use crate::error::{AudioError, AudioResult};

pub use processing::{
    compress, compress_sample, loop_extend, normalize_to_peak, overlay, peak, saturate,
};

/// Per-track gains for a two-track [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MixLevels {
    /// Gain of the first track (usually the beat).
    pub a: f64,
    /// Gain of the second track (usually the melody).
    pub b: f64,
}

impl Default for MixLevels {
    fn default() -> Self {
        Self { a: 0.7, b: 0.8 }
    }
}

/// A track with a name, for [`mix_multiple`].
#[derive(Debug, Clone, Copy)]
pub struct NamedTrack<'a> {
    pub name: &'a str,
    pub buffer: &'a PcmBuffer,
}

impl<'a> NamedTrack<'a> {
    pub fn new(name: &'a str, buffer: &'a PcmBuffer) -> Self {
        Self { name, buffer }
    }
}

fn validate_level(name: &str, level: f64) -> AudioResult<f64> {
    if !level.is_finite() || level < 0.0 {
        return Err(AudioError::invalid_param(
            name,
            format!("mix level must be a non-negative finite gain, got {}", level),
        ));
    }
    Ok(level)
}

fn master(mut mixed: Vec<f64>, sample_rate: u32, config: &MixConfig) -> AudioResult<PcmBuffer> {
    compress(&mut mixed, config.threshold, config.ratio);
    normalize_to_peak(&mut mixed, config.target_peak);
    if config.saturation {
        saturate(&mut mixed);
    }
    Ok(PcmBuffer::new(mixed, sample_rate)?)
}

/// Mixes two tracks.
///
/// The shorter track is looped to the length of the longer one; nothing is
/// ever truncated.
///
/// # Errors
/// Returns `InvalidParameter` if the sample rates differ or a level is
/// negative or non-finite, and `EmptyInput` if both tracks are empty.
pub fn combine(
    a: &PcmBuffer,
    b: &PcmBuffer,
    levels: MixLevels,
    config: &MixConfig,
) -> AudioResult<PcmBuffer> {
    config.validate()?;
    let level_a = validate_level("a", levels.a)?;
    let level_b = validate_level("b", levels.b)?;
    if a.sample_rate() != b.sample_rate() {
        return Err(AudioError::invalid_param(
            "sample_rate",
            format!(
                "tracks disagree: {} Hz vs {} Hz",
                a.sample_rate(),
                b.sample_rate()
            ),
        ));
    }
    let len = a.len().max(b.len());
    if len == 0 {
        return Err(AudioError::empty("both tracks are empty"));
    }

    let a_ext = loop_extend(a.samples(), len);
    let b_ext = loop_extend(b.samples(), len);
    let mixed: Vec<f64> = a_ext
        .iter()
        .zip(&b_ext)
        .map(|(x, y)| x * level_a + y * level_b)
        .collect();

    tracing::debug!(samples = len, level_a, level_b, "combined two tracks");
    master(mixed, a.sample_rate(), config)
}

/// Mixes any number of named tracks.
///
/// A track without an entry in `levels` gets `1/N`. Length reconciliation
/// matches [`combine`].
///
/// # Errors
/// Returns `EmptyInput` when `tracks` is empty or every track is empty, and
/// `InvalidParameter` for mismatched sample rates or bad levels.
pub fn mix_multiple(
    tracks: &[NamedTrack<'_>],
    levels: &HashMap<String, f64>,
    config: &MixConfig,
) -> AudioResult<PcmBuffer> {
    config.validate()?;
    let first = tracks.first().ok_or_else(|| AudioError::empty("no tracks to mix"))?;
    let sample_rate = first.buffer.sample_rate();
    if let Some(track) = tracks.iter().find(|t| t.buffer.sample_rate() != sample_rate) {
        return Err(AudioError::invalid_param(
            "sample_rate",
            format!(
                "track '{}' is {} Hz, expected {} Hz",
                track.name,
                track.buffer.sample_rate(),
                sample_rate
            ),
        ));
    }

    let len = tracks.iter().map(|t| t.buffer.len()).max().unwrap_or(0);
    if len == 0 {
        return Err(AudioError::empty("every track is empty"));
    }

    let default_level = 1.0 / tracks.len() as f64;
    let mut mixed = vec![0.0; len];
    for track in tracks {
        let level = match levels.get(track.name) {
            Some(&level) => validate_level(track.name, level)?,
            None => default_level,
        };
        let extended = loop_extend(track.buffer.samples(), len);
        overlay(&mut mixed, &extended, 0, level);
    }

    tracing::debug!(tracks = tracks.len(), samples = len, "mixed multiple tracks");
    master(mixed, sample_rate, config)
}
