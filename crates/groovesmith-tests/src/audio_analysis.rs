//! Signal analysis helpers for checking rendered audio.
//!
//! These go beyond "not empty": onset picking recovers where hits landed and
//! the WAV helpers read encoded output back through `hound`.

use std::io::Cursor;

/// Root mean square of `samples`; 0 for an empty slice.
pub fn calculate_rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Largest absolute sample.
pub fn calculate_peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0, |acc: f64, s| acc.max(s.abs()))
}

/// True if no sample exceeds `threshold` in magnitude.
pub fn is_silent(samples: &[f64], threshold: f64) -> bool {
    calculate_peak(samples) <= threshold
}

/// Sample indices where the signal first rises above `threshold` after at
/// least `min_gap` quiet samples.
pub fn detect_onsets(samples: &[f64], threshold: f64, min_gap: usize) -> Vec<usize> {
    let mut onsets = Vec::new();
    let mut last_above: Option<usize> = None;
    for (i, s) in samples.iter().enumerate() {
        if s.abs() > threshold {
            if last_above.map_or(true, |last| i - last > min_gap) {
                onsets.push(i);
            }
            last_above = Some(i);
        }
    }
    onsets
}

/// Checks that every expected onset is matched in order, each found onset
/// being at or after its expected index and within `tolerance` samples.
pub fn onsets_match(found: &[usize], expected: &[usize], tolerance: usize) -> bool {
    found.len() == expected.len()
        && found
            .iter()
            .zip(expected)
            .all(|(&f, &e)| f >= e && f - e <= tolerance)
}

/// Decoded 16-bit mono WAV.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWav {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub samples: Vec<i16>,
}

/// Reads WAV bytes back into integer samples.
pub fn parse_wav(bytes: &[u8]) -> Result<DecodedWav, hound::Error> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    Ok(DecodedWav {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        samples,
    })
}
