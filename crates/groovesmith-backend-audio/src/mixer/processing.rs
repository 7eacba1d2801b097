//! Buffer-level processing: normalization, compression, saturation, and
//! length reconciliation.

/// Largest absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f64, |a, b| a.max(b))
}

/// Scales samples so the peak equals `target_peak`. Silence is left alone.
pub fn normalize_to_peak(samples: &mut [f64], target_peak: f64) {
    let current_peak = peak(samples);
    if current_peak > 0.0 {
        let gain = target_peak / current_peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Hard-knee downward compression of a single sample.
///
/// Magnitudes above `threshold` become `threshold + (|x| - threshold) / ratio`;
/// the sign is preserved.
#[inline]
pub fn compress_sample(sample: f64, threshold: f64, ratio: f64) -> f64 {
    let abs = sample.abs();
    if abs <= threshold {
        sample
    } else {
        sample.signum() * (threshold + (abs - threshold) / ratio)
    }
}

/// Applies [`compress_sample`] to a buffer.
pub fn compress(samples: &mut [f64], threshold: f64, ratio: f64) {
    for sample in samples.iter_mut() {
        *sample = compress_sample(*sample, threshold, ratio);
    }
}

/// Mastering saturation, `tanh(0.8x) / 0.8`.
///
/// Never increases magnitude.
pub fn saturate(samples: &mut [f64]) {
    for sample in samples.iter_mut() {
        *sample = (*sample * 0.8).tanh() / 0.8;
    }
}

/// Tiles `samples` until it is `len` long, ending with a partial copy.
///
/// A buffer already at least `len` long is returned unchanged; an empty
/// buffer extends to silence.
pub fn loop_extend(samples: &[f64], len: usize) -> Vec<f64> {
    if samples.len() >= len {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return vec![0.0; len];
    }
    samples.iter().copied().cycle().take(len).collect()
}

/// Adds `source * gain` into `dest` starting at `offset`, dropping whatever
/// runs past the end of `dest`.
pub fn overlay(dest: &mut [f64], source: &[f64], offset: usize, gain: f64) {
    if offset >= dest.len() {
        return;
    }
    for (d, s) in dest[offset..].iter_mut().zip(source) {
        *d += s * gain;
    }
}
