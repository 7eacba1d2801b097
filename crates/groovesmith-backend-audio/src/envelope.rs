//! Amplitude envelopes.
//!
//! Notes use a fixed-length ADSR whose stages are clipped to the note; drum
//! voices use plain exponential decays.

use groovesmith_spec::Envelope;

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self::from(&Envelope::default())
    }
}

impl AdsrParams {
    /// Creates new ADSR parameters, clamping into valid ranges.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
        }
    }
}

impl From<&Envelope> for AdsrParams {
    fn from(env: &Envelope) -> Self {
        Self::new(env.attack, env.decay, env.sustain, env.release)
    }
}

/// Generates an ADSR curve exactly `len` samples long.
///
/// Stages are laid out in order and each is clipped to what remains of the
/// note: attack first, then decay, then release at the very end, with
/// sustain filling whatever is left in between. A note shorter than its
/// attack therefore never reaches full level.
pub fn adsr_clipped(params: &AdsrParams, sample_rate: f64, len: usize) -> Vec<f64> {
    let to_samples = |secs: f64| (secs * sample_rate) as usize;

    let attack_full = to_samples(params.attack);
    let decay_full = to_samples(params.decay);

    let attack = attack_full.min(len);
    let decay = decay_full.min(len - attack);
    let release = to_samples(params.release).min(len - attack - decay);
    let sustain = len - attack - decay - release;

    let mut env = Vec::with_capacity(len);
    for i in 0..attack {
        env.push(i as f64 / attack_full as f64);
    }
    for i in 0..decay {
        let progress = i as f64 / decay_full as f64;
        env.push(1.0 - progress * (1.0 - params.sustain));
    }
    env.extend(std::iter::repeat(params.sustain).take(sustain));

    let release_from = env.last().copied().unwrap_or(0.0);
    for i in 0..release {
        let progress = (i + 1) as f64 / release as f64;
        env.push(release_from * (1.0 - progress));
    }
    env
}

/// Generates `exp(-rate * t)` for `len` samples.
pub fn exponential_decay(rate: f64, sample_rate: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| (-rate * i as f64 / sample_rate).exp())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_render_envelope() {
        let params = AdsrParams::default();
        assert_eq!(params.attack, 0.01);
        assert_eq!(params.decay, 0.1);
        assert_eq!(params.sustain, 0.7);
        assert_eq!(params.release, 0.3);
    }

    #[test]
    fn test_adsr_length_is_exact() {
        let params = AdsrParams::default();
        for len in [0, 1, 50, 441, 44100] {
            assert_eq!(adsr_clipped(&params, 44100.0, len).len(), len);
        }
    }

    #[test]
    fn test_adsr_shape_long_note() {
        let params = AdsrParams::new(0.1, 0.1, 0.5, 0.1);
        // 1 kHz, 1 second: 100 attack, 100 decay, 700 sustain, 100 release
        let env = adsr_clipped(&params, 1000.0, 1000);
        assert!((env[50] - 0.5).abs() < 0.02);
        assert!((env[150] - 0.75).abs() < 0.02);
        assert_eq!(env[500], 0.5);
        assert!((env[950] - 0.25).abs() < 0.02);
        assert_eq!(env[999], 0.0);
    }

    #[test]
    fn test_adsr_short_note_clips_attack() {
        let params = AdsrParams::new(0.1, 0.1, 0.5, 0.1);
        let env = adsr_clipped(&params, 1000.0, 40);
        assert!(env.iter().all(|&v| v < 0.41));
        assert!(env.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_exponential_decay() {
        let env = exponential_decay(1.0, 10.0, 11);
        assert_eq!(env[0], 1.0);
        assert!((env[10] - (-1.0f64).exp()).abs() < 1e-12);
    }
}
