//! Procedural drum voices.
//!
//! Every voice is a short one-shot built from sines and white noise under
//! exponential decays. The whole kit is rendered once per [`DrumKit`] and the
//! buffers are only ever read afterwards, so a kit can be shared freely
//! between threads.

use std::f64::consts::PI;

use groovesmith_spec::DrumVoice;
use rand_pcg::Pcg32;

use crate::envelope::exponential_decay;
use crate::error::{AudioError, AudioResult};
use crate::filter::BiquadFilter;
use crate::rng::{create_component_rng, white_noise};

use super::Synthesizer;

/// Cutoff of the highpass that band-limits hi-hat noise.
const HIHAT_HIGHPASS_HZ: f64 = 7000.0;

/// Partials added to crash noise for a metallic edge.
const CRASH_PARTIALS: [f64; 4] = [3000.0, 4500.0, 6000.0, 8000.0];

/// Synthesizer for a single percussion voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrumSynth {
    pub voice: DrumVoice,
}

impl DrumSynth {
    /// Creates a synthesizer for `voice`.
    pub fn new(voice: DrumVoice) -> Self {
        Self { voice }
    }

    /// One-shot length in seconds.
    pub fn duration(&self) -> f64 {
        match self.voice {
            DrumVoice::Kick => 0.5,
            DrumVoice::Snare => 0.2,
            DrumVoice::HihatClosed => 0.05,
            DrumVoice::HihatOpen => 0.3,
            DrumVoice::Crash => 2.0,
            DrumVoice::Ride => 1.0,
            DrumVoice::TomHigh | DrumVoice::TomMid | DrumVoice::TomLow => 0.4,
        }
    }

    /// Number of samples at `sample_rate`.
    pub fn num_samples(&self, sample_rate: f64) -> usize {
        (self.duration() * sample_rate) as usize
    }

    fn tom_pitch(&self) -> f64 {
        match self.voice {
            DrumVoice::TomHigh => 1.2,
            DrumVoice::TomLow => 0.8,
            _ => 1.0,
        }
    }
}

fn sine(freq: f64, t: f64) -> f64 {
    (2.0 * PI * freq * t).sin()
}

fn hihat(std_dev: f64, rate: f64, n: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
    let mut noise: Vec<f64> = (0..n).map(|_| white_noise(rng, std_dev)).collect();
    let cutoff = HIHAT_HIGHPASS_HZ.min(sample_rate * 0.45);
    BiquadFilter::highpass(cutoff, 0.707, sample_rate).process_buffer(&mut noise);
    let env = exponential_decay(rate, sample_rate, n);
    noise.iter().zip(env).map(|(s, e)| s * e).collect()
}

impl Synthesizer for DrumSynth {
    fn synthesize(&self, num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
        let n = num_samples;
        let time = |i: usize| i as f64 / sample_rate;

        match self.voice {
            DrumVoice::Kick => (0..n)
                .map(|i| {
                    let t = time(i);
                    let body = sine(60.0, t) * (-35.0 * t).exp();
                    let click = white_noise(rng, 0.1) * (-100.0 * t).exp();
                    body + click
                })
                .collect(),
            DrumVoice::Snare => (0..n)
                .map(|i| {
                    let t = time(i);
                    (white_noise(rng, 0.3) + sine(200.0, t) * 0.5) * (-20.0 * t).exp()
                })
                .collect(),
            DrumVoice::HihatClosed => hihat(0.2, 50.0, n, sample_rate, rng),
            DrumVoice::HihatOpen => hihat(0.25, 5.0, n, sample_rate, rng),
            DrumVoice::Crash => (0..n)
                .map(|i| {
                    let t = time(i);
                    let metal: f64 = CRASH_PARTIALS.iter().map(|&f| sine(f, t) * 0.05).sum();
                    (white_noise(rng, 0.3) + metal) * (-t).exp()
                })
                .collect(),
            DrumVoice::Ride => (0..n)
                .map(|i| {
                    let t = time(i);
                    let bell =
                        sine(800.0, t) * 0.3 + sine(1600.0, t) * 0.15 + sine(2400.0, t) * 0.1;
                    (bell + white_noise(rng, 0.05)) * (-2.0 * t).exp()
                })
                .collect(),
            DrumVoice::TomHigh | DrumVoice::TomMid | DrumVoice::TomLow => {
                let freq = 100.0 * self.tom_pitch();
                (0..n)
                    .map(|i| {
                        let t = time(i);
                        let body = sine(freq, t) + sine(2.0 * freq, t) * 0.3;
                        let attack = white_noise(rng, 0.1) * (-50.0 * t).exp();
                        (body + attack) * (-8.0 * t).exp()
                    })
                    .collect()
            }
        }
    }
}

/// Synthesizes one voice with its own seeded noise stream.
pub fn synthesize_voice(voice: DrumVoice, sample_rate: f64, seed: u32) -> Vec<f64> {
    let synth = DrumSynth::new(voice);
    let mut rng = create_component_rng(seed, voice.name());
    synth.synthesize(synth.num_samples(sample_rate), sample_rate, &mut rng)
}

/// The nine pre-rendered voice templates.
#[derive(Debug, Clone)]
pub struct DrumKit {
    sample_rate: u32,
    templates: Vec<Vec<f64>>,
}

impl DrumKit {
    /// Renders every voice once.
    ///
    /// # Errors
    /// Returns `InvalidSampleRate` for a zero sample rate.
    pub fn new(sample_rate: u32, seed: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        let templates = DrumVoice::ALL
            .iter()
            .map(|&voice| synthesize_voice(voice, sample_rate as f64, seed))
            .collect();
        tracing::debug!(sample_rate, seed, "drum kit synthesized");
        Ok(Self {
            sample_rate,
            templates,
        })
    }

    /// Template buffer for a voice.
    pub fn template(&self, voice: DrumVoice) -> &[f64] {
        &self.templates[voice.index()]
    }

    /// Sample rate the kit was rendered at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f64]) -> f64 {
        samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn test_voice_lengths() {
        let kit = DrumKit::new(44100, 1).unwrap();
        let expected = [
            (DrumVoice::Kick, 22050),
            (DrumVoice::Snare, 8820),
            (DrumVoice::HihatClosed, 2205),
            (DrumVoice::HihatOpen, 13230),
            (DrumVoice::Crash, 88200),
            (DrumVoice::Ride, 44100),
            (DrumVoice::TomHigh, 17640),
            (DrumVoice::TomMid, 17640),
            (DrumVoice::TomLow, 17640),
        ];
        for (voice, len) in expected {
            assert_eq!(kit.template(voice).len(), len, "{:?}", voice);
            assert_eq!(DrumSynth::new(voice).num_samples(44100.0), len);
        }
    }

    #[test]
    fn test_every_voice_is_audible_and_finite() {
        let kit = DrumKit::new(22050, 9).unwrap();
        for voice in DrumVoice::ALL {
            let t = kit.template(voice);
            assert!(t.iter().all(|s| s.is_finite()), "{:?}", voice);
            assert!(peak(t) > 0.01, "{:?} is silent", voice);
        }
    }

    #[test]
    fn test_voices_decay() {
        let kit = DrumKit::new(44100, 2).unwrap();
        for voice in [DrumVoice::Kick, DrumVoice::Snare, DrumVoice::TomMid] {
            let t = kit.template(voice);
            let head = peak(&t[..t.len() / 8]);
            let tail = peak(&t[t.len() * 7 / 8..]);
            assert!(tail < head * 0.2, "{:?}: head {} tail {}", voice, head, tail);
        }
    }

    #[test]
    fn test_seeded_kit_is_reproducible() {
        let a = DrumKit::new(44100, 42).unwrap();
        let b = DrumKit::new(44100, 42).unwrap();
        for voice in DrumVoice::ALL {
            assert_eq!(a.template(voice), b.template(voice));
        }
    }

    #[test]
    fn test_seed_changes_noise() {
        let a = synthesize_voice(DrumVoice::Snare, 44100.0, 1);
        let b = synthesize_voice(DrumVoice::Snare, 44100.0, 2);
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[test]
    fn test_voices_use_separate_streams() {
        let closed = synthesize_voice(DrumVoice::HihatClosed, 44100.0, 4);
        let open = synthesize_voice(DrumVoice::HihatOpen, 44100.0, 4);
        assert_ne!(&closed[..], &open[..closed.len()]);
    }

    #[test]
    fn test_toms_are_pitched_in_order() {
        let pitch = |voice| DrumSynth::new(voice).tom_pitch();
        assert!(pitch(DrumVoice::TomHigh) > pitch(DrumVoice::TomMid));
        assert!(pitch(DrumVoice::TomMid) > pitch(DrumVoice::TomLow));
    }

    #[test]
    fn test_low_sample_rate_hats_stay_finite() {
        let kit = DrumKit::new(8000, 5).unwrap();
        assert!(kit.template(DrumVoice::HihatOpen).iter().all(|s| s.is_finite()));
        assert!(peak(kit.template(DrumVoice::HihatOpen)) < 2.0);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(DrumKit::new(0, 1).is_err());
    }
}
