//! Note events to PCM.

use groovesmith_spec::theory::midi_to_freq;
use groovesmith_spec::{GenerationWarning, Generated, NoteEvent, PcmBuffer};

use crate::envelope::{adsr_clipped, AdsrParams};
use crate::error::{AudioError, AudioResult};
use crate::mixer::overlay;
use crate::rng::create_rng;
use crate::synthesis::harmonics::{HarmonicTone, NOTE_PARTIALS};
use crate::synthesis::Synthesizer;

use super::{all_finite, RenderEngine};

/// Gain of a single synthesized note before velocity scaling.
const NOTE_GAIN: f64 = 0.3;

impl RenderEngine {
    /// Renders note events with an additive tone under the configured ADSR.
    ///
    /// Each note is the fundamental plus two harmonics (amplitudes 1, 0.5,
    /// 0.25) at 0.3 gain, scaled by `velocity / 127`. A note with a
    /// non-finite or inverted time span is skipped with a warning.
    ///
    /// # Errors
    /// Returns `EmptyInput` if `events` is empty.
    pub fn render_events(&self, events: &[NoteEvent]) -> AudioResult<Generated<PcmBuffer>> {
        if events.is_empty() {
            return Err(AudioError::empty("note event list"));
        }
        let mut warnings = Vec::new();
        let samples = self.mix_events(events, &mut warnings);
        tracing::debug!(
            events = events.len(),
            samples = samples.len(),
            "rendered note events"
        );
        self.finish(samples, warnings)
    }

    /// Un-normalized note mixdown.
    pub(crate) fn mix_events(
        &self,
        events: &[NoteEvent],
        warnings: &mut Vec<GenerationWarning>,
    ) -> Vec<f64> {
        let sr = self.sample_rate();
        let end = events
            .iter()
            .filter(|e| e.end.is_finite())
            .map(|e| e.end)
            .fold(0.0f64, f64::max);
        let mut out = vec![0.0; (end * sr).ceil() as usize];
        let adsr = AdsrParams::from(&self.config.envelope);
        let mut rng = create_rng(0);

        for (index, event) in events.iter().enumerate() {
            let valid_span = event.start.is_finite()
                && event.end.is_finite()
                && event.start >= 0.0
                && event.end > event.start;
            if !valid_span {
                warnings.push(
                    GenerationWarning::degraded(
                        format!("note {}", index),
                        format!("invalid time span {}..{}", event.start, event.end),
                    )
                    .logged(),
                );
                continue;
            }

            let start = (event.start * sr) as usize;
            let len = ((event.end - event.start) * sr) as usize;
            let tone =
                HarmonicTone::new(midi_to_freq(event.pitch as f64), &NOTE_PARTIALS, NOTE_GAIN);
            let env = adsr_clipped(&adsr, sr, len);
            let gain = event.velocity as f64 / 127.0;
            let note: Vec<f64> = tone
                .synthesize(len, sr, &mut rng)
                .iter()
                .zip(&env)
                .map(|(s, e)| s * e)
                .collect();

            if !all_finite(&note) {
                warnings.push(
                    GenerationWarning::degraded(format!("note {}", index), "non-finite samples")
                        .logged(),
                );
                continue;
            }
            overlay(&mut out, &note, start, gain);
        }
        out
    }
}
