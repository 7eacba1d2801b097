//! Chord progression to PCM.

use groovesmith_spec::theory::{key_root_pitch, midi_to_freq, ChordSymbol, MIDDLE_C};
use groovesmith_spec::validation::validate_tempo;
use groovesmith_spec::{Category, GenerationWarning, Generated, PcmBuffer};

use crate::envelope::{adsr_clipped, AdsrParams};
use crate::error::{AudioError, AudioResult};
use crate::mixer::overlay;
use crate::rng::create_rng;
use crate::synthesis::harmonics::{HarmonicTone, CHORD_PARTIALS};
use crate::synthesis::Synthesizer;

use super::{all_finite, RenderEngine};

const CHORD_TONE_GAIN: f64 = 0.3;

impl RenderEngine {
    /// Renders one chord per [`chord_beats`](groovesmith_spec::RenderConfig::chord_beats)
    /// slot, voiced upward from the key's tonic in octave 4.
    ///
    /// Unparseable symbols sound as the tonic triad and an unknown key falls
    /// back to C; both record an `UnknownCategory` warning.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a zero tempo and `EmptyInput` for an empty
    /// progression.
    pub fn render_chords(
        &self,
        chords: &[String],
        key: &str,
        tempo: u32,
    ) -> AudioResult<Generated<PcmBuffer>> {
        validate_tempo(tempo)?;
        if chords.is_empty() {
            return Err(AudioError::empty("chord progression"));
        }

        let mut warnings = Vec::new();
        let root = match key_root_pitch(key) {
            Some(root) => root,
            None => {
                warnings.push(GenerationWarning::unknown(Category::Key, key, "C").logged());
                MIDDLE_C
            }
        };

        let sr = self.sample_rate();
        let slot = self.config.chord_beats * 60.0 / tempo as f64;
        let slot_samples = (slot * sr) as usize;
        let mut out = vec![0.0; slot_samples * chords.len()];
        let adsr = AdsrParams::from(&self.config.envelope);
        let env = adsr_clipped(&adsr, sr, slot_samples);
        let mut rng = create_rng(0);

        for (index, symbol) in chords.iter().enumerate() {
            let chord = ChordSymbol::parse(symbol).unwrap_or_else(|_| {
                warnings.push(GenerationWarning::unknown(Category::Chord, symbol, "I").logged());
                ChordSymbol::tonic()
            });

            let mut voicing = vec![0.0; slot_samples];
            for pitch in chord.notes(root) {
                let tone = HarmonicTone::new(
                    midi_to_freq(pitch as f64),
                    &CHORD_PARTIALS,
                    CHORD_TONE_GAIN,
                );
                overlay(&mut voicing, &tone.synthesize(slot_samples, sr, &mut rng), 0, 1.0);
            }
            for (s, e) in voicing.iter_mut().zip(&env) {
                *s *= e;
            }

            if !all_finite(&voicing) {
                warnings.push(
                    GenerationWarning::degraded(
                        format!("chord {} ({})", index, symbol),
                        "non-finite samples",
                    )
                    .logged(),
                );
                continue;
            }
            overlay(&mut out, &voicing, index * slot_samples, 1.0);
        }

        tracing::debug!(chords = chords.len(), key, tempo, "rendered chords");
        self.finish(out, warnings)
    }
}
