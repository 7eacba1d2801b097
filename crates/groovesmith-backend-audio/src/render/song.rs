//! Whole-song render.

use groovesmith_spec::validation::validate_tempo;
use groovesmith_spec::{Generated, PcmBuffer, Song};

use crate::error::{AudioError, AudioResult};
use crate::mixer::{normalize_to_peak, overlay};

use super::RenderEngine;

impl RenderEngine {
    /// Renders a song section by section.
    ///
    /// Each section's drum stem and melody stem are rendered and normalized
    /// on their own, weighted by `beat_weight` and `melody_weight`, trimmed to
    /// the section length, and overlaid at the section's start sample.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a zero tempo and `EmptyInput` for a song
    /// without sections.
    pub fn render_song(&self, song: &Song) -> AudioResult<Generated<PcmBuffer>> {
        validate_tempo(song.tempo)?;
        if song.sections.is_empty() {
            return Err(AudioError::empty("song has no sections"));
        }

        let sr = self.sample_rate();
        let end = song
            .sections
            .iter()
            .map(|s| s.end_time())
            .fold(song.total_duration, f64::max);
        if !end.is_finite() || end < 0.0 {
            return Err(AudioError::InvalidDuration { duration: end });
        }
        let mut out = vec![0.0; (end * sr).ceil() as usize];
        let mut warnings = Vec::new();
        let target = self.config.target_peak;

        for section in &song.sections {
            let section_len = (section.duration * sr) as usize;
            let mut local = vec![0.0; section_len];

            let mut beat = self.mix_pattern(&section.beat_pattern, song.tempo, &mut warnings);
            normalize_to_peak(&mut beat, target);
            overlay(&mut local, &beat, 0, self.config.beat_weight);

            let events = self.melody_events(&section.melody)?.drain_into(&mut warnings);
            if !events.is_empty() {
                let mut lead = self.mix_events(&events, &mut warnings);
                normalize_to_peak(&mut lead, target);
                overlay(&mut local, &lead, 0, self.config.melody_weight);
            }

            let start = (section.start_time * sr) as usize;
            overlay(&mut out, &local, start, 1.0);
            tracing::debug!(
                section = section.kind.name(),
                start_time = section.start_time,
                "rendered section"
            );
        }

        tracing::debug!(
            sections = song.sections.len(),
            samples = out.len(),
            "rendered song"
        );
        self.finish(out, warnings)
    }
}
