//! Pattern grid to drum mixdown.

use groovesmith_spec::validation::validate_tempo;
use groovesmith_spec::{GenerationWarning, Generated, PatternGrid, PcmBuffer};

use crate::error::AudioResult;
use crate::mixer::overlay;

use super::{all_finite, RenderEngine};

impl RenderEngine {
    /// Seconds per sixteenth-note step.
    pub fn step_duration(tempo: u32) -> f64 {
        60.0 / (tempo as f64 * 4.0)
    }

    /// Renders a drum pattern.
    ///
    /// Each sounding cell overlays its voice template, scaled by velocity, at
    /// `step * step_duration` seconds. Overlapping hits sum. The buffer spans
    /// exactly the grid; tails past the last step are cut.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a zero tempo.
    pub fn render_pattern(
        &self,
        grid: &PatternGrid,
        tempo: u32,
    ) -> AudioResult<Generated<PcmBuffer>> {
        validate_tempo(tempo)?;
        let mut warnings = Vec::new();
        let samples = self.mix_pattern(grid, tempo, &mut warnings);
        tracing::debug!(
            tempo,
            steps = grid.steps(),
            hits = grid.hit_count(),
            samples = samples.len(),
            "rendered pattern"
        );
        self.finish(samples, warnings)
    }

    /// Un-normalized drum mixdown.
    pub(crate) fn mix_pattern(
        &self,
        grid: &PatternGrid,
        tempo: u32,
        warnings: &mut Vec<GenerationWarning>,
    ) -> Vec<f64> {
        let sr = self.sample_rate();
        let step_duration = Self::step_duration(tempo);
        let total = (grid.steps() as f64 * step_duration * sr) as usize;
        let mut out = vec![0.0; total];

        for (voice, step, velocity) in grid.hits() {
            let template = self.kit.template(voice);
            if !velocity.is_finite() || !all_finite(template) {
                warnings.push(
                    GenerationWarning::degraded(
                        format!("{} at step {}", voice.name(), step),
                        "non-finite drum hit",
                    )
                    .logged(),
                );
                continue;
            }
            let start = (step as f64 * step_duration * sr) as usize;
            overlay(&mut out, template, start, velocity);
        }
        out
    }
}
