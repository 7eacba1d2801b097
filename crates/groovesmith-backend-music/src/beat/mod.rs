//! Drum pattern composer.
//!
//! A pattern starts from a one-bar template tiled across the requested bars.
//! Genres without a template get a generated bar matched to their feel. An
//! optional reference analysis overrides tempo and genre and shapes how much
//! variation is applied. Above complexity 0.5 the tiled grid is varied:
//! random cell flips (strong-beat kicks excepted), a snare fill in bar 4, and
//! ghost hi-hats above complexity 0.7.

pub mod templates;

#[cfg(test)]
mod tests;

use groovesmith_backend_audio::rng::create_component_rng;
use groovesmith_spec::validation::clamp_unit;
use groovesmith_spec::{
    BeatParams, Category, DrumVoice, GenerationWarning, Generated, PatternGrid,
    ReferenceAnalysis, STEPS_PER_BAR,
};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::ComposeResult;

use templates::{genre_template, tile, Feel};

/// Complexity above which the tiled grid is varied.
pub const VARIATION_THRESHOLD: f64 = 0.5;
/// Complexity above which ghost hi-hats are added.
pub const GHOST_THRESHOLD: f64 = 0.7;
/// Flip probability per unit of complexity.
const FLIP_RATE: f64 = 0.03;
/// Chance of a ghost hi-hat on an empty off-beat step.
const GHOST_PROBABILITY: f64 = 0.3;
const GHOST_VELOCITY: f64 = 0.5;
/// First step of the snare fill; only placed when the grid is long enough.
const FILL_START: usize = 60;
const FILL_LENGTH: usize = 4;

/// A generated drum pattern and the settings it was generated with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatPattern {
    /// Genre the pattern was built for, after any reference override.
    pub genre: String,
    /// Tempo in BPM, after any reference override.
    pub tempo: u32,
    /// Complexity after reference scaling, in [0, 1].
    pub complexity: f64,
    /// The voice x step grid.
    pub grid: PatternGrid,
}

/// Settings resolved from a request and its reference.
#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    genre: String,
    tempo: u32,
    complexity: f64,
    variation_factor: f64,
}

fn resolve(
    params: &BeatParams,
    complexity: f64,
    warnings: &mut Vec<GenerationWarning>,
) -> Resolved {
    let mut resolved = Resolved {
        genre: params.genre.clone(),
        tempo: params.tempo,
        complexity,
        variation_factor: 1.0,
    };
    if let Some(reference) = &params.reference {
        apply_reference(&mut resolved, reference, warnings);
    }
    resolved
}

fn apply_reference(
    resolved: &mut Resolved,
    reference: &ReferenceAnalysis,
    warnings: &mut Vec<GenerationWarning>,
) {
    if let Some(tempo) = reference.tempo {
        resolved.tempo = tempo;
    }
    if let Some(genre) = &reference.genre {
        resolved.genre = genre.clone();
    }
    if let Some(energy) = reference.energy {
        resolved.complexity = (resolved.complexity * (1.0 + energy.clamp(0.0, 1.0))).min(1.0);
    }

    if let Some(signature) = &reference.time_signature {
        resolved.variation_factor *= match signature.trim() {
            "3/4" => 0.7,
            "6/8" => 1.2,
            "4/4" => 1.0,
            other => {
                warnings.push(
                    GenerationWarning::unknown(Category::TimeSignature, other, "4/4").logged(),
                );
                1.0
            }
        };
    }

    if let Some(mood) = &reference.mood {
        resolved.variation_factor *= match mood.trim().to_ascii_lowercase().as_str() {
            "energetic" | "happy" => 1.3,
            "sad" | "calm" => 0.7,
            "neutral" => 1.0,
            _ => {
                warnings.push(GenerationWarning::unknown(Category::Mood, mood, "neutral").logged());
                1.0
            }
        };
    }
}

/// Generates a drum pattern.
///
/// Always returns a well-formed grid of 9 rows and `16 x bars` steps with
/// velocities in [0, 1]. An unknown genre is not an error: it gets a bar
/// generated for its feel and an `UnknownCategory` warning.
///
/// # Errors
/// Returns `InvalidInput` for zero bars, a zero tempo, or a non-finite
/// complexity or reference energy.
///
/// # Example
/// ```
/// use groovesmith_backend_music::beat::generate_beat;
/// use groovesmith_spec::BeatParams;
///
/// let params = BeatParams {
///     genre: "rock".into(),
///     bars: 2,
///     complexity: 0.3,
///     ..Default::default()
/// };
/// let beat = generate_beat(&params, 7).unwrap().into_inner();
/// assert_eq!(beat.grid.steps(), 32);
/// ```
pub fn generate_beat(params: &BeatParams, seed: u32) -> ComposeResult<Generated<BeatPattern>> {
    params.validate()?;
    let complexity = clamp_unit("complexity", params.complexity)?;

    let mut warnings = Vec::new();
    let resolved = resolve(params, complexity, &mut warnings);
    let mut grid = PatternGrid::new(params.bars)?;

    match genre_template(&resolved.genre) {
        Some(template) => tile(&mut grid, template.rows),
        None => {
            let feel = Feel::detect(&resolved.genre);
            warnings.push(
                GenerationWarning::unknown(Category::Genre, &resolved.genre, feel.name()).logged(),
            );
            tile(&mut grid, feel.rows());
        }
    }

    if resolved.complexity > VARIATION_THRESHOLD {
        let mut rng = create_component_rng(seed, "beat");
        add_variations(
            &mut grid,
            resolved.complexity,
            resolved.variation_factor,
            &mut rng,
        );
    }

    tracing::debug!(
        genre = %resolved.genre,
        tempo = resolved.tempo,
        bars = params.bars,
        complexity = resolved.complexity,
        hits = grid.hit_count(),
        "generated beat"
    );

    Ok(Generated::with_warnings(
        BeatPattern {
            genre: resolved.genre,
            tempo: resolved.tempo,
            complexity: resolved.complexity,
            grid,
        },
        warnings,
    ))
}

/// Kick cells on beats 1 and 3 are never flipped.
fn is_protected(voice: DrumVoice, step: usize) -> bool {
    voice == DrumVoice::Kick && matches!(step % STEPS_PER_BAR, 0 | 8)
}

fn add_variations(grid: &mut PatternGrid, complexity: f64, factor: f64, rng: &mut Pcg32) {
    let flip = (complexity * FLIP_RATE * factor).clamp(0.0, 1.0);
    for voice in DrumVoice::ALL {
        for step in 0..grid.steps() {
            if is_protected(voice, step) {
                continue;
            }
            if rng.gen::<f64>() < flip {
                let v = grid.velocity(voice, step);
                grid.set(voice, step, 1.0 - v);
            }
        }
    }

    if grid.steps() >= FILL_START + FILL_LENGTH {
        for step in FILL_START..FILL_START + FILL_LENGTH {
            grid.set(DrumVoice::Snare, step, 1.0);
        }
    }

    if complexity > GHOST_THRESHOLD {
        for step in (1..grid.steps()).step_by(2) {
            if grid.velocity(DrumVoice::HihatClosed, step) == 0.0
                && rng.gen::<f64>() < GHOST_PROBABILITY
            {
                grid.set(DrumVoice::HihatClosed, step, GHOST_VELOCITY);
            }
        }
    }
}
