//! Melodic composer.
//!
//! A melody is built in two passes over the scale pitches between C3 and C6:
//! first a rhythm assembled from genre-keyed templates until the bars are
//! filled exactly, then one pitch per duration slot following a few
//! voice-leading rules (start on tonic or fifth, phrase ends on stable tones,
//! strong beats on chord tones, otherwise mostly stepwise motion). A final
//! pass softens back-to-back large leaps.

use groovesmith_backend_audio::rng::create_component_rng;
use groovesmith_spec::theory::{is_stable_tone, key_root_pitch, nearest_pitch, ChordSymbol, Scale};
use groovesmith_spec::{
    Category, GenerationWarning, Generated, Melody, MelodyParams, BEATS_PER_BAR,
};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::error::ComposeResult;

/// Lowest pitch a generated melody uses (C3).
pub const LOW_PITCH: u8 = 48;
/// Highest pitch a generated melody uses (C6).
pub const HIGH_PITCH: u8 = 84;

/// Template draws allowed per 16 beats before the rhythm falls back.
pub const MAX_PATTERN_DRAWS: usize = 20;

/// Phrase length in notes; the last note of each phrase lands on a stable tone.
const PHRASE_LENGTH: usize = 8;
/// Notes per strong-beat group; the first note of each group follows the chord.
const CHORD_GROUP: usize = 4;
const STEP_PROBABILITY: f64 = 0.7;
const LEAP_SIZES: [i32; 4] = [3, 4, 5, 8];
const FALLBACK_DURATION: f64 = 0.5;

/// Fixed phrase used when generation cannot produce a valid melody.
pub const FALLBACK_PHRASE: [u8; 8] = [60, 62, 64, 65, 67, 65, 64, 62];

const DEFAULT_RHYTHMS: [&[f64]; 4] = [
    &[1.0, 0.5, 0.5, 1.0, 1.0, 0.5, 0.5, 1.0],
    &[0.5, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0, 1.0],
    &[0.25, 0.25, 0.5, 1.0, 0.5, 0.5, 1.0, 1.0],
    &[1.0, 1.0, 0.5, 0.5, 0.5, 0.5, 1.0, 1.0],
];

const JAZZ_RHYTHMS: [&[f64]; 3] = [
    &[0.75, 0.25, 1.0, 0.5, 0.5, 1.0, 0.5, 0.5],
    &[1.0, 0.5, 0.25, 0.25, 1.0, 1.0, 0.5, 0.5],
    &[0.5, 0.5, 0.5, 0.5, 0.75, 0.25, 1.0, 1.0],
];

const ELECTRONIC_RHYTHMS: [&[f64]; 3] = [
    &[0.25, 0.25, 0.25, 0.25, 0.5, 0.5, 0.5, 0.5],
    &[0.5, 0.5, 0.5, 0.5, 0.25, 0.25, 0.25, 0.25],
    &[1.0, 0.5, 0.5, 0.25, 0.25, 0.25, 0.25, 1.0],
];

/// Rhythm templates for a genre; anything unlisted uses the default family.
pub fn rhythm_family(genre: Option<&str>) -> &'static [&'static [f64]] {
    match genre.map(|g| g.trim().to_ascii_lowercase()).as_deref() {
        Some("jazz") => &JAZZ_RHYTHMS,
        Some("electronic") => &ELECTRONIC_RHYTHMS,
        _ => &DEFAULT_RHYTHMS,
    }
}

/// Assembles durations that sum exactly to `total_beats`.
///
/// Templates are drawn at random and appended note by note. When the next
/// duration would overshoot, the remainder is appended instead and assembly
/// stops. Returns `None` if `max_draws` templates were not enough.
pub fn assemble_durations(
    total_beats: f64,
    patterns: &[&[f64]],
    max_draws: usize,
    rng: &mut Pcg32,
) -> Option<Vec<f64>> {
    let mut durations = Vec::new();
    let mut current = 0.0;
    for _ in 0..max_draws {
        let pattern = patterns.choose(rng)?;
        for &duration in pattern.iter() {
            if current + duration <= total_beats {
                durations.push(duration);
                current += duration;
            } else {
                let remainder = total_beats - current;
                if remainder > 0.0 {
                    durations.push(remainder);
                }
                current = total_beats;
            }
            if current >= total_beats {
                return Some(durations);
            }
        }
    }
    None
}

/// Draw budget for a melody of `total_beats`.
fn draw_budget(total_beats: f64) -> usize {
    MAX_PATTERN_DRAWS * (total_beats / 16.0).ceil().max(1.0) as usize
}

/// Index of the pool member closest to `pitch`.
fn pool_index(pool: &[u8], pitch: u8) -> usize {
    pool.iter()
        .enumerate()
        .min_by_key(|&(_, &p)| ((p as i32 - pitch as i32).abs(), p))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Inputs to the pitch pass.
struct PitchContext<'a> {
    pool: &'a [u8],
    root: u8,
    chords: &'a [ChordSymbol],
}

impl PitchContext<'_> {
    fn stable_tone_near(&self, current: u8) -> Option<u8> {
        let stable: Vec<u8> = self
            .pool
            .iter()
            .copied()
            .filter(|&p| is_stable_tone(self.root, p))
            .collect();
        nearest_pitch(&stable, current as i32)
    }

    fn chord_tone_near(&self, index: usize, current: u8) -> Option<u8> {
        if self.chords.is_empty() {
            return None;
        }
        let chord = &self.chords[(index / CHORD_GROUP) % self.chords.len()];
        let classes = chord.pitch_classes(self.root % 12);
        let tones: Vec<u8> = self
            .pool
            .iter()
            .copied()
            .filter(|p| classes.contains(&(p % 12)))
            .collect();
        nearest_pitch(&tones, current as i32)
    }

    fn step_or_leap(&self, current: u8, rng: &mut Pcg32) -> u8 {
        let pool = self.pool;
        if rng.gen::<f64>() < STEP_PROBABILITY {
            let idx = pool_index(pool, current);
            let direction: i32 = if idx == 0 {
                1
            } else if idx == pool.len() - 1 {
                -1
            } else {
                let roll = rng.gen::<f64>();
                if roll < 0.3 {
                    -1
                } else if roll < 0.7 {
                    0
                } else {
                    1
                }
            };
            let next = (idx as i32 + direction).clamp(0, pool.len() as i32 - 1);
            pool[next as usize]
        } else {
            let size = LEAP_SIZES[rng.gen_range(0..LEAP_SIZES.len())];
            let sign = if rng.gen::<bool>() { 1 } else { -1 };
            nearest_pitch(pool, current as i32 + size * sign).unwrap_or(current)
        }
    }
}

fn generate_pitches(ctx: &PitchContext<'_>, count: usize, rng: &mut Pcg32) -> Option<Vec<u8>> {
    let start_target = if rng.gen::<bool>() {
        ctx.root
    } else {
        ctx.root + 7
    };
    let mut current = nearest_pitch(ctx.pool, start_target as i32)?;
    let mut notes = Vec::with_capacity(count);

    for i in 0..count {
        if i > 0 {
            let phrase_end = (i + 1) % PHRASE_LENGTH == 0;
            let strong_beat = i % CHORD_GROUP == 0;
            current = if phrase_end {
                ctx.stable_tone_near(current)
            } else if strong_beat {
                ctx.chord_tone_near(i, current)
            } else {
                None
            }
            .unwrap_or_else(|| ctx.step_or_leap(current, rng));
        }
        notes.push(current);
    }
    Some(notes)
}

/// Replaces the middle of two back-to-back large leaps (more than an octave,
/// then more than a fifth) with the pool pitch nearest their midpoint, when
/// that shrinks both leaps.
pub fn smooth_leaps(notes: &[u8], pool: &[u8]) -> Vec<u8> {
    let mut smoothed = notes.to_vec();
    if notes.len() < 3 {
        return smoothed;
    }
    for i in 1..notes.len() - 1 {
        let prev = notes[i - 1] as i32;
        let curr = notes[i] as i32;
        let next = notes[i + 1] as i32;
        let first = (curr - prev).abs();
        let second = (next - curr).abs();
        if first <= 12 || second <= 7 {
            continue;
        }
        if let Some(mid) = nearest_pitch(pool, (prev + next) / 2) {
            let mid = mid as i32;
            if (mid - prev).abs() < first && (next - mid).abs() < second {
                smoothed[i] = mid as u8;
            }
        }
    }
    smoothed
}

fn fallback_melody(
    bars: u32,
    key: &str,
    scale: Scale,
    tempo: u32,
    reason: &str,
    mut warnings: Vec<GenerationWarning>,
) -> ComposeResult<Generated<Melody>> {
    warnings.push(
        GenerationWarning::FallbackContent {
            stage: "melody".to_string(),
            reason: reason.to_string(),
        }
        .logged(),
    );
    let notes: Vec<u8> = FALLBACK_PHRASE
        .iter()
        .copied()
        .cycle()
        .take(FALLBACK_PHRASE.len() * bars as usize)
        .collect();
    let durations = vec![FALLBACK_DURATION; notes.len()];
    let melody = Melody::new(notes, durations, key, scale, tempo)?;
    Ok(Generated::with_warnings(melody, warnings))
}

/// Parses chord symbols, replacing unknown ones with the tonic.
pub fn parse_progression(
    symbols: &[String],
    warnings: &mut Vec<GenerationWarning>,
) -> Vec<ChordSymbol> {
    symbols
        .iter()
        .map(|symbol| {
            ChordSymbol::parse(symbol).unwrap_or_else(|_| {
                warnings.push(GenerationWarning::unknown(Category::Chord, symbol, "I").logged());
                ChordSymbol::tonic()
            })
        })
        .collect()
}

/// Generates a melody.
///
/// Durations always sum to `bars x 4` beats and every pitch lies in the
/// chosen scale between C3 and C6. When the request has no chord progression
/// the reference's progression drives strong-beat snapping. An unknown key
/// or scale falls back to C major with a warning.
///
/// # Errors
/// Returns `InvalidInput` for zero bars or a zero tempo.
pub fn generate_melody(params: &MelodyParams, seed: u32) -> ComposeResult<Generated<Melody>> {
    params.validate()?;
    let mut warnings = Vec::new();

    let (key, root) = match key_root_pitch(&params.key) {
        Some(root) => (params.key.trim().to_string(), root),
        None => {
            warnings.push(GenerationWarning::unknown(Category::Key, &params.key, "C").logged());
            ("C".to_string(), 60)
        }
    };
    let scale = Scale::from_name(&params.scale).unwrap_or_else(|| {
        warnings.push(
            GenerationWarning::unknown(Category::Scale, &params.scale, Scale::Major.name())
                .logged(),
        );
        Scale::Major
    });

    let reference = params.reference.as_ref();
    let symbols = params
        .chord_progression
        .as_ref()
        .or_else(|| reference.and_then(|r| r.chord_progression.as_ref()))
        .map(Vec::as_slice)
        .unwrap_or_default();
    let chords = parse_progression(symbols, &mut warnings);

    let pool = scale.pitch_set(root, LOW_PITCH, HIGH_PITCH);
    if pool.is_empty() {
        return fallback_melody(
            params.bars,
            &key,
            scale,
            params.tempo,
            "empty pitch pool",
            warnings,
        );
    }

    let mut rng = create_component_rng(seed, "melody");
    let total_beats = params.bars as f64 * BEATS_PER_BAR;
    let family = rhythm_family(reference.and_then(|r| r.genre.as_deref()));
    let budget = draw_budget(total_beats);
    let durations = match assemble_durations(total_beats, family, budget, &mut rng) {
        Some(durations) => durations,
        None => {
            warnings.push(
                GenerationWarning::ExhaustedRetry {
                    stage: "melody rhythm".to_string(),
                    attempts: budget,
                }
                .logged(),
            );
            vec![FALLBACK_DURATION; (total_beats / FALLBACK_DURATION) as usize]
        }
    };

    let ctx = PitchContext {
        pool: &pool,
        root,
        chords: &chords,
    };
    let notes = match generate_pitches(&ctx, durations.len(), &mut rng) {
        Some(notes) => smooth_leaps(&notes, &pool),
        None => {
            return fallback_melody(
                params.bars,
                &key,
                scale,
                params.tempo,
                "no start pitch",
                warnings,
            )
        }
    };

    match Melody::new(notes, durations, &key, scale, params.tempo) {
        Ok(melody) => {
            tracing::debug!(
                key = %key,
                scale = scale.name(),
                bars = params.bars,
                notes = melody.len(),
                "generated melody"
            );
            Ok(Generated::with_warnings(melody, warnings))
        }
        Err(err) => {
            fallback_melody(params.bars, &key, scale, params.tempo, &err.to_string(), warnings)
        }
    }
}
