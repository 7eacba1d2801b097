//! Whole-song composer and arrangement variations.
//!
//! A song walks a per-style structural template. Every slot gets its own
//! chord progression derived from one base progression, and every section
//! gets its own beat and melody, each generated from a seed derived from the
//! song seed and the slot index. Sections are added until the running time
//! reaches the requested duration; the last one may overshoot.

use groovesmith_backend_audio::rng::{
    create_component_rng, derive_component_seed, derive_layer_seed,
};
use groovesmith_spec::{
    section_duration_seconds, BeatParams, Category, GenerationWarning, Generated, HarmonyParams,
    MelodyParams, Section, SectionKind, Song, SongParams,
};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::beat::generate_beat;
use crate::error::ComposeResult;
use crate::harmony::{suggest, FALLBACK_PROGRESSION};
use crate::melody::generate_melody;

use groovesmith_spec::SectionKind as S;

static STRUCTURES: [(&str, &[SectionKind]); 5] = [
    ("pop", &[S::Intro, S::Verse, S::Chorus, S::Verse, S::Chorus, S::Bridge, S::Chorus, S::Outro]),
    ("rock", &[S::Intro, S::Verse, S::Chorus, S::Verse, S::Chorus, S::Solo, S::Chorus, S::Outro]),
    ("hip-hop", &[S::Intro, S::Verse, S::Hook, S::Verse, S::Hook, S::Verse, S::Hook, S::Outro]),
    ("jazz", &[S::Intro, S::Head, S::Solo1, S::Solo2, S::Head, S::Outro]),
    ("electronic", &[S::Intro, S::Buildup, S::Drop, S::Breakdown, S::Buildup, S::Drop, S::Outro]),
];

/// Chance that a chord in a tension slot is replaced by a richer voicing.
const TENSION_PROBABILITY: f64 = 0.3;

static TENSION_SUBSTITUTIONS: [(&str, [&str; 2]); 4] = [
    ("I", ["IMaj7", "I6"]),
    ("V", ["V7", "V9"]),
    ("vi", ["vi7", "vim7"]),
    ("IV", ["IVMaj7", "IVadd9"]),
];

static VARIATION_STYLES: [(&str, [&str; 3]); 5] = [
    ("pop", ["acoustic", "electronic", "rock"]),
    ("rock", ["metal", "indie", "progressive"]),
    ("hip-hop", ["trap", "boom-bap", "experimental"]),
    ("electronic", ["house", "techno", "ambient"]),
    ("jazz", ["fusion", "bebop", "smooth"]),
];
static FALLBACK_VARIATION_STYLES: [&str; 3] = ["alternative", "remix", "acoustic"];

/// Sub-styles whose name is also a beat genre.
const BEAT_GENRES: [&str; 3] = ["rock", "jazz", "electronic"];

/// Structural template for a style, if the style has one.
pub fn structure_for(style: &str) -> Option<&'static [SectionKind]> {
    STRUCTURES
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, structure)| *structure)
}

/// Scale used for a style's melodies.
pub fn scale_for(style: &str) -> &'static str {
    if style == "jazz" {
        "minor"
    } else {
        "major"
    }
}

/// Beat complexity for a variation sub-style.
pub fn style_complexity(style: &str) -> f64 {
    match style {
        "acoustic" => 0.4,
        "electronic" => 0.8,
        "metal" => 0.9,
        "ambient" => 0.3,
        "trap" => 0.7,
        "techno" => 0.8,
        "fusion" => 0.9,
        "indie" => 0.5,
        _ => 0.6,
    }
}

/// Sub-styles tried when varying a song of `style`.
pub fn variation_styles(style: &str) -> &'static [&'static str] {
    VARIATION_STYLES
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, styles)| styles.as_slice())
        .unwrap_or(&FALLBACK_VARIATION_STYLES)
}

fn add_tension(base: &[String], rng: &mut Pcg32) -> Vec<String> {
    base.iter()
        .map(|chord| {
            let options = TENSION_SUBSTITUTIONS
                .iter()
                .find(|(degree, _)| *degree == chord.as_str())
                .map(|(_, options)| options);
            match options {
                Some(options) if rng.gen::<f64>() < TENSION_PROBABILITY => options
                    .choose(rng)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| chord.clone()),
                _ => chord.clone(),
            }
        })
        .collect()
}

/// One progression per structural slot.
///
/// The first and last slots loop the first two base chords, odd slots use the
/// base progression, and the remaining slots get random tension voicings.
pub fn slot_progressions(base: &[String], slots: usize, rng: &mut Pcg32) -> Vec<Vec<String>> {
    (0..slots)
        .map(|i| {
            if i == 0 || i + 1 == slots {
                let head = &base[..base.len().min(2)];
                head.iter().chain(head.iter()).cloned().collect()
            } else if i % 2 == 1 {
                base.to_vec()
            } else {
                add_tension(base, rng)
            }
        })
        .collect()
}

fn base_progression(
    key: &str,
    style: &str,
    warnings: &mut Vec<GenerationWarning>,
) -> ComposeResult<Vec<String>> {
    let params = HarmonyParams {
        key: key.to_string(),
        genre: style.to_string(),
        mood: "happy".to_string(),
        bars: 4,
    };
    let suggestions = suggest(&params)?.drain_into(warnings);
    Ok(suggestions
        .into_iter()
        .next()
        .map(|s| s.chords)
        .unwrap_or_else(|| FALLBACK_PROGRESSION.iter().map(|s| s.to_string()).collect()))
}

/// Generates a complete song.
///
/// Every section in the result has a non-empty chord progression, a beat
/// pattern covering its bars, and a melody covering its bars. The song's
/// `total_duration` is the sum of the section durations and is at least the
/// requested duration unless the structure ran out first.
///
/// # Errors
/// Returns `InvalidInput` for a zero tempo or a negative or non-finite
/// duration.
pub fn generate_whole_song(params: &SongParams, seed: u32) -> ComposeResult<Generated<Song>> {
    params.validate()?;
    let mut warnings = Vec::new();

    let structure = match structure_for(&params.style) {
        Some(structure) => structure,
        None => {
            warnings.push(
                GenerationWarning::unknown(Category::Style, &params.style, "pop").logged(),
            );
            STRUCTURES[0].1
        }
    };

    let base = base_progression(&params.key, &params.style, &mut warnings)?;
    let mut chord_rng = create_component_rng(seed, "chords");
    let chord_progression = slot_progressions(&base, structure.len(), &mut chord_rng);
    let scale = scale_for(&params.style);

    let mut sections = Vec::new();
    let mut current_time = 0.0;
    for (index, (&kind, chords)) in structure.iter().zip(&chord_progression).enumerate() {
        let config = kind.config();
        let section_seed = derive_layer_seed(seed, index as u32);

        let beat = generate_beat(
            &BeatParams {
                genre: params.style.clone(),
                tempo: params.tempo,
                bars: config.bars,
                complexity: config.complexity,
                reference: None,
            },
            section_seed,
        )?
        .drain_into(&mut warnings);

        let melody = generate_melody(
            &MelodyParams {
                key: params.key.clone(),
                scale: scale.to_string(),
                tempo: params.tempo,
                bars: config.bars,
                chord_progression: Some(chords.clone()),
                reference: None,
            },
            section_seed,
        )?
        .drain_into(&mut warnings);

        let duration = section_duration_seconds(config.bars, params.tempo);
        sections.push(Section {
            kind,
            start_time: current_time,
            duration,
            bars: config.bars,
            beat_pattern: beat.grid,
            melody,
            chord_progression: chords.clone(),
            energy: config.energy,
        });
        current_time += duration;
        if current_time >= params.total_duration {
            break;
        }
    }

    tracing::debug!(
        style = %params.style,
        tempo = params.tempo,
        sections = sections.len(),
        total_duration = current_time,
        "generated song"
    );

    Ok(Generated::with_warnings(
        Song {
            style: params.style.clone(),
            tempo: params.tempo,
            key: params.key.clone(),
            structure: structure.to_vec(),
            sections,
            total_duration: current_time,
            chord_progression,
            variation_id: None,
        },
        warnings,
    ))
}

/// Generates up to `num_variations` re-styled copies of a song.
///
/// Each copy is re-tagged with a sub-style and a 1-based `variation_id`.
/// Only the beat patterns are regenerated, with the sub-style's complexity;
/// melodies and chords are kept as they are.
///
/// # Errors
/// Returns `InvalidInput` if the song's tempo is zero.
pub fn generate_arrangement_variations(
    song: &Song,
    num_variations: usize,
    seed: u32,
) -> ComposeResult<Generated<Vec<Song>>> {
    let mut warnings = Vec::new();
    let targets = variation_styles(&song.style);
    let mut variations = Vec::new();

    for (i, &target) in targets.iter().take(num_variations).enumerate() {
        let mut variation = song.clone();
        variation.style = target.to_string();
        variation.variation_id = Some(i as u32 + 1);

        let genre = if BEAT_GENRES.contains(&target) {
            target
        } else {
            song.style.as_str()
        };
        let complexity = style_complexity(target);
        let variation_seed = derive_component_seed(seed, target);

        for (index, section) in variation.sections.iter_mut().enumerate() {
            let beat = generate_beat(
                &BeatParams {
                    genre: genre.to_string(),
                    tempo: song.tempo,
                    bars: section.bars,
                    complexity,
                    reference: None,
                },
                derive_layer_seed(variation_seed, index as u32),
            )?
            .drain_into(&mut warnings);
            section.beat_pattern = beat.grid;
        }
        variations.push(variation);
    }

    tracing::debug!(
        style = %song.style,
        requested = num_variations,
        generated = variations.len(),
        "generated arrangement variations"
    );
    Ok(Generated::with_warnings(variations, warnings))
}
