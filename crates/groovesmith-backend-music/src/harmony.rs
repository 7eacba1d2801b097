//! Chord progression suggestions.
//!
//! Progressions come from fixed genre x mood tables. Each candidate is tiled
//! to the requested number of bars, scored for variety and for having a
//! dominant, and returned best first.

use groovesmith_spec::theory::ChordSymbol;
use groovesmith_spec::{Category, GenerationWarning, Generated, HarmonyParams};
use serde::Serialize;

use crate::error::ComposeResult;

/// Progression used when no suggestion is available.
pub const FALLBACK_PROGRESSION: [&str; 4] = ["I", "V", "vi", "IV"];

/// Color for degrees missing from the color table.
pub const DEFAULT_COLOR: &str = "#888";

const DISTINCT_CHORD_POINTS: u32 = 20;
const DOMINANT_BONUS: u32 = 30;

type Progression = [&'static str; 4];

struct MoodTable {
    happy: [Progression; 4],
    sad: [Progression; 4],
}

struct GenreTable {
    genre: &'static str,
    moods: MoodTable,
}

static PROGRESSIONS: [GenreTable; 3] = [
    GenreTable {
        genre: "pop",
        moods: MoodTable {
            happy: [
                ["I", "V", "vi", "IV"],
                ["I", "vi", "IV", "V"],
                ["I", "IV", "V", "I"],
                ["I", "iii", "vi", "IV"],
            ],
            sad: [
                ["vi", "IV", "I", "V"],
                ["i", "VII", "iv", "i"],
                ["vi", "ii", "V", "I"],
                ["i", "iv", "VII", "III"],
            ],
        },
    },
    GenreTable {
        genre: "jazz",
        moods: MoodTable {
            happy: [
                ["IMaj7", "vi7", "ii7", "V7"],
                ["IMaj7", "VII7", "IIIMaj7", "VI7"],
                ["IMaj7", "ii7", "V7", "IMaj7"],
                ["IMaj7", "IV7", "iii7", "vi7"],
            ],
            sad: [
                ["i7", "iv7", "VII7", "IIIMaj7"],
                ["i7", "ii°7", "V7", "i7"],
                ["vi7", "ii7", "V7", "IMaj7"],
                ["i7", "iv7", "i7", "V7"],
            ],
        },
    },
    GenreTable {
        genre: "rock",
        moods: MoodTable {
            happy: [
                ["I", "IV", "V", "I"],
                ["I", "V", "IV", "I"],
                ["I", "bVII", "IV", "I"],
                ["I", "vi", "IV", "V"],
            ],
            sad: [
                ["i", "bVII", "bVI", "V"],
                ["i", "iv", "i", "V"],
                ["vi", "IV", "I", "V"],
                ["i", "bIII", "bVII", "i"],
            ],
        },
    },
];

static CHORD_COLORS: [(&str, &str); 7] = [
    ("I", "#4CAF50"),
    ("ii", "#2196F3"),
    ("iii", "#9C27B0"),
    ("IV", "#FF9800"),
    ("V", "#F44336"),
    ("vi", "#795548"),
    ("vii", "#607D8B"),
];

/// One ranked progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Chord symbols, one per bar.
    pub chords: Vec<String>,
    /// Key the suggestion was requested for.
    pub key: String,
    /// Harmonic interest; higher is better.
    pub score: u32,
    /// Display color per chord.
    pub colors: Vec<String>,
    /// Short description of the progression.
    pub description: String,
}

/// Display color for a chord symbol, keyed by its degree with the
/// diminished marker removed.
pub fn chord_color(symbol: &str) -> &'static str {
    ChordSymbol::parse(symbol)
        .ok()
        .and_then(|chord| {
            let token = chord.degree_token().replace('°', "");
            CHORD_COLORS
                .iter()
                .find(|(degree, _)| *degree == token)
                .map(|(_, color)| *color)
        })
        .unwrap_or(DEFAULT_COLOR)
}

/// Distinct chords x 20, plus 30 if a dominant (`V` or `V7`) appears.
pub fn score_progression(chords: &[String]) -> u32 {
    let mut distinct: Vec<&str> = chords.iter().map(String::as_str).collect();
    distinct.sort_unstable();
    distinct.dedup();
    let has_dominant = chords.iter().any(|c| c == "V" || c == "V7");
    distinct.len() as u32 * DISTINCT_CHORD_POINTS + if has_dominant { DOMINANT_BONUS } else { 0 }
}

/// Names well-known progressions.
pub fn describe_progression(chords: &[String]) -> &'static str {
    let is = |expected: &[&str]| chords.iter().map(String::as_str).eq(expected.iter().copied());
    if is(&["I", "V", "vi", "IV"]) {
        "The 'pop progression' - used in countless hit songs"
    } else if is(&["I", "vi", "IV", "V"]) {
        "Classic '50s progression - doo-wop style"
    } else if is(&["i", "bVII", "bVI", "V"]) {
        "Andalusian cadence - dramatic and powerful"
    } else if chords.iter().any(|c| c == "ii7") && chords.iter().any(|c| c == "V7") {
        "Jazz ii-V-I movement - sophisticated and smooth"
    } else {
        "A compelling progression with strong voice leading"
    }
}

/// Repeats `progression` until it is exactly `bars` long.
pub fn tile_progression(progression: &[&str], bars: usize) -> Vec<String> {
    progression
        .iter()
        .cycle()
        .take(bars)
        .map(|s| s.to_string())
        .collect()
}

fn lookup(
    genre: &str,
    mood: &str,
    warnings: &mut Vec<GenerationWarning>,
) -> &'static [Progression; 4] {
    let genre_key = genre.trim().to_ascii_lowercase();
    let table = match PROGRESSIONS.iter().find(|t| t.genre == genre_key) {
        Some(table) => table,
        None => {
            warnings.push(GenerationWarning::unknown(Category::Genre, genre, "pop").logged());
            &PROGRESSIONS[0]
        }
    };
    match mood.trim().to_ascii_lowercase().as_str() {
        "happy" => &table.moods.happy,
        "sad" => &table.moods.sad,
        _ => {
            warnings.push(GenerationWarning::unknown(Category::Mood, mood, "happy").logged());
            &table.moods.happy
        }
    }
}

/// Suggests chord progressions, best first.
///
/// Ties keep table order. An unknown genre falls back to pop and an unknown
/// mood to happy, each with a warning.
///
/// # Errors
/// Returns `InvalidInput` for zero bars.
///
/// # Example
/// ```
/// use groovesmith_backend_music::harmony::suggest;
/// use groovesmith_spec::HarmonyParams;
///
/// let ranked = suggest(&HarmonyParams::default()).unwrap().into_inner();
/// assert_eq!(ranked[0].chords, ["I", "V", "vi", "IV"]);
/// ```
pub fn suggest(params: &HarmonyParams) -> ComposeResult<Generated<Vec<Suggestion>>> {
    params.validate()?;
    let mut warnings = Vec::new();
    let candidates = lookup(&params.genre, &params.mood, &mut warnings);

    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .map(|progression| {
            let chords = tile_progression(progression, params.bars as usize);
            Suggestion {
                score: score_progression(&chords),
                colors: chords.iter().map(|c| chord_color(c).to_string()).collect(),
                description: describe_progression(&chords).to_string(),
                key: params.key.clone(),
                chords,
            }
        })
        .collect();
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        genre = %params.genre,
        mood = %params.mood,
        bars = params.bars,
        count = suggestions.len(),
        "suggested progressions"
    );
    Ok(Generated::with_warnings(suggestions, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(genre: &str, mood: &str, bars: u32) -> HarmonyParams {
        HarmonyParams {
            key: "C".to_string(),
            genre: genre.to_string(),
            mood: mood.to_string(),
            bars,
        }
    }

    fn strings(chords: &[&str]) -> Vec<String> {
        chords.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pop_happy_top_result() {
        let out = suggest(&params("pop", "happy", 4)).unwrap();
        assert!(out.is_clean());
        let top = &out.value[0];
        assert_eq!(top.chords, strings(&["I", "V", "vi", "IV"]));
        assert_eq!(top.score, 110);
        assert!(top.description.starts_with("The 'pop progression'"));
        assert_eq!(top.colors, strings(&["#4CAF50", "#F44336", "#795548", "#FF9800"]));
        assert_eq!(top.key, "C");
    }

    #[test]
    fn test_ranking_is_stable_and_descending() {
        let out = suggest(&params("pop", "happy", 4)).unwrap().into_inner();
        let scores: Vec<u32> = out.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![110, 110, 90, 80]);
        assert_eq!(out[1].chords, strings(&["I", "vi", "IV", "V"]));
    }

    #[test]
    fn test_tiling_to_bar_count() {
        let out = suggest(&params("rock", "sad", 6)).unwrap().into_inner();
        assert!(out.iter().all(|s| s.chords.len() == 6 && s.colors.len() == 6));

        let short = suggest(&params("pop", "happy", 2)).unwrap().into_inner();
        assert!(short.iter().all(|s| s.chords.len() == 2));
    }

    #[test]
    fn test_unknown_genre_and_mood_fall_back() {
        let out = suggest(&params("polka", "wistful", 4)).unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.value[0].chords, strings(&["I", "V", "vi", "IV"]));
    }

    #[test]
    fn test_jazz_descriptions_and_colors() {
        let out = suggest(&params("jazz", "happy", 4)).unwrap().into_inner();
        let ii_v = out
            .iter()
            .find(|s| s.chords == strings(&["IMaj7", "vi7", "ii7", "V7"]))
            .unwrap();
        assert_eq!(ii_v.description, "Jazz ii-V-I movement - sophisticated and smooth");
        assert_eq!(ii_v.colors, strings(&["#4CAF50", "#795548", "#2196F3", "#F44336"]));
    }

    #[test]
    fn test_chord_colors() {
        assert_eq!(chord_color("vii°"), "#607D8B");
        assert_eq!(chord_color("bVII"), DEFAULT_COLOR);
        assert_eq!(chord_color("vii°7"), "#607D8B");
        assert_eq!(chord_color("ii°7"), "#2196F3");
        assert_eq!(chord_color("ii°"), chord_color("ii"));
        assert_eq!(chord_color("nonsense"), DEFAULT_COLOR);
    }

    #[test]
    fn test_andalusian_description() {
        assert_eq!(
            describe_progression(&strings(&["i", "bVII", "bVI", "V"])),
            "Andalusian cadence - dramatic and powerful"
        );
        assert_eq!(
            describe_progression(&strings(&["I", "IV"])),
            "A compelling progression with strong voice leading"
        );
    }

    #[test]
    fn test_zero_bars_rejected() {
        assert!(suggest(&params("pop", "happy", 0)).is_err());
    }
}
