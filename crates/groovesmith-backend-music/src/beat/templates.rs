//! One-bar drum templates.
//!
//! Named genres have hand-written bars. Any other genre is matched to a
//! [`Feel`] and gets a generated 4/4 bar instead.

use groovesmith_spec::{DrumVoice, PatternGrid, STEPS_PER_BAR};

/// One voice of a one-bar template: 1 marks a hit.
pub type TemplateRow = (DrumVoice, [u8; STEPS_PER_BAR]);

/// A named one-bar drum template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreTemplate {
    pub name: &'static str,
    pub rows: &'static [TemplateRow],
}

const BACKBEAT: [u8; 16] = [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0];
const QUARTER_KICK: [u8; 16] = [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0];
const EIGHTHS: [u8; 16] = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];

/// Templates for the genres with a hand-written bar.
pub static GENRE_TEMPLATES: [GenreTemplate; 4] = [
    GenreTemplate {
        name: "hip-hop",
        rows: &[
            (DrumVoice::Kick, QUARTER_KICK),
            (DrumVoice::Snare, BACKBEAT),
            (DrumVoice::HihatClosed, EIGHTHS),
        ],
    },
    GenreTemplate {
        name: "rock",
        rows: &[
            (DrumVoice::Kick, QUARTER_KICK),
            (DrumVoice::Snare, [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0]),
            (DrumVoice::HihatClosed, [1; 16]),
        ],
    },
    GenreTemplate {
        name: "jazz",
        rows: &[
            (DrumVoice::Kick, [1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 0]),
            (DrumVoice::Snare, [0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0]),
            (DrumVoice::Ride, [1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 0]),
        ],
    },
    GenreTemplate {
        name: "electronic",
        rows: &[
            (DrumVoice::Kick, QUARTER_KICK),
            (DrumVoice::Snare, BACKBEAT),
            (DrumVoice::HihatClosed, [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0]),
        ],
    },
];

/// Looks up a hand-written template by genre name (case-insensitive).
pub fn genre_template(genre: &str) -> Option<&'static GenreTemplate> {
    let lower = genre.trim().to_ascii_lowercase();
    GENRE_TEMPLATES.iter().find(|t| t.name == lower)
}

/// Rhythmic feel used for genres without a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feel {
    /// Kick on every beat.
    FourOnTheFloor,
    /// Ride-led swing with a light kick.
    Swing,
    /// Kick on beats 1 and 3.
    Straight,
}

const FOUR_ON_THE_FLOOR_HINTS: [&str; 9] = [
    "house", "techno", "trance", "edm", "dance", "trap", "dubstep", "electro", "disco",
];
const SWING_HINTS: [&str; 6] = ["jazz", "bebop", "fusion", "smooth", "swing", "blues"];

const FOUR_ON_THE_FLOOR_ROWS: [TemplateRow; 3] = [
    (DrumVoice::Kick, QUARTER_KICK),
    (DrumVoice::Snare, BACKBEAT),
    (DrumVoice::HihatClosed, EIGHTHS),
];

const SWING_ROWS: [TemplateRow; 4] = [
    (DrumVoice::Kick, [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]),
    (DrumVoice::Snare, BACKBEAT),
    (DrumVoice::HihatClosed, BACKBEAT),
    (DrumVoice::Ride, [1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 1]),
];

const STRAIGHT_ROWS: [TemplateRow; 3] = [
    (DrumVoice::Kick, [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]),
    (DrumVoice::Snare, BACKBEAT),
    (DrumVoice::HihatClosed, EIGHTHS),
];

impl Feel {
    /// Picks a feel from words in the genre name.
    pub fn detect(genre: &str) -> Feel {
        let lower = genre.to_ascii_lowercase();
        if FOUR_ON_THE_FLOOR_HINTS.iter().any(|h| lower.contains(h)) {
            Feel::FourOnTheFloor
        } else if SWING_HINTS.iter().any(|h| lower.contains(h)) {
            Feel::Swing
        } else {
            Feel::Straight
        }
    }

    /// Name reported when an unknown genre falls back to this feel.
    pub fn name(self) -> &'static str {
        match self {
            Feel::FourOnTheFloor => "four-on-the-floor",
            Feel::Swing => "swing",
            Feel::Straight => "straight",
        }
    }

    /// The generated one-bar rows.
    pub fn rows(self) -> &'static [TemplateRow] {
        match self {
            Feel::FourOnTheFloor => &FOUR_ON_THE_FLOOR_ROWS,
            Feel::Swing => &SWING_ROWS,
            Feel::Straight => &STRAIGHT_ROWS,
        }
    }
}

/// Tiles one-bar rows across every bar of `grid`.
///
/// Rows longer than the space left in the grid are truncated.
pub fn tile(grid: &mut PatternGrid, rows: &[TemplateRow]) {
    let steps = grid.steps();
    for (voice, row) in rows {
        for start in (0..steps).step_by(STEPS_PER_BAR) {
            for (offset, &hit) in row.iter().enumerate().take(steps - start) {
                if hit > 0 {
                    grid.set(*voice, start + offset, 1.0);
                }
            }
        }
    }
}
