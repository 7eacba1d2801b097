//! Scale families and in-range pitch sets.

use serde::{Deserialize, Serialize};

/// A seven-note scale family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Scale {
    /// Every supported scale family.
    pub const ALL: [Scale; 8] = [
        Scale::Major,
        Scale::Minor,
        Scale::Dorian,
        Scale::Phrygian,
        Scale::Lydian,
        Scale::Mixolydian,
        Scale::Aeolian,
        Scale::Locrian,
    ];

    /// Semitone offsets from the root, strictly ascending and starting at 0.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Scale::Major => [0, 2, 4, 5, 7, 9, 11],
            Scale::Minor | Scale::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Scale::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Scale::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Scale::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Scale::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    /// Lowercase scale name.
    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Dorian => "dorian",
            Scale::Phrygian => "phrygian",
            Scale::Lydian => "lydian",
            Scale::Mixolydian => "mixolydian",
            Scale::Aeolian => "aeolian",
            Scale::Locrian => "locrian",
        }
    }

    /// Looks up a scale by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Scale> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "major" | "ionian" => Some(Scale::Major),
            "minor" => Some(Scale::Minor),
            _ => Scale::ALL.into_iter().find(|s| s.name() == lower),
        }
    }

    /// Returns true if `pitch` belongs to this scale rooted at `root`.
    pub fn contains(self, root: u8, pitch: u8) -> bool {
        let offset = (pitch as i32 - root as i32).rem_euclid(12) as u8;
        self.intervals().contains(&offset)
    }

    /// Scale pitches over three octaves around `root` (one below, the root
    /// octave, one above), restricted to `[low, high]` and sorted ascending.
    pub fn pitch_set(self, root: u8, low: u8, high: u8) -> Vec<u8> {
        let mut pitches: Vec<u8> = (-1..=1)
            .flat_map(|octave: i32| {
                self.intervals()
                    .into_iter()
                    .map(move |interval| root as i32 + 12 * octave + interval as i32)
            })
            .filter(|&p| p >= low as i32 && p <= high as i32)
            .map(|p| p as u8)
            .collect();
        pitches.sort_unstable();
        pitches.dedup();
        pitches
    }
}
