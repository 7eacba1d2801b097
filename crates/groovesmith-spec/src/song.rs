//! Song arrangements: section kinds, sections, and whole songs.

use serde::{Deserialize, Serialize};

use crate::melody::{Melody, BEATS_PER_BAR};
use crate::pattern::PatternGrid;

/// A structural section label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Intro,
    Verse,
    Chorus,
    Hook,
    Bridge,
    Solo,
    Buildup,
    Drop,
    Breakdown,
    Outro,
    Head,
    Solo1,
    Solo2,
}

/// Fixed shape of a section kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Length in 4/4 bars.
    pub bars: u32,
    /// Beat complexity passed to the rhythm composer.
    pub complexity: f64,
    /// Relative energy in [0, 1].
    pub energy: f64,
}

impl SectionKind {
    /// Every section kind.
    pub const ALL: [SectionKind; 13] = [
        SectionKind::Intro,
        SectionKind::Verse,
        SectionKind::Chorus,
        SectionKind::Hook,
        SectionKind::Bridge,
        SectionKind::Solo,
        SectionKind::Buildup,
        SectionKind::Drop,
        SectionKind::Breakdown,
        SectionKind::Outro,
        SectionKind::Head,
        SectionKind::Solo1,
        SectionKind::Solo2,
    ];

    /// Lowercase label.
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Intro => "intro",
            SectionKind::Verse => "verse",
            SectionKind::Chorus => "chorus",
            SectionKind::Hook => "hook",
            SectionKind::Bridge => "bridge",
            SectionKind::Solo => "solo",
            SectionKind::Buildup => "buildup",
            SectionKind::Drop => "drop",
            SectionKind::Breakdown => "breakdown",
            SectionKind::Outro => "outro",
            SectionKind::Head => "head",
            SectionKind::Solo1 => "solo1",
            SectionKind::Solo2 => "solo2",
        }
    }

    /// Looks up a kind by label.
    pub fn from_name(name: &str) -> Option<SectionKind> {
        SectionKind::ALL.into_iter().find(|k| k.name() == name)
    }

    /// The (bars, complexity, energy) triple for this kind.
    pub fn config(self) -> SectionConfig {
        let (bars, complexity, energy) = match self {
            SectionKind::Intro => (8, 0.3, 0.4),
            SectionKind::Verse => (16, 0.5, 0.6),
            SectionKind::Chorus => (16, 0.8, 0.9),
            SectionKind::Hook => (8, 0.7, 0.8),
            SectionKind::Bridge => (8, 0.6, 0.7),
            SectionKind::Solo => (32, 0.9, 0.9),
            SectionKind::Buildup => (16, 0.7, 0.8),
            SectionKind::Drop => (32, 0.9, 1.0),
            SectionKind::Breakdown => (16, 0.3, 0.5),
            SectionKind::Outro => (8, 0.3, 0.3),
            SectionKind::Head => (32, 0.6, 0.7),
            SectionKind::Solo1 => (32, 0.8, 0.8),
            SectionKind::Solo2 => (32, 0.9, 0.9),
        };
        SectionConfig {
            bars,
            complexity,
            energy,
        }
    }
}

/// Length of `bars` 4/4 bars in seconds at `tempo` BPM.
pub fn section_duration_seconds(bars: u32, tempo: u32) -> f64 {
    bars as f64 * BEATS_PER_BAR * 60.0 / tempo as f64
}

/// One generated section of a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section label.
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Onset in seconds from the start of the song.
    pub start_time: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Length in bars.
    pub bars: u32,
    /// Drum pattern covering the whole section.
    pub beat_pattern: PatternGrid,
    /// Lead line covering the whole section.
    pub melody: Melody,
    /// Chord symbols for this section.
    pub chord_progression: Vec<String>,
    /// Relative energy in [0, 1].
    pub energy: f64,
}

impl Section {
    /// Offset of the section end in seconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// A complete song arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Style name; re-tagged on arrangement variations.
    pub style: String,
    /// Tempo in BPM.
    pub tempo: u32,
    /// Key name.
    pub key: String,
    /// Full structural template, including slots past the duration cut-off.
    pub structure: Vec<SectionKind>,
    /// Generated sections in order.
    pub sections: Vec<Section>,
    /// Sum of section durations in seconds.
    pub total_duration: f64,
    /// One progression per structural slot.
    pub chord_progression: Vec<Vec<String>>,
    /// 1-based variation index; `None` for the base arrangement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<u32>,
}

impl Song {
    /// Number of sections actually generated.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}
