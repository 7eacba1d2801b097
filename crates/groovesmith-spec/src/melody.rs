//! Melody records and symbolic note events.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::theory::{Scale, MAX_PITCH};
use crate::validation::validate_tempo;

/// Beats in one 4/4 bar.
pub const BEATS_PER_BAR: f64 = 4.0;

/// A monophonic line: parallel pitch and duration sequences plus metadata.
///
/// Constructed through [`Melody::new`], which enforces that both sequences
/// have the same non-zero length and that every duration is a positive
/// number of beats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MelodyRecord", into = "MelodyRecord")]
pub struct Melody {
    notes: Vec<u8>,
    durations: Vec<f64>,
    key: String,
    scale: Scale,
    tempo: u32,
}

impl Melody {
    /// Creates a melody.
    ///
    /// # Errors
    /// Returns `InvalidInput` if either sequence is empty, the lengths differ,
    /// a pitch exceeds 127, a duration is not a positive finite number, or the
    /// tempo is zero.
    pub fn new(
        notes: Vec<u8>,
        durations: Vec<f64>,
        key: impl Into<String>,
        scale: Scale,
        tempo: u32,
    ) -> SpecResult<Self> {
        validate_tempo(tempo)?;
        if notes.is_empty() {
            return Err(SpecError::invalid_input("notes", "melody cannot be empty"));
        }
        if notes.len() != durations.len() {
            return Err(SpecError::invalid_input(
                "durations",
                format!(
                    "{} notes but {} durations",
                    notes.len(),
                    durations.len()
                ),
            ));
        }
        if let Some(p) = notes.iter().find(|&&p| p > MAX_PITCH) {
            return Err(SpecError::invalid_input(
                "notes",
                format!("pitch {} is outside 0..=127", p),
            ));
        }
        if let Some(d) = durations.iter().find(|d| !d.is_finite() || **d <= 0.0) {
            return Err(SpecError::invalid_input(
                "durations",
                format!("durations must be positive beats, got {}", d),
            ));
        }
        Ok(Self {
            notes,
            durations,
            key: key.into(),
            scale,
            tempo,
        })
    }

    /// Pitches, one per slot.
    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    /// Durations in beats, one per slot.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Key name the melody was written in.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Scale family.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Tempo in BPM.
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Pairs with `len` (clippy `len_without_is_empty`). A constructed melody
    /// always has notes, so this is false.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Sum of durations in beats.
    pub fn total_beats(&self) -> f64 {
        self.durations.iter().sum()
    }

    /// Length in seconds at the melody's tempo.
    pub fn total_duration(&self) -> f64 {
        self.total_beats() * 60.0 / self.tempo as f64
    }

    /// Iterates `(pitch, duration_beats)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.notes.iter().copied().zip(self.durations.iter().copied())
    }
}

/// Serialized shape of a [`Melody`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MelodyRecord {
    notes: Vec<u8>,
    durations: Vec<f64>,
    key: String,
    scale: Scale,
    tempo: u32,
    #[serde(default, skip_deserializing)]
    total_duration: f64,
}

impl TryFrom<MelodyRecord> for Melody {
    type Error = SpecError;

    fn try_from(record: MelodyRecord) -> Result<Self, Self::Error> {
        Melody::new(
            record.notes,
            record.durations,
            record.key,
            record.scale,
            record.tempo,
        )
    }
}

impl From<Melody> for MelodyRecord {
    fn from(melody: Melody) -> Self {
        let total_duration = melody.total_duration();
        MelodyRecord {
            notes: melody.notes,
            durations: melody.durations,
            key: melody.key,
            scale: melody.scale,
            tempo: melody.tempo,
            total_duration,
        }
    }
}

/// One timed note, the unit of the symbolic event stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch 0-127.
    pub pitch: u8,
    /// MIDI velocity 1-127.
    pub velocity: u8,
    /// Onset in seconds.
    pub start: f64,
    /// Release in seconds.
    pub end: f64,
}

impl NoteEvent {
    /// Length of the note in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
