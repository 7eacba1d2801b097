//! Percussion voices and the pattern grid.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::validation::validate_bars;

/// Number of sixteenth-note steps in one 4/4 bar.
pub const STEPS_PER_BAR: usize = 16;

/// A percussion voice. The declaration order is the canonical row order of
/// every [`PatternGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrumVoice {
    Kick,
    Snare,
    HihatClosed,
    HihatOpen,
    Crash,
    Ride,
    TomHigh,
    TomMid,
    TomLow,
}

impl DrumVoice {
    /// Number of voices (grid rows).
    pub const COUNT: usize = 9;

    /// All voices in canonical row order.
    pub const ALL: [DrumVoice; 9] = [
        DrumVoice::Kick,
        DrumVoice::Snare,
        DrumVoice::HihatClosed,
        DrumVoice::HihatOpen,
        DrumVoice::Crash,
        DrumVoice::Ride,
        DrumVoice::TomHigh,
        DrumVoice::TomMid,
        DrumVoice::TomLow,
    ];

    /// Row index of this voice.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical voice name.
    pub fn name(self) -> &'static str {
        match self {
            DrumVoice::Kick => "kick",
            DrumVoice::Snare => "snare",
            DrumVoice::HihatClosed => "hihat_closed",
            DrumVoice::HihatOpen => "hihat_open",
            DrumVoice::Crash => "crash",
            DrumVoice::Ride => "ride",
            DrumVoice::TomHigh => "tom_high",
            DrumVoice::TomMid => "tom_mid",
            DrumVoice::TomLow => "tom_low",
        }
    }

    /// Looks up a voice by its canonical name.
    pub fn from_name(name: &str) -> Option<DrumVoice> {
        DrumVoice::ALL.into_iter().find(|v| v.name() == name)
    }
}

/// Voice x step matrix of velocities in [0, 1].
///
/// Rows follow [`DrumVoice::ALL`]; there are always 16 x `bars` columns.
/// Serializes as nested numeric arrays (one inner array per voice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PatternGrid {
    bars: usize,
    cells: Vec<Vec<f64>>,
}

impl PatternGrid {
    /// Creates a silent grid.
    pub fn new(bars: u32) -> SpecResult<Self> {
        let bars = validate_bars(bars)? as usize;
        Ok(Self {
            bars,
            cells: vec![vec![0.0; bars * STEPS_PER_BAR]; DrumVoice::COUNT],
        })
    }

    /// Number of bars.
    pub fn bars(&self) -> usize {
        self.bars
    }

    /// Number of steps (columns).
    pub fn steps(&self) -> usize {
        self.bars * STEPS_PER_BAR
    }

    /// Number of rows, always [`DrumVoice::COUNT`].
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Velocity at a cell; 0 outside the grid.
    pub fn velocity(&self, voice: DrumVoice, step: usize) -> f64 {
        self.cells[voice.index()].get(step).copied().unwrap_or(0.0)
    }

    /// Sets a cell, clamping into [0, 1]. Non-finite values become 0 and
    /// out-of-range steps are ignored.
    pub fn set(&mut self, voice: DrumVoice, step: usize, velocity: f64) {
        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if let Some(cell) = self.cells[voice.index()].get_mut(step) {
            *cell = velocity;
        }
    }

    /// One voice's row.
    pub fn row(&self, voice: DrumVoice) -> &[f64] {
        &self.cells[voice.index()]
    }

    /// Iterates over every sounding cell as `(voice, step, velocity)`.
    pub fn hits(&self) -> impl Iterator<Item = (DrumVoice, usize, f64)> + '_ {
        DrumVoice::ALL.into_iter().flat_map(move |voice| {
            self.cells[voice.index()]
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v > 0.0)
                .map(move |(step, &v)| (voice, step, v))
        })
    }

    /// Number of sounding cells.
    pub fn hit_count(&self) -> usize {
        self.hits().count()
    }

    /// Copy of the cells as nested arrays.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.cells.clone()
    }
}

impl TryFrom<Vec<Vec<f64>>> for PatternGrid {
    type Error = SpecError;

    fn try_from(cells: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        if cells.len() != DrumVoice::COUNT {
            return Err(SpecError::InvalidPattern(format!(
                "expected {} rows, got {}",
                DrumVoice::COUNT,
                cells.len()
            )));
        }
        let steps = cells[0].len();
        if steps == 0 || steps % STEPS_PER_BAR != 0 {
            return Err(SpecError::InvalidPattern(format!(
                "step count must be a positive multiple of {}, got {}",
                STEPS_PER_BAR, steps
            )));
        }
        if let Some((row, _)) = cells.iter().enumerate().find(|(_, r)| r.len() != steps) {
            return Err(SpecError::InvalidPattern(format!(
                "row {} has {} steps, expected {}",
                row,
                cells[row].len(),
                steps
            )));
        }
        if cells
            .iter()
            .flatten()
            .any(|v| !v.is_finite() || *v < 0.0 || *v > 1.0)
        {
            return Err(SpecError::InvalidPattern(
                "velocities must be finite and within [0, 1]".to_string(),
            ));
        }
        Ok(Self {
            bars: steps / STEPS_PER_BAR,
            cells,
        })
    }
}

impl From<PatternGrid> for Vec<Vec<f64>> {
    fn from(grid: PatternGrid) -> Self {
        grid.cells
    }
}
