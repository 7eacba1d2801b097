//! Melody to note-event stream.

use groovesmith_spec::theory::clamp_pitch;
use groovesmith_spec::validation::validate_tempo;
use groovesmith_spec::{GenerationWarning, Generated, Melody, NoteEvent, SpecError};

use crate::error::{AudioError, AudioResult};

use super::RenderEngine;

/// Converts parallel pitch and duration sequences into timed note events.
///
/// Durations are in beats and become `duration * 60 / tempo` seconds.
/// Pitches are clamped into 0..=127. Non-positive durations are skipped
/// without advancing time. If the sequences differ in length both are
/// truncated to the shorter one and a `Reconciled` warning is recorded.
///
/// # Errors
/// Returns `InvalidInput` for a zero tempo or a zero or out-of-range
/// velocity, `InvalidParameter` for a non-finite duration, and `EmptyInput`
/// when nothing is left after truncation.
pub fn melody_to_events(
    notes: &[i32],
    durations: &[f64],
    tempo: u32,
    velocity: u8,
) -> AudioResult<Generated<Vec<NoteEvent>>> {
    validate_tempo(tempo)?;
    if velocity == 0 || velocity > 127 {
        return Err(SpecError::invalid_input(
            "velocity",
            format!("must be within 1..=127, got {}", velocity),
        )
        .into());
    }

    let mut warnings = Vec::new();
    let len = notes.len().min(durations.len());
    if notes.len() != durations.len() {
        warnings.push(
            GenerationWarning::Reconciled {
                field: "durations".to_string(),
                message: format!(
                    "{} notes and {} durations, truncated both to {}",
                    notes.len(),
                    durations.len(),
                    len
                ),
            }
            .logged(),
        );
    }
    if len == 0 {
        return Err(AudioError::empty("melody has no notes"));
    }
    if let Some(d) = durations[..len].iter().find(|d| !d.is_finite()) {
        return Err(AudioError::invalid_param(
            "durations",
            format!("must be finite, got {}", d),
        ));
    }

    let seconds_per_beat = 60.0 / tempo as f64;
    let mut events = Vec::with_capacity(len);
    let mut now = 0.0;
    let mut skipped = 0usize;
    for (&pitch, &duration) in notes[..len].iter().zip(&durations[..len]) {
        if duration <= 0.0 {
            skipped += 1;
            continue;
        }
        let length = duration * seconds_per_beat;
        events.push(NoteEvent {
            pitch: clamp_pitch(pitch),
            velocity,
            start: now,
            end: now + length,
        });
        now += length;
    }
    if skipped > 0 {
        warnings.push(
            GenerationWarning::Reconciled {
                field: "durations".to_string(),
                message: format!("skipped {} non-positive durations", skipped),
            }
            .logged(),
        );
    }

    tracing::debug!(events = events.len(), tempo, "melody converted to events");
    Ok(Generated::with_warnings(events, warnings))
}

impl RenderEngine {
    /// Converts a melody to events at its own tempo using the configured
    /// note velocity.
    pub fn melody_events(&self, melody: &Melody) -> AudioResult<Generated<Vec<NoteEvent>>> {
        let notes: Vec<i32> = melody.notes().iter().map(|&p| p as i32).collect();
        melody_to_events(
            &notes,
            melody.durations(),
            melody.tempo(),
            self.config.note_velocity,
        )
    }
}
