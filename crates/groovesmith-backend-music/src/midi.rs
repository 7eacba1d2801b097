//! Standard MIDI File export of note-event streams.
//!
//! Output is SMF format 1 with two tracks: a tempo track and a single piano
//! track holding every note.

use groovesmith_backend_audio::melody_to_events;
use groovesmith_spec::validation::validate_tempo;
use groovesmith_spec::{Generated, Melody, NoteEvent};
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

use crate::error::{ComposeError, ComposeResult};

/// Ticks per quarter note.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Velocity used when exporting a melody.
pub const MELODY_VELOCITY: u8 = 80;

const MAX_DELTA: u64 = 0x0FFF_FFFF;
const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;
const PIANO_PROGRAM: u8 = 0;

#[derive(Debug, Clone)]
struct TimedEvent {
    tick: u64,
    // note-offs sort before note-ons on the same tick
    order: u8,
    kind: TrackEventKind<'static>,
}

fn seconds_to_ticks(seconds: f64, tempo: u32) -> ComposeResult<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ComposeError::invalid_param(
            "events",
            format!("event time must be finite and non-negative, got {}", seconds),
        ));
    }
    Ok((seconds * tempo as f64 / 60.0 * TICKS_PER_QUARTER as f64).round() as u64)
}

fn note_events(event: &NoteEvent, tempo: u32) -> ComposeResult<[TimedEvent; 2]> {
    if event.end < event.start {
        return Err(ComposeError::invalid_param(
            "events",
            format!("note ends at {} before it starts at {}", event.end, event.start),
        ));
    }
    let key = u7::new(event.pitch.min(127));
    let vel = u7::new(event.velocity.min(127));
    let channel = u4::new(0);
    Ok([
        TimedEvent {
            tick: seconds_to_ticks(event.start, tempo)?,
            order: 1,
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { key, vel },
            },
        },
        TimedEvent {
            tick: seconds_to_ticks(event.end, tempo)?,
            order: 0,
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff { key, vel: u7::new(0) },
            },
        },
    ])
}

fn tempo_track(tempo: u32) -> Vec<TrackEvent<'static>> {
    let micros_per_quarter = (60_000_000 / tempo).min(MAX_TEMPO_MICROS);
    vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_quarter))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]
}

fn piano_track(events: &[NoteEvent], tempo: u32) -> ComposeResult<Vec<TrackEvent<'static>>> {
    let mut timed = Vec::with_capacity(events.len() * 2);
    for event in events {
        timed.extend(note_events(event, tempo)?);
    }
    timed.sort_by_key(|e| (e.tick, e.order));

    let mut track = Vec::with_capacity(timed.len() + 3);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Piano")),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::ProgramChange {
                program: u7::new(PIANO_PROGRAM),
            },
        },
    });

    let mut previous_tick = 0;
    for event in timed {
        let delta = event.tick - previous_tick;
        if delta > MAX_DELTA {
            return Err(ComposeError::invalid_param(
                "events",
                format!("gap of {} ticks exceeds the MIDI delta limit", delta),
            ));
        }
        track.push(TrackEvent {
            delta: u28::new(delta as u32),
            kind: event.kind,
        });
        previous_tick = event.tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    Ok(track)
}

/// Encodes a note-event stream as a Standard MIDI File.
///
/// Event times in seconds become ticks at `tempo` BPM and 480 ticks per
/// quarter note, rounded to the nearest tick. Pitches and velocities are
/// clamped into 0..=127. An empty stream yields a file with an empty piano
/// track.
///
/// # Errors
/// Returns `InvalidInput` for a zero tempo and `InvalidParameter` for a
/// negative or non-finite event time or a note that ends before it starts.
pub fn write_smf(events: &[NoteEvent], tempo: u32) -> ComposeResult<Vec<u8>> {
    validate_tempo(tempo)?;

    let smf = Smf {
        header: Header::new(Format::Parallel, Timing::Metrical(u15::new(TICKS_PER_QUARTER))),
        tracks: vec![tempo_track(tempo), piano_track(events, tempo)?],
    };
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;

    tracing::debug!(
        notes = events.len(),
        tempo,
        bytes = bytes.len(),
        "encoded MIDI file"
    );
    Ok(bytes)
}

/// Converts a melody to events at velocity 80 and encodes them.
pub fn melody_to_smf(melody: &Melody) -> ComposeResult<Generated<Vec<u8>>> {
    let notes: Vec<i32> = melody.notes().iter().map(|&n| n as i32).collect();
    let (events, warnings) =
        melody_to_events(&notes, melody.durations(), melody.tempo(), MELODY_VELOCITY)?.into_parts();
    let bytes = write_smf(&events, melody.tempo())?;
    Ok(Generated::with_warnings(bytes, warnings))
}
