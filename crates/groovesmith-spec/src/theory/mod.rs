//! Music theory tables: note names, scales, and Roman-numeral chords.
//!
//! Everything here is an immutable lookup; nothing allocates state that
//! outlives a call.

mod chord;
mod pitch;
mod scale;


pub use chord::{ChordExtension, ChordQuality, ChordSymbol};
pub use pitch::{
    clamp_pitch, freq_to_midi, key_root_pitch, midi_to_freq, parse_pitch_class,
    pitch_class_name, MAX_PITCH, MIDDLE_C, PITCH_CLASS_NAMES, REFERENCE_FREQ, REFERENCE_PITCH,
};
pub use scale::Scale;

/// Semitone offsets (mod 12) of the stable tones: root, major third, fifth.
pub const STABLE_TONES: [u8; 3] = [0, 4, 7];

/// Returns true if `pitch` is a stable tone relative to `root`.
pub fn is_stable_tone(root: u8, pitch: u8) -> bool {
    let offset = (pitch as i32 - root as i32).rem_euclid(12) as u8;
    STABLE_TONES.contains(&offset)
}

/// Returns the member of `pool` closest to `target`, preferring the lower
/// pitch on ties. `None` only if the pool is empty.
pub fn nearest_pitch(pool: &[u8], target: i32) -> Option<u8> {
    pool.iter()
        .copied()
        .min_by_key(|&p| ((p as i32 - target).abs(), p))
}
