//! Pitch, frequency, and key-name conversion.

/// MIDI pitch of the tuning reference (A4).
pub const REFERENCE_PITCH: u8 = 69;

/// Frequency of the tuning reference in Hz.
pub const REFERENCE_FREQ: f64 = 440.0;

/// Highest representable pitch.
pub const MAX_PITCH: u8 = 127;

/// MIDI pitch of the tonic used when a key is placed in octave 4.
pub const MIDDLE_C: u8 = 60;

/// Sharp-spelled pitch class names, indexed by semitone.
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a (possibly fractional) MIDI pitch to frequency in Hz.
///
/// Uses `f = 440 * 2^((p - 69) / 12)`.
///
/// # Examples
/// ```
/// use groovesmith_spec::theory::midi_to_freq;
///
/// assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-9);
/// assert!((midi_to_freq(60.0) - 261.626).abs() < 0.01);
/// ```
pub fn midi_to_freq(pitch: f64) -> f64 {
    REFERENCE_FREQ * 2.0_f64.powf((pitch - REFERENCE_PITCH as f64) / 12.0)
}

/// Convert a frequency in Hz to the nearest MIDI pitch (0-127).
pub fn freq_to_midi(freq: f64) -> u8 {
    let pitch = REFERENCE_PITCH as f64 + 12.0 * (freq / REFERENCE_FREQ).log2();
    pitch.round().clamp(0.0, MAX_PITCH as f64) as u8
}

/// Clamp an arbitrary integer pitch into the MIDI range.
pub fn clamp_pitch(pitch: i32) -> u8 {
    pitch.clamp(0, MAX_PITCH as i32) as u8
}

/// Parse a key name ("C", "F#", "Bb", "eb") into a pitch class (0-11).
///
/// Returns `None` for anything that is not a single note letter with an
/// optional `#` or `b`.
pub fn parse_pitch_class(name: &str) -> Option<u8> {
    let mut chars = name.trim().chars();
    let letter = chars.next()?;
    let base: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let accidental = match chars.next() {
        None => 0,
        Some('#') | Some('♯') => 1,
        Some('b') | Some('♭') => -1,
        Some(_) => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some((base + accidental).rem_euclid(12) as u8)
}

/// MIDI pitch of a key's tonic in octave 4 (C = 60 ... B = 71).
pub fn key_root_pitch(name: &str) -> Option<u8> {
    parse_pitch_class(name).map(|pc| MIDDLE_C + pc)
}

/// Name of a pitch class, sharp spelling.
pub fn pitch_class_name(pc: u8) -> &'static str {
    PITCH_CLASS_NAMES[(pc % 12) as usize]
}
