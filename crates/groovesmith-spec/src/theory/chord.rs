//! Roman-numeral chord symbols.
//!
//! A symbol is `[accidental] numeral [quality] [extension]`:
//!
//! - accidental: `b` or `#`, shifting the degree root by a semitone
//! - numeral: `I` .. `VII`; upper case is a major triad, lower case minor
//! - quality: `°`/`dim`/`o` (diminished), `ø` (half-diminished), `m` (minor)
//! - extension: `7`, `Maj7`/`maj7`/`M7`, `6`, `9`, `add9`
//!
//! An unaltered upper-case `VII` is read as the borrowed flat-seven major
//! chord, which is how pop and rock progressions use it.

use crate::error::{SpecError, SpecResult};

use super::pitch::MAX_PITCH;

/// Triad quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

impl ChordQuality {
    /// Semitone offsets of the triad from the chord root.
    pub fn triad(self) -> [u8; 3] {
        match self {
            ChordQuality::Major => [0, 4, 7],
            ChordQuality::Minor => [0, 3, 7],
            ChordQuality::Diminished => [0, 3, 6],
        }
    }
}

/// Notes added on top of the triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordExtension {
    /// Major seventh (+11).
    MajorSeventh,
    /// Minor (dominant) seventh (+10).
    MinorSeventh,
    /// Major sixth (+9).
    Sixth,
    /// Minor seventh and ninth (+10, +14).
    Ninth,
    /// Added ninth without a seventh (+14).
    AddNinth,
}

impl ChordExtension {
    fn intervals(self) -> &'static [u8] {
        match self {
            ChordExtension::MajorSeventh => &[11],
            ChordExtension::MinorSeventh => &[10],
            ChordExtension::Sixth => &[9],
            ChordExtension::Ninth => &[10, 14],
            ChordExtension::AddNinth => &[14],
        }
    }
}

/// A parsed Roman-numeral chord symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordSymbol {
    symbol: String,
    numeral: String,
    accidental: i8,
    root_offset: u8,
    quality: ChordQuality,
    extension: Option<ChordExtension>,
}

/// Degree number (1-7) of an upper-cased numeral.
fn numeral_degree(numeral: &str) -> Option<usize> {
    match numeral {
        "I" => Some(1),
        "II" => Some(2),
        "III" => Some(3),
        "IV" => Some(4),
        "V" => Some(5),
        "VI" => Some(6),
        "VII" => Some(7),
        _ => None,
    }
}

/// Semitone offset of each scale degree from the key root.
const DEGREE_OFFSETS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

impl ChordSymbol {
    /// Parses a chord symbol.
    ///
    /// # Examples
    /// ```
    /// use groovesmith_spec::theory::{ChordQuality, ChordSymbol};
    ///
    /// let chord = ChordSymbol::parse("V7").unwrap();
    /// assert_eq!(chord.root_offset(), 7);
    /// assert_eq!(chord.quality(), ChordQuality::Major);
    /// assert_eq!(chord.pitch_classes(0), vec![7, 11, 2, 5]);
    /// ```
    pub fn parse(symbol: &str) -> SpecResult<Self> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(SpecError::invalid_chord(symbol, "chord symbol cannot be empty"));
        }

        let is_numeral_char = |c: char| matches!(c, 'I' | 'V' | 'i' | 'v');

        let mut rest = trimmed;
        let mut accidental: i8 = 0;
        if let Some(stripped) = rest.strip_prefix('b') {
            if stripped.starts_with(is_numeral_char) {
                accidental = -1;
                rest = stripped;
            }
        } else if let Some(stripped) = rest.strip_prefix('#') {
            accidental = 1;
            rest = stripped;
        }

        let numeral_len = rest
            .char_indices()
            .find(|&(_, c)| !is_numeral_char(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let numeral = &rest[..numeral_len];
        rest = &rest[numeral_len..];

        if numeral.is_empty() {
            return Err(SpecError::invalid_chord(symbol, "missing roman numeral"));
        }
        let upper = numeral.chars().all(|c| c.is_ascii_uppercase());
        let lower = numeral.chars().all(|c| c.is_ascii_lowercase());
        if !upper && !lower {
            return Err(SpecError::invalid_chord(symbol, "numeral mixes upper and lower case"));
        }
        let degree = numeral_degree(&numeral.to_ascii_uppercase())
            .ok_or_else(|| SpecError::invalid_chord(symbol, "unknown roman numeral"))?;

        let mut quality = if upper {
            ChordQuality::Major
        } else {
            ChordQuality::Minor
        };
        let mut half_diminished = false;

        if let Some(stripped) = rest
            .strip_prefix('°')
            .or_else(|| rest.strip_prefix("dim"))
            .or_else(|| rest.strip_prefix('o'))
        {
            quality = ChordQuality::Diminished;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('ø') {
            quality = ChordQuality::Diminished;
            half_diminished = true;
            rest = stripped;
        } else if rest.starts_with('m') && !rest.starts_with("maj") {
            quality = ChordQuality::Minor;
            rest = &rest[1..];
        }

        let extension = match rest {
            "" if half_diminished => Some(ChordExtension::MinorSeventh),
            "" => None,
            "7" => Some(ChordExtension::MinorSeventh),
            "Maj7" | "maj7" | "M7" => Some(ChordExtension::MajorSeventh),
            "6" => Some(ChordExtension::Sixth),
            "9" => Some(ChordExtension::Ninth),
            "add9" => Some(ChordExtension::AddNinth),
            _ => {
                return Err(SpecError::invalid_chord(
                    symbol,
                    format!("unknown suffix '{}'", rest),
                ))
            }
        };

        let mut offset = DEGREE_OFFSETS[degree - 1] + accidental as i32;
        if degree == 7 && upper && accidental == 0 {
            offset -= 1;
        }

        Ok(Self {
            symbol: trimmed.to_string(),
            numeral: numeral.to_string(),
            accidental,
            root_offset: offset.rem_euclid(12) as u8,
            quality,
            extension,
        })
    }

    /// The tonic major triad, used whenever a symbol cannot be resolved.
    pub fn tonic() -> Self {
        Self {
            symbol: "I".to_string(),
            numeral: "I".to_string(),
            accidental: 0,
            root_offset: 0,
            quality: ChordQuality::Major,
            extension: None,
        }
    }

    /// The symbol as written.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Semitone offset of the chord root from the key root.
    pub fn root_offset(&self) -> u8 {
        self.root_offset
    }

    /// Triad quality.
    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    /// Extension above the triad, if any.
    pub fn extension(&self) -> Option<ChordExtension> {
        self.extension
    }

    /// Returns true if the chord carries a seventh.
    pub fn has_seventh(&self) -> bool {
        matches!(
            self.extension,
            Some(ChordExtension::MajorSeventh)
                | Some(ChordExtension::MinorSeventh)
                | Some(ChordExtension::Ninth)
        )
    }

    /// Degree token without extensions, e.g. `"V"` for `"V7"` and `"vii°"`
    /// for `"vii°"`. Used as the key for per-degree lookup tables.
    pub fn degree_token(&self) -> String {
        let mut token = String::new();
        match self.accidental {
            -1 => token.push('b'),
            1 => token.push('#'),
            _ => {}
        }
        token.push_str(&self.numeral);
        if self.quality == ChordQuality::Diminished {
            token.push('°');
        }
        token
    }

    /// Semitone offsets of every chord tone from the chord root.
    pub fn intervals(&self) -> Vec<u8> {
        let mut intervals = self.quality.triad().to_vec();
        if let Some(ext) = self.extension {
            intervals.extend_from_slice(ext.intervals());
        }
        intervals
    }

    /// Pitch classes of the chord in the given key, root first.
    pub fn pitch_classes(&self, key_pc: u8) -> Vec<u8> {
        self.intervals()
            .into_iter()
            .map(|i| (key_pc as u32 + self.root_offset as u32 + i as u32) as u8 % 12)
            .collect()
    }

    /// Absolute pitches of the chord voiced upward from the key tonic.
    pub fn notes(&self, key_root: u8) -> Vec<u8> {
        let root = key_root as u32 + self.root_offset as u32;
        self.intervals()
            .into_iter()
            .map(|i| (root + i as u32).min(MAX_PITCH as u32) as u8)
            .collect()
    }
}

impl std::str::FromStr for ChordSymbol {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordSymbol::parse(s)
    }
}

impl std::fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.symbol)
    }
}
