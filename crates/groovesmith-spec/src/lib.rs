//! groovesmith data model
//!
//! This crate holds everything the composers and the render engine agree on:
//! music theory lookups, the pattern/melody/song records, PCM buffers,
//! request parameters, render settings, and the error taxonomy.
//!
//! Nothing here is random and nothing synthesizes audio. Randomness lives in
//! the backends, which take an explicit seed on every entry point.
//!
//! # Example
//!
//! ```
//! use groovesmith_spec::theory::{ChordSymbol, Scale};
//! use groovesmith_spec::{DrumVoice, PatternGrid};
//!
//! let mut grid = PatternGrid::new(2).unwrap();
//! grid.set(DrumVoice::Kick, 0, 1.0);
//! assert_eq!(grid.steps(), 32);
//!
//! let chord = ChordSymbol::parse("ii7").unwrap();
//! assert!(chord.has_seventh());
//! assert!(Scale::Major.contains(60, 62));
//! ```
//!
//! # Modules
//!
//! - [`error`]: `SpecError` and the `BackendError` trait
//! - [`report`]: recoverable warnings and the `Generated` wrapper
//! - [`theory`]: pitches, scales, and Roman-numeral chords
//! - [`pattern`], [`melody`], [`song`], [`pcm`]: artifacts
//! - [`params`], [`config`]: request and settings records
//! - [`validation`]: shared input checks

pub mod config;
pub mod error;
pub mod melody;
pub mod params;
pub mod pattern;
pub mod pcm;
pub mod report;
pub mod song;
pub mod theory;
pub mod validation;

pub use config::{Envelope, MixConfig, RenderConfig};
pub use error::{BackendError, SpecError, SpecResult};
pub use melody::{Melody, NoteEvent, BEATS_PER_BAR};
pub use params::{BeatParams, HarmonyParams, MelodyParams, ReferenceAnalysis, SongParams};
pub use pattern::{DrumVoice, PatternGrid, STEPS_PER_BAR};
pub use pcm::{PcmBuffer, DEFAULT_SAMPLE_RATE};
pub use report::{Category, GenerationWarning, Generated};
pub use song::{section_duration_seconds, Section, SectionConfig, SectionKind, Song};
