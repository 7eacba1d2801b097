//! groovesmith music backend - algorithmic composition
//!
//! This crate turns high-level requests (genre, key, tempo, mood) into
//! symbolic music: drum pattern grids, melodies, ranked chord progressions,
//! and whole-song arrangements. It also encodes note-event streams as
//! Standard MIDI Files.
//!
//! # Determinism
//!
//! Every generator takes an explicit `u32` seed. Each component draws from
//! its own PCG32 stream derived from that seed with BLAKE3, and song sections
//! use per-slot derived seeds, so the same request and seed always produce
//! the same artifact.
//!
//! # Warnings
//!
//! Unknown genres, styles, moods, keys, scales, and chord symbols are not
//! errors. Generators fall back to a default and return the substitution in
//! [`Generated::warnings`](groovesmith_spec::Generated). Only malformed
//! requests (zero bars, zero tempo, non-finite values) fail.
//!
//! # Example
//!
//! ```ignore
//! use groovesmith_backend_music::{generate_whole_song, midi::melody_to_smf};
//! use groovesmith_spec::SongParams;
//!
//! let song = generate_whole_song(&SongParams::default(), 42)?.into_inner();
//! let first = &song.sections[0];
//! std::fs::write("intro.mid", melody_to_smf(&first.melody)?.into_inner())?;
//! ```
//!
//! # Module Structure
//!
//! - [`beat`]: drum pattern composer and genre templates
//! - [`melody`]: melodic composer
//! - [`harmony`]: chord progression suggester
//! - [`song`]: song composer and arrangement variations
//! - [`midi`]: Standard MIDI File writer

pub mod beat;
pub mod error;
pub mod harmony;
pub mod melody;
pub mod midi;
pub mod song;

pub use beat::{generate_beat, BeatPattern};
pub use error::{ComposeError, ComposeResult};
pub use harmony::{suggest, Suggestion};
pub use melody::generate_melody;
pub use midi::{melody_to_smf, write_smf};
pub use song::{generate_arrangement_variations, generate_whole_song};

/// Backend identifier.
pub const BACKEND_ID: &str = "groovesmith-backend-music";
