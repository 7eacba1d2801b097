//! groovesmith audio backend
//!
//! Turns symbolic music artifacts into sound:
//! - drum patterns, note events, and chord progressions to mono PCM
//! - whole songs, section by section
//! - two-track and multi-track mixing with compression and normalization
//! - deterministic 16-bit WAV encoding
//!
//! # Determinism
//!
//! All noise comes from PCG32 streams seeded through BLAKE3 key derivation.
//! The same seed and inputs produce bit-identical samples, and the drum kit is
//! synthesized once per [`RenderEngine`], so repeated renders never re-draw
//! noise.
//!
//! # Example
//!
//! ```ignore
//! use groovesmith_backend_audio::{RenderEngine, WavResult};
//!
//! let engine = RenderEngine::with_seed(42)?;
//! let pcm = engine.render_pattern(&grid, 120)?.into_inner();
//! std::fs::write("beat.wav", WavResult::from_buffer(&pcm)?.wav_data)?;
//! ```
//!
//! # Crate Structure
//!
//! - [`render`] - Render engine for patterns, events, chords, and songs
//! - [`mixer`] - Track combination and master processing
//! - [`synthesis`] - Drum voices and additive tones
//! - [`envelope`] - ADSR and exponential decay curves
//! - [`filter`] - Biquad highpass
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`wav`] - WAV encoding and PCM hashing

pub mod envelope;
pub mod error;
pub mod filter;
pub mod mixer;
pub mod render;
pub mod rng;
pub mod synthesis;
pub mod wav;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use mixer::{combine, mix_multiple, MixLevels, NamedTrack};
pub use render::{melody_to_events, RenderEngine};
pub use rng::{derive_component_seed, derive_layer_seed};
pub use synthesis::drums::DrumKit;
pub use wav::{encode_wav, WavResult};
