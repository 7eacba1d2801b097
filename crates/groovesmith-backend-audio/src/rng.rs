//! Call-local PCG32 generators with BLAKE3 seed derivation.
//!
//! No generator outlives the call that created it. Independent streams for
//! sub-components (drum voices, sections, variations) are derived from the
//! caller's seed by hashing, so the same seed always yields the same output
//! and concurrent calls never share state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The seed is duplicated into both halves of the 64-bit state seed.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

fn hash_to_seed(input: &[u8]) -> u32 {
    let hash = blake3::hash(input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Derives an indexed sub-seed, e.g. one per song section.
pub fn derive_layer_seed(base_seed: u32, layer_index: u32) -> u32 {
    let mut input = Vec::with_capacity(8);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&layer_index.to_le_bytes());
    hash_to_seed(&input)
}

/// Derives a named sub-seed, e.g. `"beat"` or `"kick"`.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());
    hash_to_seed(&input)
}

/// Creates an RNG for a named component.
pub fn create_component_rng(base_seed: u32, key: &str) -> Pcg32 {
    create_rng(derive_component_seed(base_seed, key))
}

/// Uniform white noise with the given standard deviation.
///
/// A uniform distribution on `[-a, a]` has standard deviation `a / sqrt(3)`.
pub fn white_noise(rng: &mut Pcg32, std_dev: f64) -> f64 {
    let amplitude = std_dev * 3.0_f64.sqrt();
    rng.gen_range(-1.0..=1.0) * amplitude
}
