//! Deterministic 16-bit mono WAV encoding.
//!
//! Output carries no timestamps or variable metadata, so equal buffers always
//! encode to equal bytes. The BLAKE3 hash covers the PCM payload only and is
//! the value compared in determinism checks.

use std::io::Cursor;

use groovesmith_spec::PcmBuffer;

use crate::error::AudioResult;

const BITS_PER_SAMPLE: u16 = 16;

/// Converts a sample in [-1, 1] to a 16-bit integer, clipping outside values.
pub fn sample_to_i16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Little-endian 16-bit PCM bytes.
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        pcm.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }
    pcm
}

/// BLAKE3 hex digest of the 16-bit PCM payload.
pub fn pcm_hash(samples: &[f64]) -> String {
    blake3::hash(&samples_to_pcm16(samples)).to_hex().to_string()
}

/// Encodes a buffer as a complete mono WAV file.
///
/// # Errors
/// Returns `Wav` if the encoder rejects the stream.
pub fn encode_wav(buffer: &PcmBuffer) -> AudioResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };
    let mut bytes = Vec::with_capacity(44 + buffer.len() * 2);
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec)?;
        for &sample in buffer.samples() {
            writer.write_sample(sample_to_i16(sample))?;
        }
        writer.finalize()?;
    }
    Ok(bytes)
}

/// An encoded WAV file with its payload hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes `buffer` and hashes its payload.
    pub fn from_buffer(buffer: &PcmBuffer) -> AudioResult<Self> {
        let wav_data = encode_wav(buffer)?;
        Ok(Self {
            wav_data,
            pcm_hash: pcm_hash(buffer.samples()),
            sample_rate: buffer.sample_rate(),
            num_samples: buffer.len(),
        })
    }
}
