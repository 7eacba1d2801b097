//! Shared request fixtures.

use groovesmith_backend_audio::{AudioResult, RenderEngine};
use groovesmith_spec::{
    BeatParams, DrumVoice, HarmonyParams, MelodyParams, PatternGrid, PcmBuffer, SongParams,
};

/// Seed used by every fixture that needs one.
pub const SEED: u32 = 42;

/// Default-config engine with the fixture seed.
pub fn engine() -> AudioResult<RenderEngine> {
    RenderEngine::with_seed(SEED)
}

pub fn beat_params(genre: &str, tempo: u32, bars: u32, complexity: f64) -> BeatParams {
    BeatParams {
        genre: genre.to_string(),
        tempo,
        bars,
        complexity,
        reference: None,
    }
}

pub fn melody_params(key: &str, scale: &str, tempo: u32, bars: u32) -> MelodyParams {
    MelodyParams {
        key: key.to_string(),
        scale: scale.to_string(),
        tempo,
        bars,
        chord_progression: None,
        reference: None,
    }
}

pub fn harmony_params(key: &str, genre: &str, mood: &str, bars: u32) -> HarmonyParams {
    HarmonyParams {
        key: key.to_string(),
        genre: genre.to_string(),
        mood: mood.to_string(),
        bars,
    }
}

pub fn song_params(style: &str, tempo: u32, key: &str, total_duration: f64) -> SongParams {
    SongParams {
        style: style.to_string(),
        tempo,
        key: key.to_string(),
        total_duration,
    }
}

/// Grid with full-velocity kicks at `steps`.
pub fn kick_grid(bars: u32, steps: &[usize]) -> PatternGrid {
    let mut grid = PatternGrid::new(bars).unwrap_or_else(|e| panic!("fixture grid: {}", e));
    for &step in steps {
        grid.set(DrumVoice::Kick, step, 1.0);
    }
    grid
}

/// Sine tone scaled to unit peak.
pub fn sine(freq: f64, seconds: f64, sample_rate: u32) -> PcmBuffer {
    let len = (seconds * sample_rate as f64) as usize;
    let samples = (0..len)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
        .collect();
    PcmBuffer::new(samples, sample_rate).unwrap_or_else(|e| panic!("fixture sine: {}", e))
}
