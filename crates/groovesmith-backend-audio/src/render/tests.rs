//! Tests for the render engine.

use groovesmith_spec::theory::Scale;
use groovesmith_spec::{
    DrumVoice, GenerationWarning, Melody, NoteEvent, PatternGrid, RenderConfig, Section,
    SectionKind, Song,
};

use super::*;
use crate::error::AudioError;

const SR: u32 = 44100;

fn engine() -> RenderEngine {
    RenderEngine::with_seed(42).unwrap()
}

fn kick_grid(bars: u32, steps: &[usize]) -> PatternGrid {
    let mut grid = PatternGrid::new(bars).unwrap();
    for &step in steps {
        grid.set(DrumVoice::Kick, step, 1.0);
    }
    grid
}

/// Sample indices where the signal rises above `threshold` after at least
/// `gap` samples below it.
fn onsets(samples: &[f64], threshold: f64, gap: usize) -> Vec<usize> {
    let mut found = Vec::new();
    let mut last_above: Option<usize> = None;
    for (i, s) in samples.iter().enumerate() {
        if s.abs() > threshold {
            if last_above.map_or(true, |last| i - last > gap) {
                found.push(i);
            }
            last_above = Some(i);
        }
    }
    found
}

// ============================================================================
// Pattern
// ============================================================================

#[test]
fn test_pattern_buffer_length_and_peak() {
    let grid = kick_grid(1, &[0, 4, 8, 12]);
    let out = engine().render_pattern(&grid, 120).unwrap();
    assert!(out.is_clean());
    // 16 steps * 0.125 s
    assert_eq!(out.value.len(), 2 * SR as usize);
    assert!((out.value.peak() - 0.8).abs() < 1e-9);
}

#[test]
fn test_empty_pattern_renders_silence() {
    let grid = PatternGrid::new(2).unwrap();
    let out = engine().render_pattern(&grid, 100).unwrap().into_inner();
    assert_eq!(out.peak(), 0.0);
    assert!(!out.is_empty());
}

#[test]
fn test_pattern_zero_tempo_rejected() {
    let grid = kick_grid(1, &[0]);
    let err = engine().render_pattern(&grid, 0).unwrap_err();
    assert!(matches!(err, AudioError::Spec(_)));
}

#[test]
fn test_pattern_onsets_match_steps() {
    let steps = [0usize, 4, 8, 12, 20, 28];
    let grid = kick_grid(2, &steps);
    let tempo = 120;
    let out = engine().render_pattern(&grid, tempo).unwrap().into_inner();

    let step_samples = RenderEngine::step_duration(tempo) * SR as f64;
    let tolerance = (0.01 * SR as f64) as usize;
    let found = onsets(out.samples(), out.peak() * 0.3, (0.05 * SR as f64) as usize);

    assert_eq!(found.len(), steps.len(), "onsets at {:?}", found);
    for (&onset, &step) in found.iter().zip(&steps) {
        let expected = (step as f64 * step_samples) as usize;
        assert!(
            onset >= expected && onset - expected <= tolerance,
            "step {} expected near {}, found {}",
            step,
            expected,
            onset
        );
    }
}

#[test]
fn test_pattern_render_is_bit_identical() {
    let mut grid = kick_grid(1, &[0, 8]);
    grid.set(DrumVoice::Snare, 4, 0.8);
    grid.set(DrumVoice::HihatClosed, 2, 0.5);

    let a = engine().render_pattern(&grid, 96).unwrap().into_inner();
    let b = engine().render_pattern(&grid, 96).unwrap().into_inner();
    assert_eq!(a.samples(), b.samples());

    let shared = engine();
    let c = shared.render_pattern(&grid, 96).unwrap().into_inner();
    let d = shared.render_pattern(&grid, 96).unwrap().into_inner();
    assert_eq!(c, d);
    assert_eq!(a, c);
}

#[test]
fn test_ghost_notes_are_quieter() {
    let mut grid = PatternGrid::new(1).unwrap();
    grid.set(DrumVoice::Snare, 0, 1.0);
    grid.set(DrumVoice::Snare, 8, 0.25);
    let out = engine().render_pattern(&grid, 120).unwrap().into_inner();
    let half = out.len() / 2;
    let first = out.samples()[..half].iter().fold(0.0f64, |a, s| a.max(s.abs()));
    let second = out.samples()[half..].iter().fold(0.0f64, |a, s| a.max(s.abs()));
    assert!(second < first * 0.5);
}

// ============================================================================
// Melody events
// ============================================================================

#[test]
fn test_mismatched_lengths_truncate_to_shorter() {
    let out = melody_to_events(&[60, 62, 64, 65, 67], &[1.0, 1.0, 2.0], 120, 80).unwrap();
    assert_eq!(out.value.len(), 3);
    assert!(matches!(
        out.warnings.as_slice(),
        [GenerationWarning::Reconciled { .. }]
    ));
    assert_eq!(out.value[2].pitch, 64);
}

#[test]
fn test_event_timing() {
    let events = melody_to_events(&[60, 64], &[1.0, 0.5], 120, 80)
        .unwrap()
        .into_inner();
    assert_eq!(
        events,
        vec![
            NoteEvent {
                pitch: 60,
                velocity: 80,
                start: 0.0,
                end: 0.5
            },
            NoteEvent {
                pitch: 64,
                velocity: 80,
                start: 0.5,
                end: 0.75
            },
        ]
    );
}

#[test]
fn test_events_clamp_pitch_and_skip_non_positive() {
    let out = melody_to_events(&[200, -3, 60], &[1.0, 0.0, 1.0], 60, 100).unwrap();
    let events = &out.value;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].pitch, 127);
    assert_eq!(events[1].pitch, 60);
    assert_eq!(events[1].start, 1.0);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_events_reject_bad_input() {
    assert!(melody_to_events(&[], &[], 120, 80).is_err());
    assert!(melody_to_events(&[60], &[1.0], 0, 80).is_err());
    assert!(melody_to_events(&[60], &[f64::NAN], 120, 80).is_err());
    assert!(melody_to_events(&[60], &[1.0], 120, 0).is_err());
}

#[test]
fn test_melody_events_use_configured_velocity() {
    let melody = Melody::new(vec![60, 62], vec![1.0, 1.0], "C", Scale::Major, 90).unwrap();
    let events = engine().melody_events(&melody).unwrap().into_inner();
    assert!(events.iter().all(|e| e.velocity == 80));
    assert!((events[1].end - 2.0 * 60.0 / 90.0).abs() < 1e-12);
}

// ============================================================================
// Note events to PCM
// ============================================================================

#[test]
fn test_render_events() {
    let events = melody_to_events(&[60, 64, 67], &[1.0, 1.0, 2.0], 120, 80)
        .unwrap()
        .into_inner();
    let out = engine().render_events(&events).unwrap();
    assert!(out.is_clean());
    assert_eq!(out.value.len(), 2 * SR as usize);
    assert!((out.value.peak() - 0.8).abs() < 1e-9);
}

#[test]
fn test_render_events_empty_is_fatal() {
    let err = engine().render_events(&[]).unwrap_err();
    assert!(matches!(err, AudioError::EmptyInput { .. }));
}

#[test]
fn test_render_events_skips_invalid_span() {
    let events = [
        NoteEvent {
            pitch: 60,
            velocity: 80,
            start: 0.0,
            end: 0.5,
        },
        NoteEvent {
            pitch: 62,
            velocity: 80,
            start: 0.5,
            end: 0.2,
        },
    ];
    let out = engine().render_events(&events).unwrap();
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].code(), "W_SYNTHESIS_DEGRADED");
    assert!(out.value.peak() > 0.0);
}

#[test]
fn test_custom_target_peak() {
    let config = RenderConfig {
        target_peak: 0.5,
        sample_rate: 22050,
        ..Default::default()
    };
    let engine = RenderEngine::new(config, 1).unwrap();
    let events = melody_to_events(&[69], &[1.0], 120, 127).unwrap().into_inner();
    let out = engine.render_events(&events).unwrap().into_inner();
    assert_eq!(out.sample_rate(), 22050);
    assert!((out.peak() - 0.5).abs() < 1e-9);
}

// ============================================================================
// Chords
// ============================================================================

#[test]
fn test_render_chords_slots() {
    let chords: Vec<String> = ["I", "V7", "vi", "IV"].iter().map(|s| s.to_string()).collect();
    let out = engine().render_chords(&chords, "C", 120).unwrap();
    assert!(out.is_clean());
    // 2 beats at 120 BPM = 1 second per chord
    assert_eq!(out.value.len(), 4 * SR as usize);
    assert!((out.value.peak() - 0.8).abs() < 1e-9);
}

#[test]
fn test_unknown_chord_and_key_fall_back() {
    let chords = vec!["I".to_string(), "Xyz".to_string()];
    let out = engine().render_chords(&chords, "H", 120).unwrap();
    let codes: Vec<&str> = out.warnings.iter().map(|w| w.code()).collect();
    assert_eq!(codes, vec!["W_UNKNOWN_CATEGORY", "W_UNKNOWN_CATEGORY"]);
    assert_eq!(out.value.len(), 2 * SR as usize);
}

#[test]
fn test_render_chords_rejects_empty() {
    assert!(engine().render_chords(&[], "C", 120).is_err());
}

// ============================================================================
// Songs
// ============================================================================

fn section(kind: SectionKind, start_time: f64) -> Section {
    Section {
        kind,
        start_time,
        duration: 2.0,
        bars: 1,
        beat_pattern: kick_grid(1, &[0, 4, 8, 12]),
        melody: Melody::new(vec![60, 64, 67, 72], vec![1.0; 4], "C", Scale::Major, 120)
            .unwrap(),
        chord_progression: vec!["I".to_string()],
        energy: 0.5,
    }
}

fn two_section_song() -> Song {
    Song {
        style: "pop".to_string(),
        tempo: 120,
        key: "C".to_string(),
        structure: vec![SectionKind::Intro, SectionKind::Outro],
        sections: vec![
            section(SectionKind::Intro, 0.0),
            section(SectionKind::Outro, 2.0),
        ],
        total_duration: 4.0,
        chord_progression: vec![vec!["I".to_string()]; 2],
        variation_id: None,
    }
}

#[test]
fn test_render_song() {
    let out = engine().render_song(&two_section_song()).unwrap();
    assert!(out.is_clean());
    assert_eq!(out.value.len(), 4 * SR as usize);
    assert!((out.value.peak() - 0.8).abs() < 1e-9);

    // Both halves carry sound
    let half = out.value.len() / 2;
    let second = &out.value.samples()[half..];
    assert!(second.iter().any(|s| s.abs() > 0.1));
}

fn window_peak(samples: &[f64], from: f64, to: f64) -> f64 {
    let (a, b) = ((from * SR as f64) as usize, (to * SR as f64) as usize);
    samples[a..b].iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
}

/// One lead note in the first quarter of the section and one kick in the
/// middle, so each stem occupies its own window.
fn split_stem_section(kind: SectionKind, start_time: f64) -> Section {
    Section {
        beat_pattern: kick_grid(1, &[8]),
        melody: Melody::new(vec![69], vec![1.0], "C", Scale::Major, 120).unwrap(),
        ..section(kind, start_time)
    }
}

#[test]
fn test_render_song_stem_weights_and_offsets() {
    let mut song = two_section_song();
    song.sections = vec![
        split_stem_section(SectionKind::Intro, 0.0),
        split_stem_section(SectionKind::Outro, 2.0),
    ];
    let out = engine().render_song(&song).unwrap().into_inner();
    let samples = out.samples();
    assert_eq!(samples.len(), 4 * SR as usize);

    // Beat stem weighted 0.6 is the loudest element after normalization
    let lead = window_peak(samples, 0.0, 0.5);
    let drums = window_peak(samples, 1.0, 1.5);
    assert!((drums - 0.8).abs() < 1e-9);
    assert!((lead / drums - 0.4 / 0.6).abs() < 1e-9);

    // Second section repeats the first at its own start offset
    assert!((window_peak(samples, 2.0, 2.5) - lead).abs() < 1e-9);
    assert!((window_peak(samples, 3.0, 3.5) - drums).abs() < 1e-9);
    for (from, to) in [(0.5, 1.0), (1.5, 2.0), (2.5, 3.0), (3.5, 4.0)] {
        assert_eq!(window_peak(samples, from, to), 0.0, "sound in {}..{}", from, to);
    }

    let found = onsets(samples, out.peak() * 0.3, (0.05 * SR as f64) as usize);
    let tolerance = (0.02 * SR as f64) as usize;
    let expected = [0.0, 1.0, 2.0, 3.0].map(|t: f64| (t * SR as f64) as usize);
    assert_eq!(found.len(), expected.len(), "onsets at {:?}", found);
    for (&onset, &at) in found.iter().zip(&expected) {
        assert!(onset >= at && onset - at <= tolerance, "expected near {}, found {}", at, onset);
    }
}

#[test]
fn test_render_peak_never_exceeds_full_scale() {
    let config = RenderConfig {
        target_peak: 5.0,
        sample_rate: 8000,
        ..Default::default()
    };
    assert!(RenderEngine::new(config, 1).is_err());

    let config = RenderConfig {
        target_peak: 1.0,
        sample_rate: 8000,
        ..Default::default()
    };
    let engine = RenderEngine::new(config, 1).unwrap();
    let out = engine.render_pattern(&kick_grid(1, &[0]), 120).unwrap().into_inner();
    assert!(out.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
    assert!((out.peak() - 1.0).abs() < 1e-9);
}

#[test]
fn test_render_song_without_sections_fails() {
    let mut song = two_section_song();
    song.sections.clear();
    assert!(engine().render_song(&song).is_err());
}
