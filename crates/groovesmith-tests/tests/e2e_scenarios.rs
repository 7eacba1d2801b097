//! End-to-end scenarios: requests through composition, rendering, and export.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p groovesmith-tests --test e2e_scenarios
//! ```

use groovesmith_backend_audio::{combine, melody_to_events, MixLevels, RenderEngine, WavResult};
use groovesmith_backend_music::{
    generate_arrangement_variations, generate_beat, generate_melody, generate_whole_song,
    melody_to_smf, suggest, write_smf,
};
use groovesmith_spec::theory::ChordSymbol;
use groovesmith_spec::{MixConfig, RenderConfig, STEPS_PER_BAR};
use groovesmith_tests::audio_analysis::{detect_onsets, onsets_match, parse_wav};
use groovesmith_tests::fixtures::{
    beat_params, engine, harmony_params, kick_grid, melody_params, song_params, SEED,
};
use groovesmith_tests::init_tracing;
use pretty_assertions::assert_eq;

fn low_rate_engine() -> RenderEngine {
    let config = RenderConfig {
        sample_rate: 22050,
        ..Default::default()
    };
    RenderEngine::new(config, SEED).unwrap()
}

// ============================================================================
// Song
// ============================================================================

#[test]
fn test_pop_song_scenario() {
    init_tracing();
    let song = generate_whole_song(&song_params("pop", 120, "C", 32.0), SEED)
        .unwrap()
        .into_inner();

    assert!(song.section_count() >= 1);
    assert!(song.total_duration >= 32.0);
    assert!(song.sections.iter().all(|s| !s.chord_progression.is_empty()));
    assert_eq!(song.style, "pop");
    assert_eq!(song.variation_id, None);
}

#[test]
fn test_song_renders_to_wav() {
    init_tracing();
    let song = generate_whole_song(&song_params("rock", 140, "E", 10.0), SEED)
        .unwrap()
        .into_inner();
    let engine = low_rate_engine();
    let pcm = engine.render_song(&song).unwrap().into_inner();

    assert_eq!(pcm.len(), (song.total_duration * 22050.0).ceil() as usize);
    assert!((pcm.peak() - 0.8).abs() < 1e-9);

    let wav = WavResult::from_buffer(&pcm).unwrap();
    let decoded = parse_wav(&wav.wav_data).unwrap();
    assert_eq!(decoded.sample_rate, 22050);
    assert_eq!(decoded.channels, 1);
    assert_eq!(decoded.bits_per_sample, 16);
    assert_eq!(decoded.samples.len(), pcm.len());
    assert_eq!(wav.num_samples, pcm.len());
}

#[test]
fn test_song_json_shape() {
    let song = generate_whole_song(&song_params("jazz", 100, "F", 1.0), SEED)
        .unwrap()
        .into_inner();
    let json = serde_json::to_value(&song).unwrap();
    for field in [
        "style",
        "tempo",
        "key",
        "structure",
        "sections",
        "total_duration",
        "chord_progression",
    ] {
        assert!(json.get(field).is_some(), "missing {}", field);
    }
    assert!(json.get("variation_id").is_none());
    assert_eq!(json["sections"][0]["type"], "intro");
    assert_eq!(json["structure"][2], "solo1");
}

#[test]
fn test_variations_keep_melodies() {
    let song = generate_whole_song(&song_params("electronic", 128, "A", 60.0), SEED)
        .unwrap()
        .into_inner();
    let variations = generate_arrangement_variations(&song, 2, SEED)
        .unwrap()
        .into_inner();

    assert_eq!(variations.len(), 2);
    assert_eq!(variations[0].style, "house");
    assert_eq!(variations[1].variation_id, Some(2));
    for variation in &variations {
        for (new, old) in variation.sections.iter().zip(&song.sections) {
            assert_eq!(new.melody, old.melody);
            assert_eq!(new.start_time, old.start_time);
        }
    }
}

// ============================================================================
// Harmony
// ============================================================================

#[test]
fn test_pop_happy_suggestion_scenario() {
    let ranked = suggest(&harmony_params("C", "pop", "happy", 4))
        .unwrap()
        .into_inner();
    assert_eq!(ranked[0].chords, vec!["I", "V", "vi", "IV"]);
    assert!(ranked[0].description.starts_with("The 'pop progression'"));
}

#[test]
fn test_suggested_chords_render() {
    let ranked = suggest(&harmony_params("G", "jazz", "sad", 8))
        .unwrap()
        .into_inner();
    let engine = low_rate_engine();
    let out = engine.render_chords(&ranked[0].chords, "G", 90).unwrap();
    assert!(out.is_clean());
    // 8 chords x 2 beats at 90 BPM
    let expected = (8.0 * 2.0 * 60.0 / 90.0 * 22050.0) as usize;
    assert!(out.value.len().abs_diff(expected) <= 8);
}

#[test]
fn test_dominant_seventh_in_c() {
    let chord = ChordSymbol::parse("V7").unwrap();
    let mut classes = chord.pitch_classes(0);
    assert_eq!(classes[0], 7);
    classes.sort_unstable();
    // G B D F
    assert_eq!(classes, vec![2, 5, 7, 11]);
}

// ============================================================================
// Melody and events
// ============================================================================

#[test]
fn test_mismatched_melody_truncates_before_export() {
    init_tracing();
    let out = melody_to_events(&[60, 62, 64, 65, 67], &[1.0, 1.0, 2.0], 120, 80).unwrap();
    assert_eq!(out.value.len(), 3);
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].code(), "W_RECONCILED");

    let smf = write_smf(&out.value, 120).unwrap();
    let parsed = midly::Smf::parse(&smf).unwrap();
    let note_ons = parsed.tracks[1]
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                midly::TrackEventKind::Midi {
                    message: midly::MidiMessage::NoteOn { .. },
                    ..
                }
            )
        })
        .count();
    assert_eq!(note_ons, 3);
}

#[test]
fn test_generated_melody_renders_and_exports() {
    let melody = generate_melody(&melody_params("D", "dorian", 110, 4), SEED)
        .unwrap()
        .into_inner();
    let engine = low_rate_engine();
    let events = engine.melody_events(&melody).unwrap().into_inner();
    assert_eq!(events.len(), melody.len());
    assert!(events.iter().all(|e| e.velocity == 80));

    let pcm = engine.render_events(&events).unwrap().into_inner();
    assert!(pcm.peak() > 0.0);

    let smf = melody_to_smf(&melody).unwrap().into_inner();
    assert_eq!(&smf[..4], b"MThd");
}

// ============================================================================
// Beat and mixing
// ============================================================================

#[test]
fn test_pattern_onsets_round_trip() {
    let steps = [0usize, 6, 10, 16, 24, 36, 44];
    let grid = kick_grid(3, &steps);
    let tempo = 100;
    let engine = engine().unwrap();
    let pcm = engine.render_pattern(&grid, tempo).unwrap().into_inner();

    let sr = pcm.sample_rate() as f64;
    let step_samples = RenderEngine::step_duration(tempo) * sr;
    let expected: Vec<usize> = steps
        .iter()
        .map(|&s| (s as f64 * step_samples) as usize)
        .collect();
    let found = detect_onsets(pcm.samples(), pcm.peak() * 0.3, (0.05 * sr) as usize);
    assert!(
        onsets_match(&found, &expected, (0.01 * sr) as usize),
        "expected {:?}, found {:?}",
        expected,
        found
    );
}

#[test]
fn test_beat_and_melody_combine() {
    let engine = low_rate_engine();
    let beat = generate_beat(&beat_params("hip-hop", 90, 4, 0.8), SEED)
        .unwrap()
        .into_inner();
    assert_eq!(beat.grid.steps(), 4 * STEPS_PER_BAR);
    let drums = engine.render_pattern(&beat.grid, 90).unwrap().into_inner();

    let melody = generate_melody(&melody_params("C", "minor", 90, 2), SEED)
        .unwrap()
        .into_inner();
    let events = engine.melody_events(&melody).unwrap().into_inner();
    let lead = engine.render_events(&events).unwrap().into_inner();

    let mixed = combine(&drums, &lead, MixLevels::default(), &MixConfig::default()).unwrap();
    assert_eq!(mixed.len(), drums.len().max(lead.len()));
    assert!(mixed.peak() <= 0.9 + 1e-9);
}

// ============================================================================
// Boundaries
// ============================================================================

#[test]
fn test_zero_bars_and_tempo_rejected() {
    assert!(generate_beat(&beat_params("rock", 120, 0, 0.5), SEED).is_err());
    assert!(generate_beat(&beat_params("rock", 0, 4, 0.5), SEED).is_err());
    assert!(generate_melody(&melody_params("C", "major", 120, 0), SEED).is_err());
    assert!(generate_melody(&melody_params("C", "major", 0, 4), SEED).is_err());
    assert!(suggest(&harmony_params("C", "pop", "happy", 0)).is_err());
    assert!(generate_whole_song(&song_params("pop", 0, "C", 30.0), SEED).is_err());

    let engine = engine().unwrap();
    assert!(engine.render_pattern(&kick_grid(1, &[0]), 0).is_err());
    assert!(melody_to_events(&[60], &[1.0], 0, 80).is_err());
    assert!(engine.render_chords(&["I".to_string()], "C", 0).is_err());
}
