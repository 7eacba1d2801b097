use groovesmith_spec::{BeatParams, DrumVoice, GenerationWarning, ReferenceAnalysis};
use pretty_assertions::assert_eq;

use super::*;

fn params(genre: &str, bars: u32, complexity: f64) -> BeatParams {
    BeatParams {
        genre: genre.to_string(),
        tempo: 100,
        bars,
        complexity,
        reference: None,
    }
}

fn row_hits(grid: &PatternGrid, voice: DrumVoice) -> Vec<usize> {
    grid.row(voice)
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > 0.0)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_low_complexity_is_plain_template() {
    let beat = generate_beat(&params("hip-hop", 2, 0.3), 1).unwrap();
    assert!(beat.is_clean());
    let grid = &beat.value.grid;
    assert_eq!(grid.rows(), 9);
    assert_eq!(grid.steps(), 32);
    assert_eq!(row_hits(grid, DrumVoice::Snare), vec![4, 12, 20, 28]);
    assert_eq!(row_hits(grid, DrumVoice::HihatClosed).len(), 16);
    assert_eq!(row_hits(grid, DrumVoice::Ride), Vec::<usize>::new());
}

#[test]
fn test_jazz_uses_ride() {
    let beat = generate_beat(&params("jazz", 1, 0.2), 1).unwrap().into_inner();
    assert_eq!(
        row_hits(&beat.grid, DrumVoice::Ride),
        vec![0, 2, 3, 5, 6, 8, 9, 11, 12, 14]
    );
    assert!(row_hits(&beat.grid, DrumVoice::HihatClosed).is_empty());
}

#[test]
fn test_same_seed_same_pattern() {
    let p = params("rock", 8, 0.95);
    let a = generate_beat(&p, 99).unwrap().into_inner();
    let b = generate_beat(&p, 99).unwrap().into_inner();
    assert_eq!(a, b);
}

#[test]
fn test_strong_beat_kicks_survive_variation() {
    for seed in 0..20 {
        let beat = generate_beat(&params("electronic", 4, 1.0), seed)
            .unwrap()
            .into_inner();
        for bar in 0..4 {
            assert_eq!(beat.grid.velocity(DrumVoice::Kick, bar * 16), 1.0);
            assert_eq!(beat.grid.velocity(DrumVoice::Kick, bar * 16 + 8), 1.0);
        }
    }
}

#[test]
fn test_fill_at_step_sixty() {
    let beat = generate_beat(&params("hip-hop", 4, 0.6), 3).unwrap().into_inner();
    for step in 60..64 {
        assert_eq!(beat.grid.velocity(DrumVoice::Snare, step), 1.0);
    }

    // Too short for a fill
    let short = generate_beat(&params("hip-hop", 2, 0.3), 3).unwrap().into_inner();
    assert_eq!(short.grid.velocity(DrumVoice::Snare, 30), 0.0);
}

#[test]
fn test_ghost_hats_are_half_velocity() {
    let beat = generate_beat(&params("hip-hop", 16, 0.9), 11).unwrap().into_inner();
    let ghosts = beat
        .grid
        .row(DrumVoice::HihatClosed)
        .iter()
        .filter(|&&v| v == 0.5)
        .count();
    assert!(ghosts > 0);
}

#[test]
fn test_velocities_in_unit_range() {
    for genre in ["hip-hop", "rock", "jazz", "electronic", "polka"] {
        let beat = generate_beat(&params(genre, 6, 1.0), 5).unwrap().into_inner();
        for voice in DrumVoice::ALL {
            assert!(beat.grid.row(voice).iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

#[test]
fn test_unknown_genre_uses_feel() {
    let beat = generate_beat(&params("deep-house", 1, 0.2), 1).unwrap();
    assert_eq!(
        beat.warnings,
        vec![GenerationWarning::unknown(
            Category::Genre,
            "deep-house",
            "four-on-the-floor"
        )]
    );
    assert_eq!(row_hits(&beat.value.grid, DrumVoice::Kick), vec![0, 4, 8, 12]);

    let swing = generate_beat(&params("bebop", 1, 0.2), 1).unwrap().into_inner();
    assert!(!row_hits(&swing.grid, DrumVoice::Ride).is_empty());
}

#[test]
fn test_reference_overrides_tempo_and_genre() {
    let mut p = params("hip-hop", 2, 0.4);
    p.reference = Some(ReferenceAnalysis {
        tempo: Some(140),
        genre: Some("jazz".to_string()),
        energy: Some(0.5),
        ..Default::default()
    });
    let beat = generate_beat(&p, 1).unwrap().into_inner();
    assert_eq!(beat.tempo, 140);
    assert_eq!(beat.genre, "jazz");
    assert!((beat.complexity - 0.6).abs() < 1e-12);
}

#[test]
fn test_reference_energy_caps_complexity() {
    let mut p = params("rock", 1, 0.8);
    p.reference = Some(ReferenceAnalysis {
        energy: Some(1.0),
        ..Default::default()
    });
    assert_eq!(generate_beat(&p, 1).unwrap().value.complexity, 1.0);
}

#[test]
fn test_reference_unknown_signature_and_mood_warn() {
    let mut p = params("rock", 1, 0.3);
    p.reference = Some(ReferenceAnalysis {
        time_signature: Some("7/8".to_string()),
        mood: Some("wistful".to_string()),
        ..Default::default()
    });
    let beat = generate_beat(&p, 1).unwrap();
    let codes: Vec<&str> = beat.warnings.iter().map(|w| w.code()).collect();
    assert_eq!(codes, vec!["W_UNKNOWN_CATEGORY", "W_UNKNOWN_CATEGORY"]);
}

#[test]
fn test_resolve_variation_factor() {
    let mut p = params("rock", 1, 0.6);
    p.reference = Some(ReferenceAnalysis {
        time_signature: Some("3/4".to_string()),
        mood: Some("Energetic".to_string()),
        ..Default::default()
    });
    let mut warnings = Vec::new();
    let resolved = resolve(&p, 0.6, &mut warnings);
    assert!(warnings.is_empty());
    assert!((resolved.variation_factor - 0.7 * 1.3).abs() < 1e-12);
}

#[test]
fn test_invalid_requests_rejected() {
    assert!(generate_beat(&params("rock", 0, 0.5), 1).is_err());
    assert!(generate_beat(&params("rock", 2, f64::NAN), 1).is_err());
    let mut p = params("rock", 2, 0.5);
    p.tempo = 0;
    assert!(generate_beat(&p, 1).is_err());
}

#[test]
fn test_out_of_range_complexity_is_clamped() {
    let beat = generate_beat(&params("rock", 1, 3.0), 1).unwrap().into_inner();
    assert_eq!(beat.complexity, 1.0);
    let beat = generate_beat(&params("rock", 1, -1.0), 1).unwrap().into_inner();
    assert_eq!(beat.complexity, 0.0);
}
