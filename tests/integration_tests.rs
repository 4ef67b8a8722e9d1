//! Integration Tests
//!
//! End-to-end coverage of the session: decode, analyze, render, master,
//! and the cancellation and scheduling behavior around edits.

use std::io::Cursor;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;

use stemmix::engine::{decode_wav_bytes, encode_wav, MixResult, StemBuffer, StemFile};
use stemmix::master::MasterOptions;
use stemmix::model::{
    apply_preset, interpolate, Genre, LevelPoint, Track, TrackChange,
};
use stemmix::render::{build_flat_mix, build_processed_mix, RenderGeneration};
use stemmix::{MixError, Session};

// ============================================================================
// Helpers
// ============================================================================

fn sine_wav_bytes(frames: usize, freq: f32, amplitude: f32, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = ((t * freq * std::f32::consts::TAU).sin() * amplitude * 32767.0) as i16;
            writer.write_sample(sample).unwrap();
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn dc_stem(frames: usize, value: f32, sample_rate: u32) -> StemBuffer {
    StemBuffer {
        samples: vec![vec![value; frames], vec![value; frames]],
        sample_rate,
    }
}

fn two_stem_session() -> Session {
    let files = vec![
        StemFile::new("Kick.wav", sine_wav_bytes(8820, 60.0, 0.6, 44100)),
        StemFile::new("Lead Vocal.wav", sine_wav_bytes(4410, 440.0, 0.4, 44100)),
    ];
    let mut session = Session::new();
    session.load_stems(&files).unwrap();
    session
}

// ============================================================================
// Decode and Analysis
// ============================================================================

#[test]
fn test_session_survives_one_bad_stem() {
    let files = vec![
        StemFile::new("good.wav", sine_wav_bytes(4410, 220.0, 0.5, 44100)),
        StemFile::new("bad.wav", vec![0xde, 0xad, 0xbe, 0xef]),
    ];
    let mut session = Session::new();
    session.load_stems(&files).unwrap();

    assert_eq!(session.tracks().len(), 2, "bad slot keeps its track");
    assert!(session.stems()[0].is_some());
    assert!(session.stems()[1].is_none());

    // The bad slot renders as silence, not an error
    let mix = session.build_flat_mix().unwrap();
    assert!(mix.frames() > 0);
}

#[test]
fn test_analysis_reports_sane_levels() {
    let mut session = two_stem_session();
    let analyses = session.analyze_stems().to_vec();

    let kick = analyses[0].as_ref().unwrap();
    assert!(kick.peak_db <= 0.0 && kick.peak_db > -10.0);
    assert!(kick.rms_db < kick.peak_db);
    assert!(!kick.rms_over_time.is_empty());
    assert_relative_eq!(kick.duration_secs, 0.2, epsilon = 1e-6);
}

// ============================================================================
// Mix Builders
// ============================================================================

#[test]
fn test_flat_mix_sums_with_static_gains() {
    let stems = vec![
        Some(dc_stem(88200, 0.2, 44100)),
        Some(dc_stem(44100, 0.2, 44100)),
    ];
    let mut tracks = vec![Track::new("a.wav"), Track::new("b.wav")];
    tracks[0].set_gain(1.0);
    tracks[1].set_gain(0.5);

    let mix = build_flat_mix(&stems, &tracks).unwrap();
    assert_eq!(mix.frames(), 88200, "mix runs to the longest stem");
    // Both stems overlap here: 0.2 + 0.2 * 0.5
    assert_relative_eq!(mix.left[1000], 0.3, epsilon = 1e-6);
    // Only the longer stem remains here
    assert_relative_eq!(mix.left[50000], 0.2, epsilon = 1e-6);
}

#[test]
fn test_no_render_path_clips() {
    let files: Vec<StemFile> = (0..4)
        .map(|i| {
            StemFile::new(
                format!("stem{}.wav", i),
                sine_wav_bytes(4410, 110.0 * (i + 1) as f32, 0.95, 44100),
            )
        })
        .collect();
    let mut session = Session::new();
    session.load_stems(&files).unwrap();
    let changes: Vec<TrackChange> = (0..4)
        .map(|i| TrackChange {
            track: i,
            gain_db: Some(9.0),
            ..Default::default()
        })
        .collect();
    session.apply_changes(&changes).unwrap();

    let flat = session.build_flat_mix().unwrap();
    assert!(flat.peak() <= 0.99 + 1e-4);

    let processed = session.build_processed_mix().unwrap().unwrap();
    assert!(processed.peak() <= 0.99 + 1e-4);

    let mastered = session.master(MasterOptions::default()).unwrap();
    assert!(mastered.peak() <= 0.99 + 1e-4);
}

#[test]
fn test_superseded_render_is_abandoned() {
    let stems = vec![Some(dc_stem(44100, 0.3, 44100))];
    let tracks = vec![Track::new("stem.wav")];

    let generation = RenderGeneration::new();
    let first = generation.begin();
    let second = generation.begin();

    let stale = build_processed_mix(&stems, &tracks, &first).unwrap();
    assert!(stale.is_none(), "older token must not produce a mix");

    let fresh = build_processed_mix(&stems, &tracks, &second).unwrap();
    assert!(fresh.is_some());
}

#[test]
fn test_solo_isolates_a_track() {
    let mut session = two_stem_session();
    session
        .apply_changes(&[TrackChange {
            track: 1,
            solo: Some(true),
            ..Default::default()
        }])
        .unwrap();

    let mix = session.build_processed_mix().unwrap().unwrap();
    // The kick is 8820 frames, the soloed vocal only 4410: the tail past the
    // vocal must be silent
    let tail_peak = mix.left[5000..]
        .iter()
        .fold(0.0_f32, |acc, &s| acc.max(s.abs()));
    assert!(tail_peak < 1e-6, "unsoloed track must not sound");
}

// ============================================================================
// WAV Round Trip
// ============================================================================

#[test]
fn test_wav_encode_decode_round_trip() {
    let mix = MixResult {
        left: (0..441).map(|i| (i as f32 / 441.0) * 0.8 - 0.4).collect(),
        right: (0..441).map(|i| 0.4 - (i as f32 / 441.0) * 0.8).collect(),
        sample_rate: 44100,
    };
    let bytes = encode_wav(&mix);
    let decoded = decode_wav_bytes("mix.wav", &bytes).unwrap();

    assert_eq!(decoded.frames(), 441);
    assert_eq!(decoded.sample_rate, 44100);
    for i in 0..441 {
        assert!(
            (decoded.samples[0][i] - mix.left[i]).abs() <= 1.0 / 32768.0,
            "16-bit quantization bound exceeded at frame {}",
            i
        );
    }
}

// ============================================================================
// Edits, Presets, Scheduling
// ============================================================================

#[test]
fn test_change_batch_rejects_bad_index_atomically() {
    let mut session = two_stem_session();
    let before = session.snapshot_tracks();

    let err = session
        .apply_changes(&[
            TrackChange {
                track: 0,
                pan: Some(0.5),
                ..Default::default()
            },
            TrackChange {
                track: 9,
                ..Default::default()
            },
        ])
        .unwrap_err();

    assert!(matches!(err, MixError::TrackOutOfRange { index: 9, count: 2 }));
    assert_eq!(session.tracks(), &before[..], "no partial application");
}

#[test]
fn test_preset_is_idempotent_across_sessions() {
    let mut tracks = vec![
        Track::new("Kick.wav"),
        Track::new("Snare.wav"),
        Track::new("Lead Vocal.wav"),
    ];
    apply_preset(&mut tracks, Genre::Pop);
    let once = tracks.clone();
    apply_preset(&mut tracks, Genre::Pop);
    assert_eq!(tracks, once);

    // Lead vocal gets the pop reverb send
    assert!(tracks[2].reverb_on);
    assert_relative_eq!(tracks[2].reverb.mix, 0.22);
}

#[test]
fn test_automation_point_shapes_the_render() {
    let mut session = two_stem_session();
    // Duck the kick to zero at the midpoint
    session
        .apply_changes(&[
            TrackChange {
                track: 0,
                gain_db: Some(0.0),
                ..Default::default()
            },
            TrackChange {
                track: 0,
                add_level_point: Some(LevelPoint { t: 0.5, value: 0.0 }),
                ..Default::default()
            },
            TrackChange {
                track: 1,
                mute: Some(true),
                ..Default::default()
            },
        ])
        .unwrap();

    let track = &session.tracks()[0];
    assert_relative_eq!(interpolate(&track.automation.level, 0.5), 0.0);
    assert_relative_eq!(interpolate(&track.automation.level, 0.0), 1.0);

    let mix = session.build_processed_mix().unwrap().unwrap();
    let mid = mix.frames() / 2;
    let mid_peak = mix.left[mid - 50..mid + 50]
        .iter()
        .fold(0.0_f32, |acc, &s| acc.max(s.abs()));
    assert!(mid_peak < 0.01, "level automation must duck the midpoint");
}

#[test]
fn test_debounced_rebuild_fires_once() {
    let mut session = two_stem_session();
    session
        .apply_changes(&[TrackChange {
            track: 0,
            gain_db: Some(-3.0),
            ..Default::default()
        }])
        .unwrap();

    let now = Instant::now();
    assert!(!session.poll_rebuild(now).unwrap(), "quiet period not over");

    let later = now + Duration::from_millis(1500);
    assert!(session.poll_rebuild(later).unwrap());
    assert!(session.take_processed_wav().is_some());

    // Consumed: nothing due until the next edit
    assert!(!session.poll_rebuild(later + Duration::from_secs(5)).unwrap());
}

// ============================================================================
// Mastering
// ============================================================================

#[test]
fn test_master_normalizes_quiet_mixes_up() {
    let mut session = two_stem_session();
    session
        .apply_changes(&[
            TrackChange {
                track: 0,
                gain_db: Some(-30.0),
                ..Default::default()
            },
            TrackChange {
                track: 1,
                gain_db: Some(-30.0),
                ..Default::default()
            },
        ])
        .unwrap();

    let processed = session.build_processed_mix().unwrap().unwrap();
    assert!(processed.peak() < 0.1, "mix should start quiet");

    let mastered = session.master(MasterOptions::default()).unwrap();
    assert_relative_eq!(mastered.peak(), 0.99, epsilon = 1e-3);
}

// ============================================================================
// Live Preview
// ============================================================================

#[test]
fn test_live_preview_tracks_the_transport() {
    let mut session = two_stem_session();
    session.enable_live().unwrap();

    let live = session.live().unwrap();
    assert_relative_eq!(live.duration_secs(), 0.2, epsilon = 1e-6);

    live.start_playback(0.0);
    let mut left = vec![0.0; 512];
    let mut right = vec![0.0; 512];
    live.process_block(&mut left, &mut right);
    assert!(left.iter().any(|&s| s != 0.0));
    assert_relative_eq!(live.playback_position(), 512.0 / 44100.0, epsilon = 1e-9);

    live.stop_playback();
    assert_eq!(live.playback_position(), 0.0);
    live.process_block(&mut left, &mut right);
    assert!(left.iter().all(|&s| s == 0.0), "stopped graph is silent");
}
