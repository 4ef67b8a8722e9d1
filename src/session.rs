//! Mix Session
//!
//! The top-level object tying everything together: decoded stems, the
//! track model, analyses, render artifacts, the rebuild scheduler, and the
//! optional live preview graph. A front end drives a session through
//! change lists and polls it for due rebuilds.

use log::{info, warn};
use std::time::Instant;

use crate::engine::{
    analyze_stem, decode_stems, encode_wav, MixResult, StemBuffer, StemFile, TrackAnalysis,
};
use crate::error::{MixError, Result};
use crate::live::LiveGraph;
use crate::master::{master_mix, MasterOptions};
use crate::model::{apply_preset, apply_to, infer_role, Genre, Track, TrackChange};
use crate::render::{
    build_flat_mix, build_processed_mix, mix_dimensions, RebuildScheduler, RenderGeneration,
};

/// One loaded mixing session
#[derive(Default)]
pub struct Session {
    stems: Vec<Option<StemBuffer>>,
    tracks: Vec<Track>,
    analyses: Vec<Option<TrackAnalysis>>,
    generation: RenderGeneration,
    scheduler: RebuildScheduler,
    live: Option<LiveGraph>,
    flat_wav: Option<Vec<u8>>,
    processed_wav: Option<Vec<u8>>,
    mastered_wav: Option<Vec<u8>>,
    processed_mix: Option<MixResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Loading and analysis
    // ------------------------------------------------------------------------

    /// Decode stems and build a fresh track per file
    ///
    /// Files that fail to decode keep their slot (as silence) so track
    /// indices always line up with the upload order. Fails only when not a
    /// single stem decoded.
    pub fn load_stems(&mut self, files: &[StemFile]) -> Result<()> {
        let stems = decode_stems(files);
        if stems.iter().all(|s| s.is_none()) {
            return Err(MixError::NothingToMix);
        }

        self.tracks = files.iter().map(|f| Track::new(f.name.clone())).collect();
        self.stems = stems;
        self.analyses = vec![None; self.tracks.len()];
        self.live = None;
        self.clear_artifacts();

        let decoded = self.stems.iter().flatten().count();
        info!("session loaded: {}/{} stems decoded", decoded, files.len());
        Ok(())
    }

    /// Analyze every decoded stem, caching the results
    pub fn analyze_stems(&mut self) -> &[Option<TrackAnalysis>] {
        let total = self.tracks.len();
        for (i, (stem, track)) in self.stems.iter().zip(&self.tracks).enumerate() {
            if self.analyses[i].is_none() {
                if let Some(stem) = stem {
                    let role = infer_role(&track.name, i, total);
                    self.analyses[i] = Some(analyze_stem(stem, role));
                }
            }
        }
        &self.analyses
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn stems(&self) -> &[Option<StemBuffer>] {
        &self.stems
    }

    /// Mix duration in seconds, 0 before stems load
    pub fn duration_secs(&self) -> f64 {
        self.stems
            .iter()
            .flatten()
            .map(|s| s.duration_secs())
            .fold(0.0, f64::max)
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Apply a batch of change deltas atomically
    ///
    /// Every index is validated before any track changes, so a bad index
    /// rejects the whole batch and leaves the session untouched.
    pub fn apply_changes(&mut self, changes: &[TrackChange]) -> Result<()> {
        let count = self.tracks.len();
        for change in changes {
            if change.track >= count {
                return Err(MixError::TrackOutOfRange {
                    index: change.track,
                    count,
                });
            }
        }

        for change in changes {
            apply_to(&mut self.tracks[change.track], change);
        }
        self.scheduler.mark_dirty(Instant::now());
        if let Some(live) = &mut self.live {
            live.sync_all_tracks(&self.tracks);
        }
        Ok(())
    }

    /// Rewrite every track from a genre preset
    pub fn apply_genre_preset(&mut self, genre: Genre) {
        apply_preset(&mut self.tracks, genre);
        self.scheduler.mark_dirty(Instant::now());
        if let Some(live) = &mut self.live {
            live.sync_all_tracks(&self.tracks);
        }
        info!("applied {} preset to {} tracks", genre.name(), self.tracks.len());
    }

    /// Clone the current track state for undo
    pub fn snapshot_tracks(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    /// Restore a snapshot, renormalizing its length to the stem count
    ///
    /// A snapshot from before stems were added or removed still applies:
    /// extra entries drop, missing slots get fresh tracks.
    pub fn restore_tracks(&mut self, mut snapshot: Vec<Track>) {
        snapshot.truncate(self.stems.len());
        for i in snapshot.len()..self.stems.len() {
            let name = self
                .tracks
                .get(i)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| format!("stem {}", i + 1));
            snapshot.push(Track::new(name));
        }
        self.tracks = snapshot;
        self.scheduler.mark_dirty(Instant::now());
        if let Some(live) = &mut self.live {
            live.sync_all_tracks(&self.tracks);
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Build the unprocessed reference mix and cache its WAV
    pub fn build_flat_mix(&mut self) -> Result<MixResult> {
        let mix = build_flat_mix(&self.stems, &self.tracks)?;
        self.flat_wav = Some(encode_wav(&mix));
        Ok(mix)
    }

    /// Build the processed mix under a fresh render token
    ///
    /// Returns `Ok(None)` when another render started while this one ran;
    /// in that case no artifact is committed.
    pub fn build_processed_mix(&mut self) -> Result<Option<MixResult>> {
        let token = self.generation.begin();
        // Snapshot so mid-render edits target the next generation
        let tracks = self.tracks.clone();
        match build_processed_mix(&self.stems, &tracks, &token)? {
            Some(mix) => {
                self.processed_wav = Some(encode_wav(&mix));
                self.processed_mix = Some(mix.clone());
                Ok(Some(mix))
            }
            None => Ok(None),
        }
    }

    /// Master the latest processed mix
    pub fn master(&mut self, options: MasterOptions) -> Result<MixResult> {
        let processed = self.processed_mix.as_ref().ok_or(MixError::NothingToMix)?;
        let mastered = master_mix(processed, options).ok_or(MixError::NothingToMix)?;
        self.mastered_wav = Some(encode_wav(&mastered));
        Ok(mastered)
    }

    /// Poll the debounce scheduler; when due, rebuild the processed mix
    pub fn poll_rebuild(&mut self, now: Instant) -> Result<bool> {
        if !self.scheduler.take_due(now) {
            return Ok(false);
        }
        match self.build_processed_mix() {
            Ok(Some(_)) => Ok(true),
            Ok(None) => {
                warn!("scheduled rebuild superseded");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn request_rebuild(&mut self) {
        self.scheduler.request_immediate();
    }

    // ------------------------------------------------------------------------
    // Artifacts
    // ------------------------------------------------------------------------

    pub fn take_flat_wav(&mut self) -> Option<Vec<u8>> {
        self.flat_wav.take()
    }

    pub fn take_processed_wav(&mut self) -> Option<Vec<u8>> {
        self.processed_wav.take()
    }

    pub fn take_mastered_wav(&mut self) -> Option<Vec<u8>> {
        self.mastered_wav.take()
    }

    /// Drop every cached render artifact
    pub fn clear_artifacts(&mut self) {
        self.flat_wav = None;
        self.processed_wav = None;
        self.mastered_wav = None;
        self.processed_mix = None;
    }

    // ------------------------------------------------------------------------
    // Live preview
    // ------------------------------------------------------------------------

    /// Build (or rebuild) the live graph over the loaded stems
    pub fn enable_live(&mut self) -> Result<()> {
        let (_, sample_rate) = mix_dimensions(&self.stems).ok_or(MixError::NothingToMix)?;
        self.live = Some(LiveGraph::new(&self.stems, &self.tracks, sample_rate));
        Ok(())
    }

    pub fn disable_live(&mut self) {
        self.live = None;
    }

    pub fn live(&mut self) -> Option<&mut LiveGraph> {
        self.live.as_mut()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LevelPoint;
    use approx::assert_relative_eq;
    use std::io::Cursor;
    use std::time::Duration;

    fn wav_bytes(frames: usize, value: f32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            let sample = (value * 32767.0) as i16;
            for _ in 0..frames {
                writer.write_sample(sample).unwrap();
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn loaded_session() -> Session {
        let files = vec![
            StemFile::new("Kick.wav", wav_bytes(4410, 0.5)),
            StemFile::new("Snare.wav", wav_bytes(2205, 0.3)),
        ];
        let mut session = Session::new();
        session.load_stems(&files).unwrap();
        session
    }

    #[test]
    fn test_load_builds_aligned_tracks() {
        let session = loaded_session();
        assert_eq!(session.tracks().len(), 2);
        assert_eq!(session.tracks()[0].name, "Kick.wav");
        assert!(session.stems()[0].is_some());
        assert_relative_eq!(session.duration_secs(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_load_with_no_decodable_stems_fails() {
        let files = vec![StemFile::new("junk.wav", vec![1, 2, 3])];
        let mut session = Session::new();
        assert!(matches!(
            session.load_stems(&files),
            Err(MixError::NothingToMix)
        ));
    }

    #[test]
    fn test_analyze_caches_per_track() {
        let mut session = loaded_session();
        let analyses = session.analyze_stems();
        assert!(analyses[0].is_some());
        assert!(analyses[1].is_some());
    }

    #[test]
    fn test_apply_changes_is_atomic() {
        let mut session = loaded_session();
        let before = session.snapshot_tracks();
        let changes = vec![
            TrackChange {
                track: 0,
                gain_db: Some(-6.0),
                ..Default::default()
            },
            TrackChange {
                track: 7,
                ..Default::default()
            },
        ];
        let err = session.apply_changes(&changes).unwrap_err();
        assert!(matches!(
            err,
            MixError::TrackOutOfRange { index: 7, count: 2 }
        ));
        // First change must not have landed
        assert_eq!(session.tracks(), &before[..]);
    }

    #[test]
    fn test_apply_changes_marks_rebuild_due() {
        let mut session = loaded_session();
        session
            .apply_changes(&[TrackChange {
                track: 0,
                gain_db: Some(0.0),
                ..Default::default()
            }])
            .unwrap();

        let later = Instant::now() + Duration::from_secs(2);
        assert!(session.poll_rebuild(later).unwrap());
        assert!(session.take_processed_wav().is_some());
    }

    #[test]
    fn test_flat_and_processed_artifacts() {
        let mut session = loaded_session();
        session.build_flat_mix().unwrap();
        let mix = session.build_processed_mix().unwrap().unwrap();
        assert!(mix.frames() > 0);

        assert!(session.take_flat_wav().is_some());
        assert!(session.take_processed_wav().is_some());
        // take consumes
        assert!(session.take_flat_wav().is_none());
    }

    #[test]
    fn test_master_requires_processed_mix() {
        let mut session = loaded_session();
        assert!(matches!(
            session.master(MasterOptions::default()),
            Err(MixError::NothingToMix)
        ));

        session.build_processed_mix().unwrap();
        let mastered = session.master(MasterOptions::default()).unwrap();
        assert!(mastered.peak() <= 0.99 + 1e-4);
        assert!(session.take_mastered_wav().is_some());
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut session = loaded_session();
        let snapshot = session.snapshot_tracks();
        session.apply_genre_preset(Genre::Rock);
        assert_ne!(session.tracks(), &snapshot[..]);

        session.restore_tracks(snapshot.clone());
        assert_eq!(session.tracks(), &snapshot[..]);
    }

    #[test]
    fn test_restore_renormalizes_length() {
        let mut session = loaded_session();
        session.restore_tracks(vec![Track::new("only one.wav")]);
        assert_eq!(session.tracks().len(), 2);
        assert_eq!(session.tracks()[0].name, "only one.wav");
    }

    #[test]
    fn test_add_level_point_change() {
        let mut session = loaded_session();
        session
            .apply_changes(&[TrackChange {
                track: 1,
                add_level_point: Some(LevelPoint { t: 0.5, value: 1.2 }),
                ..Default::default()
            }])
            .unwrap();
        assert_eq!(session.tracks()[1].automation.level.len(), 3);
    }

    #[test]
    fn test_live_graph_lifecycle() {
        let mut session = loaded_session();
        session.enable_live().unwrap();
        {
            let live = session.live().unwrap();
            live.start_playback(0.0);
            let mut l = vec![0.0; 128];
            let mut r = vec![0.0; 128];
            live.process_block(&mut l, &mut r);
            assert!(l.iter().any(|&s| s != 0.0));
        }
        session.disable_live();
        assert!(session.live().is_none());
    }
}
