//! Live Preview Graph
//!
//! Block-pull preview of the processed mix. Unlike the offline chains,
//! which are rebuilt per render, the live graph keeps every processor
//! alive across parameter edits and glides gain, pan, and wet level
//! through short smoothers so edits never click during playback.

use log::debug;

use crate::dsp::{
    mix_wet, pan_gains, CompParams, Compressor, EqParams, PlateReverb, Smoothed, StereoProcessor,
    TrackEq, DEFAULT_DAMPING,
};
use crate::engine::{StemBuffer, Transport};
use crate::model::automation::{interpolate, Breakpoint};
use crate::model::Track;
use crate::render::audibility;

/// Neutral compressor settings for a bypassed track
fn neutral_comp() -> CompParams {
    CompParams {
        threshold_db: 0.0,
        ratio: 1.0,
        ..CompParams::default()
    }
}

/// Persistent processing state for one live track
struct LiveChain {
    eq: TrackEq,
    comp: Compressor,
    reverb: PlateReverb,
    gain: Smoothed,
    pan: Smoothed,
    wet: Smoothed,
    level_curve: Vec<Breakpoint>,
    pan_curve: Vec<Breakpoint>,
    audible: bool,
}

impl LiveChain {
    fn new(track: &Track, sample_rate: f32, audible: bool) -> Self {
        let reverb_params = track.reverb.clamped();
        let mut chain = Self {
            eq: TrackEq::new(sample_rate, EqParams::default()),
            comp: Compressor::new(sample_rate, neutral_comp()),
            reverb: PlateReverb::new(sample_rate, reverb_params.decay_secs, DEFAULT_DAMPING),
            gain: Smoothed::new(track.gain, sample_rate),
            pan: Smoothed::new(track.pan, sample_rate),
            wet: Smoothed::new(0.0, sample_rate),
            level_curve: Vec::new(),
            pan_curve: Vec::new(),
            audible,
        };
        chain.sync(track, audible);
        chain
    }

    /// Pull the track's current parameters into the running processors
    fn sync(&mut self, track: &Track, audible: bool) {
        let eq = if track.eq_on {
            track.eq.clamped()
        } else {
            EqParams::default()
        };
        self.eq.update_params(eq);

        let comp = if track.comp_on {
            track.comp.clamped()
        } else {
            neutral_comp()
        };
        self.comp.update_params(comp);

        let reverb = track.reverb.clamped();
        self.reverb.update_params(reverb.decay_secs, DEFAULT_DAMPING);
        self.wet
            .set_target(if track.reverb_on { reverb.mix } else { 0.0 });

        self.level_curve = track.automation.level.clone();
        self.pan_curve = track.automation.pan.clone();
        self.audible = audible;
    }

    /// Aim the gain and pan smoothers at the automation values for
    /// normalized song position `t`
    fn aim(&mut self, t: f32) {
        let level = if self.audible {
            interpolate(&self.level_curve, t).max(0.0)
        } else {
            0.0
        };
        self.gain.set_target(level);
        self.pan
            .set_target(interpolate(&self.pan_curve, t).clamp(-1.0, 1.0));
    }

    #[inline]
    fn process_frame(&mut self, stem: &StemBuffer, frame: usize) -> (f32, f32) {
        let dry = (stem.sample_at(0, frame), stem.sample_at(1, frame));
        let mut out = self.eq.process_frame(dry);
        out = self.comp.process_frame(out);

        let wet_level = self.wet.next();
        let wet = self.reverb.process_frame(out);
        out = (
            mix_wet(out.0, wet.0, wet_level),
            mix_wet(out.1, wet.1, wet_level),
        );

        let gain = self.gain.next();
        let (left_gain, right_gain) = pan_gains(self.pan.next());
        (out.0 * gain * left_gain, out.1 * gain * right_gain)
    }
}

/// Block-pull preview graph over the session's stems
pub struct LiveGraph {
    stems: Vec<Option<StemBuffer>>,
    chains: Vec<LiveChain>,
    transport: Transport,
    duration_secs: f64,
}

impl LiveGraph {
    /// Build a graph over decoded stems and their tracks
    ///
    /// Slots whose stem failed to decode get a chain too, so indices stay
    /// aligned with the track list; they just contribute silence.
    pub fn new(stems: &[Option<StemBuffer>], tracks: &[Track], sample_rate: u32) -> Self {
        let audible = audibility(tracks);
        let chains = tracks
            .iter()
            .zip(&audible)
            .map(|(track, &on)| LiveChain::new(track, sample_rate as f32, on))
            .collect();
        let duration_secs = stems
            .iter()
            .flatten()
            .map(|s| s.duration_secs())
            .fold(0.0, f64::max);

        debug!(
            "live graph: {} tracks, {:.2}s @ {} Hz",
            tracks.len(),
            duration_secs,
            sample_rate
        );
        Self {
            stems: stems.to_vec(),
            chains,
            transport: Transport::new(sample_rate),
            duration_secs,
        }
    }

    /// Re-sync one track's parameters into its running chain
    ///
    /// Mute and solo affect other tracks, so solo edits should go through
    /// [`LiveGraph::sync_all_tracks`] instead.
    pub fn sync_track(&mut self, index: usize, track: &Track, audible: bool) {
        if let Some(chain) = self.chains.get_mut(index) {
            chain.sync(track, audible);
        }
    }

    /// Re-sync every track, recomputing mute/solo audibility
    pub fn sync_all_tracks(&mut self, tracks: &[Track]) {
        let audible = audibility(tracks);
        for ((chain, track), on) in self.chains.iter_mut().zip(tracks).zip(audible) {
            chain.sync(track, on);
        }
    }

    pub fn start_playback(&mut self, offset_secs: f64) {
        self.transport.start(offset_secs, self.duration_secs);
    }

    pub fn stop_playback(&mut self) {
        self.transport.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn playback_position(&self) -> f64 {
        self.transport.position_secs()
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Render the next block into the output slices
    ///
    /// Stopped transport fills silence. The block length is whatever the
    /// host hands in; both slices must be the same length.
    pub fn process_block(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        let block = out_left.len().min(out_right.len());
        out_left[..block].fill(0.0);
        out_right[..block].fill(0.0);
        if !self.transport.is_playing() {
            return;
        }

        let start_frame = self.transport.position_frames() as usize;
        let duration = self.duration_secs.max(f64::EPSILON);
        let t = (self.transport.position_secs() / duration).clamp(0.0, 1.0) as f32;
        for chain in &mut self.chains {
            chain.aim(t);
        }

        for (slot, chain) in self.stems.iter().zip(&mut self.chains) {
            let Some(stem) = slot else { continue };
            for i in 0..block {
                let (l, r) = chain.process_frame(stem, start_frame + i);
                out_left[i] += l;
                out_right[i] += r;
            }
        }

        for i in 0..block {
            out_left[i] = out_left[i].clamp(-1.0, 1.0);
            out_right[i] = out_right[i].clamp(-1.0, 1.0);
        }
        self.transport.advance(block as u64);
    }
}

// ============================================================================
// Tests
// ============================================================================
