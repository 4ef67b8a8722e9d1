//! Per-Track Processing Chain
//!
//! One chain per track during an offline render: EQ into compressor into
//! plate reverb, then automated gain and equal-power pan. Effects that are
//! switched off on the track are simply not built, so a dry track costs a
//! couple of multiplies per frame.

use crate::dsp::{
    mix_wet, pan_gains, Compressor, PlateReverb, StereoProcessor, TrackEq, DEFAULT_DAMPING,
};
use crate::engine::StemBuffer;
use crate::model::automation::{interpolate, Breakpoint};
use crate::model::Track;

/// Offline render chain for one track
pub struct TrackChain {
    eq: Option<TrackEq>,
    comp: Option<Compressor>,
    reverb: Option<PlateReverb>,
    reverb_mix: f32,
    level_curve: Vec<Breakpoint>,
    pan_curve: Vec<Breakpoint>,
    audible: bool,
}

impl TrackChain {
    /// Build a chain from a track snapshot
    ///
    /// `audible` folds mute and session solo state into the chain: a muted
    /// track (or an unsoloed one while any solo is active) renders silence
    /// but still advances its effect state.
    pub fn new(track: &Track, sample_rate: f32, audible: bool) -> Self {
        let eq = track.eq_on.then(|| TrackEq::new(sample_rate, track.eq.clamped()));
        let comp = track
            .comp_on
            .then(|| Compressor::new(sample_rate, track.comp.clamped()));
        let reverb_params = track.reverb.clamped();
        let reverb = track
            .reverb_on
            .then(|| PlateReverb::new(sample_rate, reverb_params.decay_secs, DEFAULT_DAMPING));

        Self {
            eq,
            comp,
            reverb,
            reverb_mix: reverb_params.mix,
            level_curve: track.automation.level.clone(),
            pan_curve: track.automation.pan.clone(),
            audible,
        }
    }

    /// Whether mute/solo state lets this track reach the mix bus
    pub fn is_audible(&self) -> bool {
        self.audible
    }

    /// Process one stem frame at normalized song position `t`
    #[inline]
    pub fn process_frame(&mut self, stem: &StemBuffer, frame: usize, t: f32) -> (f32, f32) {
        let mut out = (stem.sample_at(0, frame), stem.sample_at(1, frame));

        if let Some(eq) = &mut self.eq {
            out = eq.process_frame(out);
        }
        if let Some(comp) = &mut self.comp {
            out = comp.process_frame(out);
        }
        if let Some(reverb) = &mut self.reverb {
            let wet = reverb.process_frame(out);
            out = (
                mix_wet(out.0, wet.0, self.reverb_mix),
                mix_wet(out.1, wet.1, self.reverb_mix),
            );
        }

        if !self.audible {
            return (0.0, 0.0);
        }

        let gain = interpolate(&self.level_curve, t).max(0.0);
        let pan = interpolate(&self.pan_curve, t).clamp(-1.0, 1.0);
        let (left_gain, right_gain) = pan_gains(pan);

        (out.0 * gain * left_gain, out.1 * gain * right_gain)
    }
}

/// Whether each track reaches the bus given the session's solo state
pub fn audibility(tracks: &[Track]) -> Vec<bool> {
    let any_solo = tracks.iter().any(|t| t.solo);
    tracks
        .iter()
        .map(|t| !t.mute && (!any_solo || t.solo))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dc_stem(frames: usize, value: f32) -> StemBuffer {
        StemBuffer {
            samples: vec![vec![value; frames], vec![value; frames]],
            sample_rate: 44100,
        }
    }

    #[test]
    fn test_dry_chain_applies_gain_and_pan() {
        let mut track = Track::new("Bass.wav");
        track.set_gain(0.5);
        let stem = dc_stem(16, 1.0);
        let mut chain = TrackChain::new(&track, 44100.0, true);

        let (l, r) = chain.process_frame(&stem, 0, 0.0);
        // Center pan: both sides at gain * sqrt(0.5)
        let expected = 0.5 * 0.5_f32.sqrt();
        assert_relative_eq!(l, expected, epsilon = 1e-6);
        assert_relative_eq!(r, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_hard_pan() {
        let mut track = Track::new("Guitar.wav");
        track.set_gain(1.0);
        track.set_pan(-1.0);
        let stem = dc_stem(4, 1.0);
        let mut chain = TrackChain::new(&track, 44100.0, true);

        let (l, r) = chain.process_frame(&stem, 0, 0.0);
        assert_relative_eq!(l, 1.0, epsilon = 1e-6);
        assert_relative_eq!(r, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_inaudible_chain_renders_silence() {
        let mut track = Track::new("Keys.wav");
        track.mute = true;
        let stem = dc_stem(4, 1.0);
        let mut chain = TrackChain::new(&track, 44100.0, false);
        assert_eq!(chain.process_frame(&stem, 0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_level_automation_drives_gain() {
        let mut track = Track::new("Vocal.wav");
        track.automation.level = vec![
            Breakpoint { t: 0.0, value: 0.0 },
            Breakpoint { t: 1.0, value: 1.0 },
        ];
        let stem = dc_stem(4, 1.0);
        let mut chain = TrackChain::new(&track, 44100.0, true);

        let (start, _) = chain.process_frame(&stem, 0, 0.0);
        let (end, _) = chain.process_frame(&stem, 1, 1.0);
        assert_relative_eq!(start, 0.0, epsilon = 1e-6);
        assert_relative_eq!(end, 0.5_f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_audibility_solo_rules() {
        let mut tracks = vec![
            Track::new("a.wav"),
            Track::new("b.wav"),
            Track::new("c.wav"),
        ];
        assert_eq!(audibility(&tracks), vec![true, true, true]);

        tracks[1].solo = true;
        assert_eq!(audibility(&tracks), vec![false, true, false]);

        tracks[1].mute = true;
        // Mute beats solo on the same track
        assert_eq!(audibility(&tracks), vec![false, false, false]);
    }

    #[test]
    fn test_disabled_effects_are_not_built() {
        let track = Track::new("Tom.wav");
        let chain = TrackChain::new(&track, 44100.0, true);
        assert!(chain.eq.is_none());
        assert!(chain.comp.is_none());
        assert!(chain.reverb.is_none());
    }
}
