//! Track Model
//!
//! The mutable mixing state for one stem. Buffers live in the engine; a
//! `Track` is purely parameters and serializes as the session's exchange
//! format with UIs and preset stores.

use serde::{Deserialize, Serialize};

use crate::dsp::{CompParams, EqParams, ReverbParams};
use crate::model::automation::{mirror_endpoints, Automation};

/// Default fader gain for a fresh track
pub const DEFAULT_GAIN: f32 = 0.8;
/// Fader gain limits
pub const GAIN_MIN: f32 = 0.01;
pub const GAIN_MAX: f32 = 3.0;

/// Per-stem mixing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub gain: f32,
    pub pan: f32,
    pub eq_on: bool,
    pub eq: EqParams,
    pub comp_on: bool,
    pub comp: CompParams,
    pub reverb_on: bool,
    pub reverb: ReverbParams,
    pub mute: bool,
    pub solo: bool,
    pub automation: Automation,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gain: DEFAULT_GAIN,
            pan: 0.0,
            eq_on: false,
            eq: EqParams::default(),
            comp_on: false,
            comp: CompParams::default(),
            reverb_on: false,
            reverb: ReverbParams::default(),
            mute: false,
            solo: false,
            automation: Automation::flat(DEFAULT_GAIN, 0.0),
        }
    }

    /// Set the fader gain, clamped, and mirror it into the level endpoints
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(GAIN_MIN, GAIN_MAX);
        mirror_endpoints(&mut self.automation.level, self.gain);
    }

    /// Set the pan position, clamped, and mirror it into the pan endpoints
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
        mirror_endpoints(&mut self.automation.pan, self.pan);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::automation::interpolate;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let track = Track::new("Kick.wav");
        assert_eq!(track.gain, 0.8);
        assert_eq!(track.pan, 0.0);
        assert!(!track.eq_on && !track.comp_on && !track.reverb_on);
        assert!(!track.mute && !track.solo);
        assert_eq!(track.comp.threshold_db, -20.0);
        assert_eq!(track.comp.ratio, 2.0);
        assert_relative_eq!(track.reverb.mix, 0.25);
        assert_relative_eq!(track.reverb.decay_secs, 0.4);
        // Automation endpoints mirror the fader
        assert_relative_eq!(interpolate(&track.automation.level, 0.5), 0.8);
    }

    #[test]
    fn test_set_gain_clamps_and_mirrors() {
        let mut track = Track::new("Bass.wav");
        track.set_gain(5.0);
        assert_eq!(track.gain, GAIN_MAX);
        assert_relative_eq!(interpolate(&track.automation.level, 0.0), GAIN_MAX);
        assert_relative_eq!(interpolate(&track.automation.level, 1.0), GAIN_MAX);

        track.set_gain(0.0);
        assert_eq!(track.gain, GAIN_MIN);
    }

    #[test]
    fn test_set_pan_clamps_and_mirrors() {
        let mut track = Track::new("Guitar.wav");
        track.set_pan(-2.0);
        assert_eq!(track.pan, -1.0);
        assert_relative_eq!(interpolate(&track.automation.pan, 0.3), -1.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut track = Track::new("Lead Vocal.wav");
        track.set_gain(1.2);
        track.eq_on = true;
        track.eq.high_db = 0.75;
        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(back, track);
    }
}
