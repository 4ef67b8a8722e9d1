//! Track Change Lists
//!
//! Deserializable deltas against the track model. A change list arrives as
//! JSON (from a UI or an assistant), gets validated as a batch, then each
//! change patches one track. Every field is optional so a change can touch
//! a single knob without restating the rest of the track.

use serde::{Deserialize, Serialize};

use crate::engine::buffer::db_to_linear;
use crate::model::automation::add_point;
use crate::model::track::{Track, GAIN_MAX, GAIN_MIN};

/// Partial EQ update
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EqPatch {
    pub low_db: Option<f32>,
    pub mid_db: Option<f32>,
    pub high_db: Option<f32>,
}

/// Partial compressor update
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompPatch {
    pub threshold_db: Option<f32>,
    pub ratio: Option<f32>,
    pub attack_secs: Option<f32>,
    pub release_secs: Option<f32>,
    pub knee_db: Option<f32>,
}

/// Partial reverb update
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverbPatch {
    pub mix: Option<f32>,
    pub decay_secs: Option<f32>,
}

/// A new automation breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPoint {
    pub t: f32,
    pub value: f32,
}

/// One delta against one track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackChange {
    /// Index of the track this change addresses
    pub track: usize,
    /// Absolute fader target expressed in dB
    pub gain_db: Option<f32>,
    pub pan: Option<f32>,
    pub eq_on: Option<bool>,
    pub eq: Option<EqPatch>,
    pub comp_on: Option<bool>,
    pub comp: Option<CompPatch>,
    pub reverb_on: Option<bool>,
    pub reverb: Option<ReverbPatch>,
    pub mute: Option<bool>,
    pub solo: Option<bool>,
    pub add_level_point: Option<LevelPoint>,
}

/// Patch one track in place
///
/// Fields left as `None` keep the track's current value. `gain_db` is an
/// absolute target, not a relative trim: the fader lands at the linear
/// equivalent of the requested dB, clamped to the fader range.
pub fn apply_to(track: &mut Track, change: &TrackChange) {
    if let Some(db) = change.gain_db {
        track.set_gain(db_to_linear(db).clamp(GAIN_MIN, GAIN_MAX));
    }
    if let Some(pan) = change.pan {
        track.set_pan(pan.clamp(-1.0, 1.0));
    }

    if let Some(on) = change.eq_on {
        track.eq_on = on;
    }
    if let Some(eq) = &change.eq {
        if let Some(low) = eq.low_db {
            track.eq.low_db = low;
        }
        if let Some(mid) = eq.mid_db {
            track.eq.mid_db = mid;
        }
        if let Some(high) = eq.high_db {
            track.eq.high_db = high;
        }
        track.eq = track.eq.clamped();
    }

    if let Some(on) = change.comp_on {
        track.comp_on = on;
    }
    if let Some(comp) = &change.comp {
        if let Some(threshold) = comp.threshold_db {
            track.comp.threshold_db = threshold;
        }
        if let Some(ratio) = comp.ratio {
            track.comp.ratio = ratio;
        }
        if let Some(attack) = comp.attack_secs {
            track.comp.attack_secs = attack;
        }
        if let Some(release) = comp.release_secs {
            track.comp.release_secs = release;
        }
        if let Some(knee) = comp.knee_db {
            track.comp.knee_db = knee;
        }
        track.comp = track.comp.clamped();
    }

    if let Some(on) = change.reverb_on {
        track.reverb_on = on;
    }
    if let Some(reverb) = &change.reverb {
        if let Some(mix) = reverb.mix {
            track.reverb.mix = mix;
        }
        if let Some(decay) = reverb.decay_secs {
            track.reverb.decay_secs = decay;
        }
        track.reverb = track.reverb.clamped();
    }

    if let Some(on) = change.mute {
        track.mute = on;
    }
    if let Some(on) = change.solo {
        track.solo = on;
    }

    if let Some(point) = change.add_level_point {
        add_point(
            &mut track.automation.level,
            point.t.clamp(0.0, 1.0),
            point.value.clamp(0.0, 2.0),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
