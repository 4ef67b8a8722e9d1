//! Mastering Chain
//!
//! A bus compressor pass over the finished mix followed by peak
//! normalization to the output ceiling. Options come in as three coarse
//! 0..=2 knobs rather than raw compressor parameters, so a front end can
//! expose "punch" and "glue" without knowing anything about DSP.

use log::info;
use serde::{Deserialize, Serialize};

use crate::dsp::{CompParams, Compressor, StereoProcessor};
use crate::engine::{MixResult, PEAK_CEILING};

/// Coarse mastering controls, each 0 (light) to 2 (heavy)
///
/// Knobs are floats so any client-side value deserializes; lookup buckets
/// the endpoints exactly and sends everything in between to the middle row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterOptions {
    pub punch: f32,
    pub compression: f32,
    /// Accepted and range-checked but not yet wired to a loudness target
    pub loudness: f32,
}

impl Default for MasterOptions {
    fn default() -> Self {
        Self {
            punch: 1.0,
            compression: 1.0,
            loudness: 1.0,
        }
    }
}

impl MasterOptions {
    /// Copy with every knob clamped to [0, 2]
    pub fn clamped(&self) -> Self {
        Self {
            punch: self.punch.clamp(0.0, 2.0),
            compression: self.compression.clamp(0.0, 2.0),
            loudness: self.loudness.clamp(0.0, 2.0),
        }
    }

    /// Bus compressor settings for these knobs
    pub fn comp_params(&self) -> CompParams {
        let opts = self.clamped();
        let (threshold_db, ratio) = if opts.compression == 0.0 {
            (-12.0, 1.5)
        } else if opts.compression == 2.0 {
            (-24.0, 4.0)
        } else {
            (-18.0, 2.5)
        };
        let (attack_secs, release_secs) = if opts.punch == 0.0 {
            (0.010, 0.200)
        } else if opts.punch == 1.0 {
            (0.005, 0.150)
        } else {
            (0.003, 0.100)
        };
        CompParams {
            threshold_db,
            ratio,
            attack_secs,
            release_secs,
            knee_db: 6.0,
        }
    }
}

/// Master a finished mix
///
/// Runs the bus compressor over the whole mix, then normalizes the peak up
/// or down to the output ceiling. Returns `None` only for an empty mix.
pub fn master_mix(mix: &MixResult, options: MasterOptions) -> Option<MixResult> {
    if mix.is_empty() {
        return None;
    }

    let params = options.comp_params();
    let mut comp = Compressor::new(mix.sample_rate as f32, params);
    let mut out = MixResult::silence(mix.frames(), mix.sample_rate);
    for i in 0..mix.frames() {
        let (l, r) = comp.process_frame((mix.left[i], mix.right[i]));
        out.left[i] = l;
        out.right[i] = r;
    }

    let peak = out.peak();
    if peak > 0.0 {
        let scale = PEAK_CEILING / peak;
        for sample in out.left.iter_mut().chain(out.right.iter_mut()) {
            *sample = (*sample * scale).clamp(-1.0, 1.0);
        }
    }

    info!(
        "mastered {} frames: threshold {} dB, ratio {}:1, peak {:.3} -> {:.3}",
        out.frames(),
        params.threshold_db,
        params.ratio,
        peak,
        out.peak()
    );
    Some(out)
}

// ============================================================================
// Tests
// ============================================================================
