//! Plate Reverb
//!
//! Freeverb-style plate: four parallel feedback combs with damped feedback
//! paths, summed into two series allpasses. Delay lengths are fixed at
//! construction for a given sample rate; decay and damping retune the
//! feedback coefficients through smoothing without touching the topology.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::{Smoothed, StereoProcessor};

/// Comb delay lengths in samples at 44.1 kHz
pub const COMB_DELAYS_44K: [usize; 4] = [1116, 1188, 1277, 1356];
/// Allpass delay lengths in samples at 44.1 kHz
pub const ALLPASS_DELAYS_44K: [usize; 2] = [225, 556];
/// Allpass feedback gain
pub const ALLPASS_GAIN: f32 = 0.5;
/// Damping used when the track model does not specify one
pub const DEFAULT_DAMPING: f32 = 0.5;

const REFERENCE_RATE: f32 = 44100.0;
const FEEDBACK_MIN: f32 = 0.5;
const FEEDBACK_MAX: f32 = 0.92;

/// Per-track reverb parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbParams {
    /// Wet amount in [0, 1]
    pub mix: f32,
    /// Decay time in seconds
    pub decay_secs: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            mix: 0.25,
            decay_secs: 0.4,
        }
    }
}

impl ReverbParams {
    /// Copy with both fields clamped to their legal ranges
    pub fn clamped(&self) -> Self {
        Self {
            mix: self.mix.clamp(0.0, 1.0),
            decay_secs: self.decay_secs.clamp(0.15, 1.5),
        }
    }
}

/// Dry/wet sum used by the track chains
///
/// The denominator keeps the summed level roughly constant as mix rises.
#[inline]
pub fn mix_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    let m = mix.clamp(0.0, 1.0);
    (dry + wet * m * 0.5) / (1.0 + m * 0.5)
}

/// One feedback comb with a one-pole lowpass in the feedback path
#[derive(Debug, Clone)]
struct Comb {
    buffer_l: Vec<f32>,
    buffer_r: Vec<f32>,
    index: usize,
    feedback: Smoothed,
    damp_coeff: Smoothed,
    lp_l: f32,
    lp_r: f32,
}

impl Comb {
    fn new(delay: usize, sample_rate: f32) -> Self {
        Self {
            buffer_l: vec![0.0; delay],
            buffer_r: vec![0.0; delay],
            index: 0,
            feedback: Smoothed::new(FEEDBACK_MIN, sample_rate),
            damp_coeff: Smoothed::new(1.0, sample_rate),
            lp_l: 0.0,
            lp_r: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: (f32, f32)) -> (f32, f32) {
        let fb = self.feedback.next();
        let damp = self.damp_coeff.next();

        let out_l = self.buffer_l[self.index];
        let out_r = self.buffer_r[self.index];

        self.lp_l += damp * (out_l - self.lp_l);
        self.lp_r += damp * (out_r - self.lp_r);

        self.buffer_l[self.index] = input.0 + self.lp_l * fb;
        self.buffer_r[self.index] = input.1 + self.lp_r * fb;

        self.index += 1;
        if self.index >= self.buffer_l.len() {
            self.index = 0;
        }

        (out_l, out_r)
    }

    fn reset(&mut self) {
        self.buffer_l.fill(0.0);
        self.buffer_r.fill(0.0);
        self.lp_l = 0.0;
        self.lp_r = 0.0;
        self.index = 0;
    }
}

/// Schroeder allpass diffuser
#[derive(Debug, Clone)]
struct Allpass {
    buffer_l: Vec<f32>,
    buffer_r: Vec<f32>,
    index: usize,
}

impl Allpass {
    fn new(delay: usize) -> Self {
        Self {
            buffer_l: vec![0.0; delay],
            buffer_r: vec![0.0; delay],
            index: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: (f32, f32)) -> (f32, f32) {
        let buf_l = self.buffer_l[self.index];
        let buf_r = self.buffer_r[self.index];

        let out_l = -input.0 + buf_l;
        let out_r = -input.1 + buf_r;

        self.buffer_l[self.index] = input.0 + buf_l * ALLPASS_GAIN;
        self.buffer_r[self.index] = input.1 + buf_r * ALLPASS_GAIN;

        self.index += 1;
        if self.index >= self.buffer_l.len() {
            self.index = 0;
        }

        (out_l, out_r)
    }

    fn reset(&mut self) {
        self.buffer_l.fill(0.0);
        self.buffer_r.fill(0.0);
        self.index = 0;
    }
}

/// Stereo plate reverb
#[derive(Debug, Clone)]
pub struct PlateReverb {
    sample_rate: f32,
    decay_secs: f32,
    damping: f32,
    combs: Vec<Comb>,
    allpasses: Vec<Allpass>,
}

impl PlateReverb {
    pub fn new(sample_rate: f32, decay_secs: f32, damping: f32) -> Self {
        let scale = sample_rate / REFERENCE_RATE;
        let combs = COMB_DELAYS_44K
            .iter()
            .map(|&d| Comb::new(scaled_delay(d, scale), sample_rate))
            .collect();
        let allpasses = ALLPASS_DELAYS_44K
            .iter()
            .map(|&d| Allpass::new(scaled_delay(d, scale)))
            .collect();

        let mut plate = Self {
            sample_rate,
            decay_secs,
            damping,
            combs,
            allpasses,
        };
        plate.retune();
        // No glide on construction
        for comb in &mut plate.combs {
            let fb = comb.feedback.target();
            comb.feedback.snap_to(fb);
            let dc = comb.damp_coeff.target();
            comb.damp_coeff.snap_to(dc);
        }
        plate
    }

    /// Retune decay and damping through smoothing
    ///
    /// Delay lengths and topology never change here.
    pub fn update_params(&mut self, decay_secs: f32, damping: f32) {
        self.decay_secs = decay_secs;
        self.damping = damping;
        self.retune();
    }

    /// Per-comb delay lengths in samples, in tuning order
    pub fn comb_delays(&self) -> Vec<usize> {
        self.combs.iter().map(|c| c.buffer_l.len()).collect()
    }

    /// Allpass delay lengths in samples, in series order
    pub fn allpass_delays(&self) -> Vec<usize> {
        self.allpasses.iter().map(|a| a.buffer_l.len()).collect()
    }

    fn retune(&mut self) {
        let decay = self.decay_secs.max(1e-3);
        let cutoff_hz = 800.0 + self.damping.clamp(0.0, 1.0) * 6000.0;
        let damp_coeff = (1.0 - (-TAU * cutoff_hz / self.sample_rate).exp()).min(1.0);

        for comb in &mut self.combs {
            // Feedback from this comb's own loop time: -60 dB after `decay`
            let delay_secs = comb.buffer_l.len() as f32 / self.sample_rate;
            let feedback =
                10.0_f32.powf(-3.0 * delay_secs / decay).clamp(FEEDBACK_MIN, FEEDBACK_MAX);
            comb.feedback.set_target(feedback);
            comb.damp_coeff.set_target(damp_coeff);
        }
    }
}

#[inline]
fn scaled_delay(base: usize, scale: f32) -> usize {
    ((base as f32 * scale).round() as usize).max(1)
}

impl StereoProcessor for PlateReverb {
    #[inline]
    fn process_frame(&mut self, frame: (f32, f32)) -> (f32, f32) {
        let mut wet = (0.0, 0.0);
        for comb in &mut self.combs {
            let out = comb.process(frame);
            wet.0 += out.0;
            wet.1 += out.1;
        }
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }
        wet
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
