//! Track Compressor
//!
//! Feed-forward soft-knee compressor with stereo-linked detection: both
//! channels share one gain so the image never shifts under compression.

use serde::{Deserialize, Serialize};

use super::StereoProcessor;

/// Compressor parameters, times in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompParams {
    pub threshold_db: f32,
    pub ratio: f32,
    pub attack_secs: f32,
    pub release_secs: f32,
    pub knee_db: f32,
}

impl Default for CompParams {
    fn default() -> Self {
        Self {
            threshold_db: -20.0,
            ratio: 2.0,
            attack_secs: 0.003,
            release_secs: 0.25,
            knee_db: 6.0,
        }
    }
}

impl CompParams {
    /// Copy with every field clamped to its legal range
    pub fn clamped(&self) -> Self {
        Self {
            threshold_db: self.threshold_db.clamp(-60.0, 0.0),
            ratio: self.ratio.clamp(1.0, 20.0),
            attack_secs: self.attack_secs.clamp(0.0001, 1.0),
            release_secs: self.release_secs.clamp(0.01, 2.0),
            knee_db: self.knee_db.clamp(0.0, 24.0),
        }
    }
}

/// Stereo-linked soft-knee compressor
#[derive(Debug, Clone)]
pub struct Compressor {
    params: CompParams,
    sample_rate: f32,
    attack_coeff: f32,
    release_coeff: f32,
    /// Smoothed gain in dB; 0 = no reduction, negative = reducing
    envelope_db: f32,
}

impl Compressor {
    pub fn new(sample_rate: f32, params: CompParams) -> Self {
        let params = params.clamped();
        let mut comp = Self {
            params,
            sample_rate,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            envelope_db: 0.0,
        };
        comp.update_coeffs();
        comp
    }

    /// Push new parameters; detector state carries over
    pub fn update_params(&mut self, params: CompParams) {
        self.params = params.clamped();
        self.update_coeffs();
    }

    pub fn params(&self) -> CompParams {
        self.params
    }

    /// Current gain reduction in dB (>= 0)
    pub fn gain_reduction_db(&self) -> f32 {
        -self.envelope_db
    }

    fn update_coeffs(&mut self) {
        self.attack_coeff = step_coeff(self.params.attack_secs, self.sample_rate);
        self.release_coeff = step_coeff(self.params.release_secs, self.sample_rate);
    }

    /// Static gain computer: target gain in dB for a detector level in dB
    fn computed_gain_db(&self, level_db: f32) -> f32 {
        let over = level_db - self.params.threshold_db;
        let knee = self.params.knee_db;
        let slope = 1.0 / self.params.ratio - 1.0;

        if 2.0 * over < -knee {
            0.0
        } else if knee > 0.0 && 2.0 * over.abs() <= knee {
            // Quadratic interpolation through the knee
            let t = over + knee / 2.0;
            slope * t * t / (2.0 * knee)
        } else {
            slope * over
        }
    }
}

#[inline]
fn step_coeff(time_secs: f32, sample_rate: f32) -> f32 {
    1.0 - (-1.0 / (time_secs * sample_rate.max(1.0))).exp()
}

impl StereoProcessor for Compressor {
    #[inline]
    fn process_frame(&mut self, frame: (f32, f32)) -> (f32, f32) {
        // Linked peak detection across both channels
        let level = frame.0.abs().max(frame.1.abs()).max(1e-6);
        let level_db = 20.0 * level.log10();

        let target_db = self.computed_gain_db(level_db);
        let coeff = if target_db < self.envelope_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope_db += (target_db - self.envelope_db) * coeff;

        let gain = 10.0_f32.powf(self.envelope_db / 20.0);
        (frame.0 * gain, frame.1 * gain)
    }

    fn reset(&mut self) {
        self.envelope_db = 0.0;
    }
}

// ============================================================================
// Tests
// ============================================================================
