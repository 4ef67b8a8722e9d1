//! Three-Band Track EQ
//!
//! Fixed topology per track: low shelf at 320 Hz, peaking bell at 1 kHz
//! (Q = 1), high shelf at 3.2 kHz. Coefficients follow the Audio EQ Cookbook.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::StereoProcessor;

/// Low shelf corner frequency in Hz
pub const LOW_SHELF_HZ: f64 = 320.0;
/// Peaking band center frequency in Hz
pub const MID_PEAK_HZ: f64 = 1000.0;
/// Peaking band Q
pub const MID_PEAK_Q: f64 = 1.0;
/// High shelf corner frequency in Hz
pub const HIGH_SHELF_HZ: f64 = 3200.0;

/// Shelf Q used for both shelves
const SHELF_Q: f64 = 0.7071;

/// Band gain limit in dB
const GAIN_LIMIT_DB: f32 = 24.0;

/// Per-track EQ band gains in dB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqParams {
    pub low_db: f32,
    pub mid_db: f32,
    pub high_db: f32,
}

impl Default for EqParams {
    fn default() -> Self {
        Self {
            low_db: 0.0,
            mid_db: 0.0,
            high_db: 0.0,
        }
    }
}

impl EqParams {
    /// Copy with every band clamped to the legal gain range
    pub fn clamped(&self) -> Self {
        Self {
            low_db: self.low_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB),
            mid_db: self.mid_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB),
            high_db: self.high_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB),
        }
    }
}

/// Biquad coefficients, normalized by a0
#[derive(Debug, Clone, Copy, Default)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    LowShelf,
    Peak,
    HighShelf,
}

impl BiquadCoeffs {
    /// Audio EQ Cookbook formulas
    fn calculate(shape: Shape, sample_rate: f64, frequency: f64, gain_db: f64, q: f64) -> Self {
        let freq = frequency.clamp(20.0, sample_rate / 2.0 - 1.0);
        let w0 = 2.0 * PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * q);
        let a = (10.0_f64).powf(gain_db / 40.0);

        let (b0, b1, b2, a0, a1, a2) = match shape {
            Shape::Peak => (
                1.0 + alpha * a,
                -2.0 * cos_w0,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * cos_w0,
                1.0 - alpha / a,
            ),
            Shape::LowShelf => {
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
            Shape::HighShelf => {
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
        };

        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    fn unity() -> Self {
        BiquadCoeffs {
            b0: 1.0,
            ..Default::default()
        }
    }
}

/// Biquad delay line for one channel, Direct Form I
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    #[inline]
    fn process(&mut self, input: f64, coeffs: &BiquadCoeffs) -> f64 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
struct Band {
    coeffs: BiquadCoeffs,
    left: BiquadState,
    right: BiquadState,
}

impl Band {
    #[inline]
    fn process(&mut self, frame: (f32, f32)) -> (f32, f32) {
        (
            self.left.process(frame.0 as f64, &self.coeffs) as f32,
            self.right.process(frame.1 as f64, &self.coeffs) as f32,
        )
    }
}

/// Stereo three-band track EQ
#[derive(Debug, Clone)]
pub struct TrackEq {
    sample_rate: f64,
    params: EqParams,
    low: Band,
    mid: Band,
    high: Band,
}

impl TrackEq {
    pub fn new(sample_rate: f32, params: EqParams) -> Self {
        let mut eq = Self {
            sample_rate: sample_rate as f64,
            params: params.clamped(),
            low: Band::default(),
            mid: Band::default(),
            high: Band::default(),
        };
        eq.recalculate();
        eq
    }

    /// Push new band gains; delay state is untouched
    pub fn update_params(&mut self, params: EqParams) {
        self.params = params.clamped();
        self.recalculate();
    }

    pub fn params(&self) -> EqParams {
        self.params
    }

    fn recalculate(&mut self) {
        self.low.coeffs = shelf_or_unity(Shape::LowShelf, self.sample_rate, LOW_SHELF_HZ, self.params.low_db, SHELF_Q);
        self.mid.coeffs = shelf_or_unity(Shape::Peak, self.sample_rate, MID_PEAK_HZ, self.params.mid_db, MID_PEAK_Q);
        self.high.coeffs = shelf_or_unity(Shape::HighShelf, self.sample_rate, HIGH_SHELF_HZ, self.params.high_db, SHELF_Q);
    }
}

fn shelf_or_unity(shape: Shape, sample_rate: f64, freq: f64, gain_db: f32, q: f64) -> BiquadCoeffs {
    if gain_db.abs() < 0.01 {
        BiquadCoeffs::unity()
    } else {
        BiquadCoeffs::calculate(shape, sample_rate, freq, gain_db as f64, q)
    }
}

impl StereoProcessor for TrackEq {
    #[inline]
    fn process_frame(&mut self, frame: (f32, f32)) -> (f32, f32) {
        let frame = self.low.process(frame);
        let frame = self.mid.process(frame);
        self.high.process(frame)
    }

    fn reset(&mut self) {
        for band in [&mut self.low, &mut self.mid, &mut self.high] {
            band.left.reset();
            band.right.reset();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
