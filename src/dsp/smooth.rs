//! Parameter Smoothing
//!
//! One-pole smoothing (~10 ms) applied to every parameter that changes while
//! audio is flowing, so pushes from the UI or a preset never click.

/// Smoothing time constant in seconds
pub const SMOOTHING_SECS: f32 = 0.01;

/// A parameter value that glides toward its target one sample at a time
#[derive(Debug, Clone, Copy)]
pub struct Smoothed {
    current: f32,
    target: f32,
    coeff: f32,
}

impl Smoothed {
    /// Create a smoothed value starting (and targeted) at `value`
    pub fn new(value: f32, sample_rate: f32) -> Self {
        Self {
            current: value,
            target: value,
            coeff: smoothing_coeff(sample_rate),
        }
    }

    /// Set a new target; the value glides there over ~10 ms
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value` with no glide
    #[inline]
    pub fn snap_to(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Advance one sample and return the current value
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.coeff;
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }
}

#[inline]
fn smoothing_coeff(sample_rate: f32) -> f32 {
    1.0 - (-1.0 / (SMOOTHING_SECS * sample_rate.max(1.0))).exp()
}
