//! DSP Processors
//!
//! Per-track signal processing for the render and live paths. Everything is
//! stereo and frame-pull: the chains own their processors and pull one frame
//! at a time, so the same code serves offline renders and live preview.

mod compressor;
mod eq;
mod reverb;
mod smooth;

pub use compressor::{CompParams, Compressor};
pub use eq::{EqParams, TrackEq};
pub use reverb::{mix_wet, PlateReverb, ReverbParams, DEFAULT_DAMPING};
pub use smooth::Smoothed;

/// A stereo frame processor with persistent state
pub trait StereoProcessor {
    /// Process one stereo frame
    fn process_frame(&mut self, frame: (f32, f32)) -> (f32, f32);

    /// Clear all internal state
    fn reset(&mut self);
}

/// Equal-power pan gains for a pan position in [-1, 1]
///
/// Center sits at -3 dB per side; the gains' squares always sum to 1.
#[inline]
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let p = pan.clamp(-1.0, 1.0);
    ((0.5 - p / 2.0).sqrt(), (0.5 + p / 2.0).sqrt())
}
