//! Audio Buffer Types
//!
//! Decoded stem storage and the universal render output type, plus the
//! dB/peak/RMS helpers the analysis and render stages share.

// ============================================================================
// Constants
// ============================================================================

/// Peak ceiling applied to every rendered buffer
pub const PEAK_CEILING: f32 = 0.99;

/// Linear floor used when converting analysis levels to dBFS
pub const DB_FLOOR: f32 = 1e-6;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero or negative input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Convert linear amplitude to dBFS with the analysis floor applied
///
/// Silence reports as the floor value (-120 dBFS), never -inf, so analysis
/// results stay finite and serializable.
#[inline]
pub fn linear_to_db_floored(linear: f32) -> f32 {
    20.0 * linear.max(DB_FLOOR).log10()
}

// ============================================================================
// Stem Buffer
// ============================================================================

/// A decoded stem: non-interleaved f32 PCM, read-only after decode
///
/// Mono stems carry a single channel; [`StemBuffer::channel_pair`] presents
/// it on both sides so downstream code is always stereo.
#[derive(Debug, Clone)]
pub struct StemBuffer {
    /// Sample data: outer Vec is channels, inner Vec is samples
    pub samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl StemBuffer {
    /// Number of channels
    #[inline]
    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of frames (samples per channel)
    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// True if the buffer holds no audio
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Left/right sample slices; a mono stem appears on both sides
    #[inline]
    pub fn channel_pair(&self) -> (&[f32], &[f32]) {
        let left = self.samples.first().map(|ch| ch.as_slice()).unwrap_or(&[]);
        let right = if self.samples.len() > 1 {
            self.samples[1].as_slice()
        } else {
            left
        };
        (left, right)
    }

    /// Sample at `frame` in `channel`, 0.0 past the end
    ///
    /// Mono stems answer for channel 1 with channel 0.
    #[inline]
    pub fn sample_at(&self, channel: usize, frame: usize) -> f32 {
        let ch = if channel < self.samples.len() { channel } else { 0 };
        self.samples
            .get(ch)
            .and_then(|c| c.get(frame).copied())
            .unwrap_or(0.0)
    }
}

/// Mono-folded frame value: mean of all channels at `frame`
pub fn mono_sample(stem: &StemBuffer, frame: usize) -> f32 {
    let channels = stem.channels();
    if channels == 0 {
        return 0.0;
    }
    let sum: f32 = stem
        .samples
        .iter()
        .map(|ch| ch.get(frame).copied().unwrap_or(0.0))
        .sum();
    sum / channels as f32
}

// ============================================================================
// Mix Result
// ============================================================================

/// Stereo render output shared by every render path
///
/// Flat mixes, processed mixes, and mastered mixes all produce this shape;
/// the WAV encoder and the players consume it.
#[derive(Debug, Clone)]
pub struct MixResult {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub sample_rate: u32,
}

impl MixResult {
    /// Allocate a zeroed stereo result
    pub fn silence(frames: usize, sample_rate: u32) -> Self {
        Self {
            left: vec![0.0; frames],
            right: vec![0.0; frames],
            sample_rate,
        }
    }

    /// Number of frames
    #[inline]
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    /// True if the result holds no audio
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Absolute peak across both channels
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Clip safety: if the peak exceeds the ceiling, scale the whole buffer
    /// down so the new peak sits exactly at the ceiling
    ///
    /// Runs unconditionally at the end of every render path.
    pub fn limit_peak(&mut self) {
        let peak = self.peak();
        if peak > PEAK_CEILING {
            let scale = PEAK_CEILING / peak;
            for s in self.left.iter_mut() {
                *s *= scale;
            }
            for s in self.right.iter_mut() {
                *s *= scale;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
