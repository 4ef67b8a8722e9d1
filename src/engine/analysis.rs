//! Stem Analysis
//!
//! Block-based level statistics computed once per decoded stem. Levels are
//! mono-folded; dB figures use the analysis floor so silence stays finite.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::{linear_to_db_floored, mono_sample, StemBuffer};
use crate::model::roles::Role;

/// Analysis block length in seconds
pub const BLOCK_SECS: f64 = 0.2;

/// Level statistics for one stem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAnalysis {
    pub duration_secs: f64,
    pub sample_rate: u32,
    /// Linear RMS per 200 ms block, mono-folded
    pub rms_over_time: Vec<f32>,
    /// Peak level in dBFS (floored)
    pub peak_db: f32,
    /// Overall RMS in dBFS (floored)
    pub rms_db: f32,
    /// Index of the loudest block in `rms_over_time`
    pub loudest_block: usize,
    /// Index of the softest block in `rms_over_time`
    pub softest_block: usize,
    pub role: Role,
}

/// Analyze one stem in 200 ms blocks
pub fn analyze_stem(stem: &StemBuffer, role: Role) -> TrackAnalysis {
    let frames = stem.frames();
    let block_len = ((BLOCK_SECS * stem.sample_rate as f64) as usize).max(1);

    let mut rms_over_time = Vec::with_capacity(frames / block_len + 1);
    let mut peak = 0.0_f32;
    let mut sum_squares = 0.0_f64;

    let mut start = 0;
    while start < frames {
        let end = (start + block_len).min(frames);
        let mut block_squares = 0.0_f64;
        for i in start..end {
            let s = mono_sample(stem, i);
            peak = peak.max(s.abs());
            block_squares += (s as f64) * (s as f64);
        }
        sum_squares += block_squares;
        rms_over_time.push((block_squares / (end - start) as f64).sqrt() as f32);
        start = end;
    }

    let rms = if frames > 0 {
        (sum_squares / frames as f64).sqrt() as f32
    } else {
        0.0
    };

    let (loudest_block, softest_block) = extreme_blocks(&rms_over_time);

    let analysis = TrackAnalysis {
        duration_secs: stem.duration_secs(),
        sample_rate: stem.sample_rate,
        rms_over_time,
        peak_db: linear_to_db_floored(peak),
        rms_db: linear_to_db_floored(rms),
        loudest_block,
        softest_block,
        role,
    };
    debug!(
        "analysis: {:.2}s, peak {:.1} dBFS, rms {:.1} dBFS, role {:?}",
        analysis.duration_secs, analysis.peak_db, analysis.rms_db, analysis.role
    );
    analysis
}

fn extreme_blocks(blocks: &[f32]) -> (usize, usize) {
    let mut loudest = 0;
    let mut softest = 0;
    for (i, &rms) in blocks.iter().enumerate() {
        if rms > blocks[loudest] {
            loudest = i;
        }
        if rms < blocks[softest] {
            softest = i;
        }
    }
    (loudest, softest)
}

// ============================================================================
// Tests
// ============================================================================
