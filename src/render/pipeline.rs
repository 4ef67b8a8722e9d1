//! Mix Pipeline
//!
//! Offline mix builders. The flat mix sums stems with static fader gains
//! and nothing else, as a reference point; the processed mix runs every
//! track through its full chain with automation and panning. Both land in
//! a [`MixResult`] sized to the longest stem and peak-limited.

use log::{debug, info};
use std::time::Instant;

use crate::engine::{MixResult, StemBuffer};
use crate::error::{MixError, Result};
use crate::model::Track;
use crate::render::chain::{audibility, TrackChain};
use crate::render::token::RenderToken;

/// Frame count and sample rate for a mix over these stems
///
/// The mix is as long as the longest stem; the sample rate follows the
/// first decoded stem. Returns `None` when no stem decoded.
pub fn mix_dimensions(stems: &[Option<StemBuffer>]) -> Option<(usize, u32)> {
    let mut frames = 0;
    let mut rate = None;
    for stem in stems.iter().flatten() {
        frames = frames.max(stem.frames());
        if rate.is_none() {
            rate = Some(stem.sample_rate);
        }
    }
    rate.map(|r| (frames, r))
}

/// Sum all stems with static fader gains only
///
/// No pan law, no effects, no automation. This is the "before" reference
/// against which the processed mix is judged.
pub fn build_flat_mix(stems: &[Option<StemBuffer>], tracks: &[Track]) -> Result<MixResult> {
    let started = Instant::now();
    let (frames, sample_rate) = mix_dimensions(stems).ok_or(MixError::NothingToMix)?;
    let mut mix = MixResult::silence(frames, sample_rate);

    for (stem, track) in stems.iter().zip(tracks) {
        let Some(stem) = stem else { continue };
        let gain = track.gain;
        let (left, right) = stem.channel_pair();
        for i in 0..stem.frames() {
            mix.left[i] += left[i] * gain;
            mix.right[i] += right[i] * gain;
        }
    }

    mix.limit_peak();
    debug!(
        "flat mix: {} frames @ {} Hz in {:?}",
        frames,
        sample_rate,
        started.elapsed()
    );
    Ok(mix)
}

/// Render the full processed mix
///
/// Runs each track through EQ, compression, reverb, automation, and pan,
/// honoring mute and solo. The token is checked between tracks and once
/// more before the result is handed back; a superseded render returns
/// `Ok(None)` with no partial output.
pub fn build_processed_mix(
    stems: &[Option<StemBuffer>],
    tracks: &[Track],
    token: &RenderToken,
) -> Result<Option<MixResult>> {
    let started = Instant::now();
    let (frames, sample_rate) = mix_dimensions(stems).ok_or(MixError::NothingToMix)?;
    let mut mix = MixResult::silence(frames, sample_rate);
    let audible = audibility(tracks);
    let t_scale = 1.0 / frames.saturating_sub(1).max(1) as f32;

    for (index, (stem, track)) in stems.iter().zip(tracks).enumerate() {
        if !token.is_current() {
            debug!("processed mix superseded at track {}", index);
            return Ok(None);
        }
        let Some(stem) = stem else { continue };

        let mut chain = TrackChain::new(track, sample_rate as f32, audible[index]);
        // A reverb tail rings past the stem's end, out to the mix length;
        // past the stem the chain pulls zeros
        let span = if track.reverb_on { frames } else { stem.frames() };
        for frame in 0..span {
            let t = frame as f32 * t_scale;
            let (l, r) = chain.process_frame(stem, frame, t);
            mix.left[frame] += l;
            mix.right[frame] += r;
        }
    }

    if !token.is_current() {
        debug!("processed mix superseded before commit");
        return Ok(None);
    }

    mix.limit_peak();
    info!(
        "processed mix: {} tracks, {} frames @ {} Hz in {:?}",
        tracks.len(),
        frames,
        sample_rate,
        started.elapsed()
    );
    Ok(Some(mix))
}

// ============================================================================
// Tests
// ============================================================================
