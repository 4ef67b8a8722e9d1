//! WAV Encoding
//!
//! Hand-rolled 16-bit PCM stereo encoder. The 44-byte RIFF header layout is
//! the externally visible contract for exported mixes, so it is written
//! explicitly rather than through a writer library.

use crate::engine::buffer::MixResult;

const HEADER_LEN: usize = 44;
const BYTES_PER_SAMPLE: usize = 2;
const CHANNELS: usize = 2;

/// Encode a stereo mix as a complete WAV file (PCM 16-bit little-endian)
///
/// Every sample is clamped to [-1, 1] before quantization; positive values
/// scale by 0x7FFF and negative by 0x8000 so both rails map to full scale.
pub fn encode_wav(mix: &MixResult) -> Vec<u8> {
    let frames = mix.frames();
    let data_len = frames * CHANNELS * BYTES_PER_SAMPLE;
    let mut out = Vec::with_capacity(HEADER_LEN + data_len);

    let byte_rate = mix.sample_rate * (CHANNELS * BYTES_PER_SAMPLE) as u32;
    let block_align = (CHANNELS * BYTES_PER_SAMPLE) as u16;

    // RIFF chunk
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((HEADER_LEN - 8 + data_len) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt sub-chunk: PCM, stereo, 16-bit
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&(CHANNELS as u16).to_le_bytes());
    out.extend_from_slice(&mix.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());

    // data sub-chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());

    for i in 0..frames {
        out.extend_from_slice(&quantize(mix.left[i]).to_le_bytes());
        out.extend_from_slice(&quantize(mix.right[i]).to_le_bytes());
    }

    out
}

#[inline]
fn quantize(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped >= 0.0 {
        (clamped * 0x7FFF as f32) as i16
    } else {
        (clamped * 0x8000 as f32) as i16
    }
}

// ============================================================================
// Tests
// ============================================================================
