//! Stem Decoding
//!
//! Decodes uploaded WAV bytes into [`StemBuffer`]s. Batches run with bounded
//! concurrency; a stem that fails to decode leaves a hole in the batch rather
//! than failing it.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::{debug, warn};

use crate::engine::buffer::StemBuffer;
use crate::error::{MixError, Result};

/// Maximum number of decodes in flight at once
pub const MAX_PARALLEL_DECODES: usize = 6;

/// An uploaded stem: display name plus the raw file bytes
#[derive(Debug, Clone)]
pub struct StemFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl StemFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Read a stem from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MixError::FileNotFound {
                path: path.display().to_string(),
                source: None,
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let data = std::fs::read(path)?;
        Ok(Self { name, data })
    }
}

/// Decode a batch of stems, at most [`MAX_PARALLEL_DECODES`] at a time
///
/// The result has one slot per input file, in input order. A slot is `None`
/// when that file failed to decode; callers decide whether an all-`None`
/// batch is fatal.
pub fn decode_stems(files: &[StemFile]) -> Vec<Option<StemBuffer>> {
    let mut decoded: Vec<Option<StemBuffer>> = Vec::with_capacity(files.len());

    for chunk in files.chunks(MAX_PARALLEL_DECODES) {
        let results: Vec<Option<StemBuffer>> = std::thread::scope(|scope| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|file| scope.spawn(move || decode_wav_bytes(&file.name, &file.data)))
                .collect();

            handles
                .into_iter()
                .zip(chunk.iter())
                .map(|(handle, file)| match handle.join() {
                    Ok(Ok(stem)) => {
                        debug!(
                            "decoded '{}': {} frames, {} ch, {} Hz",
                            file.name,
                            stem.frames(),
                            stem.channels(),
                            stem.sample_rate
                        );
                        Some(stem)
                    }
                    Ok(Err(e)) => {
                        warn!("skipping '{}': {}", file.name, e);
                        None
                    }
                    Err(_) => {
                        warn!("skipping '{}': decode worker panicked", file.name);
                        None
                    }
                })
                .collect()
        });
        decoded.extend(results);
    }

    decoded
}

/// Decode one WAV file from memory
pub fn decode_wav_bytes(name: &str, data: &[u8]) -> Result<StemBuffer> {
    let reader = WavReader::new(Cursor::new(data)).map_err(|e| MixError::DecodeFailed {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 || channels > 2 {
        return Err(MixError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    let interleaved = read_samples_as_f32(name, reader, spec.bits_per_sample, spec.sample_format)?;
    if interleaved.is_empty() {
        return Err(MixError::DecodeFailed {
            name: name.to_string(),
            reason: "file contains no samples".to_string(),
        });
    }

    let frames = interleaved.len() / channels;
    let mut samples = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            samples[ch].push(sample);
        }
    }

    Ok(StemBuffer {
        samples,
        sample_rate: spec.sample_rate,
    })
}

fn read_samples_as_f32<R: std::io::Read>(
    name: &str,
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let decode_err = |e: hound::Error| MixError::DecodeFailed {
        name: name.to_string(),
        reason: e.to_string(),
    };

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(decode_err),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err),
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err),
            other => Err(MixError::UnsupportedFormat {
                format: format!("{}-bit integer audio", other),
            }),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
