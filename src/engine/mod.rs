//! Audio Engine Module
//!
//! Core audio plumbing:
//! - Stem and mix buffer types
//! - WAV decoding and encoding
//! - Stem analysis
//! - Playback transport

pub mod analysis;
pub mod buffer;
pub mod decode;
pub mod transport;
pub mod wav;

pub use analysis::{analyze_stem, TrackAnalysis};
pub use buffer::{db_to_linear, linear_to_db, MixResult, StemBuffer, PEAK_CEILING};
pub use decode::{decode_stems, decode_wav_bytes, StemFile, MAX_PARALLEL_DECODES};
pub use transport::{Transport, TransportState};
pub use wav::encode_wav;
