//! Stemmix - Multi-Stem Mixing Engine
//!
//! Decodes a set of stem WAVs, runs each through a per-track chain of EQ,
//! compression, and plate reverb with breakpoint automation, and renders
//! flat, processed, and mastered stereo mixes. A debounced scheduler and
//! generation-token cancellation keep background rebuilds coherent while
//! the track model is being edited, and a live graph previews the mix in
//! pull-based blocks.
//!
//! # Layers
//!
//! - [`engine`]: decoding, buffers, analysis, transport, WAV encoding
//! - [`dsp`]: the stereo frame processors
//! - [`model`]: tracks, automation, roles, presets, change lists
//! - [`render`]: offline mix builders, tokens, the rebuild scheduler
//! - [`live`]: the block-pull preview graph
//! - [`master`]: the bus compressor and normalization pass
//! - [`session`]: the top-level object tying it all together

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod live;
pub mod master;
pub mod model;
pub mod render;
pub mod session;

pub use error::{MixError, Result};
pub use session::Session;
