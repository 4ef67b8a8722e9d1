//! Offline Rendering
//!
//! Mix builders, per-track chains, generation tokens for cancellation, and
//! the debounced rebuild scheduler.

pub mod chain;
pub mod pipeline;
pub mod scheduler;
pub mod token;

pub use chain::{audibility, TrackChain};
pub use pipeline::{build_flat_mix, build_processed_mix, mix_dimensions};
pub use scheduler::{RebuildScheduler, DEBOUNCE};
pub use token::{RenderGeneration, RenderToken};
