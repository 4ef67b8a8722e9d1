//! Session Model
//!
//! Tracks, automation curves, role inference, genre presets, and the
//! change-list format. Everything here is parameter state; the engine and
//! render layers consume it but never mutate it.

pub mod automation;
pub mod changes;
pub mod presets;
pub mod roles;
pub mod track;

pub use automation::{add_point, interpolate, mirror_endpoints, Automation, Breakpoint};
pub use changes::{apply_to, CompPatch, EqPatch, LevelPoint, ReverbPatch, TrackChange};
pub use presets::{apply_preset, Genre};
pub use roles::{infer_role, Role};
pub use track::{Track, DEFAULT_GAIN, GAIN_MAX, GAIN_MIN};
