//! Playback Transport
//!
//! Tracks the shared playhead for live preview. Position derives from the
//! start offset plus frames actually rendered, so it never drifts from the
//! audio the host has pulled.

use std::fmt;

use log::debug;

/// Playback states for the live graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Not playing (default state)
    #[default]
    Stopped,
    /// Blocks are being pulled
    Playing,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Stopped => write!(f, "Stopped"),
            TransportState::Playing => write!(f, "Playing"),
        }
    }
}

/// Shared playhead for all live sources
#[derive(Debug, Clone)]
pub struct Transport {
    state: TransportState,
    /// Timeline offset playback started from, in seconds
    offset_secs: f64,
    /// Frames rendered since playback started
    rendered_frames: u64,
    sample_rate: u32,
}

impl Transport {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            state: TransportState::Stopped,
            offset_secs: 0.0,
            rendered_frames: 0,
            sample_rate,
        }
    }

    /// Begin playback at `offset_secs`, clamped into `[0, duration_secs]`
    pub fn start(&mut self, offset_secs: f64, duration_secs: f64) {
        self.offset_secs = offset_secs.clamp(0.0, duration_secs.max(0.0));
        self.rendered_frames = 0;
        self.state = TransportState::Playing;
        debug!("transport: play from {:.3}s", self.offset_secs);
    }

    /// Stop playback and reset the offset to the start
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.offset_secs = 0.0;
        self.rendered_frames = 0;
        debug!("transport: stopped");
    }

    /// Account for frames the host pulled; no-op when stopped
    pub fn advance(&mut self, frames: u64) {
        if self.state == TransportState::Playing {
            self.rendered_frames += frames;
        }
    }

    /// Current timeline position in seconds
    ///
    /// While playing this is offset plus rendered audio; when stopped it is
    /// the stored offset.
    pub fn position_secs(&self) -> f64 {
        match self.state {
            TransportState::Playing => {
                self.offset_secs + self.rendered_frames as f64 / self.sample_rate as f64
            }
            TransportState::Stopped => self.offset_secs,
        }
    }

    /// Frame index in the timeline corresponding to the current position
    pub fn position_frames(&self) -> u64 {
        (self.offset_secs * self.sample_rate as f64) as u64 + self.rendered_frames
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stopped_at_zero() {
        let transport = Transport::new(44100);
        assert!(!transport.is_playing());
        assert_eq!(transport.position_secs(), 0.0);
    }

    #[test]
    fn test_position_tracks_rendered_frames() {
        let mut transport = Transport::new(44100);
        transport.start(1.0, 10.0);
        transport.advance(44100);
        assert!((transport.position_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_start_clamps_offset_into_timeline() {
        let mut transport = Transport::new(44100);
        transport.start(25.0, 10.0);
        assert_eq!(transport.position_secs(), 10.0);

        transport.start(-3.0, 10.0);
        assert_eq!(transport.position_secs(), 0.0);
    }

    #[test]
    fn test_stop_resets_to_start() {
        let mut transport = Transport::new(44100);
        transport.start(2.0, 10.0);
        transport.advance(22050);
        transport.stop();
        assert!(!transport.is_playing());
        assert_eq!(transport.position_secs(), 0.0);
    }

    #[test]
    fn test_advance_while_stopped_is_noop() {
        let mut transport = Transport::new(44100);
        transport.advance(44100);
        assert_eq!(transport.position_secs(), 0.0);
    }

    #[test]
    fn test_position_frames() {
        let mut transport = Transport::new(48000);
        transport.start(0.5, 10.0);
        transport.advance(1200);
        assert_eq!(transport.position_frames(), 24000 + 1200);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", TransportState::Stopped), "Stopped");
        assert_eq!(format!("{}", TransportState::Playing), "Playing");
    }
}
