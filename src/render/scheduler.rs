//! Rebuild Scheduler
//!
//! Debounces parameter edits into render requests. Each edit marks the
//! session dirty and restarts the quiet period; once edits stop for the
//! debounce window the next poll reports a rebuild as due. The scheduler
//! never renders anything itself, the session drives it by polling.

use std::time::{Duration, Instant};

/// Quiet period after the last edit before a rebuild fires
pub const DEBOUNCE: Duration = Duration::from_millis(1000);

/// Poll-driven debounce for mix rebuilds
#[derive(Debug, Clone)]
pub struct RebuildScheduler {
    debounce: Duration,
    dirty_at: Option<Instant>,
    immediate: bool,
}

impl Default for RebuildScheduler {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

impl RebuildScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            dirty_at: None,
            immediate: false,
        }
    }

    /// Record an edit, restarting the quiet period
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_at = Some(now);
    }

    /// Make the next poll fire regardless of the quiet period
    pub fn request_immediate(&mut self) {
        self.immediate = true;
    }

    /// Whether any edit is waiting on the quiet period
    pub fn is_dirty(&self) -> bool {
        self.immediate || self.dirty_at.is_some()
    }

    /// Poll: report and consume a due rebuild
    ///
    /// Returns `true` at most once per batch of edits.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.immediate {
            self.immediate = false;
            self.dirty_at = None;
            return true;
        }
        match self.dirty_at {
            Some(at) if now.duration_since(at) >= self.debounce => {
                self.dirty_at = None;
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
