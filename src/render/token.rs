//! Render Generations
//!
//! Every edit bumps a shared generation counter; a render captures the
//! counter when it starts and checks it at safe points. A render whose
//! token has fallen behind abandons its work instead of committing a mix
//! built from stale parameters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared generation counter for one session
#[derive(Debug, Clone, Default)]
pub struct RenderGeneration {
    counter: Arc<AtomicU64>,
}

impl RenderGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render, superseding any token issued earlier
    pub fn begin(&self) -> RenderToken {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        RenderToken {
            counter: Arc::clone(&self.counter),
            id,
        }
    }

    /// The id the next `begin` call will issue, minus one
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

/// Capture of the generation counter at render start
#[derive(Debug, Clone)]
pub struct RenderToken {
    counter: Arc<AtomicU64>,
    id: u64,
}

impl RenderToken {
    /// Whether this render is still the newest one
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.id
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// Tests
// ============================================================================
