//! Stale-result discard for overlapping invocations.
//!
//! Each pipeline run is stamped with a generation. When the user triggers a
//! new request before the previous one completes, the older stamp stops
//! being current and its snapshot must be dropped instead of rendered.

use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque stamp identifying one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Issues generations and tracks which one is current.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new invocation, superseding all earlier ones.
    pub fn next(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a snapshot stamped with `generation` may still be applied.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }
}
