//! Latest-snapshot publication point.
//!
//! Producers rebuild a whole [`Snapshot`] per ground-truth message and swap
//! it in; readers grab an `Arc` and query it without holding the lock.
//! A published snapshot is never mutated.

use std::sync::Arc;

use parking_lot::RwLock;

use super::Snapshot;

/// Holds the most recently published snapshot.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot, returning the previous one.
    pub fn publish(&self, snapshot: Snapshot) -> Option<Arc<Snapshot>> {
        let next = Arc::new(snapshot);
        tracing::debug!(
            lanes = next.network().len(),
            violations = next.violations().len(),
            "snapshot published"
        );
        self.current.write().replace(next)
    }

    /// The latest snapshot, if any has been published.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    /// Drop the current snapshot.
    pub fn clear(&self) -> Option<Arc<Snapshot>> {
        self.current.write().take()
    }
}
