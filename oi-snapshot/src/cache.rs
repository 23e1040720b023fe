//! Latest-snapshot cache.
//!
//! A single slot holding the most recent [`Snapshot`]. The poller replaces it
//! after each successful cycle; any number of readers can look at it
//! concurrently.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::fetcher::Snapshot;

type Slot = Arc<RwLock<Option<Arc<Snapshot>>>>;

/// Writable handle to the snapshot slot. Owned by the poller.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCache {
    slot: Slot,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent snapshot, or `None` if no cycle has succeeded yet.
    pub fn get_latest(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().clone()
    }

    /// Replace the held snapshot in one step.
    pub(crate) fn store(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.slot.write() = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// A read-only view sharing the same slot.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Read-only view of the snapshot slot, handed to the API layer.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Slot,
}

impl SnapshotReader {
    pub fn get_latest(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().clone()
    }
}
