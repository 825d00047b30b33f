//! Rebuild-in-progress tracking for one entity type.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// Shared flag marking a running rebuild, plus the ids whose incremental
/// writes were deferred during it.
///
/// Clones share state. Give the orchestrator and the incremental indexer of
/// the same entity type clones of one tracker.
#[derive(Debug, Clone, Default)]
pub struct RebuildTracker {
    deferred: Arc<Mutex<Option<BTreeSet<i64>>>>,
}

impl RebuildTracker {
    /// Creates an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a rebuild as started.
    ///
    /// Returns `None` if one is already running. The rebuild ends when the
    /// returned guard is finished or dropped.
    pub fn begin(&self) -> Option<RebuildGuard> {
        let mut state = self.deferred.lock();
        if state.is_some() {
            return None;
        }
        *state = Some(BTreeSet::new());
        Some(RebuildGuard {
            tracker: self.clone(),
            finished: false,
        })
    }

    /// Records `id` for replay if a rebuild is running.
    ///
    /// Returns `false` when no rebuild is running and the caller should write
    /// directly.
    pub fn defer(&self, id: i64) -> bool {
        match self.deferred.lock().as_mut() {
            Some(ids) => {
                ids.insert(id);
                true
            }
            None => false,
        }
    }

    /// Returns true while a rebuild is running.
    pub fn is_rebuilding(&self) -> bool {
        self.deferred.lock().is_some()
    }

    fn end(&self) -> Vec<i64> {
        self.deferred
            .lock()
            .take()
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }
}

/// Marks a rebuild as running until finished or dropped.
#[derive(Debug)]
pub struct RebuildGuard {
    tracker: RebuildTracker,
    finished: bool,
}

impl RebuildGuard {
    /// Ends the rebuild and returns the deferred ids, in ascending order.
    ///
    /// Calls made after this point write directly again.
    pub fn finish(mut self) -> Vec<i64> {
        self.finished = true;
        self.tracker.end()
    }
}

impl Drop for RebuildGuard {
    fn drop(&mut self) {
        if !self.finished {
            let dropped = self.tracker.end();
            if !dropped.is_empty() {
                tracing::warn!(
                    deferred = dropped.len(),
                    "Rebuild ended without replaying deferred writes"
                );
            }
        }
    }
}
