//! Single-entity reindexing after a store write.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::{DocumentIndex, EntityRepository};
use crate::documents::Projection;
use crate::index_name::EntityKind;

use super::tracker::RebuildTracker;

/// What an incremental call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The entity was projected and upserted.
    Indexed,
    /// The document was removed.
    Removed,
    /// The entity no longer exists in the store; nothing was written.
    Missing,
    /// A rebuild is running; the id will be replayed when it finishes.
    Deferred,
    /// The store read or the engine write failed.
    Failed(String),
}

impl IndexOutcome {
    /// Returns true unless the call failed.
    pub fn is_ok(&self) -> bool {
        !matches!(self, IndexOutcome::Failed(_))
    }
}

impl fmt::Display for IndexOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexOutcome::Indexed => write!(f, "indexed"),
            IndexOutcome::Removed => write!(f, "removed"),
            IndexOutcome::Missing => write!(f, "missing"),
            IndexOutcome::Deferred => write!(f, "deferred"),
            IndexOutcome::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Keeps one entity type's index current after individual writes.
///
/// Called by the write path with the id of an entity that was just created,
/// updated or deleted. Never returns an error: a failed update is logged and
/// stays stale until the next rebuild.
pub struct IncrementalIndexer<E, I, R> {
    kind: EntityKind,
    index: Arc<I>,
    repository: Arc<R>,
    tracker: RebuildTracker,
    _entity: PhantomData<fn() -> E>,
}

impl<E, I, R> IncrementalIndexer<E, I, R>
where
    E: Projection,
    I: DocumentIndex<E::Document>,
    R: EntityRepository<E>,
{
    /// Creates an indexer sharing `tracker` with the entity's orchestrator.
    pub fn new(
        kind: EntityKind,
        index: Arc<I>,
        repository: Arc<R>,
        tracker: RebuildTracker,
    ) -> Self {
        Self {
            kind,
            index,
            repository,
            tracker,
            _entity: PhantomData,
        }
    }

    /// Re-projects entity `id` and upserts it with read-after-write visibility.
    pub async fn index_entity(&self, id: i64) -> IndexOutcome {
        let entity = self.kind.as_str();

        if self.tracker.defer(id) {
            tracing::debug!(entity, id, "Rebuild running, deferring index update");
            return IndexOutcome::Deferred;
        }

        let loaded = match self.repository.get_by_id(id).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(entity, id, error = %e, "Failed to load entity for indexing");
                return IndexOutcome::Failed(e.to_string());
            }
        };

        let Some(loaded) = loaded else {
            tracing::info!(entity, id, "Entity no longer exists, skipping index update");
            return IndexOutcome::Missing;
        };

        let document = loaded.project();
        match self.index.index_and_refresh(&document).await {
            Ok(()) => {
                tracing::debug!(entity, id, index = %self.index.index_name(), "Indexed entity");
                IndexOutcome::Indexed
            }
            Err(e) => {
                tracing::error!(
                    entity,
                    id,
                    index = %self.index.index_name(),
                    error = %e,
                    "Failed to index entity"
                );
                IndexOutcome::Failed(e.to_string())
            }
        }
    }

    /// Removes entity `id` from the index after it was deleted from the store.
    pub async fn remove_entity(&self, id: i64) -> IndexOutcome {
        let entity = self.kind.as_str();

        if self.tracker.defer(id) {
            tracing::debug!(entity, id, "Rebuild running, deferring index removal");
            return IndexOutcome::Deferred;
        }

        match self.index.delete_and_refresh(id).await {
            Ok(()) => {
                tracing::debug!(entity, id, "Removed entity from index");
                IndexOutcome::Removed
            }
            Err(e) => {
                tracing::error!(entity, id, error = %e, "Failed to remove entity from index");
                IndexOutcome::Failed(e.to_string())
            }
        }
    }
}
