//! Full index rebuild from the store of record.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::core::{DocumentIndex, EntityRepository};
use crate::documents::Projection;
use crate::index_name::EntityKind;

use super::tracker::RebuildTracker;

/// Final state of a rebuild run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RebuildStatus {
    /// Cleared and refilled with every document accepted.
    Completed,
    /// Refilled, but the clear phase failed, some documents were rejected,
    /// or a deferred write could not be replayed.
    Partial,
    /// The refill phase failed.
    Failed,
    /// Another rebuild of the same entity type was already running.
    Skipped,
}

/// Machine-readable result of a rebuild, also emitted as a log record.
#[derive(Debug, Clone, Serialize)]
pub struct RebuildOutcome {
    /// Identifies this run in logs.
    pub run_id: Uuid,
    /// Entity type rebuilt.
    pub entity: EntityKind,
    /// Index rebuilt.
    pub index: String,
    /// Final state.
    pub status: RebuildStatus,
    /// Whether the clear phase removed the previous content.
    pub cleared: bool,
    /// Documents removed by the clear phase.
    pub deleted: u64,
    /// Entities read from the store.
    pub fetched: usize,
    /// Documents the engine accepted.
    pub indexed: usize,
    /// Documents the engine rejected.
    pub failed: usize,
    /// Deferred incremental writes replayed after the refill.
    pub replayed: usize,
    /// Wall time of the run.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Message of the last failure, if any.
    pub last_error: Option<String>,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl RebuildOutcome {
    fn new(entity: EntityKind, index: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            entity,
            index,
            status: RebuildStatus::Completed,
            cleared: false,
            deleted: 0,
            fetched: 0,
            indexed: 0,
            failed: 0,
            replayed: 0,
            duration: Duration::ZERO,
            last_error: None,
        }
    }

    fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Returns true if the run completed without any failure.
    pub fn is_success(&self) -> bool {
        self.status == RebuildStatus::Completed
    }

    fn log(&self) {
        let run_id = self.run_id.to_string();
        match self.status {
            RebuildStatus::Completed | RebuildStatus::Skipped => tracing::info!(
                run_id = %run_id,
                entity = self.entity.as_str(),
                index = %self.index,
                status = ?self.status,
                deleted = self.deleted,
                fetched = self.fetched,
                indexed = self.indexed,
                replayed = self.replayed,
                duration_ms = self.duration.as_millis() as u64,
                "Rebuild finished"
            ),
            RebuildStatus::Partial | RebuildStatus::Failed => tracing::error!(
                run_id = %run_id,
                entity = self.entity.as_str(),
                index = %self.index,
                status = ?self.status,
                cleared = self.cleared,
                deleted = self.deleted,
                fetched = self.fetched,
                indexed = self.indexed,
                failed = self.failed,
                replayed = self.replayed,
                duration_ms = self.duration.as_millis() as u64,
                last_error = self.last_error.as_deref().unwrap_or(""),
                "Rebuild finished with errors"
            ),
        }
    }
}

/// Clears and refills one entity type's index.
pub struct RebuildOrchestrator<E, I, R> {
    kind: EntityKind,
    index: Arc<I>,
    repository: Arc<R>,
    tracker: RebuildTracker,
    _entity: PhantomData<fn() -> E>,
}

impl<E, I, R> RebuildOrchestrator<E, I, R>
where
    E: Projection,
    I: DocumentIndex<E::Document>,
    R: EntityRepository<E>,
{
    /// Creates an orchestrator sharing `tracker` with the entity's
    /// incremental indexer.
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

    /// Runs the rebuild. Never fails; inspect the outcome instead.
    ///
    /// 1. Clear: ensure the index exists, then delete every document.
    /// 2. Refill: read every entity, project, bulk write with refresh.
    ///    Runs even if the clear phase failed.
    /// 3. Replay ids deferred by the incremental indexer during 1 and 2.
    pub async fn rebuild(&self) -> RebuildOutcome {
        let started = Instant::now();
        let mut outcome = RebuildOutcome::new(self.kind, self.index.index_name());

        let Some(guard) = self.tracker.begin() else {
            outcome.status = RebuildStatus::Skipped;
            outcome.record_error("a rebuild of this entity type is already running");
            outcome.log();
            return outcome;
        };

        tracing::info!(
            run_id = %outcome.run_id,
            entity = self.kind.as_str(),
            index = %outcome.index,
            "Rebuild started"
        );

        self.clear(&mut outcome).await;
        let refilled = self.refill(&mut outcome).await;
        let deferred = guard.finish();
        self.replay(&deferred, &mut outcome).await;

        outcome.duration = started.elapsed();
        outcome.status = if !refilled {
            RebuildStatus::Failed
        } else if !outcome.cleared || outcome.failed > 0 || outcome.last_error.is_some() {
            RebuildStatus::Partial
        } else {
            RebuildStatus::Completed
        };
        outcome.log();
        outcome
    }

    async fn clear(&self, outcome: &mut RebuildOutcome) {
        let ready = self.index.ensure_index_exists().await;
        if !ready {
            tracing::warn!(index = %outcome.index, "Index not ready, clearing anyway");
            outcome.record_error("index could not be created or engine unavailable");
        }

        match self.index.delete_all().await {
            Ok(deleted) => {
                outcome.deleted = deleted;
                outcome.cleared = ready;
                tracing::info!(index = %outcome.index, deleted, "Clear phase done");
            }
            Err(e) => {
                tracing::error!(index = %outcome.index, error = %e, "Clear phase failed");
                outcome.record_error(e.to_string());
            }
        }
    }

    async fn refill(&self, outcome: &mut RebuildOutcome) -> bool {
        let entities = match self.repository.get_all().await {
            Ok(entities) => entities,
            Err(e) => {
                tracing::error!(
                    entity = self.kind.as_str(),
                    error = %e,
                    "Refill phase failed to read the store"
                );
                outcome.record_error(e.to_string());
                return false;
            }
        };

        outcome.fetched = entities.len();
        if entities.is_empty() {
            tracing::info!(
                entity = self.kind.as_str(),
                index = %outcome.index,
                "No entities to index"
            );
            return true;
        }

        let documents: Vec<E::Document> = entities.iter().map(Projection::project).collect();

        match self.index.index_and_refresh_many(&documents).await {
            Ok(bulk) => {
                outcome.indexed = bulk.indexed;
                outcome.failed = bulk.failed;
                if let Some(first_error) = bulk.first_error {
                    outcome.record_error(first_error);
                }
                tracing::info!(
                    index = %outcome.index,
                    indexed = bulk.indexed,
                    failed = bulk.failed,
                    "Refill phase done"
                );
                true
            }
            Err(e) => {
                tracing::error!(index = %outcome.index, error = %e, "Refill phase failed");
                outcome.failed = documents.len();
                outcome.record_error(e.to_string());
                false
            }
        }
    }

    async fn replay(&self, ids: &[i64], outcome: &mut RebuildOutcome) {
        if ids.is_empty() {
            return;
        }
        tracing::debug!(index = %outcome.index, count = ids.len(), "Replaying deferred writes");

        for &id in ids {
            let result = match self.repository.get_by_id(id).await {
                Ok(Some(entity)) => self
                    .index
                    .index_and_refresh(&entity.project())
                    .await
                    .map_err(|e| e.to_string()),
                Ok(None) => self
                    .index
                    .delete_and_refresh(id)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match result {
                Ok(()) => outcome.replayed += 1,
                Err(e) => {
                    tracing::warn!(index = %outcome.index, id, error = %e, "Replay failed");
                    outcome.record_error(e);
                }
            }
        }
    }
}
