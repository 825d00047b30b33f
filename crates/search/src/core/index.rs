//! Index write trait.

use async_trait::async_trait;

use crate::documents::SearchableDocument;
use crate::error::IndexResult;

/// Result of a bulk write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Documents the engine accepted.
    pub indexed: usize,
    /// Documents the engine rejected.
    pub failed: usize,
    /// Reason given for the first rejected document.
    pub first_error: Option<String>,
}

impl BulkOutcome {
    /// Adds another batch's counts to this one.
    pub fn merge(&mut self, other: BulkOutcome) {
        self.indexed += other.indexed;
        self.failed += other.failed;
        if self.first_error.is_none() {
            self.first_error = other.first_error;
        }
    }

    /// Returns true if no document was rejected.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Write operations on the index holding documents of type `T`.
///
/// Plain writes are eventually consistent. The `*_and_refresh` variants
/// return only once the change is visible to search.
#[async_trait]
pub trait DocumentIndex<T: SearchableDocument>: Send + Sync {
    /// Returns the name of the backing index.
    fn index_name(&self) -> String;

    /// Creates the index if it is missing.
    ///
    /// Waits a bounded number of attempts for the engine to become available.
    /// Returns `false` instead of failing when the engine stays unavailable
    /// or creation fails.
    async fn ensure_index_exists(&self) -> bool;

    /// Upserts one document.
    async fn index(&self, doc: &T) -> IndexResult<()>;

    /// Upserts one document and waits until it is searchable.
    async fn index_and_refresh(&self, doc: &T) -> IndexResult<()>;

    /// Upserts many documents.
    async fn index_many(&self, docs: &[T]) -> IndexResult<BulkOutcome>;

    /// Upserts many documents and waits until they are searchable.
    async fn index_and_refresh_many(&self, docs: &[T]) -> IndexResult<BulkOutcome>;

    /// Removes one document. Removing an absent document succeeds.
    async fn delete(&self, id: i64) -> IndexResult<()>;

    /// Removes one document and waits until the removal is visible.
    async fn delete_and_refresh(&self, id: i64) -> IndexResult<()>;

    /// Removes every document and waits until the index reads empty.
    ///
    /// Returns the number of documents removed.
    async fn delete_all(&self) -> IndexResult<u64>;
}
