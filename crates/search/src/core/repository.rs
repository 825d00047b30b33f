//! Read-only access to the store of record.

use async_trait::async_trait;

use crate::error::RepositoryError;

/// Authoritative reads of one entity type, with relations loaded.
#[async_trait]
pub trait EntityRepository<E>: Send + Sync {
    /// Loads one entity. `Ok(None)` means it no longer exists.
    async fn get_by_id(&self, id: i64) -> Result<Option<E>, RepositoryError>;

    /// Loads every entity of this type.
    async fn get_all(&self) -> Result<Vec<E>, RepositoryError>;
}
