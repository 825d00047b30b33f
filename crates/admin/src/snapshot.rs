//! A read-only store of record backed by a JSON export.
//!
//! Operators export a table (with its relations loaded) as a JSON array and
//! rebuild an index from it without touching the live database.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use rfq_search::core::EntityRepository;
use rfq_search::documents::{Projection, SearchableDocument};
use rfq_search::error::RepositoryError;
use serde::de::DeserializeOwned;

/// Entities loaded from a JSON array, keyed by id.
#[derive(Debug, Clone)]
pub struct SnapshotRepository<E> {
    entity: &'static str,
    rows: BTreeMap<i64, E>,
}

impl<E> SnapshotRepository<E>
where
    E: Projection + Clone + DeserializeOwned,
{
    /// Parses a JSON array of entities. Later rows win on duplicate ids.
    pub fn from_json(entity: &'static str, json: &str) -> Result<Self, RepositoryError> {
        let entities: Vec<E> = serde_json::from_str(json).map_err(|e| RepositoryError::ReadFailed {
            entity,
            message: format!("invalid snapshot: {}", e),
            source: Some(Box::new(e)),
        })?;

        let rows = entities
            .into_iter()
            .map(|entity| (entity.project().id(), entity))
            .collect();

        Ok(Self { entity, rows })
    }

    /// Reads and parses a snapshot file.
    pub async fn load(entity: &'static str, path: &Path) -> Result<Self, RepositoryError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::ReadFailed {
                entity,
                message: format!("cannot read {}: {}", path.display(), e),
                source: Some(Box::new(e)),
            })?;
        Self::from_json(entity, &json)
    }

    /// Number of distinct entities in the snapshot.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Entity name the snapshot holds.
    pub fn entity(&self) -> &'static str {
        self.entity
    }
}

#[async_trait]
impl<E> EntityRepository<E> for SnapshotRepository<E>
where
    E: Clone + Send + Sync,
{
    async fn get_by_id(&self, id: i64) -> Result<Option<E>, RepositoryError> {
        Ok(self.rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<E>, RepositoryError> {
        Ok(self.rows.values().cloned().collect())
    }
}
