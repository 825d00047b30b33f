//! Test doubles and fixtures shared by the indexing integration tests.
//!
//! [`InMemoryIndex`] and [`InMemoryRepository`] stand in for the engine and
//! the store of record, with switches to inject failures.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;

use rfq_search::core::{BulkOutcome, DocumentIndex, EntityRepository};
use rfq_search::documents::SearchableDocument;
use rfq_search::error::{BackendError, IndexResult, RepositoryError};
use rfq_search::model::{Category, Submission, SubmissionStatus, User, UserRole};

/// Pauses a bulk write until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// In-memory [`DocumentIndex`].
pub struct InMemoryIndex<T> {
    name: String,
    docs: Mutex<BTreeMap<i64, T>>,
    pub fail_ensure: AtomicBool,
    pub fail_delete_all: AtomicBool,
    pub fail_writes: AtomicBool,
    rejected_ids: Mutex<HashSet<i64>>,
    bulk_gate: Mutex<Option<Arc<Gate>>>,
    pub ensure_calls: AtomicUsize,
}

impl<T: SearchableDocument> InMemoryIndex<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            docs: Mutex::new(BTreeMap::new()),
            fail_ensure: AtomicBool::new(false),
            fail_delete_all: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            rejected_ids: Mutex::new(HashSet::new()),
            bulk_gate: Mutex::new(None),
            ensure_calls: AtomicUsize::new(0),
        }
    }

    /// Seeds documents without going through the trait.
    pub fn seed(&self, docs: impl IntoIterator<Item = T>) {
        let mut stored = self.docs.lock();
        for doc in docs {
            stored.insert(doc.id(), doc);
        }
    }

    pub fn reject(&self, id: i64) {
        self.rejected_ids.lock().insert(id);
    }

    pub fn pause_bulk(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.bulk_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn ids(&self) -> Vec<i64> {
        self.docs.lock().keys().copied().collect()
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.docs.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    fn check_writes(&self) -> IndexResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::internal(&self.name, "write refused").into());
        }
        Ok(())
    }

    fn write_many(&self, docs: &[T]) -> BulkOutcome {
        let rejected = self.rejected_ids.lock().clone();
        let mut stored = self.docs.lock();
        let mut outcome = BulkOutcome::default();
        for doc in docs {
            if rejected.contains(&doc.id()) {
                outcome.failed += 1;
                if outcome.first_error.is_none() {
                    outcome.first_error = Some(format!("document {}: rejected", doc.id()));
                }
            } else {
                stored.insert(doc.id(), doc.clone());
                outcome.indexed += 1;
            }
        }
        outcome
    }
}

#[async_trait]
impl<T: SearchableDocument> DocumentIndex<T> for InMemoryIndex<T> {
    fn index_name(&self) -> String {
        self.name.clone()
    }

    async fn ensure_index_exists(&self) -> bool {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        !self.fail_ensure.load(Ordering::SeqCst)
    }

    async fn index(&self, doc: &T) -> IndexResult<()> {
        self.index_and_refresh(doc).await
    }

    async fn index_and_refresh(&self, doc: &T) -> IndexResult<()> {
        self.check_writes()?;
        self.docs.lock().insert(doc.id(), doc.clone());
        Ok(())
    }

    async fn index_many(&self, docs: &[T]) -> IndexResult<BulkOutcome> {
        self.index_and_refresh_many(docs).await
    }

    async fn index_and_refresh_many(&self, docs: &[T]) -> IndexResult<BulkOutcome> {
        let gate = self.bulk_gate.lock().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.check_writes()?;
        Ok(self.write_many(docs))
    }

    async fn delete(&self, id: i64) -> IndexResult<()> {
        self.delete_and_refresh(id).await
    }

    async fn delete_and_refresh(&self, id: i64) -> IndexResult<()> {
        self.check_writes()?;
        self.docs.lock().remove(&id);
        Ok(())
    }

    async fn delete_all(&self) -> IndexResult<u64> {
        if self.fail_delete_all.load(Ordering::SeqCst) {
            return Err(BackendError::internal(&self.name, "delete-by-query timed out").into());
        }
        let mut stored = self.docs.lock();
        let deleted = stored.len() as u64;
        stored.clear();
        Ok(deleted)
    }
}

/// In-memory [`EntityRepository`] keyed by id.
pub struct InMemoryRepository<E> {
    rows: Mutex<BTreeMap<i64, E>>,
    pub fail_reads: AtomicBool,
}

impl<E: Clone + Send + Sync> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, id: i64, entity: E) {
        self.rows.lock().insert(id, entity);
    }

    pub fn remove(&self, id: i64) {
        self.rows.lock().remove(&id);
    }

    fn check_reads(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::read_failed("entity", "connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Clone + Send + Sync> EntityRepository<E> for InMemoryRepository<E> {
    async fn get_by_id(&self, id: i64) -> Result<Option<E>, RepositoryError> {
        self.check_reads()?;
        Ok(self.rows.lock().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<E>, RepositoryError> {
        self.check_reads()?;
        Ok(self.rows.lock().values().cloned().collect())
    }
}

pub fn customer(id: i64, first_name: &str, last_name: &str) -> User {
    User {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        company_name: None,
        role: UserRole::Customer,
        categories: vec![],
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn category(id: i64) -> Category {
    let name = match id {
        1 => "Roofing",
        2 => "Repairs",
        3 => "Plumbing",
        _ => "Other",
    };
    Category {
        id,
        name: name.to_string(),
    }
}

pub fn submission(id: i64, title: &str, description: &str, categories: &[i64]) -> Submission {
    let created_at =
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(id);
    Submission {
        id,
        title: title.to_string(),
        description: description.to_string(),
        status: SubmissionStatus::Open,
        categories: categories.iter().copied().map(category).collect(),
        owner: customer(7, "Grace", "Hopper"),
        budget: Some(100.0 * id as f64),
        deadline: None,
        quotes_count: 0,
        created_at,
        updated_at: created_at,
    }
}
