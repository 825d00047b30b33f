//! Document writes for Elasticsearch.

use async_trait::async_trait;
use elasticsearch::params::{Conflicts, Refresh};
use elasticsearch::{BulkOperation, BulkParts, DeleteByQueryParts, DeleteParts, IndexParts};
use serde_json::{Value, json};

use crate::core::{BulkOutcome, DocumentIndex};
use crate::documents::SearchableDocument;
use crate::error::{BackendError, IndexResult};

use super::client::ElasticsearchClient;

impl ElasticsearchClient {
    async fn put_document<T: SearchableDocument>(
        &self,
        index: &str,
        doc: &T,
        refresh: Refresh,
    ) -> IndexResult<()> {
        let id = doc.id().to_string();
        let response = self
            .client()
            .index(IndexParts::IndexId(index, &id))
            .refresh(refresh)
            .body(doc)
            .send()
            .await
            .map_err(|e| {
                BackendError::request_failed(index, &format!("Failed to index document {}", id), e)
            })?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::internal(
                index,
                format!("Failed to index document {} (status {}): {}", id, status, body),
            )
            .into());
        }

        tracing::trace!(index, id = %id, "Indexed document");
        Ok(())
    }

    async fn remove_document(&self, index: &str, id: i64, refresh: Refresh) -> IndexResult<()> {
        let doc_id = id.to_string();
        let response = self
            .client()
            .delete(DeleteParts::IndexId(index, &doc_id))
            .refresh(refresh)
            .send()
            .await
            .map_err(|e| {
                BackendError::request_failed(index, &format!("Failed to delete document {}", id), e)
            })?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            // Absent before, absent after.
            tracing::debug!(index, id, "Document to delete was not indexed");
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::internal(
                index,
                format!("Failed to delete document {} (status {}): {}", id, status, body),
            )
            .into());
        }

        Ok(())
    }

    /// Sends `docs` as bulk index requests of at most `bulk_batch_size`.
    async fn bulk_index<T: SearchableDocument>(
        &self,
        index: &str,
        docs: &[T],
    ) -> IndexResult<BulkOutcome> {
        let mut outcome = BulkOutcome::default();
        let batch_size = self.config().bulk_batch_size.max(1);

        for (batch_number, batch) in docs.chunks(batch_size).enumerate() {
            let operations: Vec<BulkOperation<&T>> = batch
                .iter()
                .map(|doc| BulkOperation::index(doc).id(doc.id().to_string()).into())
                .collect();

            let response = self
                .client()
                .bulk(BulkParts::Index(index))
                .body(operations)
                .send()
                .await
                .map_err(|e| {
                    BackendError::request_failed(index, "Bulk request failed", e)
                })?;

            let status = response.status_code();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(BackendError::internal(
                    index,
                    format!("Bulk request failed (status {}): {}", status, body),
                )
                .into());
            }

            let body = response.json::<Value>().await.map_err(|e| {
                BackendError::request_failed(index, "Failed to parse bulk response", e)
            })?;

            let batch_outcome = parse_bulk_response(&body, batch.len());
            tracing::debug!(
                index,
                batch = batch_number + 1,
                indexed = batch_outcome.indexed,
                failed = batch_outcome.failed,
                "Bulk batch written"
            );
            outcome.merge(batch_outcome);
        }

        if let Some(ref first_error) = outcome.first_error {
            tracing::warn!(
                index,
                failed = outcome.failed,
                first_error = %first_error,
                "Bulk index rejected documents"
            );
        }

        Ok(outcome)
    }

    /// Deletes every document with a match-all delete-by-query.
    async fn delete_all_documents(&self, index: &str) -> IndexResult<u64> {
        let response = self
            .client()
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .refresh(true)
            .conflicts(Conflicts::Proceed)
            .body(json!({ "query": { "match_all": {} } }))
            .send()
            .await
            .map_err(|e| {
                BackendError::request_failed(index, "Delete-by-query failed", e)
            })?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.contains("index_not_found_exception") {
                return Ok(0);
            }
            return Err(BackendError::internal(
                index,
                format!("Delete-by-query failed (status {}): {}", status, body),
            )
            .into());
        }

        let body = response.json::<Value>().await.map_err(|e| {
            BackendError::request_failed(index, "Failed to parse delete-by-query response", e)
        })?;

        let deleted = body.get("deleted").and_then(Value::as_u64).unwrap_or(0);
        tracing::debug!(index, deleted, "Deleted all documents");
        Ok(deleted)
    }
}

/// Counts accepted and rejected items of a bulk response.
fn parse_bulk_response(body: &Value, sent: usize) -> BulkOutcome {
    if body.get("errors").and_then(Value::as_bool) != Some(true) {
        return BulkOutcome {
            indexed: sent,
            failed: 0,
            first_error: None,
        };
    }

    let mut outcome = BulkOutcome::default();
    let items = body.get("items").and_then(Value::as_array);
    for item in items.into_iter().flatten() {
        let Some(result) = item.get("index") else {
            continue;
        };
        match result.get("error") {
            Some(error) => {
                outcome.failed += 1;
                if outcome.first_error.is_none() {
                    let id = result.get("_id").and_then(Value::as_str).unwrap_or("?");
                    let reason = error
                        .get("reason")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string());
                    outcome.first_error = Some(format!("document {}: {}", id, reason));
                }
            }
            None => outcome.indexed += 1,
        }
    }
    outcome
}

#[async_trait]
impl<T: SearchableDocument> DocumentIndex<T> for ElasticsearchClient {
    fn index_name(&self) -> String {
        self.index_for::<T>()
    }

    async fn ensure_index_exists(&self) -> bool {
        let index = self.index_for::<T>();
        self.ensure_index(&index).await
    }

    async fn index(&self, doc: &T) -> IndexResult<()> {
        let index = self.index_for::<T>();
        self.put_document(&index, doc, Refresh::False).await
    }

    async fn index_and_refresh(&self, doc: &T) -> IndexResult<()> {
        let index = self.index_for::<T>();
        self.put_document(&index, doc, Refresh::True).await
    }

    async fn index_many(&self, docs: &[T]) -> IndexResult<BulkOutcome> {
        if docs.is_empty() {
            return Ok(BulkOutcome::default());
        }
        let index = self.index_for::<T>();
        self.bulk_index(&index, docs).await
    }

    async fn index_and_refresh_many(&self, docs: &[T]) -> IndexResult<BulkOutcome> {
        if docs.is_empty() {
            return Ok(BulkOutcome::default());
        }
        let index = self.index_for::<T>();
        let outcome = self.bulk_index(&index, docs).await?;
        self.refresh_index(&index).await?;
        Ok(outcome)
    }

    async fn delete(&self, id: i64) -> IndexResult<()> {
        let index = self.index_for::<T>();
        self.remove_document(&index, id, Refresh::False).await
    }

    async fn delete_and_refresh(&self, id: i64) -> IndexResult<()> {
        let index = self.index_for::<T>();
        self.remove_document(&index, id, Refresh::True).await
    }

    async fn delete_all(&self) -> IndexResult<u64> {
        let index = self.index_for::<T>();
        self.delete_all_documents(&index).await
    }
}
