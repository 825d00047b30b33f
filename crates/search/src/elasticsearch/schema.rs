//! Index settings and mapping templates.

use elasticsearch::indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts};
use serde_json::{Value, json};

use crate::config::SearchConfig;
use crate::error::BackendError;

use super::client::ElasticsearchClient;

/// Longest string, in characters, that still gets a `keyword` value.
///
/// Lucene caps a keyword term at 32766 bytes; 8191 four-byte characters
/// stay under it. Strings without a keyword value would fall out of
/// lexical sorting.
pub const KEYWORD_IGNORE_ABOVE: u32 = 8191;

/// Builds the create-index body for a document index.
///
/// Document shapes differ per entity, so fields are mapped by dynamic
/// templates instead of explicit properties:
/// - `id` and `*Id` fields: `long`
/// - floating point numbers: `double`
/// - strings: analyzed `text` with an untokenized `keyword` sub-field
///
/// RFC 3339 timestamps are picked up by date detection before the string
/// template applies.
pub fn create_index_body(config: &SearchConfig) -> Value {
    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
            "number_of_replicas": config.number_of_replicas,
            "index.max_result_window": config.max_result_window,
            "refresh_interval": config.refresh_interval
        },
        "mappings": {
            "date_detection": true,
            "dynamic_templates": [
                {
                    "ids": {
                        "match_mapping_type": "long",
                        "match": "*Id",
                        "mapping": { "type": "long" }
                    }
                },
                {
                    "doubles": {
                        "match_mapping_type": "double",
                        "mapping": { "type": "double" }
                    }
                },
                {
                    "strings": {
                        "match_mapping_type": "string",
                        "mapping": {
                            "type": "text",
                            "fields": {
                                "keyword": {
                                    "type": "keyword",
                                    "ignore_above": KEYWORD_IGNORE_ABOVE
                                }
                            }
                        }
                    }
                }
            ],
            "properties": {
                "id": { "type": "long" }
            }
        }
    })
}

impl ElasticsearchClient {
    /// Returns whether the index exists.
    pub async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        let response = self
            .client()
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| {
                BackendError::request_failed(index, "Failed to check index existence", e)
            })?;

        Ok(response.status_code().is_success())
    }

    /// Creates the index with [`create_index_body`].
    ///
    /// An index created concurrently by someone else counts as success.
    pub async fn create_index(&self, index: &str) -> Result<(), BackendError> {
        let body = create_index_body(self.config());

        let response = self
            .client()
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::request_failed(index, "Failed to create index", e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.contains("resource_already_exists_exception") {
                tracing::debug!(index, "Index was created concurrently");
                return Ok(());
            }
            return Err(BackendError::internal(
                index,
                format!("Failed to create index (status {}): {}", status, body),
            ));
        }

        tracing::info!(index, "Created Elasticsearch index");
        Ok(())
    }

    /// Deletes the index. A missing index is not an error.
    pub async fn delete_index(&self, index: &str) -> Result<(), BackendError> {
        let response = self
            .client()
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| BackendError::request_failed(index, "Failed to delete index", e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if !body.contains("index_not_found_exception") {
                return Err(BackendError::internal(
                    index,
                    format!("Failed to delete index (status {}): {}", status, body),
                ));
            }
        }

        tracing::debug!(index, "Deleted Elasticsearch index");
        Ok(())
    }
}
