//! Criteria-driven search.

use elasticsearch::SearchParts;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::criteria::SearchCriteria;
use crate::error::{IndexError, IndexResult};
use crate::types::{Page, Paging};

use super::client::ElasticsearchClient;
use super::query_builder::build_query;

impl ElasticsearchClient {
    /// Runs `criteria` against its document index and returns one page.
    ///
    /// Pages past `max_result_window` come back without items but with the
    /// full `total_count`. Engine failures (unreachable cluster, missing
    /// index, rejected query) are logged and produce an empty page, so
    /// browsing never fails because the index is unhealthy. A hit whose
    /// source does not decode as the document type is an
    /// [`IndexError::Serialization`].
    pub async fn search<C: SearchCriteria>(
        &self,
        criteria: &C,
    ) -> IndexResult<Page<C::Document>> {
        let index = self.index_for::<C::Document>();
        let query = build_query(criteria, self.config());
        let paging = query.paging;

        tracing::debug!(index = %index, query = %query.body, "Executing search");

        let response = match self
            .client()
            .search(SearchParts::Index(&[&index]))
            .body(query.body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(index = %index, error = %e, "Search request failed");
                return Ok(Page::empty(paging));
            }
        };

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                index = %index,
                status = status.as_u16(),
                body = %body,
                "Search returned an error status"
            );
            return Ok(Page::empty(paging));
        }

        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(index = %index, error = %e, "Failed to read search response");
                return Ok(Page::empty(paging));
            }
        };

        parse_search_response(&body, paging)
    }
}

/// Extracts documents and the total hit count from a search response.
fn parse_search_response<T: DeserializeOwned>(
    body: &Value,
    paging: Paging,
) -> IndexResult<Page<T>> {
    let hits = body.get("hits");

    let total_count = hits
        .and_then(|h| h.get("total"))
        .and_then(|t| t.get("value").or(Some(t)))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let mut items = Vec::new();
    let hit_list = hits.and_then(|h| h.get("hits")).and_then(Value::as_array);
    for hit in hit_list.into_iter().flatten() {
        let Some(source) = hit.get("_source") else {
            continue;
        };
        let doc = serde_json::from_value::<T>(source.clone()).map_err(|e| {
            IndexError::Serialization {
                message: format!(
                    "Failed to decode hit {}: {}",
                    hit.get("_id").and_then(Value::as_str).unwrap_or("?"),
                    e
                ),
            }
        })?;
        items.push(doc);
    }

    Ok(Page {
        items,
        total_count,
        page_number: paging.page_number,
        page_size: paging.page_size,
    })
}
