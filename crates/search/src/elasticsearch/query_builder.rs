//! Translates criteria into Elasticsearch query bodies.

use serde_json::{Map, Value, json};

use crate::config::SearchConfig;
use crate::criteria::{SearchCriteria, SortField, Sorting, filters};
use crate::types::Paging;

/// A search request ready to send.
#[derive(Debug, Clone)]
pub struct EsQuery {
    /// The request body.
    pub body: Value,
    /// Paging after normalization, echoed back in the page result.
    pub paging: Paging,
}

/// Builds the search body for `criteria`.
///
/// Every clause goes into `bool.filter`, so matching is conjunctive and
/// unscored: the free-text clause (when a query is present) plus one clause
/// per present filter. Results are ordered by the requested sort with `id`
/// as tie-breaker, or by `id` ascending when no sort is requested.
///
/// The requested hits are kept inside `max_result_window`: a page straddling
/// the window is cut short, and a page wholly past it becomes a count-only
/// request, so the engine still reports the full `totalCount`.
pub fn build_query<C: SearchCriteria>(criteria: &C, config: &SearchConfig) -> EsQuery {
    let paging = criteria
        .paging()
        .normalize(config.default_page_size, config.max_page_size);
    let (from, size) = result_window(paging, config.max_result_window);

    let mut filter_clauses = Vec::new();
    if let Some(text) = criteria.text() {
        filter_clauses.push(text_clause(text, C::text_fields()));
    }
    filter_clauses.extend(filters::conjunction(criteria.filters()));

    let query = if filter_clauses.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "filter": filter_clauses } })
    };

    let body = json!({
        "query": query,
        "from": from,
        "size": size,
        "track_total_hits": true,
        "sort": sort_clauses(criteria.sorting()),
    });

    EsQuery { body, paging }
}

/// Returns `(from, size)` for `paging`, bounded so `from + size` never
/// exceeds `max_result_window`.
fn result_window(paging: Paging, max_result_window: u32) -> (u64, u64) {
    let window = u64::from(max_result_window);
    let offset = paging.offset();
    if offset >= window {
        tracing::debug!(
            page_number = paging.page_number,
            page_size = paging.page_size,
            max_result_window,
            "Page lies past the result window, counting only"
        );
        return (0, 0);
    }
    (offset, u64::from(paging.page_size).min(window - offset))
}

/// Full-text match OR a case-insensitive "contains" wildcard on any field.
fn text_clause(text: &str, fields: &[&str]) -> Value {
    let pattern = format!("*{}*", escape_wildcard(text));

    let mut should = vec![json!({
        "multi_match": {
            "query": text,
            "fields": fields,
        }
    })];
    for field in fields {
        should.push(json!({
            "wildcard": {
                *field: {
                    "value": pattern,
                    "case_insensitive": true
                }
            }
        }));
    }

    json!({
        "bool": {
            "should": should,
            "minimum_should_match": 1
        }
    })
}

/// Escapes the wildcard metacharacters `\`, `*` and `?`.
pub fn escape_wildcard(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '?') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn sort_clauses<F: SortField>(sorting: Option<Sorting<F>>) -> Value {
    let tie_breaker = json!({ "id": { "order": "asc" } });

    let Some(sorting) = sorting else {
        return json!([tie_breaker]);
    };

    let property = sorting.field.property();
    if property.path == "id" {
        return json!([{ "id": { "order": sorting.order.as_str() } }]);
    }

    let mut options = Map::new();
    options.insert("order".to_string(), json!(sorting.order.as_str()));
    options.insert(
        "unmapped_type".to_string(),
        json!(if property.textual { "keyword" } else { "long" }),
    );
    options.insert("missing".to_string(), json!("_last"));

    let mut clause = Map::new();
    clause.insert(property.sort_key(), Value::Object(options));

    json!([Value::Object(clause), tie_breaker])
}
