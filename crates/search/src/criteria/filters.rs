//! Optional filter clause builders.
//!
//! Each builder returns `None` when its input is absent or empty, so a
//! criteria object can list one builder call per filterable field and the
//! query builder keeps only the `Some` clauses. Clauses are combined by
//! conjunction.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// `terms` on the document id.
pub fn ids(values: &[i64]) -> Option<Value> {
    terms("id", values)
}

/// Exact match of `field` against `value`.
pub fn term<V: Serialize>(field: &str, value: Option<V>) -> Option<Value> {
    let value = value?;
    Some(json!({ "term": { field: value } }))
}

/// Match of `field` against any of `values`.
pub fn terms<V: Serialize>(field: &str, values: &[V]) -> Option<Value> {
    match values {
        [] => None,
        [single] => Some(json!({ "term": { field: single } })),
        _ => Some(json!({ "terms": { field: values } })),
    }
}

/// Inclusive range on `field`. Either bound may be open.
pub fn range<V: Serialize>(field: &str, gte: Option<V>, lte: Option<V>) -> Option<Value> {
    if gte.is_none() && lte.is_none() {
        return None;
    }

    let mut bounds = Map::new();
    if let Some(gte) = gte {
        bounds.insert("gte".to_string(), json!(gte));
    }
    if let Some(lte) = lte {
        bounds.insert("lte".to_string(), json!(lte));
    }

    Some(json!({ "range": { field: Value::Object(bounds) } }))
}

/// Keeps the present clauses.
pub fn conjunction(clauses: Vec<Option<Value>>) -> Vec<Value> {
    clauses.into_iter().flatten().collect()
}
