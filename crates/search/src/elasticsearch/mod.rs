//! Elasticsearch implementation of the search and indexing layer.
//!
//! [`ElasticsearchClient`] is a stateless gateway over one cluster. It
//! implements [`DocumentIndex`](crate::core::DocumentIndex) for every
//! searchable document type and exposes a generic
//! [`search`](ElasticsearchClient::search) driven by
//! [`SearchCriteria`](crate::criteria::SearchCriteria).
//!
//! # Index layout
//!
//! One index per document type, named by the
//! [`IndexNameResolver`](crate::index_name::IndexNameResolver). Mappings are
//! derived dynamically from the first document written: every string becomes
//! `text` with a `keyword` sub-field (used for sorting), id fields become
//! `long`.
//!
//! # Consistency
//!
//! Plain writes become visible after the index refresh interval. The
//! `*_and_refresh` operations pass `refresh=true` (or refresh the index after
//! a bulk load) so a search issued right afterward observes the write.

mod client;
mod lifecycle;
mod query_builder;
mod schema;
mod search_impl;
mod storage;

pub use client::ElasticsearchClient;
pub use query_builder::{EsQuery, build_query, escape_wildcard};
pub use schema::{KEYWORD_IGNORE_ABOVE, create_index_body};
