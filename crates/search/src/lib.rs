//! RFQ Marketplace Search and Indexing Layer
//!
//! This crate keeps a search engine in step with the marketplace's relational
//! store and serves criteria-driven, paginated queries over it. Five entities
//! are projected into flat searchable documents: users, submissions (requests
//! for quote), submission quotes, quote messages and notifications.
//!
//! # Architecture
//!
//! - [`documents`] - Searchable document contracts and the entity projections
//! - [`index_name`] - Document type to index name resolution
//! - [`criteria`] - Per-entity filters, paging and typed sorting
//! - [`core`] - The [`DocumentIndex`] and [`EntityRepository`] seams
//! - [`elasticsearch`] - Engine client: writes, search, index lifecycle
//! - [`indexing`] - Rebuild orchestrator and incremental indexer
//! - [`model`] - Domain entities as returned by the store of record
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rfq_search::config::SearchConfig;
//! use rfq_search::criteria::{SortOrder, SubmissionCriteria, SubmissionSortField, Sorting};
//! use rfq_search::elasticsearch::ElasticsearchClient;
//!
//! # async fn example() -> Result<(), rfq_search::IndexError> {
//! let client = ElasticsearchClient::new(SearchConfig::default())?;
//!
//! let criteria = SubmissionCriteria {
//!     query: Some("roof".to_string()),
//!     category_ids: vec![1],
//!     sorting: Some(Sorting::new(SubmissionSortField::CreatedAt, SortOrder::Desc)),
//!     ..Default::default()
//! };
//!
//! let page = client.search(&criteria).await?;
//! println!("{} of {} submissions", page.items.len(), page.total_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Failure model
//!
//! Rebuilds and incremental updates never fail their caller; they return an
//! outcome and log it. Searches degrade to an empty page when the engine is
//! unhealthy. The one error surfaced to API callers is an unknown sort field,
//! since sorting by the wrong field would silently corrupt result order.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod core;
pub mod criteria;
pub mod documents;
pub mod elasticsearch;
pub mod error;
pub mod index_name;
pub mod indexing;
pub mod model;
pub mod types;

// Re-export commonly used types at crate root
pub use config::SearchConfig;
pub use core::{BulkOutcome, DocumentIndex, EntityRepository};
pub use documents::{Projection, SearchableDocument};
pub use error::{IndexError, IndexResult, SortError};
pub use index_name::{EntityKind, IndexNameResolver};
pub use types::{Page, Paging};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
