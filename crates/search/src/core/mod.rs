//! Core traits at the seams of the indexing pipeline.
//!
//! - [`DocumentIndex`] - write side of one document type's index
//! - [`EntityRepository`] - read-only access to the store of record
//!
//! The rebuild and incremental paths are written against these traits only,
//! so they run unchanged against Elasticsearch or an in-memory double.

mod index;
mod repository;

pub use index::{BulkOutcome, DocumentIndex};
pub use repository::EntityRepository;
