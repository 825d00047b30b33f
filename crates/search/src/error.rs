//! Error types for the search and indexing layer.
//!
//! [`IndexError`] is what engine-facing calls return: a [`BackendError`]
//! from the engine, or a document that failed to decode. Sort configuration
//! errors ([`SortError`]) surface while parsing criteria, before any engine
//! call, and are the only errors meant to reach API callers. Failures of the
//! store of record ([`RepositoryError`]) stay inside the rebuild and
//! incremental paths, which turn them into logged outcomes.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for index and search operations.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Search engine errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A document could not be encoded or a hit could not be decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

/// Errors originating from the search engine.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The engine did not answer its health check.
    #[error("search engine unavailable: {message}")]
    Unavailable { message: String },

    /// The client could not be constructed or could not connect.
    #[error("connection to search engine failed: {message}")]
    ConnectionFailed { message: String },

    /// An engine call failed or returned a non-success status.
    #[error("search engine error on index '{index}': {message}")]
    Internal {
        index: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Errors resolving a requested sort.
///
/// These are configuration errors: sorting silently by the wrong field would
/// corrupt result ordering, so they always propagate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The field is not one of the entity's sortable properties.
    #[error("unknown sort field '{field}' for {entity}")]
    UnknownField { entity: &'static str, field: String },

    /// The order is neither ascending nor descending.
    #[error("unknown sort order '{value}', expected 'asc' or 'desc'")]
    UnknownOrder { value: String },
}

/// Errors reading from the relational store of record.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A read against the store failed.
    #[error("failed to read {entity} from the store: {message}")]
    ReadFailed {
        entity: &'static str,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RepositoryError {
    /// Creates a read failure without an underlying source error.
    pub fn read_failed(entity: &'static str, message: impl Into<String>) -> Self {
        RepositoryError::ReadFailed {
            entity,
            message: message.into(),
            source: None,
        }
    }
}

impl BackendError {
    /// Creates an internal engine error for the given index.
    pub fn internal(index: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Internal {
            index: index.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a failed engine call on `index`, keeping the transport error as
    /// the source.
    pub fn request_failed(
        index: impl Into<String>,
        context: &str,
        err: elasticsearch::Error,
    ) -> Self {
        BackendError::Internal {
            index: index.into(),
            message: format!("{}: {}", context, err),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias for index and search operations.
pub type IndexResult<T> = Result<T, IndexError>;
