//! Searchable document contracts.
//!
//! Each domain entity is projected into a flat, immutable document that the
//! search engine stores as-is. Documents carry denormalized [`LookupValue`]s
//! and parent summaries so that filtering and sorting never need a join.
//!
//! # Identity
//!
//! The document id always equals the id of the source row. It is the upsert
//! key: indexing a document whose id already exists replaces it.
//!
//! # Wire shape
//!
//! Field names serialize as camelCase. Documents carry no engine metadata.

// Document fields are named after the source entity's columns
#![allow(missing_docs)]

mod message;
mod notification;
mod quote;
mod submission;
mod user;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

pub use message::QuoteMessageDocument;
pub use notification::NotificationDocument;
pub use quote::SubmissionQuoteDocument;
pub use submission::SubmissionDocument;
pub use user::UserDocument;

/// A document that can be stored in and read back from a search index.
pub trait SearchableDocument:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Returns the id of the source row.
    fn id(&self) -> i64;
}

/// Flattens a loaded domain entity into its searchable document.
pub trait Projection: Send + Sync + 'static {
    /// The document this entity projects to.
    type Document: SearchableDocument;

    /// Builds the document from the entity and its loaded relations.
    fn project(&self) -> Self::Document;
}

/// A denormalized `{id, name}` pair embedded in place of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupValue {
    /// Referenced id.
    pub id: i64,
    /// Display name at projection time.
    pub name: String,
}

impl LookupValue {
    /// Creates a lookup value.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Summary of a user embedded in other documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl From<&crate::model::User> for UserSummary {
    fn from(user: &crate::model::User) -> Self {
        Self {
            id: user.id,
            name: user.full_name(),
            email: user.email.clone(),
        }
    }
}

/// Summary of a submission embedded in quote documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    /// Submission id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Status lookup.
    pub status: LookupValue,
    /// Id of the customer who posted it.
    pub owner_id: i64,
}

impl From<&crate::model::Submission> for SubmissionSummary {
    fn from(submission: &crate::model::Submission) -> Self {
        Self {
            id: submission.id,
            title: submission.title.clone(),
            status: LookupValue::new(submission.status.id(), submission.status.name()),
            owner_id: submission.owner.id,
        }
    }
}
