//! Submission quote document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LookupValue, Projection, SearchableDocument, SubmissionSummary, UserSummary};
use crate::model::SubmissionQuote;

/// Searchable projection of a [`SubmissionQuote`].
///
/// Carries a summary of the parent submission (including its owner id) and
/// of the sending vendor, so both sides of the marketplace can list their
/// quotes without touching the submissions index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuoteDocument {
    pub id: i64,
    pub submission: SubmissionSummary,
    pub vendor: UserSummary,
    pub price: f64,
    pub message: String,
    pub status: LookupValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SearchableDocument for SubmissionQuoteDocument {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Projection for SubmissionQuote {
    type Document = SubmissionQuoteDocument;

    fn project(&self) -> SubmissionQuoteDocument {
        SubmissionQuoteDocument {
            id: self.id,
            submission: SubmissionSummary::from(&self.submission),
            vendor: UserSummary::from(&self.vendor),
            price: self.price,
            message: self.message.clone(),
            status: LookupValue::new(self.status.id(), self.status.name()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
