//! Submission (RFQ) document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LookupValue, Projection, SearchableDocument, UserSummary};
use crate::model::Submission;

/// Searchable projection of a [`Submission`].
///
/// Embeds its owner and category lookups so that "my submissions" and
/// category browsing are single-index queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDocument {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: LookupValue,
    pub categories: Vec<LookupValue>,
    pub owner: UserSummary,
    pub budget: Option<f64>,
    pub deadline: Option<DateTime<Utc>>,
    pub quotes_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SearchableDocument for SubmissionDocument {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Projection for Submission {
    type Document = SubmissionDocument;

    fn project(&self) -> SubmissionDocument {
        SubmissionDocument {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: LookupValue::new(self.status.id(), self.status.name()),
            categories: self.categories.iter().map(LookupValue::from).collect(),
            owner: UserSummary::from(&self.owner),
            budget: self.budget,
            deadline: self.deadline,
            quotes_count: self.quotes_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
