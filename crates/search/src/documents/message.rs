//! Quote message document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Projection, SearchableDocument, UserSummary};
use crate::model::QuoteMessage;

/// Searchable projection of a [`QuoteMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMessageDocument {
    pub id: i64,
    pub quote_id: i64,
    pub submission_id: i64,
    pub sender: UserSummary,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl SearchableDocument for QuoteMessageDocument {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Projection for QuoteMessage {
    type Document = QuoteMessageDocument;

    fn project(&self) -> QuoteMessageDocument {
        QuoteMessageDocument {
            id: self.id,
            quote_id: self.quote_id,
            submission_id: self.submission_id,
            sender: UserSummary::from(&self.sender),
            text: self.text.clone(),
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}
