//! Quote message search criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SearchCriteria, Sorting, filters};
use crate::documents::QuoteMessageDocument;
use crate::types::Paging;

crate::sort_fields! {
    /// Sortable message properties.
    pub enum QuoteMessageSortField for "quote message" {
        Id => ("id", "id", false),
        SenderName => ("senderName", "sender.name", true),
        CreatedAt => ("createdAt", "createdAt", false),
    }
}

/// Criteria for reading a quote thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteMessageCriteria {
    /// Free-text query.
    pub query: Option<String>,
    /// Restrict to these ids.
    pub ids: Vec<i64>,
    /// In this quote's thread.
    pub quote_id: Option<i64>,
    /// Belonging to this submission.
    pub submission_id: Option<i64>,
    /// Written by this user.
    pub sender_id: Option<i64>,
    /// Read state.
    pub is_read: Option<bool>,
    /// Created at or after.
    pub created_from: Option<DateTime<Utc>>,
    /// Created at or before.
    pub created_to: Option<DateTime<Utc>>,
    /// Requested page.
    pub paging: Paging,
    /// Requested sort.
    pub sorting: Option<Sorting<QuoteMessageSortField>>,
}

impl SearchCriteria for QuoteMessageCriteria {
    type Document = QuoteMessageDocument;
    type SortField = QuoteMessageSortField;

    fn text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn text_fields() -> &'static [&'static str] {
        &["text", "sender.name"]
    }

    fn filters(&self) -> Vec<Option<Value>> {
        vec![
            filters::ids(&self.ids),
            filters::term("quoteId", self.quote_id),
            filters::term("submissionId", self.submission_id),
            filters::term("sender.id", self.sender_id),
            filters::term("isRead", self.is_read),
            filters::range("createdAt", self.created_from, self.created_to),
        ]
    }

    fn paging(&self) -> Paging {
        self.paging
    }

    fn sorting(&self) -> Option<Sorting<QuoteMessageSortField>> {
        self.sorting
    }
}
