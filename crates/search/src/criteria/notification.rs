//! Notification search criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SearchCriteria, Sorting, filters};
use crate::documents::NotificationDocument;
use crate::types::Paging;

crate::sort_fields! {
    /// Sortable notification properties.
    pub enum NotificationSortField for "notification" {
        Id => ("id", "id", false),
        Title => ("title", "title", true),
        IsRead => ("isRead", "isRead", false),
        CreatedAt => ("createdAt", "createdAt", false),
    }
}

/// Criteria for a user's notification feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationCriteria {
    /// Free-text query.
    pub query: Option<String>,
    /// Restrict to these ids.
    pub ids: Vec<i64>,
    /// Addressed to this user.
    pub recipient_id: Option<i64>,
    /// Of any of these kinds.
    pub kind_ids: Vec<i64>,
    /// Read state.
    pub is_read: Option<bool>,
    /// Created at or after.
    pub created_from: Option<DateTime<Utc>>,
    /// Created at or before.
    pub created_to: Option<DateTime<Utc>>,
    /// Requested page.
    pub paging: Paging,
    /// Requested sort.
    pub sorting: Option<Sorting<NotificationSortField>>,
}

impl SearchCriteria for NotificationCriteria {
    type Document = NotificationDocument;
    type SortField = NotificationSortField;

    fn text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn text_fields() -> &'static [&'static str] {
        &["title", "message"]
    }

    fn filters(&self) -> Vec<Option<Value>> {
        vec![
            filters::ids(&self.ids),
            filters::term("recipientId", self.recipient_id),
            filters::terms("kind.id", &self.kind_ids),
            filters::term("isRead", self.is_read),
            filters::range("createdAt", self.created_from, self.created_to),
        ]
    }

    fn paging(&self) -> Paging {
        self.paging
    }

    fn sorting(&self) -> Option<Sorting<NotificationSortField>> {
        self.sorting
    }
}
