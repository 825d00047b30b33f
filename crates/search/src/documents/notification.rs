//! Notification document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LookupValue, Projection, SearchableDocument};
use crate::model::Notification;

/// Searchable projection of a [`Notification`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDocument {
    pub id: i64,
    pub recipient_id: i64,
    pub kind: LookupValue,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub submission_id: Option<i64>,
    pub quote_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl SearchableDocument for NotificationDocument {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Projection for Notification {
    type Document = NotificationDocument;

    fn project(&self) -> NotificationDocument {
        NotificationDocument {
            id: self.id,
            recipient_id: self.recipient_id,
            kind: LookupValue::new(self.kind.id(), self.kind.name()),
            title: self.title.clone(),
            message: self.message.clone(),
            is_read: self.is_read,
            submission_id: self.submission_id,
            quote_id: self.quote_id,
            created_at: self.created_at,
        }
    }
}
