//! Submission search criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SearchCriteria, Sorting, filters};
use crate::documents::SubmissionDocument;
use crate::types::Paging;

crate::sort_fields! {
    /// Sortable submission properties.
    pub enum SubmissionSortField for "submission" {
        Id => ("id", "id", false),
        Title => ("title", "title", true),
        Status => ("status", "status.name", true),
        Budget => ("budget", "budget", false),
        Deadline => ("deadline", "deadline", false),
        CreatedAt => ("createdAt", "createdAt", false),
        OwnerName => ("ownerName", "owner.name", true),
    }
}

/// Criteria for browsing submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionCriteria {
    /// Free text matched against title, description, owner and categories.
    pub query: Option<String>,
    /// Restrict to these submission ids.
    pub ids: Vec<i64>,
    /// Filed under any of these categories.
    pub category_ids: Vec<i64>,
    /// In any of these statuses.
    pub status_ids: Vec<i64>,
    /// Posted by this customer.
    pub owner_id: Option<i64>,
    /// Budget at least.
    pub min_budget: Option<f64>,
    /// Budget at most.
    pub max_budget: Option<f64>,
    /// Created at or after.
    pub created_from: Option<DateTime<Utc>>,
    /// Created at or before.
    pub created_to: Option<DateTime<Utc>>,
    /// Deadline at or after.
    pub deadline_from: Option<DateTime<Utc>>,
    /// Deadline at or before.
    pub deadline_to: Option<DateTime<Utc>>,
    /// Requested page.
    pub paging: Paging,
    /// Requested sort.
    pub sorting: Option<Sorting<SubmissionSortField>>,
}

impl SearchCriteria for SubmissionCriteria {
    type Document = SubmissionDocument;
    type SortField = SubmissionSortField;

    fn text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn text_fields() -> &'static [&'static str] {
        &["title", "description", "owner.name", "categories.name"]
    }

    fn filters(&self) -> Vec<Option<Value>> {
        vec![
            filters::ids(&self.ids),
            filters::terms("categories.id", &self.category_ids),
            filters::terms("status.id", &self.status_ids),
            filters::term("owner.id", self.owner_id),
            filters::range("budget", self.min_budget, self.max_budget),
            filters::range("createdAt", self.created_from, self.created_to),
            filters::range("deadline", self.deadline_from, self.deadline_to),
        ]
    }

    fn paging(&self) -> Paging {
        self.paging
    }

    fn sorting(&self) -> Option<Sorting<SubmissionSortField>> {
        self.sorting
    }
}
