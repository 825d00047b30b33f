//! Submission quote search criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SearchCriteria, Sorting, filters};
use crate::documents::SubmissionQuoteDocument;
use crate::types::Paging;

crate::sort_fields! {
    /// Sortable quote properties.
    pub enum SubmissionQuoteSortField for "submission quote" {
        Id => ("id", "id", false),
        Price => ("price", "price", false),
        Status => ("status", "status.name", true),
        VendorName => ("vendorName", "vendor.name", true),
        SubmissionTitle => ("submissionTitle", "submission.title", true),
        CreatedAt => ("createdAt", "createdAt", false),
    }
}

/// Criteria for listing quotes, from either side of the marketplace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionQuoteCriteria {
    /// Free-text query.
    pub query: Option<String>,
    /// Restrict to these ids.
    pub ids: Vec<i64>,
    /// Belonging to this submission.
    pub submission_id: Option<i64>,
    /// Sent by this vendor.
    pub vendor_id: Option<i64>,
    /// Quotes on submissions posted by this customer.
    pub submission_owner_id: Option<i64>,
    /// In any of these statuses.
    pub status_ids: Vec<i64>,
    /// Price at least.
    pub min_price: Option<f64>,
    /// Price at most.
    pub max_price: Option<f64>,
    /// Created at or after.
    pub created_from: Option<DateTime<Utc>>,
    /// Created at or before.
    pub created_to: Option<DateTime<Utc>>,
    /// Requested page.
    pub paging: Paging,
    /// Requested sort.
    pub sorting: Option<Sorting<SubmissionQuoteSortField>>,
}

impl SearchCriteria for SubmissionQuoteCriteria {
    type Document = SubmissionQuoteDocument;
    type SortField = SubmissionQuoteSortField;

    fn text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn text_fields() -> &'static [&'static str] {
        &["message", "vendor.name", "submission.title"]
    }

    fn filters(&self) -> Vec<Option<Value>> {
        vec![
            filters::ids(&self.ids),
            filters::term("submission.id", self.submission_id),
            filters::term("vendor.id", self.vendor_id),
            filters::term("submission.ownerId", self.submission_owner_id),
            filters::terms("status.id", &self.status_ids),
            filters::range("price", self.min_price, self.max_price),
            filters::range("createdAt", self.created_from, self.created_to),
        ]
    }

    fn paging(&self) -> Paging {
        self.paging
    }

    fn sorting(&self) -> Option<Sorting<SubmissionQuoteSortField>> {
        self.sorting
    }
}
