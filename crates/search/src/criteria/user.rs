//! User search criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SearchCriteria, Sorting, filters};
use crate::documents::UserDocument;
use crate::types::Paging;

crate::sort_fields! {
    /// Sortable user properties.
    pub enum UserSortField for "user" {
        Id => ("id", "id", false),
        FirstName => ("firstName", "firstName", true),
        LastName => ("lastName", "lastName", true),
        Email => ("email", "email", true),
        CompanyName => ("companyName", "companyName", true),
        CreatedAt => ("createdAt", "createdAt", false),
    }
}

/// Criteria for searching users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCriteria {
    /// Free text matched against names, email and company.
    pub query: Option<String>,
    /// Restrict to these user ids.
    pub ids: Vec<i64>,
    /// Restrict to these roles.
    pub role_ids: Vec<i64>,
    /// Restrict to vendors serving any of these categories.
    pub category_ids: Vec<i64>,
    /// Restrict by account state.
    pub is_active: Option<bool>,
    /// Registered at or after.
    pub created_from: Option<DateTime<Utc>>,
    /// Registered at or before.
    pub created_to: Option<DateTime<Utc>>,
    /// Requested page.
    pub paging: Paging,
    /// Requested sort.
    pub sorting: Option<Sorting<UserSortField>>,
}

impl SearchCriteria for UserCriteria {
    type Document = UserDocument;
    type SortField = UserSortField;

    fn text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn text_fields() -> &'static [&'static str] {
        &["firstName", "lastName", "email", "companyName"]
    }

    fn filters(&self) -> Vec<Option<Value>> {
        vec![
            filters::ids(&self.ids),
            filters::terms("role.id", &self.role_ids),
            filters::terms("categories.id", &self.category_ids),
            filters::term("isActive", self.is_active),
            filters::range("createdAt", self.created_from, self.created_to),
        ]
    }

    fn paging(&self) -> Paging {
        self.paging
    }

    fn sorting(&self) -> Option<Sorting<UserSortField>> {
        self.sorting
    }
}
