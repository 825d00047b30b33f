//! User document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LookupValue, Projection, SearchableDocument};
use crate::model::User;

/// Searchable projection of a [`User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub role: LookupValue,
    pub categories: Vec<LookupValue>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SearchableDocument for UserDocument {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Projection for User {
    type Document = UserDocument;

    fn project(&self) -> UserDocument {
        UserDocument {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            full_name: self.full_name(),
            email: self.email.clone(),
            company_name: self.company_name.clone(),
            role: LookupValue::new(self.role.id(), self.role.name()),
            categories: self.categories.iter().map(LookupValue::from).collect(),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}
