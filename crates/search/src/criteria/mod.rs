//! Per-entity search criteria.
//!
//! A criteria object bundles an optional free-text query, typed filters,
//! [`Paging`] and an optional typed [`Sorting`]. Each entity's criteria
//! implements [`SearchCriteria`], which is all the query builder needs.
//!
//! # Sorting
//!
//! Sortable properties form a closed enum per entity, generated by
//! [`sort_fields!`]. The macro emits an exhaustive `match` from each variant
//! to its document property and whether that property is textual, so adding
//! a variant without a mapping does not compile. Textual properties sort on
//! their `.keyword` sub-field so ordering is lexical rather than tokenized.
//!
//! An unknown sort field is a hard error ([`SortError::UnknownField`]),
//! raised when the criteria is parsed or deserialized.

pub mod filters;
mod message;
mod notification;
mod quote;
mod submission;
mod user;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::documents::SearchableDocument;
use crate::error::SortError;
use crate::types::Paging;

pub use message::{QuoteMessageCriteria, QuoteMessageSortField};
pub use notification::{NotificationCriteria, NotificationSortField};
pub use quote::{SubmissionQuoteCriteria, SubmissionQuoteSortField};
pub use submission::{SubmissionCriteria, SubmissionSortField};
pub use user::{UserCriteria, UserSortField};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the engine's name for this order.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(SortError::UnknownOrder {
                value: s.to_string(),
            }),
        }
    }
}

/// The document property a sort field resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortProperty {
    /// Dotted path of the property in the document.
    pub path: &'static str,
    /// Whether the property is a string mapped as analyzed text.
    pub textual: bool,
}

impl SortProperty {
    /// Returns the field the engine should sort on.
    pub fn sort_key(&self) -> String {
        if self.textual {
            format!("{}.keyword", self.path)
        } else {
            self.path.to_string()
        }
    }
}

/// A closed set of sortable properties for one entity.
pub trait SortField:
    Copy + fmt::Debug + fmt::Display + FromStr<Err = SortError> + Send + Sync + 'static
{
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Resolves the field to its document property.
    fn property(self) -> SortProperty;
}

/// A requested sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting<F> {
    /// Field to sort on.
    pub field: F,
    /// Direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl<F: SortField> Sorting<F> {
    /// Creates a sort on `field`.
    pub fn new(field: F, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Parses a sort from loosely-typed input, such as query string values.
    ///
    /// A missing order means ascending.
    pub fn parse(field: &str, order: Option<&str>) -> Result<Self, SortError> {
        let field = field.parse::<F>()?;
        let order = order.map(str::parse).transpose()?.unwrap_or_default();
        Ok(Self { field, order })
    }

    /// Returns the engine field to sort on.
    pub fn sort_key(&self) -> String {
        self.field.property().sort_key()
    }
}

/// What the query builder needs to know about a criteria object.
pub trait SearchCriteria: Send + Sync {
    /// The document type this criteria searches.
    type Document: SearchableDocument;

    /// The sortable fields of the document.
    type SortField: SortField;

    /// The free-text query, if any.
    fn text(&self) -> Option<&str>;

    /// Document fields the free-text query is matched against.
    fn text_fields() -> &'static [&'static str];

    /// One optional clause per filterable field; `None` imposes no constraint.
    fn filters(&self) -> Vec<Option<Value>>;

    /// Requested page.
    fn paging(&self) -> Paging;

    /// Requested sort, if any.
    fn sorting(&self) -> Option<Sorting<Self::SortField>>;
}

/// Declares a sort field enum with its compile-time property map.
///
/// ```ignore
/// sort_fields! {
///     pub enum UserSortField for "user" {
///         Id => ("id", "id", false),
///         LastName => ("lastName", "lastName", true),
///     }
/// }
/// ```
///
/// Each variant lists its wire name, the document path, and whether the
/// path is textual.
#[macro_export]
macro_rules! sort_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $entity:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($wire:literal, $path:literal, $textual:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every sortable field.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire name of this field.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl $crate::criteria::SortField for $name {
            const ENTITY: &'static str = $entity;

            fn property(self) -> $crate::criteria::SortProperty {
                match self {
                    $(
                        $name::$variant => $crate::criteria::SortProperty {
                            path: $path,
                            textual: $textual,
                        },
                    )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::SortError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($wire) {
                        return Ok($name::$variant);
                    }
                )+
                Err($crate::error::SortError::UnknownField {
                    entity: $entity,
                    field: s.to_string(),
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::error::SortError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!(
            "sideways".parse::<SortOrder>(),
            Err(SortError::UnknownOrder {
                value: "sideways".to_string()
            })
        );
    }

    #[test]
    fn test_sort_property_keyword_suffix() {
        let textual = SortProperty {
            path: "owner.name",
            textual: true,
        };
        let numeric = SortProperty {
            path: "budget",
            textual: false,
        };
        assert_eq!(textual.sort_key(), "owner.name.keyword");
        assert_eq!(numeric.sort_key(), "budget");
    }

    #[test]
    fn test_sorting_parse() {
        let sorting = Sorting::<SubmissionSortField>::parse("title", Some("desc")).unwrap();
        assert_eq!(sorting.field, SubmissionSortField::Title);
        assert_eq!(sorting.order, SortOrder::Desc);
        assert_eq!(sorting.sort_key(), "title.keyword");

        let default_order = Sorting::<SubmissionSortField>::parse("budget", None).unwrap();
        assert_eq!(default_order.order, SortOrder::Asc);
    }

    #[test]
    fn test_sorting_parse_unknown_field_is_an_error() {
        let err = Sorting::<SubmissionSortField>::parse("colour", None).unwrap_err();
        assert_eq!(
            err,
            SortError::UnknownField {
                entity: "submission",
                field: "colour".to_string()
            }
        );
    }

    #[test]
    fn test_sorting_deserialize() {
        let sorting: Sorting<UserSortField> =
            serde_json::from_str(r#"{"field": "lastName", "order": "desc"}"#).unwrap();
        assert_eq!(sorting, Sorting::new(UserSortField::LastName, SortOrder::Desc));

        let err = serde_json::from_str::<Sorting<UserSortField>>(r#"{"field": "shoeSize"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown sort field 'shoeSize'"));
    }

    #[test]
    fn test_sort_field_serializes_to_wire_name() {
        let value = serde_json::to_value(Sorting::new(
            QuoteMessageSortField::SenderName,
            SortOrder::Asc,
        ))
        .unwrap();
        assert_eq!(value, serde_json::json!({"field": "senderName", "order": "asc"}));
    }

    #[test]
    fn test_every_field_round_trips_through_its_wire_name() {
        fn check<F: SortField + PartialEq>(all: &[F]) {
            for field in all {
                assert_eq!(field.to_string().parse::<F>().ok(), Some(*field));
            }
        }
        check(UserSortField::ALL);
        check(SubmissionSortField::ALL);
        check(SubmissionQuoteSortField::ALL);
        check(QuoteMessageSortField::ALL);
        check(NotificationSortField::ALL);
    }
}
