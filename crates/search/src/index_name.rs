//! Document type to index name resolution.
//!
//! Every searchable document type lives in exactly one index. The
//! [`IndexNameResolver`] maps a Rust type to that index name. Resolution is
//! total: a type that was never registered resolves to the `default` index
//! and a warning is logged, since it points at a missing registration.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::documents::{
    NotificationDocument, QuoteMessageDocument, SubmissionDocument, SubmissionQuoteDocument,
    UserDocument,
};

/// Index name used for unregistered document types.
pub const DEFAULT_INDEX: &str = "default";

/// The entity types that have their own index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Marketplace users.
    User,
    /// Customer requests for quote.
    Submission,
    /// Vendor quotes on submissions.
    SubmissionQuote,
    /// Messages in quote threads.
    QuoteMessage,
    /// User notifications.
    Notification,
}

impl EntityKind {
    /// All entity kinds, in rebuild order.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::Submission,
        EntityKind::SubmissionQuote,
        EntityKind::QuoteMessage,
        EntityKind::Notification,
    ];

    /// Returns the unprefixed index name.
    pub fn index_name(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Submission => "submissions",
            EntityKind::SubmissionQuote => "submission-quotes",
            EntityKind::QuoteMessage => "quote-messages",
            EntityKind::Notification => "notifications",
        }
    }

    /// Returns the human-readable entity name used in logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Submission => "submission",
            EntityKind::SubmissionQuote => "submission quote",
            EntityKind::QuoteMessage => "quote message",
            EntityKind::Notification => "notification",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.index_name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "user" | "users" => Ok(EntityKind::User),
            "submission" | "submissions" => Ok(EntityKind::Submission),
            "quote" | "quotes" | "submission-quote" | "submission-quotes" => {
                Ok(EntityKind::SubmissionQuote)
            }
            "message" | "messages" | "quote-message" | "quote-messages" => {
                Ok(EntityKind::QuoteMessage)
            }
            "notification" | "notifications" => Ok(EntityKind::Notification),
            _ => Err(format!("unknown entity '{}'", s)),
        }
    }
}

/// Resolves document types to prefixed index names.
#[derive(Debug, Clone)]
pub struct IndexNameResolver {
    prefix: String,
    registry: HashMap<TypeId, EntityKind>,
}

impl IndexNameResolver {
    /// Creates a resolver with the five document types registered.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut resolver = Self {
            prefix: prefix.into().to_lowercase(),
            registry: HashMap::new(),
        };
        resolver.register::<UserDocument>(EntityKind::User);
        resolver.register::<SubmissionDocument>(EntityKind::Submission);
        resolver.register::<SubmissionQuoteDocument>(EntityKind::SubmissionQuote);
        resolver.register::<QuoteMessageDocument>(EntityKind::QuoteMessage);
        resolver.register::<NotificationDocument>(EntityKind::Notification);
        resolver
    }

    fn register<T: 'static>(&mut self, kind: EntityKind) {
        self.registry.insert(TypeId::of::<T>(), kind);
    }

    /// Returns the entity kind registered for `T`, if any.
    pub fn kind_of<T: 'static>(&self) -> Option<EntityKind> {
        self.registry.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the index name for `T`.
    pub fn index_for<T: 'static>(&self) -> String {
        match self.kind_of::<T>() {
            Some(kind) => self.index_for_kind(kind),
            None => {
                warn!(
                    document_type = type_name::<T>(),
                    index = DEFAULT_INDEX,
                    "No index registered for document type, using default index"
                );
                self.prefixed(DEFAULT_INDEX)
            }
        }
    }

    /// Returns the index name for an entity kind.
    pub fn index_for_kind(&self, kind: EntityKind) -> String {
        self.prefixed(kind.index_name())
    }

    fn prefixed(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.prefix, name)
        }
    }
}
