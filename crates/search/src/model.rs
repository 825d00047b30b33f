//! Domain entities as loaded from the relational store of record.
//!
//! These are the shapes the [`EntityRepository`](crate::core::EntityRepository)
//! returns, with their related rows already loaded. The
//! [`documents`](crate::documents) module flattens them into searchable
//! documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::documents::LookupValue;

/// A service category a submission can be filed under and a vendor can serve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl From<&Category> for LookupValue {
    fn from(category: &Category) -> Self {
        LookupValue::new(category.id, category.name.clone())
    }
}

/// Role of a marketplace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    /// Posts submissions and accepts quotes.
    Customer,
    /// Responds to submissions with quotes.
    Vendor,
    /// Back-office operator.
    Admin,
}

impl UserRole {
    /// Returns the stable lookup id of this role.
    pub fn id(self) -> i64 {
        match self {
            UserRole::Customer => 1,
            UserRole::Vendor => 2,
            UserRole::Admin => 3,
        }
    }

    /// Returns the display name of this role.
    pub fn name(self) -> &'static str {
        match self {
            UserRole::Customer => "Customer",
            UserRole::Vendor => "Vendor",
            UserRole::Admin => "Admin",
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Company the user acts for, if any.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Marketplace role.
    pub role: UserRole,
    /// Categories a vendor serves.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns `"first last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Not yet visible to vendors.
    Draft,
    /// Accepting quotes.
    Open,
    /// A quote has been accepted.
    Awarded,
    /// No longer accepting quotes.
    Closed,
    /// Withdrawn by the customer.
    Cancelled,
}

impl SubmissionStatus {
    /// Returns the stable lookup id of this status.
    pub fn id(self) -> i64 {
        match self {
            SubmissionStatus::Draft => 1,
            SubmissionStatus::Open => 2,
            SubmissionStatus::Awarded => 3,
            SubmissionStatus::Closed => 4,
            SubmissionStatus::Cancelled => 5,
        }
    }

    /// Returns the display name of this status.
    pub fn name(self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "Draft",
            SubmissionStatus::Open => "Open",
            SubmissionStatus::Awarded => "Awarded",
            SubmissionStatus::Closed => "Closed",
            SubmissionStatus::Cancelled => "Cancelled",
        }
    }
}

/// A customer's request for quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Submission id.
    pub id: i64,
    /// Short title.
    pub title: String,
    /// Free-form description of the work.
    pub description: String,
    /// Current status.
    pub status: SubmissionStatus,
    /// Categories the submission is filed under.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// The customer who posted it.
    pub owner: User,
    /// Indicative budget.
    #[serde(default)]
    pub budget: Option<f64>,
    /// Quote deadline.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Number of quotes received so far.
    #[serde(default)]
    pub quotes_count: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Status of a vendor's quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Awaiting the customer's decision.
    Pending,
    /// Accepted by the customer.
    Accepted,
    /// Declined by the customer.
    Rejected,
    /// Pulled back by the vendor.
    Withdrawn,
}

impl QuoteStatus {
    /// Returns the stable lookup id of this status.
    pub fn id(self) -> i64 {
        match self {
            QuoteStatus::Pending => 1,
            QuoteStatus::Accepted => 2,
            QuoteStatus::Rejected => 3,
            QuoteStatus::Withdrawn => 4,
        }
    }

    /// Returns the display name of this status.
    pub fn name(self) -> &'static str {
        match self {
            QuoteStatus::Pending => "Pending",
            QuoteStatus::Accepted => "Accepted",
            QuoteStatus::Rejected => "Rejected",
            QuoteStatus::Withdrawn => "Withdrawn",
        }
    }
}

/// A vendor's priced response to a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuote {
    /// Quote id.
    pub id: i64,
    /// The submission being quoted.
    pub submission: Submission,
    /// The vendor sending the quote.
    pub vendor: User,
    /// Quoted price.
    pub price: f64,
    /// Cover message.
    pub message: String,
    /// Current status.
    pub status: QuoteStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A chat message in a quote's conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMessage {
    /// Message id.
    pub id: i64,
    /// Quote the thread belongs to.
    pub quote_id: i64,
    /// Submission the quote answers.
    pub submission_id: i64,
    /// Author of the message.
    pub sender: User,
    /// Message body.
    pub text: String,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// Send time.
    pub created_at: DateTime<Utc>,
}

/// Kind of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A vendor quoted on the user's submission.
    QuoteReceived,
    /// The user's quote was accepted.
    QuoteAccepted,
    /// The user's quote was rejected.
    QuoteRejected,
    /// A new message arrived in a quote thread.
    MessageReceived,
    /// A submission the user follows changed status.
    SubmissionUpdated,
}

impl NotificationKind {
    /// Returns the stable lookup id of this kind.
    pub fn id(self) -> i64 {
        match self {
            NotificationKind::QuoteReceived => 1,
            NotificationKind::QuoteAccepted => 2,
            NotificationKind::QuoteRejected => 3,
            NotificationKind::MessageReceived => 4,
            NotificationKind::SubmissionUpdated => 5,
        }
    }

    /// Returns the display name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            NotificationKind::QuoteReceived => "Quote received",
            NotificationKind::QuoteAccepted => "Quote accepted",
            NotificationKind::QuoteRejected => "Quote rejected",
            NotificationKind::MessageReceived => "Message received",
            NotificationKind::SubmissionUpdated => "Submission updated",
        }
    }
}

/// A notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification id.
    pub id: i64,
    /// Addressee.
    pub recipient_id: i64,
    /// What happened.
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether the recipient has seen it.
    pub is_read: bool,
    /// Related submission, if any.
    #[serde(default)]
    pub submission_id: Option<i64>,
    /// Related quote, if any.
    #[serde(default)]
    pub quote_id: Option<i64>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}
