//! The `Contact` entity: one observed (email, phone) touchpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact identifier, assigned by the store.
///
/// Ids increase monotonically with creation order, so they double as the
/// tie-break for "oldest" when `created_at` values collide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl ContactId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for ContactId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Position of a contact within its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPrecedence {
    Primary,
    Secondary,
}

/// A single contact row.
///
/// Cluster invariants (maintained by the resolver, relied on everywhere):
/// - exactly one `Primary` per cluster;
/// - every `Secondary` carries `linked_id` pointing directly at the current
///   primary (no secondary → secondary chains);
/// - the primary is the earliest-created member of its cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub link_precedence: LinkPrecedence,
    /// Present iff `link_precedence` is `Secondary`.
    pub linked_id: Option<ContactId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; deleted rows are invisible to matching.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn is_primary(&self) -> bool {
        self.link_precedence == LinkPrecedence::Primary
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
