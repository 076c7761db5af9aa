use async_trait::async_trait;
use thiserror::Error;

use linkwise_core::{Contact, ContactId, LinkPrecedence};

/// A contact row ready to be inserted (not yet assigned an id).
///
/// The store assigns `id`, `created_at`, and `updated_at` on insert; ids
/// increase monotonically with creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub link_precedence: LinkPrecedence,
    pub linked_id: Option<ContactId>,
}

impl NewContact {
    /// A new cluster of one: no link, primary precedence.
    pub fn primary(email: Option<&str>, phone_number: Option<&str>) -> Self {
        Self {
            email: email.map(String::from),
            phone_number: phone_number.map(String::from),
            link_precedence: LinkPrecedence::Primary,
            linked_id: None,
        }
    }

    /// A new touchpoint inside an existing cluster, linked directly to its
    /// primary. The supplied fields are stored as given, not merged with
    /// values from other rows.
    pub fn secondary(
        email: Option<&str>,
        phone_number: Option<&str>,
        linked_id: ContactId,
    ) -> Self {
        Self {
            email: email.map(String::from),
            phone_number: phone_number.map(String::from),
            link_precedence: LinkPrecedence::Secondary,
            linked_id: Some(linked_id),
        }
    }
}

/// Contact store operation error.
///
/// These are **infrastructure errors** (connectivity, constraint
/// violations, inconsistent rows) as opposed to the domain-level
/// `InvalidRequest`. The underlying cause is preserved for logging.
#[derive(Debug, Error)]
pub enum ContactStoreError {
    /// The backing database failed.
    #[error("store operation `{op}` failed: {source}")]
    Backend {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The store returned rows that violate a cluster invariant
    /// (e.g. a secondary without a `linked_id`).
    #[error("inconsistent cluster state: {0}")]
    Inconsistent(String),
}

/// Query/mutation operations the resolver requires.
///
/// Ordering contract: `find_matching` and `find_cluster` return rows
/// ascending by `created_at` (id as tie-break) and never include
/// soft-deleted rows. The reconciliation algorithm relies on both.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All non-deleted contacts whose email equals `email` OR whose phone
    /// equals `phone`. An absent identifier matches nothing.
    async fn find_matching(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError>;

    /// Insert one contact and return it with its assigned id/timestamps.
    async fn create(&self, new: NewContact) -> Result<Contact, ContactStoreError>;

    /// Bulk demotion: set `link_precedence = secondary` and
    /// `linked_id = new_linked_id` for every id in `ids`, and re-point any
    /// row whose `linked_id` is in `ids` at the new primary. The re-pointing
    /// keeps the no-chains invariant when a demoted primary had secondaries
    /// of its own. `created_at` is never touched.
    async fn demote_to_secondary(
        &self,
        ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> Result<(), ContactStoreError>;

    /// Full current membership of a cluster: the primary itself plus all
    /// non-deleted rows with `linked_id = primary_id`.
    async fn find_cluster(
        &self,
        primary_id: ContactId,
    ) -> Result<Vec<Contact>, ContactStoreError>;
}
