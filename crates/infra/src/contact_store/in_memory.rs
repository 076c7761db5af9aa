//! In-memory contact store.
//!
//! Backs tests and `DATABASE_URL`-less dev runs. Rows live in a
//! mutex-guarded vector; ids are handed out from a counter so creation
//! order and id order always agree, mirroring the Postgres sequence.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use linkwise_core::{Contact, ContactId, LinkPrecedence};

use super::r#trait::{ContactStore, ContactStoreError, NewContact};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Contact>,
    next_id: i64,
}

/// Mutex-guarded in-memory implementation of [`ContactStore`].
#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    inner: Mutex<Inner>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row, deleted included. Test hook.
    pub fn all_rows(&self) -> Vec<Contact> {
        self.inner.lock().unwrap().rows.clone()
    }
}

fn by_creation(a: &Contact, b: &Contact) -> std::cmp::Ordering {
    // created_at can collide at clock resolution; id breaks the tie the
    // same way the Postgres ORDER BY does.
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn find_matching(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError> {
        let inner = self.inner.lock().unwrap();
        let mut matches: Vec<Contact> = inner
            .rows
            .iter()
            .filter(|c| !c.is_deleted())
            .filter(|c| {
                let email_hit =
                    email.is_some_and(|e| c.email.as_deref() == Some(e));
                let phone_hit =
                    phone.is_some_and(|p| c.phone_number.as_deref() == Some(p));
                email_hit || phone_hit
            })
            .cloned()
            .collect();
        matches.sort_by(by_creation);
        Ok(matches)
    }

    async fn create(&self, new: NewContact) -> Result<Contact, ContactStoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let now = Utc::now();
        let contact = Contact {
            id: ContactId(inner.next_id),
            email: new.email,
            phone_number: new.phone_number,
            link_precedence: new.link_precedence,
            linked_id: new.linked_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.rows.push(contact.clone());
        Ok(contact)
    }

    async fn demote_to_secondary(
        &self,
        ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> Result<(), ContactStoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        for row in inner.rows.iter_mut() {
            let demoted = ids.contains(&row.id);
            let orphaned = row.linked_id.is_some_and(|l| ids.contains(&l));
            if demoted || orphaned {
                row.link_precedence = LinkPrecedence::Secondary;
                row.linked_id = Some(new_linked_id);
                row.updated_at = now;
            }
        }
        Ok(())
    }

    async fn find_cluster(
        &self,
        primary_id: ContactId,
    ) -> Result<Vec<Contact>, ContactStoreError> {
        let inner = self.inner.lock().unwrap();
        let mut members: Vec<Contact> = inner
            .rows
            .iter()
            .filter(|c| !c.is_deleted())
            .filter(|c| c.id == primary_id || c.linked_id == Some(primary_id))
            .cloned()
            .collect();
        members.sort_by(by_creation);
        Ok(members)
    }
}
