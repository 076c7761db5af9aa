//! Consolidated cluster view returned to the caller.

use serde::{Deserialize, Serialize};

use crate::contact::{Contact, ContactId};

/// Everything known about one identity: the surviving primary plus the
/// distinct contact points collected across the whole cluster.
///
/// Wire shape matches the identify response contract (`primaryContactId`,
/// `emails`, `phoneNumbers`, `secondaryContactIds`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub primary_contact_id: ContactId,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub secondary_contact_ids: Vec<ContactId>,
}

impl ClusterView {
    /// Assemble the view from a cluster's full membership.
    ///
    /// `members` must be the complete, non-deleted membership in creation
    /// order. Emails and phone numbers are deduplicated with the primary's
    /// own values first; everything after that follows membership order, so
    /// the view is reproducible from the same membership.
    pub fn from_members(primary_id: ContactId, members: &[Contact]) -> Self {
        let primary = members.iter().find(|c| c.id == primary_id);

        let mut emails: Vec<String> = Vec::new();
        let mut phone_numbers: Vec<String> = Vec::new();

        if let Some(primary) = primary {
            if let Some(email) = &primary.email {
                emails.push(email.clone());
            }
            if let Some(phone) = &primary.phone_number {
                phone_numbers.push(phone.clone());
            }
        }

        for member in members {
            if let Some(email) = &member.email {
                if !emails.contains(email) {
                    emails.push(email.clone());
                }
            }
            if let Some(phone) = &member.phone_number {
                if !phone_numbers.contains(phone) {
                    phone_numbers.push(phone.clone());
                }
            }
        }

        let secondary_contact_ids = members
            .iter()
            .filter(|c| c.id != primary_id)
            .map(|c| c.id)
            .collect();

        Self {
            primary_contact_id: primary_id,
            emails,
            phone_numbers,
            secondary_contact_ids,
        }
    }
}
