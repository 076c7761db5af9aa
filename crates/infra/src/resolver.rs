//! The identity resolver: drives the store through the reconciliation
//! algorithm and assembles the consolidated view.

use std::sync::Arc;

use tracing::instrument;

use linkwise_core::{ClusterView, IdentifyRequest, ResolveError, ResolveResult};
use linkwise_identity::reconcile;

use crate::contact_store::{ContactStore, ContactStoreError, NewContact};
use crate::ident_lock::IdentifierLocks;

/// Orchestrates one identify call end to end.
///
/// The store is injected so tests run against [`InMemoryContactStore`]
/// and production against Postgres. Per call the resolver issues zero, one,
/// or two store mutations (one create and/or one bulk demotion), always
/// followed by exactly one cluster re-read. A store failure mid-sequence
/// leaves the store in a valid state; the caller retries the whole call,
/// which is idempotent in effect.
///
/// [`InMemoryContactStore`]: crate::contact_store::InMemoryContactStore
pub struct IdentityResolver<S: ?Sized> {
    store: Arc<S>,
    locks: IdentifierLocks,
}

impl<S: ContactStore + ?Sized> IdentityResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: IdentifierLocks::new(),
        }
    }

    /// Resolve a validated request to its cluster view.
    #[instrument(
        skip(self, request),
        fields(
            has_email = request.email().is_some(),
            has_phone = request.phone_number().is_some(),
        ),
        err
    )]
    pub async fn resolve(&self, request: &IdentifyRequest) -> ResolveResult<ClusterView> {
        // Serialize overlapping requests for the whole read-decide-write
        // sequence; without this, two calls with the same unseen identifier
        // each create a primary.
        let _guards = self
            .locks
            .acquire(request.email(), request.phone_number())
            .await;

        let matches = self
            .store
            .find_matching(request.email(), request.phone_number())
            .await
            .map_err(ResolveError::store)?;

        if matches.is_empty() {
            let created = self
                .store
                .create(NewContact::primary(request.email(), request.phone_number()))
                .await
                .map_err(ResolveError::store)?;
            tracing::info!(contact_id = %created.id, "created new primary contact");
            return Ok(ClusterView::from_members(created.id, &[created]));
        }

        let primary_id = reconcile::elect_primary(&matches).ok_or_else(|| {
            ResolveError::store(ContactStoreError::Inconsistent(
                "matched secondary carries no linked_id".into(),
            ))
        })?;

        if reconcile::introduces_new_information(
            &matches,
            request.email(),
            request.phone_number(),
        ) {
            let created = self
                .store
                .create(NewContact::secondary(
                    request.email(),
                    request.phone_number(),
                    primary_id,
                ))
                .await
                .map_err(ResolveError::store)?;
            tracing::info!(
                contact_id = %created.id,
                primary_id = %primary_id,
                "recorded new secondary touchpoint"
            );
        }

        let demote = reconcile::demotion_targets(&matches, primary_id);
        if !demote.is_empty() {
            self.store
                .demote_to_secondary(&demote, primary_id)
                .await
                .map_err(ResolveError::store)?;
            tracing::info!(
                demoted = demote.len(),
                surviving_primary = %primary_id,
                "merged clusters"
            );
        }

        let members = self
            .store
            .find_cluster(primary_id)
            .await
            .map_err(ResolveError::store)?;

        Ok(ClusterView::from_members(primary_id, &members))
    }
}
