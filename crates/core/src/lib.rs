//! `linkwise-core` — domain foundation for identity resolution.
//!
//! This crate contains **pure domain** types (no infrastructure concerns):
//! the `Contact` entity, the validated identify request, the consolidated
//! cluster view, and the resolver's error surface.

pub mod cluster;
pub mod contact;
pub mod error;
pub mod request;

pub use cluster::ClusterView;
pub use contact::{Contact, ContactId, LinkPrecedence};
pub use error::{ResolveError, ResolveResult};
pub use request::IdentifyRequest;
