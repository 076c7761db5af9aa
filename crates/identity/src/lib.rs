//! `linkwise-identity` — the reconciliation algorithm, free of I/O.
//!
//! Everything here operates on slices of already-fetched [`Contact`] rows;
//! the store round-trips live in `linkwise-infra`. Keeping the decision
//! logic pure makes the matching/merge rules unit-testable in isolation.
//!
//! [`Contact`]: linkwise_core::Contact

pub mod reconcile;

pub use reconcile::{demotion_targets, elect_primary, introduces_new_information};
