//! Contact store boundary.
//!
//! This module defines the query/mutation contract the resolver requires
//! from its relational store, without making storage assumptions, plus the
//! two adapters: an in-memory store for tests and `DATABASE_URL`-less dev
//! runs, and the sqlx/Postgres store used in production.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryContactStore;
pub use postgres::PostgresContactStore;
pub use r#trait::{ContactStore, ContactStoreError, NewContact};
