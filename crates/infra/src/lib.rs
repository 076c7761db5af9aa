//! Infrastructure layer: contact store adapters and the resolver that
//! drives them.

pub mod contact_store;
pub mod ident_lock;
pub mod resolver;


pub use contact_store::{
    ContactStore, ContactStoreError, InMemoryContactStore, NewContact, PostgresContactStore,
};
pub use resolver::IdentityResolver;
