//! Entity store boundary.
//!
//! Storage is an external collaborator; this module defines the contract the
//! services rely on and an in-memory implementation used by the binary and
//! the tests.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEntityStore;
pub use r#trait::{DeletedCustomer, EntityStore, StoreSummary};
