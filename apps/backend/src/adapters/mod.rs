//! In-process implementations of the collaborator ports in `crate::repos`.

pub mod memory_registry;
pub mod memory_store;
pub mod owner_authorizer;

pub use memory_registry::InMemoryRegistry;
pub use memory_store::InMemoryMatchStore;
pub use owner_authorizer::OwnerAuthorizer;
