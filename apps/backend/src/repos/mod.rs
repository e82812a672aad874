//! Repository ports (traits) implemented by `crate::adapters`.

pub mod matches;

pub use matches::{MatchAuthorizer, MatchRegistry, MatchStore, RegisteredMatch, StoredMatch};
