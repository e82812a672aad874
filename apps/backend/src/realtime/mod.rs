pub mod hub;
pub mod snapshot;

pub use hub::{SnapshotHub, SnapshotReceiver};
pub use snapshot::PublishedSnapshot;
