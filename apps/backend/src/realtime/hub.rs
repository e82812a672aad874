//! Latest-value fan-out of published snapshots.
//!
//! One `watch` channel per match. Publishing overwrites the previous value,
//! so a slow observer skips straight to the newest snapshot.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::trace;

use super::snapshot::PublishedSnapshot;

pub type SnapshotReceiver = watch::Receiver<Option<Arc<PublishedSnapshot>>>;

#[derive(Debug, Default)]
pub struct SnapshotHub {
    channels: DashMap<String, watch::Sender<Option<Arc<PublishedSnapshot>>>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: PublishedSnapshot) {
        let match_id = snapshot.match_id.clone();
        let version = snapshot.version;
        self.channels
            .entry(match_id.clone())
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(Arc::new(snapshot)));
        trace!(match_id = %match_id, version, "snapshot published");
    }

    /// Observe a match. The receiver starts at the latest snapshot, if any.
    pub fn subscribe(&self, match_id: &str) -> SnapshotReceiver {
        self.channels
            .entry(match_id.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    pub fn latest(&self, match_id: &str) -> Option<Arc<PublishedSnapshot>> {
        self.channels
            .get(match_id)
            .and_then(|sender| sender.borrow().clone())
    }
}
