//! In-process document store.
//!
//! Documents are kept as JSON values, the same shape a remote document store
//! holds, so every load goes through the validating decoder.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::domain::document::LiveScoreDoc;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::matches::{MatchStore, StoredMatch, UNSAVED_VERSION};

#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    docs: RwLock<HashMap<String, (Value, u64)>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn load(&self, match_id: &str) -> Result<Option<StoredMatch>, DomainError> {
        let entry = self.docs.read().get(match_id).cloned();
        let Some((value, version)) = entry else {
            return Ok(None);
        };
        let doc: LiveScoreDoc = serde_json::from_value(value).map_err(|e| {
            DomainError::corrupt(format!("Stored document for {match_id} does not decode: {e}"))
        })?;
        Ok(Some(StoredMatch { doc, version }))
    }

    async fn save(
        &self,
        match_id: &str,
        doc: &LiveScoreDoc,
        expected_version: u64,
    ) -> Result<u64, DomainError> {
        let value = serde_json::to_value(doc)
            .map_err(|e| DomainError::persistence(format!("Failed to encode document: {e}")))?;

        let mut docs = self.docs.write();
        let current = docs
            .get(match_id)
            .map(|(_, version)| *version)
            .unwrap_or(UNSAVED_VERSION);
        if current != expected_version {
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!("Match {match_id} is at version {current}, expected {expected_version}"),
            ));
        }
        let next = current + 1;
        docs.insert(match_id.to_string(), (value, next));
        debug!(match_id, version = next, "document saved");
        Ok(next)
    }
}
