//! Collaborator ports used by the scoring service.
//!
//! The core never talks to storage, the fixture registry or the identity
//! provider directly; adapters implement these traits.

use async_trait::async_trait;

use crate::domain::document::LiveScoreDoc;
use crate::domain::match_flow::{MatchSetup, Rosters};
use crate::errors::domain::DomainError;

/// Version of a match that has never been saved.
pub const UNSAVED_VERSION: u64 = 0;

/// A stored live-score document and its write version.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMatch {
    pub doc: LiveScoreDoc,
    pub version: u64,
}

/// Immutable-for-the-match facts from the match/team/player registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredMatch {
    pub match_id: String,
    pub setup: MatchSetup,
    pub rosters: Rosters,
    /// `sub` of the user allowed to score this match.
    pub owner_sub: String,
}

/// Whole-document persistence for live-score documents.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn load(&self, match_id: &str) -> Result<Option<StoredMatch>, DomainError>;

    /// Replace the document atomically. Fails with
    /// `Conflict(OptimisticLock)` when the stored version is not
    /// `expected_version` (`UNSAVED_VERSION` for a first write); returns the
    /// new version.
    async fn save(
        &self,
        match_id: &str,
        doc: &LiveScoreDoc,
        expected_version: u64,
    ) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait MatchRegistry: Send + Sync {
    async fn find(&self, match_id: &str) -> Result<Option<RegisteredMatch>, DomainError>;
}

/// Decides who may issue scoring commands for a match.
#[async_trait]
pub trait MatchAuthorizer: Send + Sync {
    async fn can_score(&self, user_sub: &str, registered: &RegisteredMatch) -> Result<bool, DomainError>;
}
