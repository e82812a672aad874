//! Match/team/player registry held in memory.
//!
//! Deployments without a registry service load a JSON fixture at startup:
//!
//! ```json
//! { "matches": [ { "matchId": "m1", "team1Id": "A", "team2Id": "B",
//!     "overs": 20, "playersPerTeam": 11, "ownerSub": "scorer-1",
//!     "rosters": [ { "teamId": "A", "players": ["A1", "A2"] } ] } ] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::info;

use crate::domain::match_flow::{MatchSetup, Rosters, TeamRoster};
use crate::domain::rules::MatchRules;
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};
use crate::repos::matches::{MatchRegistry, RegisteredMatch};

#[derive(Debug, Deserialize)]
struct RegistryFixture {
    matches: Vec<MatchFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchFixture {
    match_id: String,
    team1_id: String,
    team2_id: String,
    overs: u32,
    players_per_team: u32,
    owner_sub: String,
    rosters: Vec<TeamRoster>,
}

impl MatchFixture {
    fn into_registered(self, allow_consecutive_overs: bool) -> Result<RegisteredMatch, DomainError> {
        if self.team1_id == self.team2_id {
            return Err(DomainError::validation(
                ValidationKind::InvalidTeam,
                format!("Match {} lists {} twice", self.match_id, self.team1_id),
            ));
        }
        let rules = MatchRules::new(self.overs, self.players_per_team)?
            .with_consecutive_overs_allowed(allow_consecutive_overs);
        let rosters = Rosters::new(self.rosters);
        rosters.for_team(&self.team1_id)?;
        rosters.for_team(&self.team2_id)?;

        Ok(RegisteredMatch {
            match_id: self.match_id,
            setup: MatchSetup {
                team1_id: self.team1_id,
                team2_id: self.team2_id,
                rules,
            },
            rosters,
            owner_sub: self.owner_sub,
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    matches: RwLock<HashMap<String, RegisteredMatch>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, registered: RegisteredMatch) {
        self.matches
            .write()
            .insert(registered.match_id.clone(), registered);
    }

    pub fn len(&self) -> usize {
        self.matches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a registry fixture. Every match is validated up front so a bad
    /// fixture fails at startup rather than on the first scoring command.
    pub fn from_json(json: &str, allow_consecutive_overs: bool) -> Result<Self, DomainError> {
        let fixture: RegistryFixture = serde_json::from_str(json).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("RegistryFixture".into()),
                format!("Registry fixture is not valid JSON: {e}"),
            )
        })?;
        let registry = Self::new();
        for entry in fixture.matches {
            registry.insert(entry.into_registered(allow_consecutive_overs)?);
        }
        Ok(registry)
    }

    pub fn from_json_file(
        path: impl AsRef<Path>,
        allow_consecutive_overs: bool,
    ) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("RegistryFixture".into()),
                format!("Cannot read registry fixture {}: {e}", path.display()),
            )
        })?;
        let registry = Self::from_json(&json, allow_consecutive_overs)?;
        info!(path = %path.display(), matches = registry.len(), "registry fixture loaded");
        Ok(registry)
    }
}

#[async_trait]
impl MatchRegistry for InMemoryRegistry {
    async fn find(&self, match_id: &str) -> Result<Option<RegisteredMatch>, DomainError> {
        Ok(self.matches.read().get(match_id).cloned())
    }
}
