//! Registered matches and a store whose saves can be made to fail.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use crease::adapters::{InMemoryMatchStore, InMemoryRegistry, OwnerAuthorizer};
use crease::domain::document::LiveScoreDoc;
use crease::domain::match_flow::{MatchSetup, Rosters, TeamRoster};
use crease::domain::rules::MatchRules;
use crease::errors::domain::DomainError;
use crease::realtime::SnapshotHub;
use crease::repos::matches::{MatchStore, RegisteredMatch, StoredMatch};
use crease::services::LiveScoringService;
use crease::state::{AppState, SecurityConfig};

pub const MATCH_ID: &str = "final";
pub const OWNER: &str = "scorer-1";
pub const HOME: &str = "lions";
pub const AWAY: &str = "tigers";

/// Lions (`L1..Ln`) against tigers (`T1..Tn`), owned by [`OWNER`].
pub fn registered_match(overs: u32, players: u32, allow_consecutive_overs: bool) -> RegisteredMatch {
    let rules = MatchRules::new(overs, players)
        .expect("valid rules")
        .with_consecutive_overs_allowed(allow_consecutive_overs);
    let roster = |team: &str, prefix: char| {
        TeamRoster::new(team, (1..=players).map(|n| format!("{prefix}{n}")))
    };
    RegisteredMatch {
        match_id: MATCH_ID.to_string(),
        setup: MatchSetup {
            team1_id: HOME.to_string(),
            team2_id: AWAY.to_string(),
            rules,
        },
        rosters: Rosters::new(vec![roster(HOME, 'L'), roster(AWAY, 'T')]),
        owner_sub: OWNER.to_string(),
    }
}

/// In-memory store with a switch that makes every save fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryMatchStore,
    fail_saves: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MatchStore for FlakyStore {
    async fn load(&self, match_id: &str) -> Result<Option<StoredMatch>, DomainError> {
        self.inner.load(match_id).await
    }

    async fn save(
        &self,
        match_id: &str,
        doc: &LiveScoreDoc,
        expected_version: u64,
    ) -> Result<u64, DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::persistence("document store unavailable"));
        }
        self.inner.save(match_id, doc, expected_version).await
    }
}

pub struct ScoringHarness {
    pub service: Arc<LiveScoringService>,
    pub store: Arc<FlakyStore>,
    pub hub: Arc<SnapshotHub>,
    pub security: SecurityConfig,
}

impl ScoringHarness {
    pub fn app_state(&self) -> AppState {
        AppState::new(self.security.clone(), self.service.clone())
    }

    /// A second service over the same store, with a cold snapshot hub.
    pub fn restarted(&self, registered: RegisteredMatch) -> LiveScoringService {
        let registry = InMemoryRegistry::new();
        registry.insert(registered);
        LiveScoringService::new(
            self.store.clone(),
            Arc::new(registry),
            Arc::new(OwnerAuthorizer),
            Arc::new(SnapshotHub::new()),
        )
    }
}

pub fn harness(registered: RegisteredMatch) -> ScoringHarness {
    let registry = InMemoryRegistry::new();
    registry.insert(registered);
    let store = Arc::new(FlakyStore::default());
    let hub = Arc::new(SnapshotHub::new());
    let service = Arc::new(LiveScoringService::new(
        store.clone(),
        Arc::new(registry),
        Arc::new(OwnerAuthorizer),
        hub.clone(),
    ));
    ScoringHarness {
        service,
        store,
        hub,
        security: SecurityConfig::new("integration_test_secret"),
    }
}
