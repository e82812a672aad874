//! Scoring service: the asynchronous shell around the pure match core.
//!
//! Each command runs load → authorize → transition → save → publish. The
//! transition is computed on a fresh value; if the save fails that value is
//! dropped and the stored document stays authoritative.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::document::LiveScoreDoc;
use crate::domain::events::{ScoringEvent, Signal};
use crate::domain::match_flow::{
    MatchOutcome, MatchPhase, MatchResult, MatchState, Toss, TossDecision,
};
use crate::domain::state::{PlayerId, TeamId};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::realtime::{PublishedSnapshot, SnapshotHub, SnapshotReceiver};
use crate::repos::matches::{
    MatchAuthorizer, MatchRegistry, MatchStore, RegisteredMatch, UNSAVED_VERSION,
};

/// One operator action against a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringCommand {
    Toss {
        winner_id: TeamId,
        decision: TossDecision,
    },
    Openers {
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    },
    Event(ScoringEvent),
    StartNextInnings,
}

impl ScoringCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringCommand::Toss { .. } => "toss",
            ScoringCommand::Openers { .. } => "openers",
            ScoringCommand::Event(event) => event.name(),
            ScoringCommand::StartNextInnings => "startNextInnings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub version: u64,
    pub phase: MatchPhase,
    pub signals: Vec<Signal>,
    pub result: Option<MatchResult>,
}

pub struct LiveScoringService {
    store: Arc<dyn MatchStore>,
    registry: Arc<dyn MatchRegistry>,
    authorizer: Arc<dyn MatchAuthorizer>,
    hub: Arc<SnapshotHub>,
    writers: DashMap<String, Arc<Mutex<()>>>,
}

impl LiveScoringService {
    pub fn new(
        store: Arc<dyn MatchStore>,
        registry: Arc<dyn MatchRegistry>,
        authorizer: Arc<dyn MatchAuthorizer>,
        hub: Arc<SnapshotHub>,
    ) -> Self {
        Self {
            store,
            registry,
            authorizer,
            hub,
            writers: DashMap::new(),
        }
    }

    /// Apply one command as `actor_sub`.
    ///
    /// `expected_version`, when given, must equal the stored version or the
    /// command fails with `OPTIMISTIC_LOCK` before anything is computed.
    pub async fn execute(
        &self,
        match_id: &str,
        actor_sub: &str,
        command: ScoringCommand,
        expected_version: Option<u64>,
    ) -> Result<CommandOutcome, AppError> {
        let registered = self.require_match(match_id).await?;
        if !self.authorizer.can_score(actor_sub, &registered).await? {
            warn!(match_id, actor_sub, command = command.name(), "scoring command rejected");
            return Err(DomainError::not_authorized(format!(
                "User {actor_sub} may not score match {match_id}"
            ))
            .into());
        }

        // Commands for one match are applied one at a time in this process;
        // the store's version check covers writers in other processes.
        let writer = self.writer(match_id);
        let _guard = writer.lock().await;

        let (state, version) = self.load_state(&registered).await?;
        if let Some(expected) = expected_version {
            if expected != version {
                return Err(DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "Match was modified concurrently (expected version {expected}, actual version {version}). Please refresh and retry."
                    ),
                )
                .into());
            }
        }

        let MatchOutcome { state: next, signals } = transition(&state, &registered, &command)?;

        let new_version = match self
            .store
            .save(match_id, &next.to_document(), version)
            .await
        {
            Ok(v) => v,
            Err(err) => {
                warn!(match_id, command = command.name(), version, error = %err, "save failed; next state discarded");
                return Err(err.into());
            }
        };

        let snapshot = PublishedSnapshot::from_state(match_id, new_version, &next);
        let outcome = CommandOutcome {
            version: new_version,
            phase: snapshot.phase,
            signals,
            result: snapshot.result.clone(),
        };
        self.hub.publish(snapshot);

        info!(
            match_id,
            actor_sub,
            command = command.name(),
            version = new_version,
            signals = ?outcome.signals,
            "scoring command applied"
        );
        Ok(outcome)
    }

    /// Latest snapshot for a match, building it from the store on first read.
    pub async fn snapshot(&self, match_id: &str) -> Result<Arc<PublishedSnapshot>, AppError> {
        if let Some(latest) = self.hub.latest(match_id) {
            return Ok(latest);
        }
        let registered = self.require_match(match_id).await?;
        let (state, version) = self.load_state(&registered).await?;
        debug!(match_id, version, "snapshot built from store");
        Ok(Arc::new(PublishedSnapshot::from_state(match_id, version, &state)))
    }

    /// Observe every snapshot published for a registered match.
    ///
    /// A match with a stored document but nothing published yet (e.g. after a
    /// restart) is seeded from the store, so the receiver starts at the current
    /// snapshot.
    pub async fn subscribe(&self, match_id: &str) -> Result<SnapshotReceiver, AppError> {
        let registered = self.require_match(match_id).await?;
        if self.hub.latest(match_id).is_none() {
            let writer = self.writer(match_id);
            let _guard = writer.lock().await;
            // A command may have published while we waited for the lock.
            if self.hub.latest(match_id).is_none() {
                if let Some(stored) = self.store.load(match_id).await? {
                    let state = MatchState::from_parts(registered.setup.clone(), stored.doc)?;
                    self.hub
                        .publish(PublishedSnapshot::from_state(match_id, stored.version, &state));
                    debug!(match_id, version = stored.version, "hub seeded from store");
                }
            }
        }
        Ok(self.hub.subscribe(match_id))
    }

    fn writer(&self, match_id: &str) -> Arc<Mutex<()>> {
        self.writers
            .entry(match_id.to_string())
            .or_default()
            .clone()
    }

    async fn require_match(&self, match_id: &str) -> Result<RegisteredMatch, AppError> {
        self.registry.find(match_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Match, format!("Match {match_id} not found")).into()
        })
    }

    async fn load_state(&self, registered: &RegisteredMatch) -> Result<(MatchState, u64), AppError> {
        let (doc, version) = match self.store.load(&registered.match_id).await? {
            Some(stored) => (stored.doc, stored.version),
            None => (LiveScoreDoc::upcoming(), UNSAVED_VERSION),
        };
        let state = MatchState::from_parts(registered.setup.clone(), doc)?;
        Ok((state, version))
    }
}

fn transition(
    state: &MatchState,
    registered: &RegisteredMatch,
    command: &ScoringCommand,
) -> Result<MatchOutcome, DomainError> {
    match command {
        ScoringCommand::Toss {
            winner_id,
            decision,
        } => state.record_toss(Toss {
            winner_id: winner_id.clone(),
            decision: *decision,
        }),
        ScoringCommand::Openers {
            striker,
            non_striker,
            bowler,
        } => state.confirm_openers(&registered.rosters, striker, non_striker, bowler),
        ScoringCommand::Event(event) => state.apply(&registered.rosters, event),
        ScoringCommand::StartNextInnings => state.start_next_innings(),
    }
}
