//! Match orchestration: toss, innings sequencing and selection prompts.
//!
//! `MatchState` owns at most two innings. The current phase is always derived
//! from the innings values themselves, so a persisted snapshot carries
//! everything needed to resume scoring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::events::{ScoringEvent, Signal};
use crate::domain::processor::{self, innings_complete, InningsContext};
use crate::domain::rules::MatchRules;
use crate::domain::state::{Innings, PlayerId, TeamId};
use crate::errors::domain::{DomainError, ValidationKind};

pub const INNINGS_PER_MATCH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toss {
    pub winner_id: TeamId,
    pub decision: TossDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
}

/// Immutable-for-the-match facts from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSetup {
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub rules: MatchRules,
}

impl MatchSetup {
    pub fn opponent_of(&self, team_id: &str) -> Result<TeamId, DomainError> {
        if team_id == self.team1_id {
            Ok(self.team2_id.clone())
        } else if team_id == self.team2_id {
            Ok(self.team1_id.clone())
        } else {
            Err(DomainError::validation(
                ValidationKind::InvalidTeam,
                format!("Team {team_id} is not playing this match"),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRoster {
    pub team_id: TeamId,
    pub players: BTreeSet<PlayerId>,
}

impl TeamRoster {
    pub fn new<I, P>(team_id: impl Into<TeamId>, players: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PlayerId>,
    {
        Self {
            team_id: team_id.into(),
            players: players.into_iter().map(Into::into).collect(),
        }
    }

    pub fn require_member(&self, player_id: &str) -> Result<(), DomainError> {
        if !self.players.contains(player_id) {
            return Err(DomainError::validation(
                ValidationKind::NotOnRoster,
                format!("Player {player_id} is not on the roster of {}", self.team_id),
            ));
        }
        Ok(())
    }
}

/// Eligible players for both teams.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rosters {
    pub teams: Vec<TeamRoster>,
}

impl Rosters {
    pub fn new(teams: Vec<TeamRoster>) -> Self {
        Self { teams }
    }

    pub fn for_team(&self, team_id: &str) -> Result<&TeamRoster, DomainError> {
        self.teams
            .iter()
            .find(|r| r.team_id == team_id)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidTeam,
                    format!("No roster registered for team {team_id}"),
                )
            })
    }
}

/// Where the match is in its lifecycle; `innings_no` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum MatchPhase {
    AwaitingToss,
    #[serde(rename_all = "camelCase")]
    AwaitingOpeningPlayers { innings_no: u8 },
    #[serde(rename_all = "camelCase")]
    InningsInProgress { innings_no: u8 },
    #[serde(rename_all = "camelCase")]
    AwaitingNewBatter { innings_no: u8 },
    #[serde(rename_all = "camelCase")]
    AwaitingNewBowler { innings_no: u8 },
    #[serde(rename_all = "camelCase")]
    InningsEnded { innings_no: u8 },
    MatchEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum WinMargin {
    Runs(u32),
    Wickets(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MatchResult {
    #[serde(rename_all = "camelCase")]
    Won { team_id: TeamId, margin: WinMargin },
    Tied,
}

/// New match value plus the signals raised producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub state: MatchState,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub setup: MatchSetup,
    pub toss: Option<Toss>,
    pub status: MatchStatus,
    pub innings: Vec<Innings>,
}

impl MatchState {
    pub fn new(setup: MatchSetup) -> Self {
        Self {
            setup,
            toss: None,
            status: MatchStatus::Upcoming,
            innings: Vec::new(),
        }
    }

    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings.last()
    }

    /// 1-based number of the current innings (0 before the toss).
    pub fn innings_no(&self) -> u8 {
        self.innings.len() as u8
    }

    pub fn first_innings_runs(&self) -> Option<u32> {
        (self.innings.len() >= INNINGS_PER_MATCH).then(|| self.innings[0].runs)
    }

    /// Innings-end inputs for the innings at `index` (0-based).
    pub fn context_for(&self, index: usize) -> InningsContext {
        match index {
            0 => InningsContext::first(self.setup.rules),
            _ => InningsContext::chasing(self.setup.rules, self.innings[0].runs),
        }
    }

    fn current_context(&self) -> InningsContext {
        self.context_for(self.innings.len().saturating_sub(1))
    }

    pub fn phase(&self) -> MatchPhase {
        if self.status == MatchStatus::Completed {
            return MatchPhase::MatchEnded;
        }
        let Some(current) = self.current_innings() else {
            return MatchPhase::AwaitingToss;
        };
        let innings_no = self.innings_no();
        if innings_complete(current, &self.current_context()) {
            return if self.innings.len() >= INNINGS_PER_MATCH {
                MatchPhase::MatchEnded
            } else {
                MatchPhase::InningsEnded { innings_no }
            };
        }
        if !current.openers_confirmed() {
            MatchPhase::AwaitingOpeningPlayers { innings_no }
        } else if current.crease.has_vacancy() {
            MatchPhase::AwaitingNewBatter { innings_no }
        } else if current.current_bowler_id.is_none() {
            MatchPhase::AwaitingNewBowler { innings_no }
        } else {
            MatchPhase::InningsInProgress { innings_no }
        }
    }

    /// Resolve the toss and open the first innings.
    pub fn record_toss(&self, toss: Toss) -> Result<MatchOutcome, DomainError> {
        if self.phase() != MatchPhase::AwaitingToss {
            return Err(DomainError::invalid_state("The toss has already been recorded"));
        }
        let loser = self.setup.opponent_of(&toss.winner_id)?;
        let (batting, bowling) = match toss.decision {
            TossDecision::Bat => (toss.winner_id.clone(), loser),
            TossDecision::Bowl => (loser, toss.winner_id.clone()),
        };

        let mut next = self.clone();
        next.toss = Some(toss);
        next.status = MatchStatus::Live;
        next.innings.push(Innings::new(batting, bowling));
        Ok(MatchOutcome {
            state: next,
            signals: Vec::new(),
        })
    }

    pub fn confirm_openers(
        &self,
        rosters: &Rosters,
        striker: &str,
        non_striker: &str,
        bowler: &str,
    ) -> Result<MatchOutcome, DomainError> {
        let MatchPhase::AwaitingOpeningPlayers { .. } = self.phase() else {
            return Err(DomainError::invalid_state(
                "Opening players can only be chosen at the start of an innings",
            ));
        };
        let current = self.require_current()?;
        let batting = rosters.for_team(&current.batting_team_id)?;
        batting.require_member(striker)?;
        batting.require_member(non_striker)?;
        rosters.for_team(&current.bowling_team_id)?.require_member(bowler)?;

        let outcome = processor::confirm_openers(
            current,
            &self.current_context(),
            striker,
            non_striker,
            bowler,
        )?;
        Ok(self.replace_current(outcome.innings, outcome.signals))
    }

    /// Apply one scoring event to the current innings.
    pub fn apply(&self, rosters: &Rosters, event: &ScoringEvent) -> Result<MatchOutcome, DomainError> {
        match self.phase() {
            MatchPhase::AwaitingToss => {
                return Err(DomainError::invalid_state("The toss has not been recorded"))
            }
            MatchPhase::InningsEnded { .. } | MatchPhase::MatchEnded => {
                return Err(DomainError::invalid_state("Innings has already ended"))
            }
            _ => {}
        }
        let current = self.require_current()?;
        match event {
            ScoringEvent::NewBatter { player_id } => rosters
                .for_team(&current.batting_team_id)?
                .require_member(player_id)?,
            ScoringEvent::NewBowler { player_id } => rosters
                .for_team(&current.bowling_team_id)?
                .require_member(player_id)?,
            _ => {}
        }

        let outcome = processor::apply_event(current, &self.current_context(), event)?;
        Ok(self.replace_current(outcome.innings, outcome.signals))
    }

    /// Open the chasing innings with batting/bowling sides swapped.
    pub fn start_next_innings(&self) -> Result<MatchOutcome, DomainError> {
        let MatchPhase::InningsEnded { .. } = self.phase() else {
            return Err(DomainError::invalid_state(
                "The next innings can only start after the current innings ends",
            ));
        };
        let first = self.require_current()?;
        let chasing = Innings::new(first.bowling_team_id.clone(), first.batting_team_id.clone());

        let mut next = self.clone();
        next.innings.push(chasing);
        Ok(MatchOutcome {
            state: next,
            signals: Vec::new(),
        })
    }

    /// Winner and margin once the match has ended.
    pub fn result(&self) -> Option<MatchResult> {
        if self.phase() != MatchPhase::MatchEnded || self.innings.len() < INNINGS_PER_MATCH {
            return None;
        }
        let first = &self.innings[0];
        let chase = &self.innings[1];
        let result = if chase.runs > first.runs {
            MatchResult::Won {
                team_id: chase.batting_team_id.clone(),
                margin: WinMargin::Wickets(self.setup.rules.max_wickets() - chase.wickets),
            }
        } else if chase.runs < first.runs {
            MatchResult::Won {
                team_id: first.batting_team_id.clone(),
                margin: WinMargin::Runs(first.runs - chase.runs),
            }
        } else {
            MatchResult::Tied
        };
        Some(result)
    }

    fn require_current(&self) -> Result<&Innings, DomainError> {
        self.current_innings()
            .ok_or_else(|| DomainError::invalid_state("No innings is in progress"))
    }

    fn replace_current(&self, innings: Innings, signals: Vec<Signal>) -> MatchOutcome {
        let mut next = self.clone();
        if let Some(slot) = next.innings.last_mut() {
            *slot = innings;
        }
        if signals.contains(&Signal::MatchEnded) {
            next.status = MatchStatus::Completed;
        }
        MatchOutcome {
            state: next,
            signals,
        }
    }
}
