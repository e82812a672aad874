//! Test fixtures: standard two-team setup and a driver that plays events and
//! resolves selection prompts the way a scorer would.

use crate::domain::events::{ScoringEvent, Signal};
use crate::domain::match_flow::{
    MatchPhase, MatchSetup, MatchState, Rosters, TeamRoster, Toss, TossDecision,
};
use crate::domain::rules::MatchRules;
use crate::domain::state::{Innings, PlayerId};
use crate::errors::domain::DomainError;

pub const TEAM_A: &str = "A";
pub const TEAM_B: &str = "B";

/// `"A3"` is the third player of team A.
pub fn player(team: &str, n: u32) -> PlayerId {
    format!("{team}{n}")
}

pub fn setup(overs: u32, players: u32) -> MatchSetup {
    MatchSetup {
        team1_id: TEAM_A.into(),
        team2_id: TEAM_B.into(),
        rules: MatchRules::new(overs, players).unwrap(),
    }
}

pub fn rosters_for(setup: &MatchSetup) -> Rosters {
    let n = setup.rules.players_per_team;
    Rosters::new(vec![
        TeamRoster::new(setup.team1_id.clone(), (1..=n).map(|i| player(&setup.team1_id, i))),
        TeamRoster::new(setup.team2_id.clone(), (1..=n).map(|i| player(&setup.team2_id, i))),
    ])
}

/// Drives a `MatchState` through events, auto-selecting the next unused
/// batter and alternating the first two bowlers.
pub struct Driver {
    pub state: MatchState,
    pub rosters: Rosters,
    pub last_signals: Vec<Signal>,
}

impl Driver {
    pub fn new(setup: MatchSetup) -> Self {
        let rosters = rosters_for(&setup);
        Self {
            state: MatchState::new(setup),
            rosters,
            last_signals: Vec::new(),
        }
    }

    /// Team A bats first; openers A1/A2, B1 bowls.
    pub fn started(setup: MatchSetup) -> Self {
        let mut driver = Self::new(setup);
        driver.toss(TEAM_A, TossDecision::Bat);
        driver.open_innings();
        driver
    }

    pub fn toss(&mut self, winner: &str, decision: TossDecision) {
        let outcome = self
            .state
            .record_toss(Toss {
                winner_id: winner.into(),
                decision,
            })
            .unwrap();
        self.state = outcome.state;
        self.last_signals = outcome.signals;
    }

    /// Confirm players 1 and 2 of the batting side and player 1 of the
    /// bowling side.
    pub fn open_innings(&mut self) {
        let innings = self.innings();
        let bat = innings.batting_team_id.clone();
        let bowl = innings.bowling_team_id.clone();
        let outcome = self
            .state
            .confirm_openers(
                &self.rosters,
                &player(&bat, 1),
                &player(&bat, 2),
                &player(&bowl, 1),
            )
            .unwrap();
        self.state = outcome.state;
        self.last_signals = outcome.signals;
    }

    pub fn innings(&self) -> &Innings {
        self.state.current_innings().unwrap()
    }

    /// Apply one event exactly as given.
    pub fn try_apply(&mut self, event: &ScoringEvent) -> Result<Vec<Signal>, DomainError> {
        let outcome = self.state.apply(&self.rosters, event)?;
        self.state = outcome.state;
        self.last_signals = outcome.signals.clone();
        Ok(outcome.signals)
    }

    /// Apply a delivery, then fill any resulting vacancy and bowler prompt.
    /// Returns the signals of the delivery itself.
    pub fn deliver(&mut self, event: ScoringEvent) -> Vec<Signal> {
        let signals = self.try_apply(&event).unwrap();
        self.resolve_prompts();
        signals
    }

    pub fn runs(&mut self, runs: u8) -> Vec<Signal> {
        self.deliver(ScoringEvent::Runs { runs })
    }

    pub fn resolve_prompts(&mut self) {
        loop {
            match self.state.phase() {
                MatchPhase::AwaitingNewBatter { .. } => {
                    let next = self.next_batter();
                    self.try_apply(&ScoringEvent::NewBatter { player_id: next })
                        .unwrap();
                }
                MatchPhase::AwaitingNewBowler { .. } => {
                    let next = self.next_bowler();
                    self.try_apply(&ScoringEvent::NewBowler { player_id: next })
                        .unwrap();
                }
                _ => return,
            }
        }
    }

    pub fn next_batter(&self) -> PlayerId {
        let innings = self.innings();
        (1..=self.state.setup.rules.players_per_team)
            .map(|i| player(&innings.batting_team_id, i))
            .find(|id| innings.batting_entry(id).is_none())
            .unwrap()
    }

    pub fn next_bowler(&self) -> PlayerId {
        let innings = self.innings();
        let first = player(&innings.bowling_team_id, 1);
        if innings.previous_over_bowler_id.as_deref() == Some(first.as_str()) {
            player(&innings.bowling_team_id, 2)
        } else {
            first
        }
    }

    pub fn is_innings_over(&self) -> bool {
        matches!(
            self.state.phase(),
            MatchPhase::InningsEnded { .. } | MatchPhase::MatchEnded
        )
    }
}
