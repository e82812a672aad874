//! Discrete scoring events and the signals a transition raises.

use serde::{Deserialize, Serialize};

use crate::domain::state::{Innings, OutType, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraKind {
    Wide,
    #[serde(rename = "noball")]
    NoBall,
    Byes,
    #[serde(rename = "legbyes")]
    LegByes,
}

impl ExtraKind {
    /// Byes and leg-byes count toward the over; wides and no-balls do not.
    pub fn is_legal_delivery(self) -> bool {
        matches!(self, ExtraKind::Byes | ExtraKind::LegByes)
    }

    /// Wide and no-ball runs are charged to the bowler.
    pub fn charged_to_bowler(self) -> bool {
        !self.is_legal_delivery()
    }

    /// The striker is considered to have faced every delivery except a wide.
    pub fn counts_as_ball_faced(self) -> bool {
        !matches!(self, ExtraKind::Wide)
    }
}

/// One scoring action issued by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScoringEvent {
    /// Runs off the bat (0..=6).
    Runs { runs: u8 },
    /// Extra of `kind`, total runs 1..=7.
    Extra { kind: ExtraKind, runs: u8 },
    /// Dismissal; `dismissed` defaults to the striker.
    #[serde(rename_all = "camelCase")]
    Wicket {
        out_type: OutType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dismissed_player_id: Option<PlayerId>,
    },
    #[serde(rename_all = "camelCase")]
    NewBatter { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    NewBowler { player_id: PlayerId },
}

impl ScoringEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringEvent::Runs { .. } => "runs",
            ScoringEvent::Extra { .. } => "extra",
            ScoringEvent::Wicket { .. } => "wicket",
            ScoringEvent::NewBatter { .. } => "newBatter",
            ScoringEvent::NewBowler { .. } => "newBowler",
        }
    }
}

/// Control-flow prompt raised by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Signal {
    /// The ball just recorded was the sixth legal delivery of the over.
    OverCompleted,
    NewBatterRequired,
    NewBowlerRequired,
    /// A new bowler is needed, but only after the pending batter is confirmed.
    NewBowlerDeferred,
    InningsEnded,
    MatchEnded,
}

/// Next innings value plus the signals raised producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    pub innings: Innings,
    pub signals: Vec<Signal>,
}

impl EventOutcome {
    pub fn has(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }
}
