//! Domain layer: pure scoring logic, no I/O.

pub mod document;
pub mod events;
pub mod match_flow;
pub mod overlay;
pub mod processor;
pub mod rules;
pub mod state;
pub mod stats;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_processor;
#[cfg(test)]
mod tests_props;

// Re-exports for ergonomics
pub use document::LiveScoreDoc;
pub use events::{EventOutcome, ExtraKind, ScoringEvent, Signal};
pub use match_flow::{
    MatchOutcome, MatchPhase, MatchResult, MatchSetup, MatchState, MatchStatus, Rosters,
    TeamRoster, Toss, TossDecision, WinMargin,
};
pub use overlay::{OverlayView, Scorecard};
pub use processor::InningsContext;
pub use rules::MatchRules;
pub use state::{Innings, OutType, PlayerId, TeamId};
