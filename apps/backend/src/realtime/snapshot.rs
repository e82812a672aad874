use serde::Serialize;

use crate::domain::document::LiveScoreDoc;
use crate::domain::match_flow::{MatchPhase, MatchResult, MatchState};
use crate::domain::overlay::{self, OverlayView, Scorecard};

/// Everything a reader needs about one saved version of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSnapshot {
    pub match_id: String,
    pub version: u64,
    pub document: LiveScoreDoc,
    pub phase: MatchPhase,
    pub overlay: Option<OverlayView>,
    pub scorecards: Vec<Scorecard>,
    pub result: Option<MatchResult>,
}

impl PublishedSnapshot {
    pub fn from_state(match_id: &str, version: u64, state: &MatchState) -> Self {
        Self {
            match_id: match_id.to_string(),
            version,
            document: state.to_document(),
            phase: state.phase(),
            overlay: overlay::overlay(state),
            scorecards: overlay::scorecards(state),
            result: state.result(),
        }
    }
}
