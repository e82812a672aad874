use serde::Serialize;

use crate::domain::match_flow::{MatchPhase, MatchResult};
use crate::domain::overlay::OverlayView;
use crate::realtime::PublishedSnapshot;

pub const PROTOCOL_VERSION: u32 = 1;

/// Messages pushed to overlay observers. Clients never send commands over
/// the socket; scoring goes through the HTTP API.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg<'a> {
    #[serde(rename_all = "camelCase")]
    Hello { protocol: u32, match_id: &'a str },

    #[serde(rename_all = "camelCase")]
    Overlay {
        match_id: &'a str,
        version: u64,
        phase: MatchPhase,
        overlay: Option<&'a OverlayView>,
        result: Option<&'a MatchResult>,
    },

    Error { message: String },
}

impl<'a> ServerMsg<'a> {
    pub fn overlay(snapshot: &'a PublishedSnapshot) -> Self {
        ServerMsg::Overlay {
            match_id: &snapshot.match_id,
            version: snapshot.version,
            phase: snapshot.phase,
            overlay: snapshot.overlay.as_ref(),
            result: snapshot.result.as_ref(),
        }
    }
}
