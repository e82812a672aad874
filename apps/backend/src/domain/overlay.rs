//! Read-only projections for the broadcast overlay and scorecard tables.

use serde::Serialize;

use crate::domain::match_flow::{MatchPhase, MatchResult, MatchState};
use crate::domain::rules::OversNotation;
use crate::domain::state::{BattingEntry, BowlingEntry, Innings, OutType, PlayerId, TeamId};
use crate::domain::stats::{
    chase_status, current_run_rate, economy_rate, partnership, round_for_display, strike_rate,
    ChaseStatus, Partnership,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterLine {
    pub player_id: PlayerId,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub on_strike: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerLine {
    pub player_id: PlayerId,
    pub overs: String,
    pub runs: u32,
    pub wickets: u32,
    pub economy: f64,
}

/// Everything a streaming overlay shows for the live innings.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
    pub innings_no: u8,
    pub phase: MatchPhase,
    pub batting_team_id: TeamId,
    pub bowling_team_id: TeamId,
    /// `"151/3"`
    pub score: String,
    /// `"18.4"`
    pub overs: String,
    pub run_rate: f64,
    pub striker: Option<BatterLine>,
    pub non_striker: Option<BatterLine>,
    pub bowler: Option<BowlerLine>,
    pub partnership: Partnership,
    pub chase: Option<ChaseStatus>,
    pub result: Option<MatchResult>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingRow {
    pub batting_order: u32,
    #[serde(flatten)]
    pub line: BatterLine,
    pub dismissal: Option<OutType>,
    pub dismissed_by: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasLine {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub innings_no: u8,
    pub batting_team_id: TeamId,
    pub bowling_team_id: TeamId,
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlerLine>,
    pub extras: ExtrasLine,
    pub score: String,
    pub overs: String,
    pub run_rate: f64,
}

fn score_line(innings: &Innings) -> String {
    format!("{}/{}", innings.runs, innings.wickets)
}

fn batter_line(entry: &BattingEntry, on_strike: bool) -> BatterLine {
    BatterLine {
        player_id: entry.player_id.clone(),
        runs: entry.runs_scored,
        balls: entry.balls_faced,
        fours: entry.buckets.fours,
        sixes: entry.buckets.sixes,
        strike_rate: round_for_display(strike_rate(entry.runs_scored, entry.balls_faced)),
        on_strike,
    }
}

fn bowler_line(entry: &BowlingEntry) -> BowlerLine {
    BowlerLine {
        player_id: entry.player_id.clone(),
        overs: OversNotation::from_balls(entry.total_balls_bowled).to_string(),
        runs: entry.runs_conceded,
        wickets: entry.wickets.len() as u32,
        economy: round_for_display(economy_rate(entry.runs_conceded, entry.total_balls_bowled)),
    }
}

fn crease_line(innings: &Innings, slot: &Option<PlayerId>, on_strike: bool) -> Option<BatterLine> {
    slot.as_deref()
        .and_then(|id| innings.batting_entry(id))
        .map(|entry| batter_line(entry, on_strike))
}

/// Overlay for the current innings; `None` before the toss.
pub fn overlay(state: &MatchState) -> Option<OverlayView> {
    let innings = state.current_innings()?;
    // The bowler line sticks around between overs so the overlay is not blank.
    let bowler_id = innings
        .current_bowler_id
        .as_ref()
        .or(innings.previous_over_bowler_id.as_ref());
    let chase = state
        .first_innings_runs()
        .map(|first| chase_status(innings, &state.setup.rules, first));

    Some(OverlayView {
        innings_no: state.innings_no(),
        phase: state.phase(),
        batting_team_id: innings.batting_team_id.clone(),
        bowling_team_id: innings.bowling_team_id.clone(),
        score: score_line(innings),
        overs: OversNotation::from_balls(innings.total_balls).to_string(),
        run_rate: round_for_display(current_run_rate(innings)),
        striker: crease_line(innings, &innings.crease.striker, true),
        non_striker: crease_line(innings, &innings.crease.non_striker, false),
        bowler: bowler_id
            .and_then(|id| innings.bowling_entry(id))
            .map(bowler_line),
        partnership: partnership(innings),
        chase,
        result: state.result(),
    })
}

pub fn scorecard(innings: &Innings, innings_no: u8) -> Scorecard {
    let striker = innings.crease.striker.as_deref();
    let batting = innings
        .batting
        .iter()
        .map(|entry| BattingRow {
            batting_order: entry.batting_order,
            line: batter_line(entry, striker == Some(entry.player_id.as_str())),
            dismissal: entry.dismissal.as_ref().map(|d| d.out_type),
            dismissed_by: entry.dismissal.as_ref().and_then(|d| d.bowler_id.clone()),
        })
        .collect();

    Scorecard {
        innings_no,
        batting_team_id: innings.batting_team_id.clone(),
        bowling_team_id: innings.bowling_team_id.clone(),
        batting,
        bowling: innings.bowling.iter().map(bowler_line).collect(),
        extras: ExtrasLine {
            wides: innings.extras.wides,
            no_balls: innings.extras.no_balls,
            byes: innings.extras.byes,
            leg_byes: innings.extras.leg_byes,
            total: innings.extras.total(),
        },
        score: score_line(innings),
        overs: OversNotation::from_balls(innings.total_balls).to_string(),
        run_rate: round_for_display(current_run_rate(innings)),
    }
}

/// Scorecards for every innings played so far.
pub fn scorecards(state: &MatchState) -> Vec<Scorecard> {
    state
        .innings
        .iter()
        .enumerate()
        .map(|(idx, innings)| scorecard(innings, idx as u8 + 1))
        .collect()
}
