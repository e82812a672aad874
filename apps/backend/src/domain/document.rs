//! Persisted document form of a match.
//!
//! Field names mirror the stored live-score documents exactly. Derived fields
//! (`overs`, `oversBowled`) are written for readers of the raw document and
//! recomputed on load, never trusted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::match_flow::{MatchSetup, MatchState, MatchStatus, Toss, TossDecision};
use crate::domain::state::{
    BattingEntry, BowlingEntry, Crease, Dismissal, Extras, Innings, OutType, PlayerId, RunBuckets,
    TeamId,
};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TossDoc {
    pub winner_id: TeamId,
    pub decision: TossDecision,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasDoc {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingEntryDoc {
    pub player_id: PlayerId,
    pub runs_scored: u32,
    pub balls_faced: u32,
    pub out: bool,
    pub out_type: Option<OutType>,
    pub out_by_player_id: Option<PlayerId>,
    pub sixes: u32,
    pub fours: u32,
    pub threes: u32,
    pub doubles: u32,
    pub singles: u32,
    pub dots: u32,
    pub batting_order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingEntryDoc {
    pub player_id: PlayerId,
    pub runs_conceded: u32,
    pub total_balls_bowled: u32,
    #[serde(default)]
    pub overs_bowled: f64,
    pub wickets: Vec<PlayerId>,
    pub sixes: u32,
    pub fours: u32,
    pub threes: u32,
    pub doubles: u32,
    pub singles: u32,
    pub dots: u32,
    pub bowling_order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsDoc {
    pub batting_team_id: TeamId,
    pub bowling_team_id: TeamId,
    pub runs: u32,
    pub wickets: u32,
    pub total_balls: u32,
    #[serde(default)]
    pub overs: f64,
    pub extras: ExtrasDoc,
    pub batting_entries: Vec<BattingEntryDoc>,
    pub bowling_entries: Vec<BowlingEntryDoc>,
    /// `[striker, nonStriker]`; `null` marks a pending replacement.
    pub batters_on_crease: [Option<PlayerId>; 2],
    pub current_bowler_id: Option<PlayerId>,
    /// Absent in documents written before the consecutive-over law was tracked.
    #[serde(default)]
    pub previous_bowler_id: Option<PlayerId>,
}

/// The whole live-score document for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScoreDoc {
    pub status: MatchStatus,
    pub toss: Option<TossDoc>,
    #[serde(default)]
    pub innings: Vec<InningsDoc>,
}

impl LiveScoreDoc {
    /// Document for a match that has not started.
    pub fn upcoming() -> Self {
        Self {
            status: MatchStatus::Upcoming,
            toss: None,
            innings: Vec::new(),
        }
    }
}

fn buckets_from(
    sixes: u32,
    fours: u32,
    threes: u32,
    doubles: u32,
    singles: u32,
    dots: u32,
) -> RunBuckets {
    RunBuckets {
        sixes,
        fours,
        threes,
        doubles,
        singles,
        dots,
    }
}

impl From<&BattingEntry> for BattingEntryDoc {
    fn from(entry: &BattingEntry) -> Self {
        let b = entry.buckets;
        Self {
            player_id: entry.player_id.clone(),
            runs_scored: entry.runs_scored,
            balls_faced: entry.balls_faced,
            out: entry.is_out(),
            out_type: entry.dismissal.as_ref().map(|d| d.out_type),
            out_by_player_id: entry.dismissal.as_ref().and_then(|d| d.bowler_id.clone()),
            sixes: b.sixes,
            fours: b.fours,
            threes: b.threes,
            doubles: b.doubles,
            singles: b.singles,
            dots: b.dots,
            batting_order: entry.batting_order,
        }
    }
}

impl TryFrom<BattingEntryDoc> for BattingEntry {
    type Error = DomainError;

    fn try_from(doc: BattingEntryDoc) -> Result<Self, Self::Error> {
        let buckets = buckets_from(doc.sixes, doc.fours, doc.threes, doc.doubles, doc.singles, doc.dots);
        if buckets.weighted_runs() != doc.runs_scored {
            return Err(DomainError::corrupt(format!(
                "Batter {} has {} runs but buckets add up to {}",
                doc.player_id,
                doc.runs_scored,
                buckets.weighted_runs()
            )));
        }
        if doc.batting_order == 0 {
            return Err(DomainError::corrupt(format!(
                "Batter {} has batting order 0",
                doc.player_id
            )));
        }
        let dismissal = match (doc.out, doc.out_type) {
            (true, Some(out_type)) => Some(Dismissal {
                out_type,
                bowler_id: doc.out_by_player_id,
            }),
            (false, None) => None,
            _ => {
                return Err(DomainError::corrupt(format!(
                    "Batter {} has inconsistent out/outType",
                    doc.player_id
                )))
            }
        };
        Ok(BattingEntry {
            player_id: doc.player_id,
            runs_scored: doc.runs_scored,
            balls_faced: doc.balls_faced,
            dismissal,
            buckets,
            batting_order: doc.batting_order,
        })
    }
}

impl From<&BowlingEntry> for BowlingEntryDoc {
    fn from(entry: &BowlingEntry) -> Self {
        let b = entry.buckets;
        Self {
            player_id: entry.player_id.clone(),
            runs_conceded: entry.runs_conceded,
            total_balls_bowled: entry.total_balls_bowled,
            overs_bowled: entry.overs_bowled(),
            wickets: entry.wickets.clone(),
            sixes: b.sixes,
            fours: b.fours,
            threes: b.threes,
            doubles: b.doubles,
            singles: b.singles,
            dots: b.dots,
            bowling_order: entry.bowling_order,
        }
    }
}

impl From<BowlingEntryDoc> for BowlingEntry {
    fn from(doc: BowlingEntryDoc) -> Self {
        BowlingEntry {
            player_id: doc.player_id,
            runs_conceded: doc.runs_conceded,
            total_balls_bowled: doc.total_balls_bowled,
            wickets: doc.wickets,
            buckets: buckets_from(doc.sixes, doc.fours, doc.threes, doc.doubles, doc.singles, doc.dots),
            bowling_order: doc.bowling_order,
        }
    }
}

impl From<&Innings> for InningsDoc {
    fn from(innings: &Innings) -> Self {
        Self {
            batting_team_id: innings.batting_team_id.clone(),
            bowling_team_id: innings.bowling_team_id.clone(),
            runs: innings.runs,
            wickets: innings.wickets,
            total_balls: innings.total_balls,
            overs: innings.overs(),
            extras: ExtrasDoc {
                wides: innings.extras.wides,
                no_balls: innings.extras.no_balls,
                byes: innings.extras.byes,
                leg_byes: innings.extras.leg_byes,
            },
            batting_entries: innings.batting.iter().map(BattingEntryDoc::from).collect(),
            bowling_entries: innings.bowling.iter().map(BowlingEntryDoc::from).collect(),
            batters_on_crease: [
                innings.crease.striker.clone(),
                innings.crease.non_striker.clone(),
            ],
            current_bowler_id: innings.current_bowler_id.clone(),
            previous_bowler_id: innings.previous_over_bowler_id.clone(),
        }
    }
}

impl TryFrom<InningsDoc> for Innings {
    type Error = DomainError;

    fn try_from(doc: InningsDoc) -> Result<Self, Self::Error> {
        let batting = doc
            .batting_entries
            .into_iter()
            .map(BattingEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let bowling: Vec<BowlingEntry> = doc.bowling_entries.into_iter().map(Into::into).collect();
        let [striker, non_striker] = doc.batters_on_crease;

        let innings = Innings {
            batting_team_id: doc.batting_team_id,
            bowling_team_id: doc.bowling_team_id,
            runs: doc.runs,
            wickets: doc.wickets,
            total_balls: doc.total_balls,
            extras: Extras {
                wides: doc.extras.wides,
                no_balls: doc.extras.no_balls,
                byes: doc.extras.byes,
                leg_byes: doc.extras.leg_byes,
            },
            batting,
            bowling,
            crease: Crease {
                striker,
                non_striker,
            },
            current_bowler_id: doc.current_bowler_id,
            previous_over_bowler_id: doc.previous_bowler_id,
        };
        check_consistency(&innings)?;
        Ok(innings)
    }
}

/// Structural checks a freshly decoded innings must pass.
fn check_consistency(innings: &Innings) -> Result<(), DomainError> {
    let mut orders = HashSet::new();
    let mut players = HashSet::new();
    for entry in &innings.batting {
        if !orders.insert(entry.batting_order) || !players.insert(entry.player_id.as_str()) {
            return Err(DomainError::corrupt(format!(
                "Duplicate batting entry for {}",
                entry.player_id
            )));
        }
    }

    let dismissed = innings.batting.iter().filter(|b| b.is_out()).count() as u32;
    if dismissed != innings.wickets {
        return Err(DomainError::corrupt(format!(
            "Innings records {} wickets but {dismissed} batters are out",
            innings.wickets
        )));
    }

    let bowled: u32 = innings.bowling.iter().map(|b| b.total_balls_bowled).sum();
    if bowled != innings.total_balls {
        return Err(DomainError::corrupt(format!(
            "Innings has {} balls but bowlers account for {bowled}",
            innings.total_balls
        )));
    }

    let crease = &innings.crease;
    if crease.striker.is_some() && crease.striker == crease.non_striker {
        return Err(DomainError::corrupt("Same batter at both ends"));
    }
    for id in [&crease.striker, &crease.non_striker].into_iter().flatten() {
        match innings.batting_entry(id) {
            Some(entry) if !entry.is_out() => {}
            _ => {
                return Err(DomainError::corrupt(format!(
                    "Batter {id} on the crease has no active batting entry"
                )))
            }
        }
    }

    if let Some(bowler) = &innings.current_bowler_id {
        if innings.bowling_entry(bowler).is_none() {
            return Err(DomainError::corrupt(format!(
                "Current bowler {bowler} has no bowling entry"
            )));
        }
    }
    Ok(())
}

impl MatchState {
    /// Rebuild a match from its registry setup and stored document.
    pub fn from_parts(setup: MatchSetup, doc: LiveScoreDoc) -> Result<Self, DomainError> {
        let toss = doc.toss.map(|t| Toss {
            winner_id: t.winner_id,
            decision: t.decision,
        });
        let innings = doc
            .innings
            .into_iter()
            .map(Innings::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if innings.len() > crate::domain::match_flow::INNINGS_PER_MATCH {
            return Err(DomainError::corrupt(format!(
                "Document holds {} innings",
                innings.len()
            )));
        }
        for inn in &innings {
            let teams = [&setup.team1_id, &setup.team2_id];
            if !teams.contains(&&inn.batting_team_id)
                || !teams.contains(&&inn.bowling_team_id)
                || inn.batting_team_id == inn.bowling_team_id
            {
                return Err(DomainError::corrupt(format!(
                    "Innings teams {} / {} do not match the fixture",
                    inn.batting_team_id, inn.bowling_team_id
                )));
            }
        }
        if toss.is_none() && !innings.is_empty() {
            return Err(DomainError::corrupt("Innings recorded without a toss"));
        }

        Ok(Self {
            setup,
            toss,
            status: doc.status,
            innings,
        })
    }

    pub fn to_document(&self) -> LiveScoreDoc {
        LiveScoreDoc {
            status: self.status,
            toss: self.toss.as_ref().map(|t| TossDoc {
                winner_id: t.winner_id.clone(),
                decision: t.decision,
            }),
            innings: self.innings.iter().map(InningsDoc::from).collect(),
        }
    }
}
