use serde::{Deserialize, Serialize};

use crate::domain::rules::{overs_from_balls, MAX_RUNS_OFF_BAT};
use crate::errors::domain::{DomainError, ValidationKind};

/// Identifier into the external player records.
pub type PlayerId = String;
/// Identifier into the external team records.
pub type TeamId = String;

/// How a batter was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutType {
    Bowled,
    Caught,
    Lbw,
    #[serde(rename = "runout")]
    RunOut,
    Stumped,
    #[serde(rename = "hitwicket")]
    HitWicket,
}

impl OutType {
    /// Run-outs are never credited to the bowler.
    pub fn credits_bowler(self) -> bool {
        !matches!(self, OutType::RunOut)
    }

    /// Only a run-out can dismiss the non-striker.
    pub fn can_dismiss_non_striker(self) -> bool {
        matches!(self, OutType::RunOut)
    }
}

/// Per-ball scoring buckets shared by batters (runs scored) and bowlers
/// (runs conceded off the bat).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunBuckets {
    pub sixes: u32,
    pub fours: u32,
    pub threes: u32,
    pub doubles: u32,
    pub singles: u32,
    pub dots: u32,
}

impl RunBuckets {
    /// Count one ball worth `runs` (0..=6). Five runs has no bucket of its own
    /// and is recorded as one three plus one double, so for a batter who has
    /// scored a five the bucket counts exceed balls faced.
    pub fn record(&mut self, runs: u8) {
        match runs {
            0 => self.dots += 1,
            1 => self.singles += 1,
            2 => self.doubles += 1,
            3 => self.threes += 1,
            4 => self.fours += 1,
            5 => {
                self.threes += 1;
                self.doubles += 1;
            }
            _ => self.sixes += 1,
        }
    }

    /// `6·sixes + 4·fours + 3·threes + 2·doubles + singles`.
    pub fn weighted_runs(&self) -> u32 {
        6 * self.sixes + 4 * self.fours + 3 * self.threes + 2 * self.doubles + self.singles
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dismissal {
    pub out_type: OutType,
    /// Bowler credited with the wicket; `None` for run-outs.
    pub bowler_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattingEntry {
    pub player_id: PlayerId,
    pub runs_scored: u32,
    pub balls_faced: u32,
    pub dismissal: Option<Dismissal>,
    pub buckets: RunBuckets,
    /// 1-based, unique within the innings.
    pub batting_order: u32,
}

impl BattingEntry {
    pub fn new(player_id: PlayerId, batting_order: u32) -> Self {
        Self {
            player_id,
            runs_scored: 0,
            balls_faced: 0,
            dismissal: None,
            buckets: RunBuckets::default(),
            batting_order,
        }
    }

    #[inline]
    pub fn is_out(&self) -> bool {
        self.dismissal.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BowlingEntry {
    pub player_id: PlayerId,
    pub runs_conceded: u32,
    /// Legal deliveries only; overs bowled are derived from this.
    pub total_balls_bowled: u32,
    /// Batters dismissed by this bowler, in order.
    pub wickets: Vec<PlayerId>,
    pub buckets: RunBuckets,
    /// 1-based, order of first use.
    pub bowling_order: u32,
}

impl BowlingEntry {
    pub fn new(player_id: PlayerId, bowling_order: u32) -> Self {
        Self {
            player_id,
            runs_conceded: 0,
            total_balls_bowled: 0,
            wickets: Vec::new(),
            buckets: RunBuckets::default(),
            bowling_order,
        }
    }

    pub fn overs_bowled(&self) -> f64 {
        overs_from_balls(self.total_balls_bowled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extras {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// The two batters at the crease. `None` marks a vacancy awaiting a new batter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Crease {
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
}

impl Crease {
    pub fn new(striker: PlayerId, non_striker: PlayerId) -> Self {
        Self {
            striker: Some(striker),
            non_striker: Some(non_striker),
        }
    }

    /// Batters change ends.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    pub fn has_vacancy(&self) -> bool {
        self.striker.is_none() || self.non_striker.is_none()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.striker.as_deref() == Some(player_id) || self.non_striker.as_deref() == Some(player_id)
    }

    pub fn occupied(&self) -> usize {
        usize::from(self.striker.is_some()) + usize::from(self.non_striker.is_some())
    }
}

/// One team's batting effort. Mutated only through `domain::processor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Innings {
    pub batting_team_id: TeamId,
    pub bowling_team_id: TeamId,
    pub runs: u32,
    pub wickets: u32,
    /// The only stored ball counter; overs are always derived from it.
    pub total_balls: u32,
    pub extras: Extras,
    /// Insertion order is batting order.
    pub batting: Vec<BattingEntry>,
    /// Insertion order is first-used order.
    pub bowling: Vec<BowlingEntry>,
    pub crease: Crease,
    pub current_bowler_id: Option<PlayerId>,
    /// Bowler of the last completed over.
    pub previous_over_bowler_id: Option<PlayerId>,
}

impl Innings {
    pub fn new(batting_team_id: TeamId, bowling_team_id: TeamId) -> Self {
        Self {
            batting_team_id,
            bowling_team_id,
            runs: 0,
            wickets: 0,
            total_balls: 0,
            extras: Extras::default(),
            batting: Vec::new(),
            bowling: Vec::new(),
            crease: Crease::default(),
            current_bowler_id: None,
            previous_over_bowler_id: None,
        }
    }

    pub fn overs(&self) -> f64 {
        overs_from_balls(self.total_balls)
    }

    /// Openers and the opening bowler have been confirmed.
    pub fn openers_confirmed(&self) -> bool {
        !self.batting.is_empty()
    }

    pub fn batting_entry(&self, player_id: &str) -> Option<&BattingEntry> {
        self.batting.iter().find(|b| b.player_id == player_id)
    }

    pub fn batting_entry_mut(&mut self, player_id: &str) -> Option<&mut BattingEntry> {
        self.batting.iter_mut().find(|b| b.player_id == player_id)
    }

    pub fn bowling_entry(&self, player_id: &str) -> Option<&BowlingEntry> {
        self.bowling.iter().find(|b| b.player_id == player_id)
    }

    pub fn bowling_entry_mut(&mut self, player_id: &str) -> Option<&mut BowlingEntry> {
        self.bowling.iter_mut().find(|b| b.player_id == player_id)
    }

    /// Append a batting entry with the next batting order.
    pub(crate) fn push_batter(&mut self, player_id: PlayerId) {
        let order = self.batting.len() as u32 + 1;
        self.batting.push(BattingEntry::new(player_id, order));
    }

    /// Reuse an existing bowling entry or append one with the next bowling order.
    pub(crate) fn ensure_bowler(&mut self, player_id: &str) {
        if self.bowling_entry(player_id).is_none() {
            let order = self.bowling.len() as u32 + 1;
            self.bowling.push(BowlingEntry::new(player_id.to_string(), order));
        }
    }
}

pub fn require_striker<'a>(innings: &'a Innings, ctx: &'static str) -> Result<&'a PlayerId, DomainError> {
    innings.crease.striker.as_ref().ok_or_else(|| {
        DomainError::invalid_state(format!("A new batter must be confirmed first ({ctx})"))
    })
}

pub fn require_bowler<'a>(innings: &'a Innings, ctx: &'static str) -> Result<&'a PlayerId, DomainError> {
    innings.current_bowler_id.as_ref().ok_or_else(|| {
        DomainError::invalid_state(format!("A bowler must be confirmed first ({ctx})"))
    })
}

pub fn require_run_value(runs: u8, min: u8, max: u8) -> Result<u8, DomainError> {
    if runs < min || runs > max {
        return Err(DomainError::validation(
            ValidationKind::InvalidRuns,
            format!("Runs must be in range {min}..={max}, got {runs}"),
        ));
    }
    Ok(runs)
}

/// Runs off the bat for a single delivery.
pub fn require_bat_runs(runs: u8) -> Result<u8, DomainError> {
    require_run_value(runs, 0, MAX_RUNS_OFF_BAT)
}
