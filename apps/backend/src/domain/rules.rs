use std::fmt;

use crate::errors::domain::{DomainError, ValidationKind};

pub const BALLS_PER_OVER: u32 = 6;
pub const MAX_RUNS_OFF_BAT: u8 = 6;
pub const MIN_EXTRA_RUNS: u8 = 1;
pub const MAX_EXTRA_RUNS: u8 = 7;

/// Per-match facts the scoring core needs; read from the match registry and
/// immutable for the duration of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// Innings length cap in overs.
    pub overs: u32,
    pub players_per_team: u32,
    /// When false a bowler may not bowl two overs in a row.
    pub consecutive_overs_allowed: bool,
}

impl MatchRules {
    pub fn new(overs: u32, players_per_team: u32) -> Result<Self, DomainError> {
        if overs == 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidRules,
                "Innings must be at least one over long",
            ));
        }
        if overs.checked_mul(BALLS_PER_OVER).is_none() {
            return Err(DomainError::validation(
                ValidationKind::InvalidRules,
                format!("Innings of {overs} overs is too long to score"),
            ));
        }
        if players_per_team < 2 {
            return Err(DomainError::validation(
                ValidationKind::InvalidRules,
                format!("A team needs at least 2 players, got {players_per_team}"),
            ));
        }
        Ok(Self {
            overs,
            players_per_team,
            consecutive_overs_allowed: false,
        })
    }

    pub fn with_consecutive_overs_allowed(mut self, allowed: bool) -> Self {
        self.consecutive_overs_allowed = allowed;
        self
    }

    /// Legal deliveries available to one innings.
    #[inline]
    pub fn max_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER
    }

    /// Wickets that end an innings (all out).
    #[inline]
    pub fn max_wickets(&self) -> u32 {
        self.players_per_team - 1
    }
}

/// Cricket overs notation: `floor(b/6) + (b mod 6)/10`.
#[inline]
pub fn overs_from_balls(total_balls: u32) -> f64 {
    let notation = OversNotation::from_balls(total_balls);
    notation.completed as f64 + notation.balls as f64 / 10.0
}

/// Completed overs plus balls into the current over (`18.4` = 18 overs, 4 balls).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OversNotation {
    pub completed: u32,
    pub balls: u32,
}

impl OversNotation {
    pub fn from_balls(total_balls: u32) -> Self {
        Self {
            completed: total_balls / BALLS_PER_OVER,
            balls: total_balls % BALLS_PER_OVER,
        }
    }
}

impl fmt::Display for OversNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.completed, self.balls)
    }
}

/// True when the legal ball just bowled was the last of its over.
#[inline]
pub fn is_over_boundary(total_balls: u32) -> bool {
    total_balls > 0 && total_balls % BALLS_PER_OVER == 0
}
