//! Derived statistics. Pure, recomputed on every read, never stored.

use serde::Serialize;

use crate::domain::rules::{MatchRules, BALLS_PER_OVER};
use crate::domain::state::Innings;

/// Round to two decimal places for display.
#[inline]
pub fn round_for_display(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Runs per 100 balls; 0 when no balls have been faced.
pub fn strike_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    runs as f64 / balls as f64 * 100.0
}

/// Runs conceded per over; 0 when no legal balls have been bowled.
pub fn economy_rate(runs_conceded: u32, legal_balls: u32) -> f64 {
    if legal_balls == 0 {
        return 0.0;
    }
    runs_conceded as f64 / (legal_balls as f64 / BALLS_PER_OVER as f64)
}

pub fn current_run_rate(innings: &Innings) -> f64 {
    if innings.total_balls == 0 {
        return 0.0;
    }
    innings.runs as f64 / (innings.total_balls as f64 / BALLS_PER_OVER as f64)
}

/// Chasing-side arithmetic against the first-innings total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaseStatus {
    pub target: u32,
    /// Runs still needed; zero or negative once the target is reached.
    pub required: i64,
    pub balls_remaining: u32,
    /// `None` when no balls remain.
    pub required_run_rate: Option<f64>,
}

pub fn chase_status(innings: &Innings, rules: &MatchRules, first_innings_runs: u32) -> ChaseStatus {
    let target = first_innings_runs + 1;
    let required = i64::from(target) - i64::from(innings.runs);
    let balls_remaining = rules.max_balls().saturating_sub(innings.total_balls);
    let required_run_rate = (balls_remaining > 0)
        .then(|| required as f64 / (balls_remaining as f64 / BALLS_PER_OVER as f64));
    ChaseStatus {
        target,
        required,
        balls_remaining,
        required_run_rate,
    }
}

/// Combined runs and balls of the two batters currently at the crease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Partnership {
    pub runs: u32,
    pub balls: u32,
}

pub fn partnership(innings: &Innings) -> Partnership {
    [&innings.crease.striker, &innings.crease.non_striker]
        .into_iter()
        .flatten()
        .filter_map(|id| innings.batting_entry(id))
        .fold(Partnership::default(), |acc, entry| Partnership {
            runs: acc.runs + entry.runs_scored,
            balls: acc.balls + entry.balls_faced,
        })
}
