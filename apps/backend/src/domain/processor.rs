//! Scoring event processor: pure transitions over `Innings`.
//!
//! Every operation takes the current innings by reference and returns a new
//! innings plus the signals it raised. Validation runs before the clone is
//! touched, so a rejected event has no effect at all.

use crate::domain::events::{EventOutcome, ExtraKind, ScoringEvent, Signal};
use crate::domain::rules::{is_over_boundary, MatchRules, MAX_EXTRA_RUNS, MIN_EXTRA_RUNS};
use crate::domain::state::{
    require_bat_runs, require_bowler, require_run_value, require_striker, BattingEntry,
    BowlingEntry, Crease, Dismissal, Innings, OutType, PlayerId,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Inputs to the innings-end condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InningsContext {
    pub rules: MatchRules,
    /// Set for the chasing innings.
    pub first_innings_runs: Option<u32>,
}

impl InningsContext {
    pub fn first(rules: MatchRules) -> Self {
        Self {
            rules,
            first_innings_runs: None,
        }
    }

    pub fn chasing(rules: MatchRules, first_innings_runs: u32) -> Self {
        Self {
            rules,
            first_innings_runs: Some(first_innings_runs),
        }
    }

    /// The chasing innings is the last innings of the match.
    #[inline]
    pub fn is_final_innings(&self) -> bool {
        self.first_innings_runs.is_some()
    }

    pub fn target(&self) -> Option<u32> {
        self.first_innings_runs.map(|runs| runs + 1)
    }
}

/// All out, overs exhausted, or target passed in the chase.
pub fn innings_complete(innings: &Innings, ctx: &InningsContext) -> bool {
    innings.wickets >= ctx.rules.max_wickets()
        || innings.total_balls >= ctx.rules.max_balls()
        || ctx
            .first_innings_runs
            .is_some_and(|first| innings.runs > first)
}

/// Single dispatch over the tagged event type.
pub fn apply_event(
    innings: &Innings,
    ctx: &InningsContext,
    event: &ScoringEvent,
) -> Result<EventOutcome, DomainError> {
    match event {
        ScoringEvent::Runs { runs } => record_runs(innings, ctx, *runs),
        ScoringEvent::Extra { kind, runs } => record_extra(innings, ctx, *kind, *runs),
        ScoringEvent::Wicket {
            out_type,
            dismissed_player_id,
        } => record_wicket(innings, ctx, *out_type, dismissed_player_id.as_deref()),
        ScoringEvent::NewBatter { player_id } => confirm_new_batter(innings, ctx, player_id),
        ScoringEvent::NewBowler { player_id } => confirm_new_bowler(innings, ctx, player_id),
    }
}

/// Confirm the two opening batters and the opening bowler.
pub fn confirm_openers(
    innings: &Innings,
    ctx: &InningsContext,
    striker: &str,
    non_striker: &str,
    bowler: &str,
) -> Result<EventOutcome, DomainError> {
    ensure_open(innings, ctx)?;
    if innings.openers_confirmed() {
        return Err(DomainError::invalid_state(
            "Opening players are already confirmed",
        ));
    }
    if striker == non_striker {
        return Err(DomainError::validation(
            ValidationKind::DuplicateSelection,
            format!("Striker and non-striker must differ, both were {striker}"),
        ));
    }

    let mut next = innings.clone();
    next.push_batter(striker.to_string());
    next.push_batter(non_striker.to_string());
    next.crease = Crease::new(striker.to_string(), non_striker.to_string());
    next.ensure_bowler(bowler);
    next.current_bowler_id = Some(bowler.to_string());

    Ok(EventOutcome {
        innings: next,
        signals: Vec::new(),
    })
}

/// Runs off the bat: striker and bowler credited, one legal ball.
pub fn record_runs(
    innings: &Innings,
    ctx: &InningsContext,
    runs: u8,
) -> Result<EventOutcome, DomainError> {
    let runs = require_bat_runs(runs)?;
    let (striker, bowler) = ensure_delivery(innings, ctx)?;

    let mut next = innings.clone();
    let batter = batting_mut(&mut next, &striker)?;
    batter.runs_scored += u32::from(runs);
    batter.balls_faced += 1;
    batter.buckets.record(runs);

    let bowling = bowling_mut(&mut next, &bowler)?;
    bowling.runs_conceded += u32::from(runs);
    bowling.total_balls_bowled += 1;
    bowling.buckets.record(runs);

    next.runs += u32::from(runs);
    next.total_balls += 1;
    if runs % 2 == 1 {
        next.crease.rotate();
    }

    let mut signals = Vec::new();
    let over_done = close_legal_ball(&mut next, &mut signals);
    let prompts: &[Signal] = if over_done {
        &[Signal::NewBowlerRequired]
    } else {
        &[]
    };
    Ok(finish(next, ctx, signals, prompts))
}

/// Wide / no-ball (bowler charged, not a legal ball) or byes / leg-byes
/// (legal ball, bowler not charged). `runs` is the total for the delivery.
pub fn record_extra(
    innings: &Innings,
    ctx: &InningsContext,
    kind: ExtraKind,
    runs: u8,
) -> Result<EventOutcome, DomainError> {
    let runs = require_run_value(runs, MIN_EXTRA_RUNS, MAX_EXTRA_RUNS)?;
    let (striker, bowler) = ensure_delivery(innings, ctx)?;
    let amount = u32::from(runs);

    let mut next = innings.clone();
    match kind {
        ExtraKind::Wide => next.extras.wides += amount,
        ExtraKind::NoBall => next.extras.no_balls += amount,
        ExtraKind::Byes => next.extras.byes += amount,
        ExtraKind::LegByes => next.extras.leg_byes += amount,
    }
    next.runs += amount;

    if kind.counts_as_ball_faced() {
        batting_mut(&mut next, &striker)?.balls_faced += 1;
    }

    let bowling = bowling_mut(&mut next, &bowler)?;
    if kind.charged_to_bowler() {
        bowling.runs_conceded += amount;
    }
    if kind.is_legal_delivery() {
        bowling.total_balls_bowled += 1;
        next.total_balls += 1;
    }

    if runs % 2 == 1 {
        next.crease.rotate();
    }

    let mut signals = Vec::new();
    let over_done = kind.is_legal_delivery() && close_legal_ball(&mut next, &mut signals);
    let prompts: &[Signal] = if over_done {
        &[Signal::NewBowlerRequired]
    } else {
        &[]
    };
    Ok(finish(next, ctx, signals, prompts))
}

/// A wicket ball is always a legal delivery. The dismissed batter defaults to
/// the striker; only a run-out may name the non-striker.
pub fn record_wicket(
    innings: &Innings,
    ctx: &InningsContext,
    out_type: OutType,
    dismissed: Option<&str>,
) -> Result<EventOutcome, DomainError> {
    let (striker, bowler) = ensure_delivery(innings, ctx)?;
    let dismissed = dismissed.unwrap_or(striker.as_str()).to_string();

    let striker_out = dismissed == striker;
    if !striker_out {
        if innings.crease.non_striker.as_deref() != Some(dismissed.as_str()) {
            return Err(DomainError::validation(
                ValidationKind::BatterNotOnCrease,
                format!("Player {dismissed} is not batting"),
            ));
        }
        if !out_type.can_dismiss_non_striker() {
            return Err(DomainError::validation(
                ValidationKind::InvalidDismissal,
                format!("{out_type:?} cannot dismiss the non-striker"),
            ));
        }
    }

    let mut next = innings.clone();
    let facing = batting_mut(&mut next, &striker)?;
    facing.balls_faced += 1;
    facing.buckets.record(0);

    let credited = out_type.credits_bowler();
    let bowling = bowling_mut(&mut next, &bowler)?;
    bowling.total_balls_bowled += 1;
    bowling.buckets.record(0);
    if credited {
        bowling.wickets.push(dismissed.clone());
    }

    batting_mut(&mut next, &dismissed)?.dismissal = Some(Dismissal {
        out_type,
        bowler_id: credited.then(|| bowler.clone()),
    });

    if striker_out {
        next.crease.striker = None;
    } else {
        next.crease.non_striker = None;
    }
    next.wickets += 1;
    next.total_balls += 1;

    let mut signals = Vec::new();
    let over_done = close_legal_ball(&mut next, &mut signals);
    let prompts: &[Signal] = if over_done {
        &[Signal::NewBatterRequired, Signal::NewBowlerDeferred]
    } else {
        &[Signal::NewBatterRequired]
    };
    Ok(finish(next, ctx, signals, prompts))
}

/// Fill the crease vacancy. Releases a deferred bowler prompt, if any.
pub fn confirm_new_batter(
    innings: &Innings,
    ctx: &InningsContext,
    player_id: &str,
) -> Result<EventOutcome, DomainError> {
    ensure_open(innings, ctx)?;
    ensure_openers(innings)?;
    if !innings.crease.has_vacancy() {
        return Err(DomainError::invalid_state(
            "Both batters are at the crease; no new batter is required",
        ));
    }
    if innings.batting_entry(player_id).is_some() {
        return Err(DomainError::validation(
            ValidationKind::AlreadyBatted,
            format!("Player {player_id} has already batted this innings"),
        ));
    }

    let mut next = innings.clone();
    next.push_batter(player_id.to_string());
    if next.crease.striker.is_none() {
        next.crease.striker = Some(player_id.to_string());
    } else {
        next.crease.non_striker = Some(player_id.to_string());
    }

    let signals = if next.current_bowler_id.is_none() {
        vec![Signal::NewBowlerRequired]
    } else {
        Vec::new()
    };
    Ok(EventOutcome {
        innings: next,
        signals,
    })
}

/// Set the bowler for the next over, reusing an existing entry when the
/// bowler has bowled before.
pub fn confirm_new_bowler(
    innings: &Innings,
    ctx: &InningsContext,
    player_id: &str,
) -> Result<EventOutcome, DomainError> {
    ensure_open(innings, ctx)?;
    ensure_openers(innings)?;
    if innings.crease.has_vacancy() {
        return Err(DomainError::validation(
            ValidationKind::BatterSelectionPending,
            "Confirm the new batter before choosing the next bowler",
        ));
    }
    if innings.current_bowler_id.is_some() {
        return Err(DomainError::invalid_state(
            "An over is in progress; a new bowler is not required",
        ));
    }
    if !ctx.rules.consecutive_overs_allowed
        && innings.previous_over_bowler_id.as_deref() == Some(player_id)
    {
        return Err(DomainError::validation(
            ValidationKind::ConsecutiveOver,
            format!("Player {player_id} bowled the previous over"),
        ));
    }

    let mut next = innings.clone();
    next.ensure_bowler(player_id);
    next.current_bowler_id = Some(player_id.to_string());

    Ok(EventOutcome {
        innings: next,
        signals: Vec::new(),
    })
}

fn ensure_open(innings: &Innings, ctx: &InningsContext) -> Result<(), DomainError> {
    if innings_complete(innings, ctx) {
        return Err(DomainError::invalid_state("Innings has already ended"));
    }
    Ok(())
}

fn ensure_openers(innings: &Innings) -> Result<(), DomainError> {
    if !innings.openers_confirmed() {
        return Err(DomainError::invalid_state(
            "Opening players have not been confirmed",
        ));
    }
    Ok(())
}

/// Preconditions for any delivery: innings open, full crease, bowler set.
fn ensure_delivery(
    innings: &Innings,
    ctx: &InningsContext,
) -> Result<(PlayerId, PlayerId), DomainError> {
    ensure_open(innings, ctx)?;
    ensure_openers(innings)?;
    if innings.crease.has_vacancy() {
        return Err(DomainError::invalid_state(
            "A new batter must be confirmed before the next delivery",
        ));
    }
    let striker = require_striker(innings, "delivery")?.clone();
    let bowler = require_bowler(innings, "delivery")?.clone();
    Ok((striker, bowler))
}

/// Over bookkeeping after a legal ball. Returns true when the over completed.
fn close_legal_ball(next: &mut Innings, signals: &mut Vec<Signal>) -> bool {
    if !is_over_boundary(next.total_balls) {
        return false;
    }
    next.crease.rotate();
    next.previous_over_bowler_id = next.current_bowler_id.take();
    signals.push(Signal::OverCompleted);
    true
}

/// Innings end takes precedence over (and suppresses) selection prompts.
fn finish(
    next: Innings,
    ctx: &InningsContext,
    mut signals: Vec<Signal>,
    prompts: &[Signal],
) -> EventOutcome {
    if innings_complete(&next, ctx) {
        signals.push(Signal::InningsEnded);
        if ctx.is_final_innings() {
            signals.push(Signal::MatchEnded);
        }
    } else {
        signals.extend_from_slice(prompts);
    }
    EventOutcome {
        innings: next,
        signals,
    }
}

fn batting_mut<'a>(
    innings: &'a mut Innings,
    player_id: &str,
) -> Result<&'a mut BattingEntry, DomainError> {
    innings.batting_entry_mut(player_id).ok_or_else(|| {
        DomainError::corrupt(format!("Batter {player_id} is on the crease without an entry"))
    })
}

fn bowling_mut<'a>(
    innings: &'a mut Innings,
    player_id: &str,
) -> Result<&'a mut BowlingEntry, DomainError> {
    innings.bowling_entry_mut(player_id).ok_or_else(|| {
        DomainError::corrupt(format!("Bowler {player_id} is bowling without an entry"))
    })
}
