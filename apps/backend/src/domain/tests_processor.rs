use crate::domain::events::{ExtraKind, ScoringEvent, Signal};
use crate::domain::processor::{
    apply_event, confirm_new_batter, confirm_new_bowler, confirm_openers, innings_complete,
    record_extra, record_runs, record_wicket, InningsContext,
};
use crate::domain::rules::MatchRules;
use crate::domain::state::{Innings, OutType};
use crate::errors::domain::{DomainError, ValidationKind};

fn ctx() -> InningsContext {
    InningsContext::first(MatchRules::new(20, 11).unwrap())
}

fn opened(ctx: &InningsContext) -> Innings {
    let fresh = Innings::new("A".into(), "B".into());
    confirm_openers(&fresh, ctx, "s", "n", "b1").unwrap().innings
}

fn bowl_balls(mut innings: Innings, ctx: &InningsContext, n: usize) -> Innings {
    for _ in 0..n {
        innings = record_runs(&innings, ctx, 0).unwrap().innings;
    }
    innings
}

fn assert_validation(err: DomainError, expected: ValidationKind) {
    match err {
        DomainError::Validation(kind, _) => assert_eq!(kind, expected),
        other => panic!("expected validation {expected:?}, got {other:?}"),
    }
}

#[test]
fn openers_create_entries_in_batting_order() {
    let ctx = ctx();
    let innings = opened(&ctx);
    assert_eq!(innings.batting.len(), 2);
    assert_eq!(innings.batting[0].player_id, "s");
    assert_eq!(innings.batting[0].batting_order, 1);
    assert_eq!(innings.batting[1].batting_order, 2);
    assert_eq!(innings.crease.striker.as_deref(), Some("s"));
    assert_eq!(innings.crease.non_striker.as_deref(), Some("n"));
    assert_eq!(innings.current_bowler_id.as_deref(), Some("b1"));
    assert_eq!(innings.bowling[0].bowling_order, 1);
}

#[test]
fn openers_must_differ() {
    let ctx = ctx();
    let fresh = Innings::new("A".into(), "B".into());
    let err = confirm_openers(&fresh, &ctx, "s", "s", "b1").unwrap_err();
    assert_validation(err, ValidationKind::DuplicateSelection);
}

#[test]
fn deliveries_before_openers_are_invalid_state() {
    let ctx = ctx();
    let fresh = Innings::new("A".into(), "B".into());
    let err = record_runs(&fresh, &ctx, 1).unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[test]
fn runs_credit_striker_and_bowler_and_rotate_on_odd() {
    let ctx = ctx();
    let before = opened(&ctx);
    let outcome = record_runs(&before, &ctx, 3).unwrap();
    let after = &outcome.innings;

    assert!(outcome.signals.is_empty());
    assert_eq!(after.runs, 3);
    assert_eq!(after.total_balls, 1);
    let s = after.batting_entry("s").unwrap();
    assert_eq!((s.runs_scored, s.balls_faced, s.buckets.threes), (3, 1, 1));
    let b = after.bowling_entry("b1").unwrap();
    assert_eq!((b.runs_conceded, b.total_balls_bowled), (3, 1));
    assert_eq!(after.crease.striker.as_deref(), Some("n"));
    // input untouched
    assert_eq!(before.runs, 0);
}

#[test]
fn even_runs_keep_strike() {
    let ctx = ctx();
    let after = record_runs(&opened(&ctx), &ctx, 4).unwrap().innings;
    assert_eq!(after.crease.striker.as_deref(), Some("s"));
    assert_eq!(after.batting_entry("s").unwrap().buckets.fours, 1);
}

#[test]
fn runs_out_of_range_are_rejected() {
    let ctx = ctx();
    let err = record_runs(&opened(&ctx), &ctx, 7).unwrap_err();
    assert_validation(err, ValidationKind::InvalidRuns);

    let err = record_extra(&opened(&ctx), &ctx, ExtraKind::Wide, 0).unwrap_err();
    assert_validation(err, ValidationKind::InvalidRuns);
}

#[test]
fn sixth_legal_ball_completes_over() {
    let ctx = ctx();
    let innings = bowl_balls(opened(&ctx), &ctx, 5);
    let outcome = record_runs(&innings, &ctx, 0).unwrap();

    assert_eq!(
        outcome.signals,
        vec![Signal::OverCompleted, Signal::NewBowlerRequired]
    );
    let after = outcome.innings;
    assert_eq!(after.total_balls, 6);
    assert_eq!(after.current_bowler_id, None);
    assert_eq!(after.previous_over_bowler_id.as_deref(), Some("b1"));
    // ends change at the end of the over
    assert_eq!(after.crease.striker.as_deref(), Some("n"));
}

#[test]
fn single_off_last_ball_keeps_striker_facing() {
    let ctx = ctx();
    let innings = bowl_balls(opened(&ctx), &ctx, 5);
    let after = record_runs(&innings, &ctx, 1).unwrap().innings;
    assert_eq!(after.crease.striker.as_deref(), Some("s"));
}

#[test]
fn delivery_without_bowler_is_rejected() {
    let ctx = ctx();
    let innings = bowl_balls(opened(&ctx), &ctx, 6);
    let err = record_runs(&innings, &ctx, 1).unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[test]
fn wide_adds_runs_without_ball() {
    let ctx = ctx();
    let outcome = record_extra(&opened(&ctx), &ctx, ExtraKind::Wide, 1).unwrap();
    let after = outcome.innings;
    assert_eq!(after.runs, 1);
    assert_eq!(after.total_balls, 0);
    assert_eq!(after.extras.wides, 1);
    assert_eq!(after.bowling_entry("b1").unwrap().runs_conceded, 1);
    assert_eq!(after.bowling_entry("b1").unwrap().total_balls_bowled, 0);
    let s = after.batting_entry("s").unwrap();
    assert_eq!((s.runs_scored, s.balls_faced), (0, 0));
    // one run, batters crossed
    assert_eq!(after.crease.striker.as_deref(), Some("n"));
}

#[test]
fn no_ball_with_two_runs_run() {
    let ctx = ctx();
    let outcome = record_extra(&opened(&ctx), &ctx, ExtraKind::NoBall, 2).unwrap();
    let after = outcome.innings;
    assert!(outcome.signals.is_empty());
    assert_eq!(after.runs, 2);
    assert_eq!(after.total_balls, 0);
    assert_eq!(after.extras.no_balls, 2);
    assert_eq!(after.bowling_entry("b1").unwrap().runs_conceded, 2);
    assert_eq!(after.batting_entry("s").unwrap().balls_faced, 1);
    assert_eq!(after.batting_entry("s").unwrap().runs_scored, 0);
    assert_eq!(after.crease.striker.as_deref(), Some("s"));
}

#[test]
fn byes_count_as_ball_but_not_against_bowler() {
    let ctx = ctx();
    let after = record_extra(&opened(&ctx), &ctx, ExtraKind::LegByes, 4)
        .unwrap()
        .innings;
    assert_eq!(after.runs, 4);
    assert_eq!(after.total_balls, 1);
    assert_eq!(after.extras.leg_byes, 4);
    let b = after.bowling_entry("b1").unwrap();
    assert_eq!((b.runs_conceded, b.total_balls_bowled), (0, 1));
    assert_eq!(after.batting_entry("s").unwrap().balls_faced, 1);
    assert_eq!(after.batting_entry("s").unwrap().runs_scored, 0);
}

#[test]
fn bowled_wicket_vacates_striker_and_credits_bowler() {
    let ctx = ctx();
    let outcome = record_wicket(&opened(&ctx), &ctx, OutType::Bowled, None).unwrap();
    assert_eq!(outcome.signals, vec![Signal::NewBatterRequired]);
    let after = outcome.innings;
    assert_eq!(after.wickets, 1);
    assert_eq!(after.total_balls, 1);
    assert_eq!(after.crease.striker, None);
    let s = after.batting_entry("s").unwrap();
    assert!(s.is_out());
    assert_eq!(s.balls_faced, 1);
    let dismissal = s.dismissal.as_ref().unwrap();
    assert_eq!(dismissal.bowler_id.as_deref(), Some("b1"));
    assert_eq!(after.bowling_entry("b1").unwrap().wickets, vec!["s".to_string()]);
}

#[test]
fn run_out_is_not_credited_and_may_take_non_striker() {
    let ctx = ctx();
    let outcome = record_wicket(&opened(&ctx), &ctx, OutType::RunOut, Some("n")).unwrap();
    let after = outcome.innings;
    assert_eq!(after.crease.striker.as_deref(), Some("s"));
    assert_eq!(after.crease.non_striker, None);
    assert!(after.batting_entry("n").unwrap().is_out());
    assert_eq!(
        after.batting_entry("n").unwrap().dismissal.as_ref().unwrap().bowler_id,
        None
    );
    assert!(after.bowling_entry("b1").unwrap().wickets.is_empty());
}

#[test]
fn only_run_out_dismisses_non_striker() {
    let ctx = ctx();
    let err = record_wicket(&opened(&ctx), &ctx, OutType::Caught, Some("n")).unwrap_err();
    assert_validation(err, ValidationKind::InvalidDismissal);

    let err = record_wicket(&opened(&ctx), &ctx, OutType::RunOut, Some("x")).unwrap_err();
    assert_validation(err, ValidationKind::BatterNotOnCrease);
}

#[test]
fn deliveries_blocked_while_batter_pending() {
    let ctx = ctx();
    let innings = record_wicket(&opened(&ctx), &ctx, OutType::Lbw, None)
        .unwrap()
        .innings;
    let err = record_runs(&innings, &ctx, 1).unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[test]
fn new_batter_fills_vacancy_and_rejects_repeat() {
    let ctx = ctx();
    let innings = record_wicket(&opened(&ctx), &ctx, OutType::Stumped, None)
        .unwrap()
        .innings;

    let err = confirm_new_batter(&innings, &ctx, "s").unwrap_err();
    assert_validation(err, ValidationKind::AlreadyBatted);
    let err = confirm_new_batter(&innings, &ctx, "n").unwrap_err();
    assert_validation(err, ValidationKind::AlreadyBatted);

    let outcome = confirm_new_batter(&innings, &ctx, "x").unwrap();
    assert!(outcome.signals.is_empty());
    assert_eq!(outcome.innings.crease.striker.as_deref(), Some("x"));
    assert_eq!(outcome.innings.batting_entry("x").unwrap().batting_order, 3);
}

#[test]
fn new_batter_without_vacancy_is_invalid() {
    let ctx = ctx();
    let err = confirm_new_batter(&opened(&ctx), &ctx, "x").unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[test]
fn wicket_on_last_ball_defers_bowler_until_batter_confirmed() {
    let ctx = ctx();
    let innings = bowl_balls(opened(&ctx), &ctx, 5);
    let outcome = record_wicket(&innings, &ctx, OutType::Caught, None).unwrap();
    assert_eq!(
        outcome.signals,
        vec![
            Signal::OverCompleted,
            Signal::NewBatterRequired,
            Signal::NewBowlerDeferred
        ]
    );
    let innings = outcome.innings;
    // ends changed, so the vacancy sits at the non-striker end
    assert_eq!(innings.crease.striker.as_deref(), Some("n"));
    assert_eq!(innings.crease.non_striker, None);

    let err = confirm_new_bowler(&innings, &ctx, "b2").unwrap_err();
    assert_validation(err, ValidationKind::BatterSelectionPending);

    let outcome = confirm_new_batter(&innings, &ctx, "x").unwrap();
    assert_eq!(outcome.signals, vec![Signal::NewBowlerRequired]);
    assert_eq!(outcome.innings.current_bowler_id, None);
    assert_eq!(outcome.innings.crease.non_striker.as_deref(), Some("x"));

    let outcome = confirm_new_bowler(&outcome.innings, &ctx, "b2").unwrap();
    assert_eq!(outcome.innings.current_bowler_id.as_deref(), Some("b2"));
}

#[test]
fn same_bowler_cannot_bowl_consecutive_overs() {
    let ctx = ctx();
    let innings = bowl_balls(opened(&ctx), &ctx, 6);
    let err = confirm_new_bowler(&innings, &ctx, "b1").unwrap_err();
    assert_validation(err, ValidationKind::ConsecutiveOver);

    let relaxed = InningsContext::first(
        MatchRules::new(20, 11)
            .unwrap()
            .with_consecutive_overs_allowed(true),
    );
    let outcome = confirm_new_bowler(&innings, &relaxed, "b1").unwrap();
    assert_eq!(outcome.innings.bowling.len(), 1);
}

#[test]
fn returning_bowler_reuses_entry() {
    let ctx = ctx();
    let innings = bowl_balls(opened(&ctx), &ctx, 6);
    let innings = confirm_new_bowler(&innings, &ctx, "b2").unwrap().innings;
    let innings = bowl_balls(innings, &ctx, 6);
    let innings = confirm_new_bowler(&innings, &ctx, "b1").unwrap().innings;

    assert_eq!(innings.bowling.len(), 2);
    assert_eq!(innings.bowling_entry("b1").unwrap().total_balls_bowled, 6);
    assert_eq!(innings.bowling_entry("b2").unwrap().bowling_order, 2);
}

#[test]
fn new_bowler_mid_over_is_invalid() {
    let ctx = ctx();
    let err = confirm_new_bowler(&opened(&ctx), &ctx, "b2").unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[test]
fn innings_ends_on_overs_exhausted() {
    let ctx = InningsContext::first(MatchRules::new(1, 11).unwrap());
    let innings = bowl_balls(opened(&ctx), &ctx, 5);
    let outcome = record_runs(&innings, &ctx, 2).unwrap();
    assert_eq!(
        outcome.signals,
        vec![Signal::OverCompleted, Signal::InningsEnded]
    );
    assert!(innings_complete(&outcome.innings, &ctx));

    let err = record_runs(&outcome.innings, &ctx, 1).unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[test]
fn innings_ends_when_all_out() {
    let ctx = InningsContext::first(MatchRules::new(20, 2).unwrap());
    let outcome = record_wicket(&opened(&ctx), &ctx, OutType::Bowled, None).unwrap();
    assert_eq!(outcome.signals, vec![Signal::InningsEnded]);
}

#[test]
fn chase_ends_mid_over_with_match_end() {
    let ctx = InningsContext::chasing(MatchRules::new(20, 11).unwrap(), 3);
    let innings = record_runs(&opened(&ctx), &ctx, 2).unwrap().innings;
    assert!(!innings_complete(&innings, &ctx));
    let outcome = record_extra(&innings, &ctx, ExtraKind::Wide, 2).unwrap();
    assert_eq!(
        outcome.signals,
        vec![Signal::InningsEnded, Signal::MatchEnded]
    );
    assert_eq!(outcome.innings.runs, 4);
}

#[test]
fn apply_event_dispatches_by_variant() {
    let ctx = ctx();
    let innings = opened(&ctx);
    let via_dispatch = apply_event(&innings, &ctx, &ScoringEvent::Runs { runs: 2 }).unwrap();
    let direct = record_runs(&innings, &ctx, 2).unwrap();
    assert_eq!(via_dispatch, direct);

    let outcome = apply_event(
        &innings,
        &ctx,
        &ScoringEvent::Wicket {
            out_type: OutType::HitWicket,
            dismissed_player_id: None,
        },
    )
    .unwrap();
    assert!(outcome.has(Signal::NewBatterRequired));
}
