//! Property tests for the scoring processor (pure domain).
//!
//! Properties tested:
//! - Ball counting: +1 per legal delivery, +0 per wide/no-ball; overs derived
//! - Bucket invariant: every batter's runs equal their weighted buckets
//! - Run accounting: innings runs = batters' runs + extras
//! - Strike parity across odd runs and over completions
//! - Innings ends exactly at the end condition, signalled on the deciding ball
//! - Document round-trip reproduces the match value

use proptest::prelude::*;

use crate::domain::document::LiveScoreDoc;
use crate::domain::events::{ScoringEvent, Signal};
use crate::domain::fixtures::{setup, Driver};
use crate::domain::match_flow::MatchState;
use crate::domain::processor::innings_complete;
use crate::domain::rules::{overs_from_balls, BALLS_PER_OVER};
use crate::domain::state::Innings;
use crate::domain::{test_gens, test_prelude};
use crate::errors::domain::DomainError;

fn is_legal(event: &ScoringEvent) -> bool {
    match event {
        ScoringEvent::Runs { .. } | ScoringEvent::Wicket { .. } => true,
        ScoringEvent::Extra { kind, .. } => kind.is_legal_delivery(),
        _ => false,
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_total_balls_counts_legal_deliveries(
        setup in test_gens::small_setup(),
        events in test_gens::deliveries(60),
    ) {
        let mut driver = Driver::started(setup);
        for event in events {
            if driver.is_innings_over() {
                break;
            }
            let before = driver.innings().total_balls;
            driver.deliver(event.clone());
            let after = driver.innings().total_balls;
            prop_assert_eq!(after - before, u32::from(is_legal(&event)));

            let expected = f64::from(after / BALLS_PER_OVER) + f64::from(after % BALLS_PER_OVER) / 10.0;
            prop_assert_eq!(driver.innings().overs(), expected);
            for bowler in &driver.innings().bowling {
                prop_assert_eq!(bowler.overs_bowled(), overs_from_balls(bowler.total_balls_bowled));
            }
        }
    }

    #[test]
    fn prop_batter_runs_match_buckets_and_totals(
        setup in test_gens::small_setup(),
        events in test_gens::deliveries(60),
    ) {
        let mut driver = Driver::started(setup);
        for event in events {
            if driver.is_innings_over() {
                break;
            }
            driver.deliver(event);
            let innings = driver.innings();
            let mut bat_runs = 0;
            for entry in &innings.batting {
                prop_assert_eq!(entry.runs_scored, entry.buckets.weighted_runs());
                bat_runs += entry.runs_scored;
            }
            prop_assert_eq!(innings.runs, bat_runs + innings.extras.total());
            let bowled: u32 = innings.bowling.iter().map(|b| b.total_balls_bowled).sum();
            prop_assert_eq!(bowled, innings.total_balls);
        }
    }

    #[test]
    fn prop_strike_parity_follows_odd_runs_and_overs(
        runs in prop::collection::vec(0u8..=6, 0..60),
    ) {
        let mut driver = Driver::started(setup(20, 11));
        let opener = driver.innings().crease.striker.clone();
        let mut odd = 0u32;
        let mut overs = 0u32;
        for r in runs {
            let signals = driver.runs(r);
            odd += u32::from(r % 2);
            overs += u32::from(signals.contains(&Signal::OverCompleted));
        }
        let rotated = (odd + overs) % 2 == 1;
        let striker = driver.innings().crease.striker.clone();
        prop_assert_eq!(striker == opener, !rotated);
    }

    #[test]
    fn prop_innings_ends_exactly_at_condition(
        setup in test_gens::small_setup(),
        events in test_gens::deliveries(80),
    ) {
        let driver = test_gens::play_match(setup.clone(), &events);
        let state = &driver.state;
        for (idx, innings) in state.innings.iter().enumerate() {
            let ctx = state.context_for(idx);
            let expected = innings.wickets >= setup.rules.max_wickets()
                || innings.total_balls >= setup.rules.max_balls()
                || ctx.first_innings_runs.is_some_and(|first| innings.runs > first);
            prop_assert_eq!(innings_complete(innings, &ctx), expected);
            prop_assert!(innings.wickets <= setup.rules.max_wickets());
            prop_assert!(innings.total_balls <= setup.rules.max_balls());
            // never later: once complete, no further delivery is accepted
            if idx + 1 < state.innings.len() {
                prop_assert!(expected);
            }
        }

        if driver.is_innings_over() {
            let mut ended = Driver { state: state.clone(), rosters: driver.rosters.clone(), last_signals: Vec::new() };
            let err = ended.try_apply(&ScoringEvent::Runs { runs: 1 }).unwrap_err();
            prop_assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        }
    }

    #[test]
    fn prop_innings_ended_fires_on_the_deciding_ball(
        setup in test_gens::small_setup(),
        events in test_gens::deliveries(80),
    ) {
        let rules = setup.rules;
        let mut driver = Driver::started(setup);
        let mut target: Option<u32> = None;
        let end_reached = |innings: &Innings, target: Option<u32>| {
            innings.wickets >= rules.max_wickets()
                || innings.total_balls >= rules.max_balls()
                || target.is_some_and(|first| innings.runs > first)
        };

        for event in events {
            if driver.is_innings_over() {
                if target.is_some() {
                    break;
                }
                target = Some(driver.innings().runs);
                let outcome = driver.state.start_next_innings().unwrap();
                driver.state = outcome.state;
                driver.open_innings();
            }
            prop_assert!(!end_reached(driver.innings(), target));

            let signals = driver.deliver(event);
            let ended = signals.contains(&Signal::InningsEnded);
            prop_assert_eq!(ended, end_reached(driver.innings(), target));
            prop_assert_eq!(ended, driver.is_innings_over());
        }
    }

    #[test]
    fn prop_document_round_trip(
        setup in test_gens::small_setup(),
        events in test_gens::deliveries(80),
    ) {
        let driver = test_gens::play_match(setup.clone(), &events);
        let doc = driver.state.to_document();
        let json = serde_json::to_string(&doc).unwrap();
        let decoded: LiveScoreDoc = serde_json::from_str(&json).unwrap();
        let rebuilt = MatchState::from_parts(setup, decoded).unwrap();
        prop_assert_eq!(rebuilt, driver.state);
    }
}
