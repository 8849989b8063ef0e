//! End-to-end scenario tests: literal inputs and their expected observable
//! outputs.

use tourney_core::constraint::{ConsecutiveRoleConstraint, ConstraintSetBuilder, RoleKind};
use tourney_core::leg::MirroredLegStrategy;
use tourney_core::orderer::StaticOrderer;
use tourney_core::{Participant, RoundRobinScheduler, ScheduleRequest, Scheduler, SchedulerError};

fn named_participants(labels: &[&str]) -> Vec<Participant> {
    labels
        .iter()
        .map(|label| Participant::new(label.to_lowercase(), label.to_string()))
        .collect()
}

#[test]
fn four_participants_single_leg_no_constraints() {
    let scheduler = RoundRobinScheduler;
    let request = ScheduleRequest::new(named_participants(&["A", "B", "C", "D"]));
    let schedule = scheduler.generate_schedule(request).unwrap();

    assert_eq!(schedule.len(), 6);
    assert_eq!(schedule.max_round(), Some(3));
    for id in ["a", "b", "c", "d"] {
        let plays = schedule.iter().filter(|e| e.participants().iter().any(|p| p.id == id)).count();
        assert_eq!(plays, 3, "participant {id} should play exactly 3 events");
    }
    for round in 1..=3 {
        assert_eq!(schedule.events_in_round(round).count(), 2);
    }
}

#[test]
fn five_participants_odd_single_leg_no_constraints() {
    let scheduler = RoundRobinScheduler;
    let request = ScheduleRequest::new(named_participants(&["A", "B", "C", "D", "E"]));
    let schedule = scheduler.generate_schedule(request).unwrap();

    assert_eq!(schedule.len(), 10);
    assert_eq!(schedule.max_round(), Some(5));
    for id in ["a", "b", "c", "d", "e"] {
        let plays = schedule.iter().filter(|e| e.participants().iter().any(|p| p.id == id)).count();
        assert_eq!(plays, 4, "participant {id} should play exactly 4 events");
    }
    for round in 1..=5 {
        assert_eq!(schedule.events_in_round(round).count(), 2, "round {round} should have exactly 2 events");
    }
}

#[test]
fn mirrored_legs_with_static_orderer_swap_role_order() {
    let scheduler = RoundRobinScheduler;
    let request = ScheduleRequest::new(named_participants(&["A", "B", "C", "D"]))
        .legs(2)
        .leg_strategy(MirroredLegStrategy)
        .orderer(StaticOrderer);
    let schedule = scheduler.generate_schedule(request).unwrap();

    assert_eq!(schedule.len(), 12);
    assert_eq!(schedule.max_round(), Some(6));

    let leg1_rounds = 3;
    let leg1: Vec<_> = schedule.iter().filter(|e| e.round_number().unwrap() <= leg1_rounds).collect();
    let leg2: Vec<_> = schedule.iter().filter(|e| e.round_number().unwrap() > leg1_rounds).collect();
    assert_eq!(leg1.len(), leg2.len());

    for e1 in &leg1 {
        let (x, y) = (e1.first().id.clone(), e1.second().id.clone());
        let mirrored = leg2
            .iter()
            .find(|e2| e2.first().id == y && e2.second().id == x)
            .unwrap_or_else(|| panic!("no mirrored event found for ({x}, {y})"));
        let _ = mirrored;
    }

    for id in ["a", "b", "c", "d"] {
        let first_count = schedule.iter().filter(|e| e.first().id == id).count();
        let second_count = schedule.iter().filter(|e| e.second().id == id).count();
        assert_eq!(first_count, second_count, "participant {id} should balance role slots across both legs");
    }
}

#[test]
fn no_repeat_pairings_across_legs_raises_incomplete_schedule() {
    let scheduler = RoundRobinScheduler;
    let constraints = ConstraintSetBuilder::new().no_repeat_pairings().build();
    let request = ScheduleRequest::new(named_participants(&["A", "B", "C", "D"]))
        .legs(2)
        .constraints(constraints);

    let err = scheduler.generate_schedule(request).unwrap_err();
    match err {
        SchedulerError::IncompleteSchedule(ref e) => {
            assert_eq!(e.expected_count, 12);
            assert_eq!(e.actual_count, 6);
            let report = err.diagnostic_report();
            assert!(report.contains("NoRepeatPairings"));
            assert!(report.contains("NoRepeatPairings: 6 violations"));
        }
        other => panic!("expected IncompleteSchedule, got {other:?}"),
    }
}

#[test]
fn unsatisfiable_minimum_rest_over_three_participants() {
    let scheduler = RoundRobinScheduler;
    let constraints = ConstraintSetBuilder::new().minimum_rest_periods(50).unwrap().build();
    let request = ScheduleRequest::new(named_participants(&["A", "B", "C"])).constraints(constraints);

    let err = scheduler.generate_schedule(request).unwrap_err();
    // Per DESIGN.md decision (d): the engine proves this unsatisfiable
    // statically and raises ImpossibleConstraints, rather than attempting
    // (and exhausting) a full generation pass.
    match err {
        SchedulerError::ImpossibleConstraints(ref e) => {
            assert_eq!(e.participant_count, 3);
            let report = err.diagnostic_report();
            assert!(report.contains("MinimumRestPeriodsConstraint"));
            assert!(report.contains("Participants: 3"));
        }
        other => panic!("expected ImpossibleConstraints, got {other:?}"),
    }
}

#[test]
fn seed_protection_guards_top_seeds_during_protected_window() {
    let scheduler = RoundRobinScheduler;
    let participants: Vec<Participant> = (1..=8)
        .map(|seed| Participant::new(format!("p{seed}"), format!("P{seed}")).with_seed(seed))
        .collect();
    let constraints = ConstraintSetBuilder::new()
        .no_repeat_pairings()
        .seed_protection(4, 0.15)
        .unwrap()
        .build();
    let request = ScheduleRequest::new(participants).constraints(constraints);

    let schedule = scheduler.generate_schedule(request).unwrap();
    assert_eq!(schedule.len(), 28);

    for round in 1..=2 {
        for event in schedule.events_in_round(round) {
            let both_top_seeded = event.participants().iter().all(|p| matches!(p.seed, Some(s) if s <= 4));
            assert!(!both_top_seeded, "round {round} paired two top-4 seeds during the protected window");
        }
    }
}

#[test]
fn consecutive_role_constraint_rejects_extending_past_the_limit() {
    let scheduler = RoundRobinScheduler;
    let constraint = ConsecutiveRoleConstraint::new(1, RoleKind::HomeAway).unwrap();
    let constraints = ConstraintSetBuilder::new().push(constraint).build();
    let request = ScheduleRequest::new(named_participants(&["A", "B", "C", "D", "E", "F"])).constraints(constraints);

    // This is a satisfiable scenario (unlike scenario 5): there always
    // exists some arrangement where no participant plays the same role
    // slot twice in a row under a limit of 1, and the generator's greedy
    // no-backtracking pass happens to find a complete one here.
    let schedule = scheduler.generate_schedule(request).unwrap();
    assert_eq!(schedule.len(), 15);
}
