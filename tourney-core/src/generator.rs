//! The round-robin generator (§4.5): binds the positional structure to
//! participants, then iterates rounds, asking the orderer for roles and the
//! constraint set for acceptance, committing or recording a violation for
//! each candidate. No backtracking - a single greedy pass.

use crate::constraint::ConstraintSet;
use crate::context::{ScheduleSizing, SchedulingContext};
use crate::counts::{expected_event_count, rounds_per_leg, total_rounds as total_rounds_for};
use crate::diagnostics::{IncompleteScheduleError, SchedulerError};
use crate::leg::LegStrategy;
use crate::models::{Event, MetadataValue, Participant, Round, Schedule};
use crate::orderer::ParticipantOrderer;
use crate::positional::{generate_structure, PositionToken};
use crate::random::RandomSource;
use crate::violation::{ConstraintViolation, ConstraintViolationCollector};

/// Snapshot passed to an optional progress callback after each candidate is
/// resolved (committed or rejected). Modelled on the teacher library's
/// simulated-annealing progress callback (§5, §11): returning `false` aborts
/// generation early, which then surfaces as `IncompleteSchedule` carrying
/// whatever was committed so far.
#[derive(Debug, Clone, Copy)]
pub struct GenerationProgress {
    pub committed_count: usize,
    pub rejected_count: usize,
    pub expected_count: usize,
    pub current_round: u32,
    pub total_rounds: u32,
}

/// Fully-resolved inputs to a single generation run. Built by
/// [`crate::scheduler::ScheduleRequest`] after validation.
pub struct GenerationRequest<'a> {
    pub participants: Vec<Participant>,
    pub legs: u32,
    pub leg_strategy: &'a dyn LegStrategy,
    pub constraints: &'a ConstraintSet,
    pub orderer: &'a dyn ParticipantOrderer,
    pub random_source: &'a dyn RandomSource,
    pub participant_order: Option<Vec<String>>,
    pub progress: Option<&'a dyn Fn(&GenerationProgress) -> bool>,
}

fn bind_positions(
    participants: &[Participant],
    explicit_order: &Option<Vec<String>>,
    random_source: &dyn RandomSource,
) -> Vec<Participant> {
    match explicit_order {
        Some(ids) => ids
            .iter()
            .map(|id| {
                participants
                    .iter()
                    .find(|p| &p.id == id)
                    .cloned()
                    .expect("explicit participant order was validated against the participant list")
            })
            .collect(),
        None => {
            let permutation = random_source.permute(participants.len());
            permutation.into_iter().map(|i| participants[i].clone()).collect()
        }
    }
}

fn seat_pair(tokens: &[PositionToken]) -> Option<(usize, usize)> {
    match tokens {
        [PositionToken::Seat(a), PositionToken::Seat(b)] => Some((*a, *b)),
        _ => None,
    }
}

fn schedule_metadata(participant_count: usize, legs: u32, rounds_per_leg: u32, total_rounds: u32) -> crate::models::Metadata {
    let mut metadata = crate::models::Metadata::new();
    metadata.insert("algorithm".to_string(), MetadataValue::Text("round-robin".to_string()));
    metadata.insert("participant_count".to_string(), MetadataValue::Integer(participant_count as i64));
    metadata.insert("legs".to_string(), MetadataValue::Integer(legs as i64));
    metadata.insert("rounds_per_leg".to_string(), MetadataValue::Integer(rounds_per_leg as i64));
    metadata.insert("total_rounds".to_string(), MetadataValue::Integer(total_rounds as i64));
    metadata.insert(
        "events_per_round".to_string(),
        MetadataValue::Integer((participant_count / 2) as i64),
    );
    metadata
}

/// Runs a full generation: the algorithm described in §4.5, §4.7 ("generate
/// schedule"). Assumes `request.participants` has already passed
/// `InvalidConfiguration`/`ImpossibleConstraints` checks.
pub fn generate(request: GenerationRequest) -> Result<Schedule, SchedulerError> {
    let n = request.participants.len();
    log::debug!("generation state: INIT -> BOUND ({n} participants)");

    let structure = generate_structure(n)?;
    let rpl = rounds_per_leg(n);
    let total_rounds = total_rounds_for(n, request.legs);
    let expected_total = expected_event_count(n, request.legs);

    let sizing = ScheduleSizing {
        participant_count: n,
        legs: request.legs,
        rounds_per_leg: rpl,
        total_rounds,
    };
    let bound = bind_positions(&request.participants, &request.participant_order, request.random_source);

    let mut context = SchedulingContext::new(request.participants.clone(), sizing);
    let mut collector = ConstraintViolationCollector::new();
    let mut leg1_rounds: Vec<Vec<Event>> = Vec::with_capacity(structure.rounds.len());
    let mut committed_count = 0usize;
    let mut rejected_count = 0usize;
    let mut aborted = false;

    log::debug!("generation state: BOUND -> GENERATING (leg 1 of {})", request.legs);

    for (round_idx, positional_round) in structure.rounds.iter().enumerate() {
        if aborted {
            break;
        }
        let round_number = (round_idx + 1) as u32;
        let mut round_events = Vec::new();
        for (pairing_idx, pairing) in positional_round.pairings.iter().enumerate() {
            let Some((seat_a, seat_b)) = seat_pair(pairing.tokens()) else {
                continue;
            };
            let a = bound[seat_a - 1].clone();
            let b = bound[seat_b - 1].clone();
            let (first, second) = request
                .orderer
                .order(a, b, round_number, pairing_idx, &context, request.random_source);
            let candidate =
                Event::new(vec![first, second], Some(Round::new(round_number))).expect("two distinct seated participants");

            match request.constraints.evaluate(&candidate, &context) {
                Ok(()) => {
                    round_events.push(candidate.clone());
                    context.commit(candidate);
                    committed_count += 1;
                }
                Err((constraint_name, reason)) => {
                    log::debug!("round {round_number}: candidate rejected by {constraint_name}: {reason}");
                    let affected = candidate.participants().iter().map(|p| p.id.clone()).collect();
                    collector.record(ConstraintViolation {
                        constraint_name,
                        candidate,
                        reason,
                        affected_participants: affected,
                        round_number: Some(round_number),
                    });
                    rejected_count += 1;
                }
            }

            if let Some(progress) = request.progress {
                let update = GenerationProgress {
                    committed_count,
                    rejected_count,
                    expected_count: expected_total,
                    current_round: round_number,
                    total_rounds,
                };
                if !progress(&update) {
                    aborted = true;
                    break;
                }
            }
        }
        leg1_rounds.push(round_events);
    }

    if !aborted {
        for leg_number in 2..=request.legs {
            if aborted {
                break;
            }
            let transformed = request
                .leg_strategy
                .transform_leg(&leg1_rounds, leg_number, request.random_source);
            for (offset, round_pairs) in transformed.into_iter().enumerate() {
                if aborted {
                    break;
                }
                let round_number = (leg_number - 1) * rpl + offset as u32 + 1;
                for (first, second) in round_pairs {
                    let candidate = Event::new(vec![first, second], Some(Round::new(round_number)))
                        .expect("leg strategy preserves distinct participants");

                    match request.constraints.evaluate(&candidate, &context) {
                        Ok(()) => {
                            context.commit(candidate);
                            committed_count += 1;
                        }
                        Err((constraint_name, reason)) => {
                            log::debug!("round {round_number}: candidate rejected by {constraint_name}: {reason}");
                            let affected = candidate.participants().iter().map(|p| p.id.clone()).collect();
                            collector.record(ConstraintViolation {
                                constraint_name,
                                candidate,
                                reason,
                                affected_participants: affected,
                                round_number: Some(round_number),
                            });
                            rejected_count += 1;
                        }
                    }

                    if let Some(progress) = request.progress {
                        let update = GenerationProgress {
                            committed_count,
                            rejected_count,
                            expected_count: expected_total,
                            current_round: round_number,
                            total_rounds,
                        };
                        if !progress(&update) {
                            aborted = true;
                            break;
                        }
                    }
                }
            }
        }
    }

    if committed_count == expected_total {
        log::debug!("generation state: GENERATING -> COMPLETE ({committed_count} events)");
        let metadata = schedule_metadata(n, request.legs, rpl, total_rounds);
        Ok(Schedule::new(context.events().to_vec(), metadata))
    } else {
        log::debug!("generation state: GENERATING -> INCOMPLETE ({committed_count}/{expected_total} events)");
        Err(SchedulerError::from(IncompleteScheduleError {
            expected_count: expected_total,
            actual_count: committed_count,
            participants: request.participants,
            legs: request.legs,
            violations: collector,
        }))
    }
}
