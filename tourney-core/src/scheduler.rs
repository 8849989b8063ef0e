//! The public façade (§4.7): `ScheduleRequest` collects every generation
//! input behind a fluent, mut-self builder; `Scheduler` is the entry point a
//! caller (including the CLI adapter) actually calls.

use crate::constraint::ConstraintSet;
use crate::diagnostics::SchedulerError;
use crate::generator::{self, GenerationProgress, GenerationRequest};
use crate::leg::{LegStrategy, RepeatedLegStrategy};
use crate::models::{Participant, RoundSchedule, Schedule};
use crate::orderer::{ParticipantOrderer, StaticOrderer};
use crate::positional::{generate_structure as generate_positional_structure, PositionalSchedule};
use crate::random::{RandomSource, SeededRandomSource};
use crate::validation::{check_static_infeasibility, validate_configuration, validate_participant_order};

/// Every input a generation run needs. Defaults: 1 leg, `RepeatedLegStrategy`,
/// an empty `ConstraintSet`, `StaticOrderer`, the engine's default seeded
/// random source, no explicit participant order, no progress callback.
pub struct ScheduleRequest {
    participants: Vec<Participant>,
    legs: u32,
    leg_strategy: Box<dyn LegStrategy>,
    constraints: ConstraintSet,
    orderer: Box<dyn ParticipantOrderer>,
    random_source: Box<dyn RandomSource>,
    participant_order: Option<Vec<String>>,
    progress: Option<Box<dyn Fn(&GenerationProgress) -> bool>>,
}

impl ScheduleRequest {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            legs: 1,
            leg_strategy: Box::new(RepeatedLegStrategy),
            constraints: ConstraintSet::empty(),
            orderer: Box::new(StaticOrderer),
            random_source: Box::new(SeededRandomSource::default()),
            participant_order: None,
            progress: None,
        }
    }

    pub fn legs(mut self, legs: u32) -> Self {
        self.legs = legs;
        self
    }

    pub fn leg_strategy(mut self, strategy: impl LegStrategy + 'static) -> Self {
        self.leg_strategy = Box::new(strategy);
        self
    }

    pub fn constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn orderer(mut self, orderer: impl ParticipantOrderer + 'static) -> Self {
        self.orderer = Box::new(orderer);
        self
    }

    pub fn random_source(mut self, random_source: impl RandomSource + 'static) -> Self {
        self.random_source = Box::new(random_source);
        self
    }

    pub fn participant_order(mut self, order: Vec<String>) -> Self {
        self.participant_order = Some(order);
        self
    }

    pub fn progress(mut self, callback: impl Fn(&GenerationProgress) -> bool + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn legs_count(&self) -> u32 {
        self.legs
    }

    pub fn constraint_set(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn explicit_participant_order(&self) -> Option<&[String]> {
        self.participant_order.as_deref()
    }
}

/// The entry point. Implementations may, in principle, support more than one
/// generation algorithm; this engine ships exactly one (round-robin, §2).
pub trait Scheduler {
    /// Whether this scheduler can produce a full `Schedule` in a single call,
    /// as opposed to only ever streaming partial results. Always `true` for
    /// [`RoundRobinScheduler`]: the algorithm is a single greedy pass, not an
    /// incremental or anytime one.
    fn supports_complete_generation(&self) -> bool;

    /// The pure positional structure for `participant_count`, independent of
    /// any request (§4.6).
    fn generate_structure(&self, participant_count: usize) -> Result<PositionalSchedule, SchedulerError>;

    fn generate_schedule(&self, request: ScheduleRequest) -> Result<Schedule, SchedulerError>;

    /// Generates the full schedule and returns only the events of
    /// `round_number`. Round-robin generation is not incremental - there is
    /// no cheaper way to produce one round in isolation, since later rounds'
    /// committed events never affect earlier ones but earlier ones always
    /// affect later ones.
    fn generate_round(&self, request: ScheduleRequest, round_number: u32) -> Result<RoundSchedule, SchedulerError>;
}

/// The round-robin scheduler (§2): circle-method structure, constraint
/// pipeline, participant orderer, and leg strategy composed into one
/// generation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinScheduler;

impl Scheduler for RoundRobinScheduler {
    fn supports_complete_generation(&self) -> bool {
        true
    }

    fn generate_structure(&self, participant_count: usize) -> Result<PositionalSchedule, SchedulerError> {
        Ok(generate_positional_structure(participant_count)?)
    }

    fn generate_schedule(&self, request: ScheduleRequest) -> Result<Schedule, SchedulerError> {
        validate_configuration(&request.participants, request.legs)?;
        if let Some(order) = &request.participant_order {
            validate_participant_order(&request.participants, order)?;
        }
        check_static_infeasibility(request.participants.len(), request.legs, &request.constraints)?;

        generator::generate(GenerationRequest {
            participants: request.participants,
            legs: request.legs,
            leg_strategy: request.leg_strategy.as_ref(),
            constraints: &request.constraints,
            orderer: request.orderer.as_ref(),
            random_source: request.random_source.as_ref(),
            participant_order: request.participant_order,
            progress: request.progress.as_deref(),
        })
    }

    fn generate_round(&self, request: ScheduleRequest, round_number: u32) -> Result<RoundSchedule, SchedulerError> {
        let schedule = self.generate_schedule(request)?;
        let events: Vec<_> = schedule.events_in_round(round_number).cloned().collect();
        Ok(RoundSchedule { round_number, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participants(n: usize) -> Vec<Participant> {
        (0..n).map(|i| Participant::new(format!("p{i}"), format!("P{i}"))).collect()
    }

    #[test]
    fn generates_complete_schedule_for_even_group() {
        let scheduler = RoundRobinScheduler;
        let request = ScheduleRequest::new(participants(4));
        let schedule = scheduler.generate_schedule(request).unwrap();
        assert_eq!(schedule.len(), 6);
    }

    #[test]
    fn rejects_impossible_minimum_rest_before_generating() {
        let scheduler = RoundRobinScheduler;
        let request = ScheduleRequest::new(participants(4)).constraints(
            crate::constraint::ConstraintSetBuilder::new()
                .minimum_rest_periods(20)
                .unwrap()
                .build(),
        );
        let err = scheduler.generate_schedule(request).unwrap_err();
        assert!(matches!(err, SchedulerError::ImpossibleConstraints(_)));
    }

    #[test]
    fn generate_round_extracts_single_round() {
        let scheduler = RoundRobinScheduler;
        let request = ScheduleRequest::new(participants(4));
        let round = scheduler.generate_round(request, 2).unwrap();
        assert_eq!(round.round_number, 2);
        assert_eq!(round.events.len(), 2);
    }
}
