//! Participant orderer (§4.3): assigns roles ("home"/"away") to the two
//! participants of a candidate pairing before constraint evaluation, since
//! role-aware constraints (`ConsecutiveRoleConstraint`) need the assignment
//! as an input.
//!
//! Per decision (a) in DESIGN.md, the orderer only runs during base-leg
//! (leg 1) construction; leg strategies fully determine role order for legs
//! 2 and beyond, so the Mirrored invariant (§8) holds regardless of which
//! orderer is configured. See `generator.rs`.

use crate::context::SchedulingContext;
use crate::models::Participant;
use crate::random::{discriminant, RandomSource};

/// Produces the ordered tuple (first, second) for an unordered candidate
/// pair. `index_in_round` is the pairing's 0-based position within its
/// round's canonical circle-method order.
pub trait ParticipantOrderer: std::fmt::Debug {
    fn order(
        &self,
        a: Participant,
        b: Participant,
        round_number: u32,
        index_in_round: usize,
        context: &SchedulingContext,
        random_source: &dyn RandomSource,
    ) -> (Participant, Participant);
}

/// Preserves the order produced by the generator; no re-ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOrderer;

impl ParticipantOrderer for StaticOrderer {
    fn order(
        &self,
        a: Participant,
        b: Participant,
        _round_number: u32,
        _index_in_round: usize,
        _context: &SchedulingContext,
        _random_source: &dyn RandomSource,
    ) -> (Participant, Participant) {
        (a, b)
    }
}

/// Flips order based on the candidate's index within its round, producing
/// intra-round balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternatingOrderer;

impl ParticipantOrderer for AlternatingOrderer {
    fn order(
        &self,
        a: Participant,
        b: Participant,
        _round_number: u32,
        index_in_round: usize,
        _context: &SchedulingContext,
        _random_source: &dyn RandomSource,
    ) -> (Participant, Participant) {
        if index_in_round % 2 == 1 {
            (b, a)
        } else {
            (a, b)
        }
    }
}

/// Consults the context: whichever candidate has fewer prior first-role
/// appearances becomes first; ties break to the current generator order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedOrderer;

impl BalancedOrderer {
    fn first_role_count(participant_id: &str, context: &SchedulingContext) -> usize {
        context
            .events_for(participant_id)
            .filter(|e| e.role_of(participant_id) == Some(0))
            .count()
    }
}

impl ParticipantOrderer for BalancedOrderer {
    fn order(
        &self,
        a: Participant,
        b: Participant,
        _round_number: u32,
        _index_in_round: usize,
        context: &SchedulingContext,
        _random_source: &dyn RandomSource,
    ) -> (Participant, Participant) {
        let a_count = Self::first_role_count(&a.id, context);
        let b_count = Self::first_role_count(&b.id, context);
        if b_count < a_count {
            (b, a)
        } else {
            (a, b)
        }
    }
}

/// Derives a stable bit from a hash of (participant ids, round number,
/// candidate index) using the supplied random source and swaps accordingly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededRandomOrderer;

impl ParticipantOrderer for SeededRandomOrderer {
    fn order(
        &self,
        a: Participant,
        b: Participant,
        round_number: u32,
        index_in_round: usize,
        _context: &SchedulingContext,
        random_source: &dyn RandomSource,
    ) -> (Participant, Participant) {
        let key = discriminant(&[&a.id, &b.id, &round_number, &index_in_round]);
        if random_source.choose_bool(key) {
            (b, a)
        } else {
            (a, b)
        }
    }
}
