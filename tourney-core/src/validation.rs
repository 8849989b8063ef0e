//! Pre-generation validation (§4.8, §7): entry-point misuse checks that raise
//! `InvalidConfiguration`, and the static infeasibility proof that raises
//! `ImpossibleConstraints` before a single round is attempted.
//!
//! Per decision (d) in DESIGN.md, the only statically provable infeasibility
//! this engine recognizes is `MinimumRestPeriodsConstraint`: if its `k` is at
//! least `total_rounds - 1` and there is more than one round-robin meeting to
//! schedule (participant_count > 2), no arrangement of legs can satisfy it,
//! so there is no point attempting generation.

use crate::constraint::{ConstraintSet, MinimumRestPeriodsConstraint};
use crate::counts::total_rounds;
use crate::diagnostics::{ImpossibleConstraintsError, InvalidConfigurationError};
use crate::models::Participant;

/// Participant count and id-uniqueness checks; legs must be positive.
pub fn validate_configuration(participants: &[Participant], legs: u32) -> Result<(), InvalidConfigurationError> {
    if participants.len() < 2 {
        return Err(InvalidConfigurationError::new(format!(
            "participant count must be at least 2, got {}",
            participants.len()
        )));
    }
    if legs == 0 {
        return Err(InvalidConfigurationError::new("legs must be a positive integer, got 0"));
    }

    let mut seen = std::collections::HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.id.as_str()) {
            return Err(InvalidConfigurationError::new(format!(
                "duplicate participant id '{}'",
                p.id
            )));
        }
    }
    Ok(())
}

/// Validates that an explicit participant order, if given, is a permutation
/// of the known participant ids.
pub fn validate_participant_order(
    participants: &[Participant],
    order: &[String],
) -> Result<(), InvalidConfigurationError> {
    if order.len() != participants.len() {
        return Err(InvalidConfigurationError::new(format!(
            "explicit participant order has {} entries, expected {}",
            order.len(),
            participants.len()
        )));
    }
    let known: std::collections::HashSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
    let mut seen = std::collections::HashSet::with_capacity(order.len());
    for id in order {
        if !known.contains(id.as_str()) {
            return Err(InvalidConfigurationError::new(format!(
                "explicit participant order references unknown id '{id}'"
            )));
        }
        if !seen.insert(id.as_str()) {
            return Err(InvalidConfigurationError::new(format!(
                "explicit participant order repeats id '{id}'"
            )));
        }
    }
    Ok(())
}

/// Proves, before generation, that `MinimumRestPeriodsConstraint` cannot be
/// satisfied with the given sizing.
pub fn check_static_infeasibility(
    participant_count: usize,
    legs: u32,
    constraints: &ConstraintSet,
) -> Result<(), ImpossibleConstraintsError> {
    if participant_count <= 2 {
        return Ok(());
    }
    let rounds = total_rounds(participant_count, legs);

    let mut conflicting = Vec::new();
    for constraint in constraints.constraints() {
        if let Some(rest) = constraint.as_any().downcast_ref::<MinimumRestPeriodsConstraint>() {
            if rounds < 2 || rest.k >= rounds - 1 {
                conflicting.push(constraint.name().to_string());
            }
        }
    }

    if conflicting.is_empty() {
        return Ok(());
    }

    Err(ImpossibleConstraintsError {
        conflicting_constraints: conflicting,
        participant_count,
        legs,
        total_rounds: rounds,
        explanation: format!(
            "requires more rest than {rounds} rounds can provide for {participant_count} participants"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintSetBuilder;

    fn participants(n: usize) -> Vec<Participant> {
        (0..n).map(|i| Participant::new(format!("p{i}"), format!("P{i}"))).collect()
    }

    #[test]
    fn rejects_too_few_participants() {
        let err = validate_configuration(&participants(1), 1).unwrap_err();
        assert!(err.issue.contains("at least 2"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut ps = participants(2);
        ps[1].id = ps[0].id.clone();
        let err = validate_configuration(&ps, 1).unwrap_err();
        assert!(err.issue.contains("duplicate"));
    }

    #[test]
    fn rejects_zero_legs() {
        let err = validate_configuration(&participants(4), 0).unwrap_err();
        assert!(err.issue.contains("legs"));
    }

    #[test]
    fn detects_impossible_minimum_rest() {
        let constraints = ConstraintSetBuilder::new().minimum_rest_periods(10).unwrap().build();
        let err = check_static_infeasibility(4, 1, &constraints).unwrap_err();
        assert_eq!(err.conflicting_constraints, vec!["MinimumRestPeriodsConstraint"]);
    }

    #[test]
    fn accepts_satisfiable_minimum_rest() {
        let constraints = ConstraintSetBuilder::new().minimum_rest_periods(1).unwrap().build();
        assert!(check_static_infeasibility(8, 1, &constraints).is_ok());
    }

    #[test]
    fn two_participants_never_impossible() {
        let constraints = ConstraintSetBuilder::new().minimum_rest_periods(50).unwrap().build();
        assert!(check_static_infeasibility(2, 1, &constraints).is_ok());
    }
}
