//! The constraint evaluation pipeline (§4.1): a predicate over (candidate
//! Event, SchedulingContext), composed short-circuit into an ordered
//! `ConstraintSet`, built via a fluent, append-only builder.

mod built_in;

pub use built_in::{
    CallableConstraint, ConsecutiveRoleConstraint, ConstraintArgError, MetadataConstraint,
    MetadataRule, MinimumRestPeriodsConstraint, NoRepeatPairings, RoleKind, SeedProtectionConstraint,
};

use crate::context::SchedulingContext;
use crate::models::Event;
use std::any::Any;
use std::sync::Arc;

/// The result of evaluating a constraint against a candidate.
#[derive(Debug, Clone)]
pub enum ConstraintOutcome {
    Satisfied,
    Violated { reason: String },
}

impl ConstraintOutcome {
    pub fn violated(reason: impl Into<String>) -> Self {
        ConstraintOutcome::Violated { reason: reason.into() }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, ConstraintOutcome::Satisfied)
    }
}

/// A predicate over (candidate, context) with a stable name. Introspection
/// accessors consulted by the diagnostic subsystem are exposed via
/// `as_any`, a capability query rather than runtime reflection (§9).
pub trait Constraint: std::fmt::Debug {
    fn name(&self) -> &str;
    fn evaluate(&self, candidate: &Event, context: &SchedulingContext) -> ConstraintOutcome;
    fn clone_box(&self) -> Box<dyn Constraint>;
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Constraint> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An ordered, short-circuited composition of constraints: the candidate is
/// rejected as soon as one constraint reports not-satisfied.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Box<dyn Constraint>>,
}

impl ConstraintSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    /// Evaluates every constraint in order; returns the first violation's
    /// (constraint name, reason), or `Ok(())` if all are satisfied. Ordering
    /// is significant only for performance: the final committed event always
    /// satisfies every constraint.
    pub fn evaluate(&self, candidate: &Event, context: &SchedulingContext) -> Result<(), (String, String)> {
        for constraint in &self.constraints {
            if let ConstraintOutcome::Violated { reason } = constraint.evaluate(candidate, context) {
                return Err((constraint.name().to_string(), reason));
            }
        }
        Ok(())
    }

    pub fn has_constraint_named(&self, name: &str) -> bool {
        self.constraints.iter().any(|c| c.name() == name)
    }
}

/// Append-only, fluent builder for a [`ConstraintSet`]. Each `build()` call
/// yields an independent snapshot (a clone of the accumulated constraints),
/// so the same builder may be reused to produce several sets.
#[derive(Debug, Default)]
pub struct ConstraintSetBuilder {
    constraints: Vec<Box<dyn Constraint>>,
}

impl ConstraintSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    pub fn no_repeat_pairings(self) -> Self {
        self.push(NoRepeatPairings)
    }

    pub fn minimum_rest_periods(self, k: u32) -> Result<Self, ConstraintArgError> {
        let constraint = MinimumRestPeriodsConstraint::new(k)?;
        Ok(self.push(constraint))
    }

    pub fn seed_protection(self, top_n: u32, fraction: f64) -> Result<Self, ConstraintArgError> {
        let constraint = SeedProtectionConstraint::new(top_n, fraction)?;
        Ok(self.push(constraint))
    }

    pub fn consecutive_role(self, limit: u32, role_kind: RoleKind) -> Result<Self, ConstraintArgError> {
        let constraint = ConsecutiveRoleConstraint::new(limit, role_kind)?;
        Ok(self.push(constraint))
    }

    pub fn metadata_require_same_value(self, key: impl Into<String>) -> Self {
        self.push(MetadataConstraint::new(MetadataRule::RequireSameValue { key: key.into() }))
    }

    pub fn metadata_require_different_values(self, key: impl Into<String>) -> Self {
        self.push(MetadataConstraint::new(MetadataRule::RequireDifferentValues { key: key.into() }))
    }

    pub fn metadata_require_adjacent_values(self, key: impl Into<String>) -> Self {
        self.push(MetadataConstraint::new(MetadataRule::RequireAdjacentValues { key: key.into() }))
    }

    pub fn metadata_max_unique_values(self, key: impl Into<String>, n: usize) -> Self {
        self.push(MetadataConstraint::new(MetadataRule::MaxUniqueValues { key: key.into(), n }))
    }

    pub fn custom(
        self,
        name: impl Into<String>,
        predicate: impl Fn(&Event, &SchedulingContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.push(CallableConstraint::new(name, Arc::new(predicate)))
    }

    pub fn build(&self) -> ConstraintSet {
        ConstraintSet {
            constraints: self.constraints.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ScheduleSizing, SchedulingContext};
    use crate::models::{Participant, Round};

    fn sizing() -> ScheduleSizing {
        ScheduleSizing {
            participant_count: 4,
            legs: 1,
            rounds_per_leg: 3,
            total_rounds: 3,
        }
    }

    #[test]
    fn no_repeat_pairings_rejects_second_meeting() {
        let set = ConstraintSetBuilder::new().no_repeat_pairings().build();
        let a = Participant::new("a", "A");
        let b = Participant::new("b", "B");
        let mut context = SchedulingContext::new(vec![a.clone(), b.clone()], sizing());
        let first = Event::new(vec![a.clone(), b.clone()], Some(Round::new(1))).unwrap();
        assert!(set.evaluate(&first, &context).is_ok());
        context.commit(first);

        let second = Event::new(vec![b, a], Some(Round::new(2))).unwrap();
        assert!(set.evaluate(&second, &context).is_err());
    }

    #[test]
    fn build_snapshots_are_independent() {
        let builder = ConstraintSetBuilder::new().no_repeat_pairings();
        let first = builder.build();
        let builder = builder.metadata_require_same_value("pool");
        let second = builder.build();
        assert_eq!(first.constraints().len(), 1);
        assert_eq!(second.constraints().len(), 2);
    }

    #[test]
    fn custom_constraint_runs_predicate() {
        let set = ConstraintSetBuilder::new()
            .custom("no_c", |candidate: &Event, _ctx: &SchedulingContext| {
                !candidate.participants().iter().any(|p| p.id == "c")
            })
            .build();
        let a = Participant::new("a", "A");
        let c = Participant::new("c", "C");
        let context = SchedulingContext::new(vec![a.clone(), c.clone()], sizing());
        let candidate = Event::new(vec![a, c], Some(Round::new(1))).unwrap();
        let result = set.evaluate(&candidate, &context);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().0, "no_c");
    }
}
