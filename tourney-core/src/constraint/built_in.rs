//! Built-in constraint catalogue (§4.1).

use super::{Constraint, ConstraintOutcome};
use crate::context::SchedulingContext;
use crate::models::Event;
use std::any::Any;
use std::sync::Arc;

/// Raised when a built-in constraint is constructed with invalid arguments
/// (e.g. `MinimumRestPeriodsConstraint(0)`). Converted to
/// [`crate::diagnostics::InvalidConfigurationError`] at the façade boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ConstraintArgError(pub String);

/// Rejects if the unordered set of participant ids in the candidate already
/// appears in any event in the context.
#[derive(Debug, Clone, Copy)]
pub struct NoRepeatPairings;

impl Constraint for NoRepeatPairings {
    fn name(&self) -> &str {
        "NoRepeatPairings"
    }

    fn evaluate(&self, candidate: &Event, context: &SchedulingContext) -> ConstraintOutcome {
        let candidate_key = candidate.unordered_key();
        for event in context.events() {
            if event.unordered_key() == candidate_key {
                let ids: Vec<&str> = candidate.participants().iter().map(|p| p.id.as_str()).collect();
                return ConstraintOutcome::violated(format!("{ids:?} have already played each other"));
            }
        }
        ConstraintOutcome::Satisfied
    }

    fn clone_box(&self) -> Box<dyn Constraint> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// For each participant p in the candidate, the candidate's round number
/// minus the greatest round number of any prior event containing p must
/// exceed `k`.
#[derive(Debug, Clone, Copy)]
pub struct MinimumRestPeriodsConstraint {
    pub k: u32,
}

impl MinimumRestPeriodsConstraint {
    pub fn new(k: u32) -> Result<Self, ConstraintArgError> {
        if k < 1 {
            return Err(ConstraintArgError(
                "MinimumRestPeriodsConstraint requires k >= 1".to_string(),
            ));
        }
        Ok(Self { k })
    }
}

impl Constraint for MinimumRestPeriodsConstraint {
    fn name(&self) -> &str {
        "MinimumRestPeriodsConstraint"
    }

    fn evaluate(&self, candidate: &Event, context: &SchedulingContext) -> ConstraintOutcome {
        let Some(round) = candidate.round_number() else {
            return ConstraintOutcome::Satisfied;
        };
        for participant in candidate.participants() {
            let last_round = context
                .events_for(&participant.id)
                .filter_map(|e| e.round_number())
                .max();
            if let Some(last_round) = last_round {
                if round.saturating_sub(last_round) <= self.k {
                    return ConstraintOutcome::violated(format!(
                        "participant '{}' last played round {last_round}, needs more than {} rounds of rest before round {round}",
                        participant.id, self.k
                    ));
                }
            }
        }
        ConstraintOutcome::Satisfied
    }

    fn clone_box(&self) -> Box<dyn Constraint> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Rejects any candidate in rounds `1..=ceil(fraction * total_rounds)` in
/// which both participants have a seed `<= top_n`.
#[derive(Debug, Clone, Copy)]
pub struct SeedProtectionConstraint {
    pub top_n: u32,
    pub fraction: f64,
}

impl SeedProtectionConstraint {
    pub fn new(top_n: u32, fraction: f64) -> Result<Self, ConstraintArgError> {
        if top_n < 1 {
            return Err(ConstraintArgError("SeedProtectionConstraint requires topN >= 1".to_string()));
        }
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConstraintArgError(
                "SeedProtectionConstraint requires 0 < fraction <= 1".to_string(),
            ));
        }
        Ok(Self { top_n, fraction })
    }

    /// The last protected round, per decision (b) in DESIGN.md: ceiling,
    /// rounded away from zero.
    pub fn protected_through(&self, total_rounds: u32) -> u32 {
        (self.fraction * total_rounds as f64).ceil() as u32
    }
}

impl Constraint for SeedProtectionConstraint {
    fn name(&self) -> &str {
        "SeedProtectionConstraint"
    }

    fn evaluate(&self, candidate: &Event, context: &SchedulingContext) -> ConstraintOutcome {
        let Some(round) = candidate.round_number() else {
            return ConstraintOutcome::Satisfied;
        };
        let protected_through = self.protected_through(context.total_rounds());
        if round > protected_through {
            return ConstraintOutcome::Satisfied;
        }
        let seeds: Vec<Option<u32>> = candidate.participants().iter().map(|p| p.seed).collect();
        let all_protected = seeds.iter().all(|s| matches!(s, Some(seed) if *seed <= self.top_n));
        if all_protected {
            let ids: Vec<&str> = candidate.participants().iter().map(|p| p.id.as_str()).collect();
            return ConstraintOutcome::violated(format!(
                "{ids:?} are both seeded within the top {} during the protected window (rounds 1..{protected_through})",
                self.top_n
            ));
        }
        ConstraintOutcome::Satisfied
    }

    fn clone_box(&self) -> Box<dyn Constraint> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Which notion of "role slot" a [`ConsecutiveRoleConstraint`] tracks. Both
/// variants are evaluated identically for binary events (the only arity this
/// engine produces); the distinction exists so n-ary events have a place to
/// diverge in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    HomeAway,
    Position,
}

/// For each participant, the count of most-recent consecutive events in
/// which the participant occupied the same role slot must not exceed `limit`
/// if the candidate would extend that run.
#[derive(Debug, Clone, Copy)]
pub struct ConsecutiveRoleConstraint {
    pub limit: u32,
    pub role_kind: RoleKind,
}

impl ConsecutiveRoleConstraint {
    pub fn new(limit: u32, role_kind: RoleKind) -> Result<Self, ConstraintArgError> {
        if limit < 1 {
            return Err(ConstraintArgError("ConsecutiveRoleConstraint requires limit >= 1".to_string()));
        }
        Ok(Self { limit, role_kind })
    }
}

impl Constraint for ConsecutiveRoleConstraint {
    fn name(&self) -> &str {
        "ConsecutiveRoleConstraint"
    }

    fn evaluate(&self, candidate: &Event, context: &SchedulingContext) -> ConstraintOutcome {
        for participant in candidate.participants() {
            let candidate_role = candidate.role_of(&participant.id).expect("participant is in candidate");

            let mut history: Vec<&Event> = context.events_for(&participant.id).collect();
            history.sort_by_key(|e| e.round_number().unwrap_or(0));
            history.reverse();

            let mut streak = 0u32;
            for event in history {
                if event.role_of(&participant.id) == Some(candidate_role) {
                    streak += 1;
                } else {
                    break;
                }
            }
            if streak + 1 > self.limit {
                return ConstraintOutcome::violated(format!(
                    "participant '{}' would play {} consecutive events in the same role slot, exceeding limit {}",
                    participant.id,
                    streak + 1,
                    self.limit
                ));
            }
        }
        ConstraintOutcome::Satisfied
    }

    fn clone_box(&self) -> Box<dyn Constraint> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Counts distinct values by equality rather than by hashing, since
/// `MetadataValue` carries an `f64` variant and so cannot derive `Hash`/`Eq`.
/// Event arities are small (participant counts, not schedule sizes), so the
/// quadratic comparison is cheap in practice.
fn count_distinct<T: PartialEq>(values: &[T]) -> usize {
    let mut distinct: Vec<&T> = Vec::with_capacity(values.len());
    for v in values {
        if !distinct.iter().any(|existing| *existing == v) {
            distinct.push(v);
        }
    }
    distinct.len()
}

/// Parametric metadata-key rules (§4.1).
#[derive(Debug, Clone)]
pub enum MetadataRule {
    RequireSameValue { key: String },
    RequireDifferentValues { key: String },
    RequireAdjacentValues { key: String },
    MaxUniqueValues { key: String, n: usize },
}

#[derive(Debug, Clone)]
pub struct MetadataConstraint {
    rule: MetadataRule,
}

impl MetadataConstraint {
    pub fn new(rule: MetadataRule) -> Self {
        Self { rule }
    }
}

impl Constraint for MetadataConstraint {
    fn name(&self) -> &str {
        "MetadataConstraint"
    }

    fn evaluate(&self, candidate: &Event, _context: &SchedulingContext) -> ConstraintOutcome {
        match &self.rule {
            MetadataRule::RequireSameValue { key } => {
                let values: Vec<_> = candidate.participants().iter().map(|p| p.metadata_get(key)).collect();
                if let Some(first) = values.first() {
                    if values.iter().any(|v| v != first) {
                        return ConstraintOutcome::violated(format!(
                            "participants do not share the same value at metadata key '{key}'"
                        ));
                    }
                }
                ConstraintOutcome::Satisfied
            }
            MetadataRule::RequireDifferentValues { key } => {
                let values: Vec<_> = candidate.participants().iter().map(|p| p.metadata_get(key)).collect();
                if count_distinct(&values) != values.len() {
                    return ConstraintOutcome::violated(format!(
                        "participants do not have pairwise distinct values at metadata key '{key}'"
                    ));
                }
                ConstraintOutcome::Satisfied
            }
            MetadataRule::RequireAdjacentValues { key } => {
                let values: Vec<i64> = candidate
                    .participants()
                    .iter()
                    .filter_map(|p| p.metadata_get(key).and_then(|v| v.as_integer()))
                    .collect();
                if values.len() == candidate.participants().len() && values.len() >= 2 {
                    let diff = (values[0] - values[1]).abs();
                    if diff != 1 {
                        return ConstraintOutcome::violated(format!(
                            "values at metadata key '{key}' differ by {diff}, expected exactly 1"
                        ));
                    }
                }
                ConstraintOutcome::Satisfied
            }
            MetadataRule::MaxUniqueValues { key, n } => {
                let values: Vec<_> = candidate.participants().iter().map(|p| p.metadata_get(key)).collect();
                let distinct = count_distinct(&values);
                if distinct > *n {
                    return ConstraintOutcome::violated(format!(
                        "{distinct} distinct values at metadata key '{key}' exceed the maximum of {n}"
                    ));
                }
                ConstraintOutcome::Satisfied
            }
        }
    }

    fn clone_box(&self) -> Box<dyn Constraint> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Adapter wrapping a user predicate; its name is a caller-supplied label.
/// Predicates are assumed total: per decision (c) in DESIGN.md, a panicking
/// predicate is never caught, and propagates uncaught through the engine.
#[derive(Clone)]
pub struct CallableConstraint {
    label: String,
    predicate: Arc<dyn Fn(&Event, &SchedulingContext) -> bool + Send + Sync>,
}

impl CallableConstraint {
    pub fn new(label: impl Into<String>, predicate: Arc<dyn Fn(&Event, &SchedulingContext) -> bool + Send + Sync>) -> Self {
        Self {
            label: label.into(),
            predicate,
        }
    }
}

impl std::fmt::Debug for CallableConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallableConstraint").field("label", &self.label).finish()
    }
}

impl Constraint for CallableConstraint {
    fn name(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, candidate: &Event, context: &SchedulingContext) -> ConstraintOutcome {
        if (self.predicate)(candidate, context) {
            ConstraintOutcome::Satisfied
        } else {
            ConstraintOutcome::violated(format!("custom constraint '{}' rejected this candidate", self.label))
        }
    }

    fn clone_box(&self) -> Box<dyn Constraint> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
