//! Error taxonomy and diagnostic report rendering (§4.8, §6, §7).
//!
//! Three failure types, each carrying its own typed accessors and a
//! `diagnostic_report()` method producing a stable, matchable-in-tests UTF-8
//! text report. `SchedulerError` is the single error type returned at the
//! façade boundary, one variant per failure type, mirroring the teacher
//! library's `SolverError` enum.

use crate::models::Participant;
use crate::violation::ConstraintViolationCollector;
use thiserror::Error;

/// Misuse at the entry point: participant count < 2, duplicate ids,
/// non-positive legs, or a constraint whose constructor arguments are
/// themselves invalid.
#[derive(Debug, Clone)]
pub struct InvalidConfigurationError {
    pub issue: String,
}

impl InvalidConfigurationError {
    pub fn new(issue: impl Into<String>) -> Self {
        Self { issue: issue.into() }
    }

    pub fn diagnostic_report(&self) -> String {
        let mut out = String::new();
        out.push_str("INVALID CONFIGURATION DIAGNOSTIC REPORT\n");
        out.push_str("=========================================\n\n");
        out.push_str("CONFIGURATION DETAILS\n");
        out.push_str(&format!("  Issue: {}\n\n", self.issue));
        out.push_str("REQUIREMENTS\n");
        out.push_str("  - Participant count must be at least 2.\n");
        out.push_str("  - Participant ids must be unique.\n");
        out.push_str("  - Legs must be a positive integer.\n");
        out.push_str("  - Constraint parameters must satisfy their own validity constraints.\n");
        out
    }
}

impl std::fmt::Display for InvalidConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid configuration: {}", self.issue)
    }
}

impl std::error::Error for InvalidConfigurationError {}

/// Raised when pre-generation static analysis proves infeasibility (e.g.
/// required rest exceeds available rounds). Carries the conflicting
/// constraint names and the scenario sizes.
#[derive(Debug, Clone)]
pub struct ImpossibleConstraintsError {
    pub conflicting_constraints: Vec<String>,
    pub participant_count: usize,
    pub legs: u32,
    pub total_rounds: u32,
    pub explanation: String,
}

impl ImpossibleConstraintsError {
    pub fn diagnostic_report(&self) -> String {
        let mut out = String::new();
        out.push_str("IMPOSSIBLE CONSTRAINTS DIAGNOSTIC REPORT\n");
        out.push_str("=========================================\n\n");
        out.push_str("MATHEMATICAL ANALYSIS\n");
        out.push_str(&format!("  Participants: {}\n", self.participant_count));
        out.push_str(&format!("  Legs: {}\n", self.legs));
        out.push_str(&format!("  Total rounds: {}\n", self.total_rounds));
        out.push_str(&format!(
            "  Total events needed: {}\n\n",
            crate::counts::expected_event_count(self.participant_count, self.legs)
        ));
        out.push_str("CONSTRAINT VIOLATIONS\n");
        for name in &self.conflicting_constraints {
            out.push_str(&format!("  {name}: {}\n", self.explanation));
        }
        out.push('\n');
        out.push_str("SUGGESTIONS\n");
        out.push_str("  - Relax the conflicting constraint's parameters.\n");
        out.push_str("  - Add more participants or legs to create room for the constraint.\n");
        out
    }
}

impl std::fmt::Display for ImpossibleConstraintsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "impossible constraints: {} ({})",
            self.conflicting_constraints.join(", "),
            self.explanation
        )
    }
}

impl std::error::Error for ImpossibleConstraintsError {}

/// Raised after a full generation attempt leaves missing events. Carries the
/// expected/actual counts, the full violation trail, the participants, and
/// the legs value.
#[derive(Debug, Clone)]
pub struct IncompleteScheduleError {
    pub expected_count: usize,
    pub actual_count: usize,
    pub participants: Vec<Participant>,
    pub legs: u32,
    pub violations: ConstraintViolationCollector,
}

impl IncompleteScheduleError {
    fn suggestions(&self) -> Vec<String> {
        let names = self.violations.distinct_constraint_names();
        let mut suggestions = Vec::new();
        if names.iter().any(|n| n == "ConsecutiveRoleConstraint") {
            suggestions.push("Consider raising the ConsecutiveRoleConstraint limit.".to_string());
        }
        if names.iter().any(|n| n == "MinimumRestPeriodsConstraint") {
            suggestions.push("Consider lowering the MinimumRestPeriodsConstraint minimum.".to_string());
        }
        suggestions.push("Consider adding more participants.".to_string());
        suggestions.push("Consider adding more legs.".to_string());
        suggestions.push("Consider relaxing constraints.".to_string());
        suggestions
    }

    pub fn diagnostic_report(&self) -> String {
        let mut out = String::new();
        out.push_str("INCOMPLETE SCHEDULE DIAGNOSTIC REPORT\n");
        out.push_str("======================================\n\n");
        out.push_str("CONFIGURATION DETAILS\n");
        out.push_str(&format!("  Expected: {}\n", self.expected_count));
        out.push_str(&format!("  Actual: {}\n", self.actual_count));
        out.push_str(&format!("  Missing: {}\n", self.expected_count.saturating_sub(self.actual_count)));
        out.push_str(&format!("  Participants: {}\n", self.participants.len()));
        out.push_str(&format!("  Legs: {}\n", self.legs));
        out.push_str("  Algorithm: round-robin\n\n");

        out.push_str("CONSTRAINT VIOLATIONS\n");
        for name in self.violations.distinct_constraint_names() {
            let count = self.violations.count_for(&name);
            out.push_str(&format!("  {name}: {count} violations\n"));
            let top = self.violations.most_affected(&name, 3);
            if !top.is_empty() {
                let ids: Vec<String> = top.into_iter().map(|(id, _)| id).collect();
                out.push_str(&format!("    Most affected: {}\n", ids.join(", ")));
            }
            let rounds = self.violations.affected_rounds(&name);
            if !rounds.is_empty() {
                let rendered: Vec<String> = rounds
                    .into_iter()
                    .map(|(round, count)| format!("{round} ({count})"))
                    .collect();
                out.push_str(&format!("    Affected rounds: {}\n", rendered.join(", ")));
            }
        }
        out.push('\n');

        out.push_str("SUGGESTIONS\n");
        for suggestion in self.suggestions() {
            out.push_str(&format!("  - {suggestion}\n"));
        }
        out
    }
}

impl std::fmt::Display for IncompleteScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "incomplete schedule: expected {} events, produced {}",
            self.expected_count, self.actual_count
        )
    }
}

impl std::error::Error for IncompleteScheduleError {}

/// The single error type returned at the façade boundary. One variant per
/// failure type (§7); all three are surfaced synchronously, never swallowed.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfigurationError),
    #[error(transparent)]
    ImpossibleConstraints(#[from] ImpossibleConstraintsError),
    #[error(transparent)]
    IncompleteSchedule(#[from] IncompleteScheduleError),
}

impl SchedulerError {
    pub fn diagnostic_report(&self) -> String {
        match self {
            SchedulerError::InvalidConfiguration(e) => e.diagnostic_report(),
            SchedulerError::ImpossibleConstraints(e) => e.diagnostic_report(),
            SchedulerError::IncompleteSchedule(e) => e.diagnostic_report(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_report_has_required_sections() {
        let err = InvalidConfigurationError::new("participant count must be at least 2, got 1");
        let report = err.diagnostic_report();
        assert!(report.contains("INVALID CONFIGURATION DIAGNOSTIC REPORT"));
        assert!(report.contains("CONFIGURATION DETAILS"));
        assert!(report.contains("REQUIREMENTS"));
    }

    #[test]
    fn incomplete_schedule_report_lists_violation_counts() {
        let mut violations = ConstraintViolationCollector::new();
        let a = Participant::new("a", "A");
        let b = Participant::new("b", "B");
        let candidate = crate::models::Event::new(vec![a, b], Some(crate::models::Round::new(4))).unwrap();
        violations.record(crate::violation::ConstraintViolation {
            constraint_name: "NoRepeatPairings".into(),
            candidate,
            reason: "already played".into(),
            affected_participants: vec!["a".into(), "b".into()],
            round_number: Some(4),
        });
        let err = IncompleteScheduleError {
            expected_count: 12,
            actual_count: 6,
            participants: vec![Participant::new("a", "A"), Participant::new("b", "B")],
            legs: 2,
            violations,
        };
        let report = err.diagnostic_report();
        assert!(report.contains("INCOMPLETE SCHEDULE DIAGNOSTIC REPORT"));
        assert!(report.contains("NoRepeatPairings: 1 violations"));
        assert!(report.contains("4 (1)"));
    }
}
