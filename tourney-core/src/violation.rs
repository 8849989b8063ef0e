//! Violation collector (§3, §8): records every rejected candidate event
//! during generation, plus derived indices used by the diagnostic report.

use crate::models::Event;
use std::collections::BTreeMap;

/// A single rejected candidate: the constraint that rejected it, the
/// candidate itself (never committed), the reason, the affected participant
/// ids, and the round it was attempted in.
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    pub constraint_name: String,
    pub candidate: Event,
    pub reason: String,
    pub affected_participants: Vec<String>,
    pub round_number: Option<u32>,
}

/// Append-only during generation; read-only once generation ends. Derives
/// by-constraint-name, by-participant-id, and affected-rounds-with-counts
/// indices on demand rather than maintaining them incrementally, since they
/// are only consulted once, when rendering a diagnostic report.
#[derive(Debug, Clone, Default)]
pub struct ConstraintViolationCollector {
    violations: Vec<ConstraintViolation>,
}

impl ConstraintViolationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, violation: ConstraintViolation) {
        self.violations.push(violation);
    }

    pub fn all(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Distinct constraint names that produced at least one violation, in
    /// stable sorted order (used when rendering the diagnostic report).
    pub fn distinct_constraint_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .violations
            .iter()
            .map(|v| v.constraint_name.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    pub fn count_for(&self, constraint_name: &str) -> usize {
        self.violations
            .iter()
            .filter(|v| v.constraint_name == constraint_name)
            .count()
    }

    /// The top `n` participants most often named in violations of the given
    /// constraint, ordered by occurrence count descending, ties broken by id.
    pub fn most_affected(&self, constraint_name: &str, n: usize) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for v in self.violations.iter().filter(|v| v.constraint_name == constraint_name) {
            for p in &v.affected_participants {
                *counts.entry(p.clone()).or_insert(0) += 1;
            }
        }
        let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

    /// Round number -> violation count, for the given constraint, in round
    /// order.
    pub fn affected_rounds(&self, constraint_name: &str) -> Vec<(u32, usize)> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for v in self.violations.iter().filter(|v| v.constraint_name == constraint_name) {
            if let Some(round) = v.round_number {
                *counts.entry(round).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }
}
